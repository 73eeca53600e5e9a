use ranked_forms::export_file_name;

use crate::forms::*;

/// Where an export goes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// `stdout` prints the export, a path writes it there, and nothing writes it in the
/// output directory under the name derived from the title of the form.
pub fn output_target(out: Option<&str>, output_dir: &Path, title: &str) -> OutputTarget {
    match out {
        Some("stdout") => OutputTarget::Stdout,
        Some(p) if !p.is_empty() => OutputTarget::File(PathBuf::from(p)),
        _ => OutputTarget::File(output_dir.join(export_file_name(title))),
    }
}

/// One interaction with the ranking of a question, as given on the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankAction {
    /// 0-based position of the item to move.
    Up(usize),
    Down(usize),
    Move { source: String, target: String },
    Keep,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankOp {
    pub question_id: String,
    pub action: RankAction,
}

// The positions start at 1 on the command line, like the ranks.
fn parse_position(s: &str) -> Option<usize> {
    match s.parse::<usize>() {
        Ok(x) if x >= 1 => Some(x - 1),
        _ => None,
    }
}

/// Parses `QID:up:POS`, `QID:down:POS`, `QID:move:SOURCE>TARGET` or `QID:keep`.
pub fn parse_rank_op(op: &str) -> FormsResult<RankOp> {
    let mut parts = op.splitn(3, ':');
    let question_id = parts.next().unwrap_or("");
    let action = match (parts.next(), parts.next()) {
        (Some("up"), Some(pos)) => parse_position(pos).map(RankAction::Up),
        (Some("down"), Some(pos)) => parse_position(pos).map(RankAction::Down),
        (Some("move"), Some(arg)) => arg
            .split_once('>')
            .filter(|(s, t)| !s.is_empty() && !t.is_empty())
            .map(|(s, t)| RankAction::Move {
                source: s.to_string(),
                target: t.to_string(),
            }),
        (Some("keep"), None) => Some(RankAction::Keep),
        _ => None,
    };
    match action {
        Some(action) if !question_id.is_empty() => Ok(RankOp {
            question_id: question_id.to_string(),
            action,
        }),
        _ => InvalidRankOperationSnafu { op }.fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_operations() {
        assert_eq!(
            parse_rank_op("q1:up:2").unwrap(),
            RankOp {
                question_id: "q1".to_string(),
                action: RankAction::Up(1)
            }
        );
        assert_eq!(parse_rank_op("q1:down:1").unwrap().action, RankAction::Down(0));
        assert_eq!(
            parse_rank_op("q1:move:Rome>Oslo").unwrap().action,
            RankAction::Move {
                source: "Rome".to_string(),
                target: "Oslo".to_string()
            }
        );
        assert_eq!(
            parse_rank_op("q1:move:Rome: the city>Oslo").unwrap().action,
            RankAction::Move {
                source: "Rome: the city".to_string(),
                target: "Oslo".to_string()
            }
        );
        assert_eq!(parse_rank_op("q1:keep").unwrap().action, RankAction::Keep);
    }

    #[test]
    fn bad_rank_operations() {
        for op in ["q1:up:0", "q1:up:x", "q1:sideways:1", ":keep", "q1", "q1:move:Rome", "q1:keep:1"] {
            let err = parse_rank_op(op).unwrap_err();
            assert!(
                matches!(err, FormsError::InvalidRankOperation { .. }),
                "{}",
                op
            );
        }
    }

    #[test]
    fn output_targets() {
        let dir = Path::new("/tmp/out");
        assert_eq!(output_target(Some("stdout"), dir, "T"), OutputTarget::Stdout);
        assert_eq!(
            output_target(Some("a.csv"), dir, "T"),
            OutputTarget::File(PathBuf::from("a.csv"))
        );
        assert_eq!(
            output_target(None, dir, "My poll"),
            OutputTarget::File(PathBuf::from("/tmp/out/My_poll_responses.csv"))
        );
    }
}
