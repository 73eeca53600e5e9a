use log::{debug, info, warn};

use ranked_forms::builder::*;
use ranked_forms::export::{render_responses, to_csv, ExportSettings};
use ranked_forms::store::FormStore;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command};
use crate::forms::config_reader::*;
use crate::forms::io_common::{output_target, parse_rank_op, RankAction, RankOp};
use crate::forms::io_store::JsonFileStore;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_json;
pub mod io_store;

#[derive(Debug, Snafu)]
pub enum FormsError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing to JSON"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot create the data directory {path}"))]
    CreatingDataDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the CSV content of {path}"))]
    ParsingCsv { source: csv::Error, path: String },

    #[snafu(display("No form with id {form_id}"))]
    FormNotFound { form_id: String },
    #[snafu(display("Form {form_id} has no responses to export"))]
    NoResponses { form_id: String },
    #[snafu(display("{source}"))]
    InvalidForm { source: FormErrors },
    #[snafu(display(
        "Cannot understand rank operation {op:?} (expected QID:up:POS, QID:down:POS, QID:move:SOURCE>TARGET or QID:keep)"
    ))]
    InvalidRankOperation { op: String },
    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfig { message: String },
    #[snafu(display("Difference detected between the export and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type FormsResult<T> = Result<T, FormsError>;

pub fn report_error(e: &FormsError) {
    warn!("Error occured {:?}", e);
    eprintln!("An error occured: {}", e);
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("trace: {}", bt);
    }
}

fn get_form<S>(store: &S, form_id: &str) -> FormsResult<Form>
where
    S: FormStore<Error = FormsError>,
{
    store
        .get_form(form_id)?
        .context(FormNotFoundSnafu { form_id })
}

/// Every form with its number of responses.
pub fn list_forms<S>(store: &S) -> FormsResult<Vec<(Form, usize)>>
where
    S: FormStore<Error = FormsError>,
{
    let mut res: Vec<(Form, usize)> = Vec::new();
    for form in store.list_forms()? {
        let count = store.responses_for(&form.id)?.len();
        res.push((form, count));
    }
    Ok(res)
}

/// One line of the `forms` listing: id, title, number of questions, number of responses.
pub fn form_line(form: &Form, response_count: usize) -> String {
    format!(
        "{}\t{}\t{} questions\t{} responses",
        form.id,
        form.title,
        form.questions.len(),
        response_count
    )
}

pub fn show_form(form: &Form) -> FormsResult<String> {
    serde_json::to_string_pretty(form).context(SerializingJsonSnafu {})
}

/// The responses of a form as text, newest first. Unlike the export, a form without
/// responses is not an error.
pub fn view_responses<S>(store: &S, settings: &Settings, form_id: &str) -> FormsResult<String>
where
    S: FormStore<Error = FormsError>,
{
    let form = get_form(store, form_id)?;
    let responses = store.responses_for(form_id)?;
    info!(
        "Showing {} responses of form {}",
        responses.len(),
        form_id
    );
    Ok(render_responses(&form, &responses, &settings.export))
}

pub fn create_form<S>(
    store: &mut S,
    definition_path: &str,
    now: DateTime<Utc>,
) -> FormsResult<Form>
where
    S: FormStore<Error = FormsError>,
{
    let definition = io_json::read_definition(definition_path)?;
    let form = definition
        .into_builder()
        .build(now)
        .context(InvalidFormSnafu {})?;
    store.save_form(&form)?;
    info!("Created form {} ({:?})", form.id, form.title);
    Ok(form)
}

pub fn update_form<S>(
    store: &mut S,
    form_id: &str,
    update_path: &str,
    now: DateTime<Utc>,
) -> FormsResult<Form>
where
    S: FormStore<Error = FormsError>,
{
    let form = get_form(store, form_id)?;
    let update = io_json::read_update(update_path)?;
    let updated = apply_update(&form, update, now).context(InvalidFormSnafu {})?;
    store.save_form(&updated)?;
    info!("Updated form {}", form_id);
    Ok(updated)
}

pub fn delete_form<S>(store: &mut S, form_id: &str) -> FormsResult<()>
where
    S: FormStore<Error = FormsError>,
{
    ensure!(store.delete_form(form_id)?, FormNotFoundSnafu { form_id });
    info!("Deleted form {}", form_id);
    Ok(())
}

fn apply_rank_op(builder: &mut ResponseBuilder, op: &RankOp) -> FormsResult<()> {
    let mut editor = builder
        .ranking_editor(&op.question_id)
        .context(InvalidFormSnafu {})?;
    let before = editor.items().to_vec();
    match &op.action {
        RankAction::Up(pos) => {
            editor.move_up(*pos, builder);
        }
        RankAction::Down(pos) => {
            editor.move_down(*pos, builder);
        }
        RankAction::Move { source, target } => {
            editor.reorder(source, target, builder);
        }
        RankAction::Keep => editor.publish(builder),
    }
    if op.action != RankAction::Keep && editor.items() == before.as_slice() {
        warn!(
            "apply_rank_op: {:?} did not change the ranking of question {}",
            op.action, op.question_id
        );
    }
    debug!(
        "apply_rank_op: question {}: {:?}",
        op.question_id,
        editor.items()
    );
    Ok(())
}

/// Records a response: the answers file first, then the rank operations in order.
pub fn submit_response<S>(
    store: &mut S,
    form_id: &str,
    answers_path: Option<&str>,
    rank_ops: &[String],
    now: DateTime<Utc>,
) -> FormsResult<Response>
where
    S: FormStore<Error = FormsError>,
{
    let form = get_form(store, form_id)?;
    let ops: Vec<RankOp> = rank_ops
        .iter()
        .map(|s| parse_rank_op(s))
        .collect::<FormsResult<Vec<RankOp>>>()?;

    let mut builder = ResponseBuilder::new(&form);
    if let Some(p) = answers_path {
        for (question_id, answer) in io_json::read_answers(p)? {
            builder
                .answer(&question_id, answer)
                .context(InvalidFormSnafu {})?;
        }
    }
    for op in ops.iter() {
        apply_rank_op(&mut builder, op)?;
    }
    let response = builder
        .build()
        .context(InvalidFormSnafu {})?
        .into_response(now);
    store.save_response(&response)?;
    info!("Recorded response {} for form {}", response.id, form_id);
    Ok(response)
}

/// Writes the CSV export of a form. Refuses to write an export without responses.
pub fn export_responses<S>(
    store: &S,
    settings: &Settings,
    form_id: &str,
    out: Option<&str>,
    reference: Option<&str>,
) -> FormsResult<String>
where
    S: FormStore<Error = FormsError>,
{
    let form = get_form(store, form_id)?;
    let responses = store.responses_for(form_id)?;
    ensure!(!responses.is_empty(), NoResponsesSnafu { form_id });
    info!(
        "Exporting {} responses of form {} ({:?})",
        responses.len(),
        form.id,
        form.title
    );

    let content = to_csv(&form, &responses, &settings.export).context(InvalidFormSnafu {})?;
    let target = output_target(out, &settings.output_dir, &form.title);
    io_csv::write_export(&target, &content)?;

    // The reference export, if provided for comparison
    if let Some(reference_path) = reference {
        io_csv::check_reference(reference_path, &content)?;
    }
    Ok(content)
}

pub fn run(args: &Args) -> FormsResult<()> {
    let config_file = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    let settings = resolve_settings(args.data_dir.as_deref(), config_file.as_ref())?;
    info!("settings: {:?}", settings);

    let mut store = JsonFileStore::open(&settings.data_dir)?;
    let now = Utc::now();

    match &args.command {
        Command::Forms => {
            for (form, count) in list_forms(&store)? {
                println!("{}", form_line(&form, count));
            }
        }
        Command::Show { form_id } => {
            let form = get_form(&store, form_id)?;
            println!("{}", show_form(&form)?);
        }
        Command::Responses { form_id } => {
            println!("{}", view_responses(&store, &settings, form_id)?);
        }
        Command::Create { definition } => {
            let form = create_form(&mut store, definition, now)?;
            println!("{}", form.id);
        }
        Command::Update {
            form_id,
            definition,
        } => {
            update_form(&mut store, form_id, definition, now)?;
        }
        Command::Delete { form_id } => {
            delete_form(&mut store, form_id)?;
        }
        Command::Submit {
            form_id,
            answers,
            rank,
        } => {
            let response = submit_response(&mut store, form_id, answers.as_deref(), rank, now)?;
            println!("{}", response.id);
        }
        Command::Export {
            form_id,
            out,
            reference,
        } => {
            export_responses(
                &store,
                &settings,
                form_id,
                out.as_deref(),
                reference.as_deref(),
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    struct Fixture {
        dir: tempfile::TempDir,
        store: JsonFileStore,
        settings: Settings,
    }

    impl Fixture {
        fn new() -> Fixture {
            let _ = env_logger::builder().is_test(true).try_init();
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::open(&dir.path().join("data")).unwrap();
            let settings = Settings {
                data_dir: dir.path().join("data"),
                output_dir: dir.path().join("out"),
                export: ExportSettings::default(),
            };
            Fixture {
                dir,
                store,
                settings,
            }
        }

        fn write(&self, name: &str, content: &str) -> String {
            let p = self.dir.path().join(name);
            fs::write(&p, content).unwrap();
            p.display().to_string()
        }

        fn create_lunch(&mut self) -> Form {
            let def = self.write(
                "lunch.json",
                r#"{"title": "Lunch: Friday", "description": "Vote",
                    "questions": [
                        {"id": "who", "type": "short_text", "question": "Who", "required": true},
                        {"id": "menu", "type": "ranked", "question": "Menu", "required": true,
                         "options": ["Soup", "Salad", "Pie"]}
                    ]}"#,
            );
            create_form(&mut self.store, &def, at(8)).unwrap()
        }
    }

    #[test]
    fn submit_then_export() {
        let mut fx = Fixture::new();
        let form = fx.create_lunch();
        let ana = fx.write("ana.json", r#"{"who": "Ana"}"#);
        let r = submit_response(
            &mut fx.store,
            &form.id,
            Some(&ana),
            &["menu:move:Pie>Soup".to_string(), "menu:down:2".to_string()],
            at(10),
        )
        .unwrap();
        assert_eq!(
            r.answers.get("menu"),
            Some(&Answer::List(vec![
                "Pie".to_string(),
                "Salad".to_string(),
                "Soup".to_string()
            ]))
        );

        let bo = fx.write("bo.json", r#"{"who": "Bo \"B\"", "menu": ["Salad"]}"#);
        submit_response(&mut fx.store, &form.id, Some(&bo), &[], at(11)).unwrap();

        let content = export_responses(&fx.store, &fx.settings, &form.id, None, None).unwrap();
        let expected = [
            r#""Submission Time","Who","Menu - Rank 1","Menu - Rank 2","Menu - Rank 3""#,
            r#""6/1/2024, 11:00:00 AM","Bo ""B""","Salad","","""#,
            r#""6/1/2024, 10:00:00 AM","Ana","Pie","Salad","Soup""#,
        ]
        .join("\n");
        assert_eq!(content, expected);

        let written = fx.dir.path().join("out").join("Lunch__Friday_responses.csv");
        assert_eq!(fs::read_to_string(written).unwrap(), expected);

        let reference = fx.write("reference.csv", &format!("{}\n", expected));
        export_responses(
            &fx.store,
            &fx.settings,
            &form.id,
            Some(fx.dir.path().join("again.csv").to_str().unwrap()),
            Some(&reference),
        )
        .unwrap();
    }

    #[test]
    fn untouched_ranking_must_be_kept_explicitly() {
        let mut fx = Fixture::new();
        let form = fx.create_lunch();
        let ana = fx.write("ana.json", r#"{"who": "Ana"}"#);
        let err = submit_response(&mut fx.store, &form.id, Some(&ana), &[], at(9)).unwrap_err();
        assert!(matches!(
            err,
            FormsError::InvalidForm {
                source: FormErrors::RequiredAnswerMissing { .. }
            }
        ));

        let r = submit_response(
            &mut fx.store,
            &form.id,
            Some(&ana),
            &["menu:keep".to_string()],
            at(9),
        )
        .unwrap();
        assert_eq!(
            r.answers.get("menu"),
            Some(&Answer::List(vec![
                "Soup".to_string(),
                "Salad".to_string(),
                "Pie".to_string()
            ]))
        );
    }

    #[test]
    fn export_needs_responses() {
        let mut fx = Fixture::new();
        let form = fx.create_lunch();
        let err = export_responses(&fx.store, &fx.settings, &form.id, None, None).unwrap_err();
        assert!(matches!(err, FormsError::NoResponses { .. }));
        let err = export_responses(&fx.store, &fx.settings, "nope", None, None).unwrap_err();
        assert!(matches!(err, FormsError::FormNotFound { .. }));
    }

    #[test]
    fn reference_mismatch_fails() {
        let mut fx = Fixture::new();
        let form = fx.create_lunch();
        let err = submit_response(
            &mut fx.store,
            &form.id,
            None,
            &["who:keep".to_string()],
            at(9),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FormsError::InvalidForm {
                source: FormErrors::NotRanked { .. }
            }
        ));
        let ana = fx.write("ana.json", r#"{"who": "Ana", "menu": ["Pie"]}"#);
        submit_response(&mut fx.store, &form.id, Some(&ana), &[], at(9)).unwrap();
        let reference = fx.write("reference.csv", "\"Submission Time\"\n\"never\"");
        let err = export_responses(
            &fx.store,
            &fx.settings,
            &form.id,
            Some("stdout"),
            Some(&reference),
        )
        .unwrap_err();
        assert!(matches!(err, FormsError::ReferenceMismatch { .. }));
    }

    #[test]
    fn listing_and_showing_forms() {
        let mut fx = Fixture::new();
        let form = fx.create_lunch();
        let ana = fx.write("ana.json", r#"{"who": "Ana", "menu": ["Pie"]}"#);
        submit_response(&mut fx.store, &form.id, Some(&ana), &[], at(9)).unwrap();

        let lines: Vec<String> = list_forms(&fx.store)
            .unwrap()
            .iter()
            .map(|(f, count)| form_line(f, *count))
            .collect();
        assert_eq!(
            lines,
            vec![format!("{}\tLunch: Friday\t2 questions\t1 responses", form.id)]
        );

        let js: JSValue = serde_json::from_str(&show_form(&form).unwrap()).unwrap();
        assert_eq!(js["id"], form.id.as_str());
        assert_eq!(js["questions"][1]["type"], "ranked");
        assert_eq!(js["createdAt"], "2024-06-01T08:00:00Z");
    }

    #[test]
    fn viewing_responses() {
        let mut fx = Fixture::new();
        let form = fx.create_lunch();
        assert_eq!(
            view_responses(&fx.store, &fx.settings, &form.id).unwrap(),
            "Lunch: Friday\n0 responses\n\nNo responses yet"
        );

        let ana = fx.write("ana.json", r#"{"who": "Ana"}"#);
        submit_response(
            &mut fx.store,
            &form.id,
            Some(&ana),
            &["menu:up:3".to_string()],
            at(10),
        )
        .unwrap();
        let bo = fx.write("bo.json", r#"{"who": "Bo", "menu": ["Salad"]}"#);
        submit_response(&mut fx.store, &form.id, Some(&bo), &[], at(11)).unwrap();

        let expected = [
            "Lunch: Friday",
            "2 responses",
            "",
            "Response #2 (6/1/2024, 11:00:00 AM)",
            "1. Who",
            "    Bo",
            "2. Menu",
            "    1. Salad",
            "",
            "Response #1 (6/1/2024, 10:00:00 AM)",
            "1. Who",
            "    Ana",
            "2. Menu",
            "    1. Soup",
            "    2. Pie",
            "    3. Salad",
        ]
        .join("\n");
        assert_eq!(
            view_responses(&fx.store, &fx.settings, &form.id).unwrap(),
            expected
        );
        assert!(matches!(
            view_responses(&fx.store, &fx.settings, "nope"),
            Err(FormsError::FormNotFound { .. })
        ));
    }

    #[test]
    fn update_and_delete() {
        let mut fx = Fixture::new();
        let form = fx.create_lunch();
        let upd = fx.write("upd.json", r#"{"title": "Dinner"}"#);
        let updated = update_form(&mut fx.store, &form.id, &upd, at(12)).unwrap();
        assert_eq!(updated.title, "Dinner");
        assert_eq!(updated.questions, form.questions);
        assert_eq!(list_forms(&fx.store).unwrap()[0].0.title, "Dinner");

        delete_form(&mut fx.store, &form.id).unwrap();
        assert!(matches!(
            delete_form(&mut fx.store, &form.id),
            Err(FormsError::FormNotFound { .. })
        ));
        assert!(list_forms(&fx.store).unwrap().is_empty());
    }
}
