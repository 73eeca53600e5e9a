// Primitives for writing exports and reading reference CSV files.

use crate::forms::io_common::OutputTarget;
use crate::forms::*;

pub fn write_export(target: &OutputTarget, content: &str) -> FormsResult<()> {
    match target {
        OutputTarget::Stdout => {
            println!("{}", content);
            Ok(())
        }
        OutputTarget::File(p) => {
            info!("Writing export to {:?}", p);
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context(WritingFileSnafu {
                    path: parent.display().to_string(),
                })?;
            }
            fs::write(p, content).context(WritingFileSnafu {
                path: p.display().to_string(),
            })
        }
    }
}

fn read_records(content: &str, path: &str) -> FormsResult<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec.context(ParsingCsvSnafu { path })?;
        debug!("read_records: {}: line {}: {:?}", path, idx + 1, rec);
        res.push(rec.iter().map(|s| s.to_string()).collect());
    }
    Ok(res)
}

/// Compares the cells of an export with the cells of a reference file. The quoting and
/// the line endings of the reference do not matter.
pub fn check_reference(reference_path: &str, content: &str) -> FormsResult<()> {
    let reference = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
        path: reference_path,
    })?;
    let expected = read_records(&reference, reference_path)?;
    let actual = read_records(content, "export")?;
    if expected != actual {
        warn!("Found differences with the reference file {}", reference_path);
        print_diff(reference.trim_end(), content, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Export matches the reference file {}", reference_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_ignores_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("ref.csv");
        fs::write(&p, "Submission Time,Name\r\n\"1/2/2024, 3:04:05 PM\",Ana\r\n").unwrap();
        let export = "\"Submission Time\",\"Name\"\n\"1/2/2024, 3:04:05 PM\",\"Ana\"";
        check_reference(p.to_str().unwrap(), export).unwrap();

        let other = "\"Submission Time\",\"Name\"\n\"1/2/2024, 3:04:05 PM\",\"Bo\"";
        let err = check_reference(p.to_str().unwrap(), other).unwrap_err();
        assert!(matches!(err, FormsError::ReferenceMismatch { .. }));
    }

    #[test]
    fn writes_into_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("exports").join("a.csv");
        write_export(&OutputTarget::File(p.clone()), "\"x\"").unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "\"x\"");
    }
}
