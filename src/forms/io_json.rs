// Primitives for reading and writing the JSON files: data files, form definitions, answers.

use serde::de::DeserializeOwned;

use crate::forms::*;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> FormsResult<T> {
    let path_s = path.display().to_string();
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path_s.clone(),
    })?;
    debug!("read_json: read {} bytes from {}", contents.len(), path_s);
    let res: T = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path: path_s })?;
    Ok(res)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> FormsResult<()> {
    let contents = serde_json::to_string_pretty(value).context(SerializingJsonSnafu {})?;
    fs::write(path, contents).context(WritingFileSnafu {
        path: path.display().to_string(),
    })
}

/// A form as written by hand: the ids of the questions are optional.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl FormDefinition {
    pub fn into_builder(self) -> FormBuilder {
        FormBuilder::new(&self.title)
            .description(&self.description)
            .questions(&self.questions)
    }
}

pub fn read_definition(path: &str) -> FormsResult<FormDefinition> {
    info!("Attempting to read form definition {:?}", path);
    read_json(Path::new(path))
}

pub fn read_update(path: &str) -> FormsResult<FormUpdate> {
    info!("Attempting to read form update {:?}", path);
    read_json(Path::new(path))
}

/// An answers file is a JSON object from question ids to strings or lists of strings.
pub fn read_answers(path: &str) -> FormsResult<Answers> {
    info!("Attempting to read answers {:?}", path);
    read_json(Path::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_without_ids() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("def.json");
        fs::write(
            &p,
            r#"{"title": "Lunch", "questions": [
                {"type": "ranked", "question": "Order", "options": ["Soup", "Salad"]}
            ]}"#,
        )
        .unwrap();
        let def = read_definition(p.to_str().unwrap()).unwrap();
        assert_eq!(def.description, "");
        assert_eq!(def.questions[0].id, "");
        assert!(!def.questions[0].required);
    }

    #[test]
    fn reports_the_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("answers.json");
        fs::write(&p, "{\"q\": 3}").unwrap();
        let err = read_answers(p.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, FormsError::ParsingJson { .. }));
        assert!(err.to_string().contains("answers.json"));

        let missing = dir.path().join("nothing.json");
        let err = read_answers(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, FormsError::OpeningJson { .. }));
    }
}
