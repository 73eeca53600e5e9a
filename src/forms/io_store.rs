// Forms and responses kept as two JSON arrays in a data directory.

use ranked_forms::store::{newest_first, upsert_form, FormStore};

use crate::forms::io_json::{read_json, write_json};
use crate::forms::*;

pub const FORMS_FILE: &str = "forms.json";
pub const RESPONSES_FILE: &str = "responses.json";

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct JsonFileStore {
    forms_path: PathBuf,
    responses_path: PathBuf,
}

impl JsonFileStore {
    /// Creates the directory and empty data files when they do not exist yet.
    pub fn open(data_dir: &Path) -> FormsResult<JsonFileStore> {
        fs::create_dir_all(data_dir).context(CreatingDataDirSnafu {
            path: data_dir.display().to_string(),
        })?;
        let store = JsonFileStore {
            forms_path: data_dir.join(FORMS_FILE),
            responses_path: data_dir.join(RESPONSES_FILE),
        };
        for p in [&store.forms_path, &store.responses_path] {
            if !p.exists() {
                info!("Creating empty data file {:?}", p);
                write_json::<Vec<JSValue>>(p, &vec![])?;
            }
        }
        Ok(store)
    }

    fn read_forms(&self) -> FormsResult<Vec<Form>> {
        read_json(&self.forms_path)
    }

    fn read_responses(&self) -> FormsResult<Vec<Response>> {
        read_json(&self.responses_path)
    }
}

impl FormStore for JsonFileStore {
    type Error = FormsError;

    fn list_forms(&self) -> FormsResult<Vec<Form>> {
        self.read_forms()
    }

    fn get_form(&self, form_id: &str) -> FormsResult<Option<Form>> {
        Ok(self.read_forms()?.into_iter().find(|f| f.id == form_id))
    }

    fn save_form(&mut self, form: &Form) -> FormsResult<()> {
        let mut forms = self.read_forms()?;
        upsert_form(&mut forms, form);
        write_json(&self.forms_path, &forms)
    }

    fn delete_form(&mut self, form_id: &str) -> FormsResult<bool> {
        // Both files are read before either is rewritten.
        let mut forms = self.read_forms()?;
        let mut responses = self.read_responses()?;

        let before = forms.len();
        forms.retain(|f| f.id != form_id);
        let before_responses = responses.len();
        responses.retain(|r| r.form_id != form_id);

        write_json(&self.forms_path, &forms)?;
        write_json(&self.responses_path, &responses)?;
        info!(
            "delete_form: {}: removed {} responses",
            form_id,
            before_responses - responses.len()
        );
        Ok(forms.len() < before)
    }

    fn responses_for(&self, form_id: &str) -> FormsResult<Vec<Response>> {
        let mut res: Vec<Response> = self
            .read_responses()?
            .into_iter()
            .filter(|r| r.form_id == form_id)
            .collect();
        newest_first(&mut res);
        Ok(res)
    }

    fn save_response(&mut self, response: &Response) -> FormsResult<()> {
        let mut responses = self.read_responses()?;
        responses.push(response.clone());
        write_json(&self.responses_path, &responses)
    }
}
