//! Where forms and responses live.
//!
//! The command line keeps them in JSON files; [`MemoryStore`] keeps them in memory.

use std::convert::Infallible;

use log::info;

use crate::model::*;

pub trait FormStore {
    type Error;

    fn list_forms(&self) -> Result<Vec<Form>, Self::Error>;

    fn get_form(&self, form_id: &str) -> Result<Option<Form>, Self::Error>;

    /// Inserts the form, or replaces the stored form with the same id.
    fn save_form(&mut self, form: &Form) -> Result<(), Self::Error>;

    /// Deletes the form and all its responses. Returns false if there was no such form.
    fn delete_form(&mut self, form_id: &str) -> Result<bool, Self::Error>;

    /// The responses of a form, newest first.
    fn responses_for(&self, form_id: &str) -> Result<Vec<Response>, Self::Error>;

    fn save_response(&mut self, response: &Response) -> Result<(), Self::Error>;
}

/// Sorts responses newest first. Responses submitted at the same time keep their order.
pub fn newest_first(responses: &mut [Response]) {
    responses.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}

/// Inserts or replaces by id.
pub fn upsert_form(forms: &mut Vec<Form>, form: &Form) {
    match forms.iter().position(|f| f.id == form.id) {
        Some(idx) => forms[idx] = form.clone(),
        None => forms.push(form.clone()),
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MemoryStore {
    forms: Vec<Form>,
    responses: Vec<Response>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl FormStore for MemoryStore {
    type Error = Infallible;

    fn list_forms(&self) -> Result<Vec<Form>, Infallible> {
        Ok(self.forms.clone())
    }

    fn get_form(&self, form_id: &str) -> Result<Option<Form>, Infallible> {
        Ok(self.forms.iter().find(|f| f.id == form_id).cloned())
    }

    fn save_form(&mut self, form: &Form) -> Result<(), Infallible> {
        upsert_form(&mut self.forms, form);
        Ok(())
    }

    fn delete_form(&mut self, form_id: &str) -> Result<bool, Infallible> {
        let before = self.forms.len();
        self.forms.retain(|f| f.id != form_id);
        self.responses.retain(|r| r.form_id != form_id);
        info!("MemoryStore: deleted form {}", form_id);
        Ok(self.forms.len() < before)
    }

    fn responses_for(&self, form_id: &str) -> Result<Vec<Response>, Infallible> {
        let mut res: Vec<Response> = self
            .responses
            .iter()
            .filter(|r| r.form_id == form_id)
            .cloned()
            .collect();
        newest_first(&mut res);
        Ok(res)
    }

    fn save_response(&mut self, response: &Response) -> Result<(), Infallible> {
        self.responses.push(response.clone());
        Ok(())
    }
}
