use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::editor::{AnswerSink, RankingEditor};
pub use crate::model::*;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A builder for defining a new form.
///
/// ```
/// use chrono::Utc;
/// use ranked_forms::builder::FormBuilder;
/// use ranked_forms::{FormErrors, Question, QuestionType};
///
/// let form = FormBuilder::new("Team offsite")
///     .description("Help us pick a place")
///     .question(Question::new("", QuestionType::ShortText, "Your name").required())
///     .question(
///         Question::new("place", QuestionType::Ranked, "Where should we go?")
///             .with_options(&["Lisbon", "Oslo", "Rome"]),
///     )
///     .build(Utc::now())?;
///
/// assert_eq!(form.questions.len(), 2);
/// assert!(!form.questions[0].id.is_empty());
///
/// # Ok::<(), FormErrors>(())
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder {
    _title: String,
    _description: String,
    _questions: Vec<Question>,
}

impl FormBuilder {
    pub fn new(title: &str) -> FormBuilder {
        FormBuilder {
            _title: title.to_string(),
            _description: String::new(),
            _questions: Vec::new(),
        }
    }

    pub fn description(self, description: &str) -> FormBuilder {
        FormBuilder {
            _description: description.to_string(),
            ..self
        }
    }

    pub fn question(mut self, question: Question) -> FormBuilder {
        self._questions.push(question);
        self
    }

    pub fn questions(mut self, questions: &[Question]) -> FormBuilder {
        self._questions.extend(questions.iter().cloned());
        self
    }

    /// Creates the form. Questions without an id receive a fresh one.
    pub fn build(self, now: DateTime<Utc>) -> Result<Form, FormErrors> {
        let form = Form {
            id: new_id(),
            title: self._title,
            description: self._description,
            questions: fill_question_ids(self._questions),
            created_at: now,
            updated_at: now,
        };
        form.validate()?;
        info!(
            "FormBuilder: created form {} with {} questions",
            form.id,
            form.questions.len()
        );
        Ok(form)
    }
}

fn fill_question_ids(questions: Vec<Question>) -> Vec<Question> {
    questions
        .into_iter()
        .map(|q| {
            if q.id.is_empty() {
                Question { id: new_id(), ..q }
            } else {
                q
            }
        })
        .collect()
}

/// A partial edit of a form. The fields left to `None` keep their current value.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub questions: Option<Vec<Question>>,
}

/// Applies an edit. The id and the creation time of the form never change.
pub fn apply_update(form: &Form, update: FormUpdate, now: DateTime<Utc>) -> Result<Form, FormErrors> {
    let res = Form {
        id: form.id.clone(),
        title: update.title.unwrap_or_else(|| form.title.clone()),
        description: update
            .description
            .unwrap_or_else(|| form.description.clone()),
        questions: match update.questions {
            Some(qs) => fill_question_ids(qs),
            None => form.questions.clone(),
        },
        created_at: form.created_at,
        updated_at: now,
    };
    res.validate()?;
    Ok(res)
}

/// The answers of a respondent, ready to be stored.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct NewResponse {
    #[serde(rename = "formId")]
    pub form_id: String,
    pub answers: Answers,
}

impl NewResponse {
    pub fn into_response(self, now: DateTime<Utc>) -> Response {
        Response {
            id: new_id(),
            form_id: self.form_id,
            answers: self.answers,
            submitted_at: now,
        }
    }
}

/// Collects the answers of one respondent for one form.
///
/// The ranked questions are edited through a [`RankingEditor`], which records every new
/// ordering into the builder.
#[derive(Debug, Clone)]
pub struct ResponseBuilder<'a> {
    _form: &'a Form,
    _answers: Answers,
}

impl<'a> ResponseBuilder<'a> {
    pub fn new(form: &'a Form) -> ResponseBuilder<'a> {
        ResponseBuilder {
            _form: form,
            _answers: Answers::new(),
        }
    }

    pub fn answers(&self) -> &Answers {
        &self._answers
    }

    fn find_question(&self, question_id: &str) -> Result<&'a Question, FormErrors> {
        self._form
            .question(question_id)
            .ok_or_else(|| FormErrors::UnknownQuestion {
                question_id: question_id.to_string(),
            })
    }

    pub fn answer(&mut self, question_id: &str, answer: Answer) -> Result<(), FormErrors> {
        self.find_question(question_id)?;
        self._answers.insert(question_id.to_string(), answer);
        Ok(())
    }

    /// Checks or unchecks one option of a checkboxes question. Checked options are kept
    /// in the order they were checked.
    pub fn toggle_choice(&mut self, question_id: &str, option: &str, checked: bool) -> Result<(), FormErrors> {
        self.find_question(question_id)?;
        let mut current = match self._answers.get(question_id) {
            Some(Answer::List(l)) => l.clone(),
            _ => Vec::new(),
        };
        if checked {
            if !current.iter().any(|s| s == option) {
                current.push(option.to_string());
            }
        } else {
            current.retain(|s| s != option);
        }
        self._answers
            .insert(question_id.to_string(), Answer::List(current));
        Ok(())
    }

    /// An editor for a ranked question, starting from the answer recorded so far.
    pub fn ranking_editor(&self, question_id: &str) -> Result<RankingEditor, FormErrors> {
        let q = self.find_question(question_id)?;
        RankingEditor::new(q, self._answers.get(question_id))
    }

    /// Checks the required questions and the rankings.
    pub fn build(self) -> Result<NewResponse, FormErrors> {
        for q in self._form.questions.iter() {
            let answer = self._answers.get(&q.id);
            if q.required && answer.map(|a| a.is_empty()).unwrap_or(true) {
                return Err(FormErrors::RequiredAnswerMissing {
                    question_id: q.id.clone(),
                    question: q.question.clone(),
                });
            }
            if q.is_ranked() {
                match answer {
                    Some(Answer::List(l)) => q.check_ranking(l)?,
                    Some(Answer::Text(s)) if !s.is_empty() => {
                        return Err(FormErrors::RankingNotAList {
                            question_id: q.id.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }
        debug!(
            "ResponseBuilder: form {}: answers {:?}",
            self._form.id, self._answers
        );
        Ok(NewResponse {
            form_id: self._form.id.clone(),
            answers: self._answers,
        })
    }
}

impl<'a> AnswerSink for ResponseBuilder<'a> {
    fn record(&mut self, question_id: &str, answer: Answer) {
        self._answers.insert(question_id.to_string(), answer);
    }
}
