// ********* Form definitions ***********

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// All the kinds of questions a form may contain.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    ShortText,
    LongText,
    MultipleChoice,
    Checkboxes,
    Dropdown,
    Email,
    Phone,
    Date,
    /// The respondent orders the options, most preferred first.
    Ranked,
}

impl QuestionType {
    /// True for the types that pick among a declared list of options.
    pub fn needs_options(&self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoice
                | QuestionType::Checkboxes
                | QuestionType::Dropdown
                | QuestionType::Ranked
        )
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique within a form. May be left empty in a definition, the form builder fills it.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub question: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Question {
    pub fn new(id: &str, kind: QuestionType, question: &str) -> Question {
        Question {
            id: id.to_string(),
            kind,
            question: question.to_string(),
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(self) -> Question {
        Question {
            required: true,
            ..self
        }
    }

    pub fn with_options(self, options: &[&str]) -> Question {
        Question {
            options: options.iter().map(|s| s.to_string()).collect(),
            ..self
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.kind == QuestionType::Ranked
    }

    /// The number of rank slots of a ranked question: the number of declared options,
    /// independently of how many ranks any respondent filled in.
    pub fn slot_count(&self) -> usize {
        if self.is_ranked() {
            self.options.len()
        } else {
            0
        }
    }

    /// Checks that an ordering only uses declared options, each at most once.
    pub fn check_ranking(&self, ranking: &[String]) -> Result<(), FormErrors> {
        let mut seen: Vec<&String> = Vec::with_capacity(ranking.len());
        for item in ranking {
            if !self.options.contains(item) {
                return Err(FormErrors::UnknownOption {
                    question_id: self.id.clone(),
                    option: item.clone(),
                });
            }
            if seen.contains(&item) {
                return Err(FormErrors::DuplicateOption {
                    question_id: self.id.clone(),
                    option: item.clone(),
                });
            }
            seen.push(item);
        }
        Ok(())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Form {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Checks the invariants of the question list: unique ids, options declared for the
    /// types that need them, and no option listed twice in a question.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.questions.len());
        for q in self.questions.iter() {
            if ids.contains(&q.id.as_str()) {
                return Err(FormErrors::DuplicateQuestionId {
                    question_id: q.id.clone(),
                });
            }
            ids.push(q.id.as_str());
            if q.kind.needs_options() && q.options.is_empty() {
                return Err(FormErrors::MissingOptions {
                    question_id: q.id.clone(),
                });
            }
            for (idx, option) in q.options.iter().enumerate() {
                if q.options[..idx].contains(option) {
                    return Err(FormErrors::RepeatedOption {
                        question_id: q.id.clone(),
                        option: option.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ********* Responses ***********

/// The value recorded for one question.
///
/// Checkboxes and ranked questions record a list. The order of the list only carries
/// meaning for ranked questions.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    List(Vec<String>),
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(s) => s.is_empty(),
            Answer::List(l) => l.is_empty(),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Answer {
        Answer::Text(s.to_string())
    }
}

impl From<Vec<String>> for Answer {
    fn from(l: Vec<String>) -> Answer {
        Answer::List(l)
    }
}

pub type Answers = BTreeMap<String, Answer>;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    #[serde(rename = "formId")]
    pub form_id: String,
    pub answers: Answers,
    #[serde(rename = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
}

// ********* Errors ***********

/// Errors raised while defining forms or collecting answers.
///
/// The export never produces them for incomplete data, only when the CSV writer fails.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FormErrors {
    MissingOptions { question_id: String },
    RepeatedOption { question_id: String, option: String },
    DuplicateQuestionId { question_id: String },
    UnknownQuestion { question_id: String },
    NotRanked { question_id: String },
    RequiredAnswerMissing { question_id: String, question: String },
    UnknownOption { question_id: String, option: String },
    DuplicateOption { question_id: String, option: String },
    RankingNotAList { question_id: String },
    InvalidTimestampFormat(String),
    Csv(String),
}

impl Error for FormErrors {}

impl Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormErrors::MissingOptions { question_id } => {
                write!(f, "question {} needs at least one option", question_id)
            }
            FormErrors::RepeatedOption {
                question_id,
                option,
            } => write!(f, "question {}: option {:?} is listed twice", question_id, option),
            FormErrors::DuplicateQuestionId { question_id } => {
                write!(f, "question id {} is used more than once", question_id)
            }
            FormErrors::UnknownQuestion { question_id } => {
                write!(f, "no question with id {} in this form", question_id)
            }
            FormErrors::NotRanked { question_id } => {
                write!(f, "question {} is not a ranked question", question_id)
            }
            FormErrors::RequiredAnswerMissing { question, .. } => {
                write!(f, "Please answer: {}", question)
            }
            FormErrors::UnknownOption {
                question_id,
                option,
            } => write!(f, "question {}: {:?} is not an option", question_id, option),
            FormErrors::DuplicateOption {
                question_id,
                option,
            } => write!(f, "question {}: {:?} is ranked twice", question_id, option),
            FormErrors::RankingNotAList { question_id } => {
                write!(f, "question {}: a ranking must be a list", question_id)
            }
            FormErrors::InvalidTimestampFormat(fmt) => {
                write!(f, "invalid timestamp format {:?}", fmt)
            }
            FormErrors::Csv(msg) => write!(f, "failed to write CSV: {}", msg),
        }
    }
}
