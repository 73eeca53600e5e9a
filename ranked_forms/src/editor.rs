//! Interactive ordering of the options of a ranked question.
//!
//! The editor owns the respondent's current ordering. Each mutation hands the complete
//! new ordering to an [`AnswerSink`] right away, so the recorded answer always matches
//! what the respondent sees.

use log::debug;

use crate::model::*;

/// Receives the answer of a question every time it changes.
pub trait AnswerSink {
    fn record(&mut self, question_id: &str, answer: Answer);
}

impl AnswerSink for Answers {
    fn record(&mut self, question_id: &str, answer: Answer) {
        self.insert(question_id.to_string(), answer);
    }
}

/// Forwards the ordering to a callback, called with `(question_id, ordering)`.
pub struct CallbackSink<F>(pub F);

impl<F> AnswerSink for CallbackSink<F>
where
    F: FnMut(&str, &[String]),
{
    fn record(&mut self, question_id: &str, answer: Answer) {
        match answer {
            Answer::List(l) => (self.0)(question_id, &l),
            Answer::Text(s) => (self.0)(question_id, &[s]),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankingEditor {
    question_id: String,
    items: Vec<String>,
}

impl RankingEditor {
    /// Starts from the existing answer when it is a non-empty list, otherwise from the
    /// declared order of the options.
    pub fn new(question: &Question, existing: Option<&Answer>) -> Result<RankingEditor, FormErrors> {
        if !question.is_ranked() {
            return Err(FormErrors::NotRanked {
                question_id: question.id.clone(),
            });
        }
        let items = match existing {
            Some(Answer::List(l)) if !l.is_empty() => l.clone(),
            _ => question.options.clone(),
        };
        Ok(RankingEditor {
            question_id: question.id.clone(),
            items,
        })
    }

    pub fn question_id(&self) -> &str {
        &self.question_id
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn into_answer(self) -> Answer {
        Answer::List(self.items)
    }

    /// Emits the current ordering without changing it.
    pub fn publish(&self, sink: &mut dyn AnswerSink) {
        sink.record(&self.question_id, Answer::List(self.items.clone()));
    }

    /// Swaps the item at `index` with the one above it. Nothing happens for the first item.
    pub fn move_up(&mut self, index: usize, sink: &mut dyn AnswerSink) -> &[String] {
        if index > 0 && index < self.items.len() {
            self.items.swap(index - 1, index);
            self.publish(sink);
        }
        &self.items
    }

    /// Swaps the item at `index` with the one below it. Nothing happens for the last item.
    pub fn move_down(&mut self, index: usize, sink: &mut dyn AnswerSink) -> &[String] {
        if index < self.items.len().saturating_sub(1) {
            self.items.swap(index, index + 1);
            self.publish(sink);
        }
        &self.items
    }

    /// Drag and drop: takes `source` out of the list and puts it back at the position
    /// `target` held before the move.
    pub fn reorder(&mut self, source: &str, target: &str, sink: &mut dyn AnswerSink) -> &[String] {
        let source_idx = self.items.iter().position(|s| s == source);
        let target_idx = self.items.iter().position(|s| s == target);
        match (source_idx, target_idx) {
            (Some(si), Some(ti)) if si != ti => {
                let item = self.items.remove(si);
                self.items.insert(ti, item);
                debug!(
                    "reorder: question {}: {:?} {} -> {}",
                    self.question_id, source, si, ti
                );
                self.publish(sink);
            }
            _ => {
                debug!(
                    "reorder: question {}: nothing to do for {:?} -> {:?}",
                    self.question_id, source, target
                );
            }
        }
        &self.items
    }
}
