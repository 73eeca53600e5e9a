//! Flattening of responses into a spreadsheet-friendly table.
//!
//! Every question maps to a fixed set of columns: one for most questions, one per
//! option slot for ranked questions. Incomplete answers are padded with empty cells so
//! that the columns always line up with the header.
//!
//! [`render_responses`] gives the same responses as readable text.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::{debug, info, warn};

use crate::model::*;

pub const SUBMISSION_TIME_HEADER: &str = "Submission Time";

/// Month/day/year and 12-hour time, as a US-English browser renders a date-time.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExportSettings {
    timestamp_format: String,
    utc_offset: FixedOffset,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc_offset: Utc.fix(),
        }
    }
}

impl ExportSettings {
    /// `timestamp_format` follows the `strftime` conventions of chrono.
    pub fn new(timestamp_format: &str, utc_offset: FixedOffset) -> Result<ExportSettings, FormErrors> {
        if StrftimeItems::new(timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(FormErrors::InvalidTimestampFormat(
                timestamp_format.to_string(),
            ));
        }
        Ok(ExportSettings {
            timestamp_format: timestamp_format.to_string(),
            utc_offset,
        })
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset
    }

    pub fn format_timestamp(&self, ts: &DateTime<Utc>) -> String {
        ts.with_timezone(&self.utc_offset)
            .format(&self.timestamp_format)
            .to_string()
    }
}

pub fn header_row(form: &Form) -> Vec<String> {
    let mut headers = vec![SUBMISSION_TIME_HEADER.to_string()];
    for q in form.questions.iter() {
        if q.is_ranked() {
            for slot in 0..q.slot_count() {
                headers.push(format!("{} - Rank {}", q.question, slot + 1));
            }
        } else {
            headers.push(q.question.clone());
        }
    }
    headers
}

pub fn response_row(form: &Form, response: &Response, settings: &ExportSettings) -> Vec<String> {
    let mut row = vec![settings.format_timestamp(&response.submitted_at)];
    for q in form.questions.iter() {
        let answer = response.answers.get(&q.id);
        if q.is_ranked() {
            row.extend(ranked_cells(q, answer, &response.id));
        } else {
            let cell = match answer {
                Some(Answer::List(l)) => l.join(", "),
                Some(Answer::Text(s)) => s.clone(),
                None => String::new(),
            };
            row.push(cell);
        }
    }
    row
}

// Exactly one cell per slot, whatever the shape of the answer.
fn ranked_cells(question: &Question, answer: Option<&Answer>, response_id: &str) -> Vec<String> {
    let slots = question.slot_count();
    let mut cells: Vec<String> = match answer {
        Some(Answer::List(l)) => l.clone(),
        Some(Answer::Text(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    };
    if cells.len() > slots {
        warn!(
            "ranked_cells: response {}: question {} has {} ranks for {} slots, dropping the extra ranks",
            response_id,
            question.id,
            cells.len(),
            slots
        );
        cells.truncate(slots);
    }
    cells.resize(slots, String::new());
    cells
}

/// The header followed by one row per response, in the order given.
pub fn to_rows(form: &Form, responses: &[Response], settings: &ExportSettings) -> Vec<Vec<String>> {
    let mut rows = vec![header_row(form)];
    for r in responses.iter() {
        if r.form_id != form.id {
            warn!(
                "to_rows: response {} belongs to form {}, not {}",
                r.id, r.form_id, form.id
            );
        }
        let row = response_row(form, r, settings);
        debug!("to_rows: response {}: {:?}", r.id, row);
        rows.push(row);
    }
    rows
}

/// Serializes the export table: all the cells are quoted, rows are separated by `\n`.
///
/// Returns only the header when there are no responses.
pub fn to_csv(form: &Form, responses: &[Response], settings: &ExportSettings) -> Result<String, FormErrors> {
    info!(
        "to_csv: form {}: exporting {} responses",
        form.id,
        responses.len()
    );
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);
    for row in to_rows(form, responses, settings) {
        wtr.write_record(&row)
            .map_err(|e| FormErrors::Csv(e.to_string()))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| FormErrors::Csv(e.error().to_string()))?;
    let mut content = String::from_utf8(bytes).map_err(|e| FormErrors::Csv(e.to_string()))?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}

// ********* Text view ***********

pub const NO_ANSWER: &str = "No answer";

fn answer_lines(question: &Question, answer: Option<&Answer>) -> Vec<String> {
    match answer {
        Some(a) if a.is_empty() => vec![NO_ANSWER.to_string()],
        Some(Answer::List(l)) if question.is_ranked() => l
            .iter()
            .enumerate()
            .map(|(idx, item)| format!("{}. {}", idx + 1, item))
            .collect(),
        Some(Answer::List(l)) => vec![l.join(", ")],
        Some(Answer::Text(s)) => vec![s.clone()],
        None => vec![NO_ANSWER.to_string()],
    }
}

/// A plain text view of the responses, for reading in a terminal.
///
/// The responses are expected newest first and are numbered so that the oldest one is
/// `Response #1`. Each question is numbered in form order, with its answer indented below
/// it: rankings one item per line, other lists joined with `", "`.
pub fn render_responses(form: &Form, responses: &[Response], settings: &ExportSettings) -> String {
    let mut lines: Vec<String> = vec![form.title.clone()];
    let plural = if responses.len() == 1 { "" } else { "s" };
    lines.push(format!("{} response{}", responses.len(), plural));
    if responses.is_empty() {
        lines.push(String::new());
        lines.push("No responses yet".to_string());
    }
    for (idx, r) in responses.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "Response #{} ({})",
            responses.len() - idx,
            settings.format_timestamp(&r.submitted_at)
        ));
        for (q_idx, q) in form.questions.iter().enumerate() {
            lines.push(format!("{}. {}", q_idx + 1, q.question));
            for l in answer_lines(q, r.answers.get(&q.id)) {
                lines.push(format!("    {}", l));
            }
        }
    }
    debug!(
        "render_responses: form {}: {} lines",
        form.id,
        lines.len()
    );
    lines.join("\n")
}

/// The download name: every character of the title that is not an ASCII letter or
/// digit becomes `_`.
pub fn export_file_name(title: &str) -> String {
    let base: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_responses.csv", base)
}
