/*!
Form definitions, ranked answers and spreadsheet export for simple web forms.

A [`Form`] is an ordered list of [`Question`]s. Respondents answer with plain strings, or
with lists for checkboxes and ranked questions. For ranked questions the order of the
list is the ranking of the respondent, most preferred first.

- [`editor::RankingEditor`] lets a respondent reorder the options of a ranked question
  and reports every new ordering.
- [`export::to_csv`] flattens the responses of a form into a CSV table with one column
  per rank slot.
- [`builder`] defines forms and collects answers, [`store`] abstracts where they are kept.

See the [`manual`] for the details of the formats and the [`quick_start`] for a complete
session with the `rforms` command line.
*/

mod model;

pub use crate::model::*;

pub mod builder;
pub mod editor;
pub mod export;
pub mod manual;
pub mod quick_start;
pub mod store;

pub use crate::export::{export_file_name, render_responses, to_csv, ExportSettings};
