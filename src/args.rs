use clap::{Parser, Subcommand};

/// This is a program to define forms, collect ranked answers and export them as spreadsheets.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file with the data directory, the output directory
    /// and the export settings. Relative paths in the file are resolved against its directory.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    /// (directory, optional) Where the forms and the responses are kept. Setting this option overrides
    /// what may be specified with the --config option.
    #[clap(long, value_parser, global = true)]
    pub data_dir: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Lists the forms with their number of responses.
    Forms,
    /// Prints a form in JSON format.
    Show {
        #[clap(value_parser)]
        form_id: String,
    },
    /// Creates a form from a JSON definition and prints its id.
    Create {
        /// (file path) The definition: a title, an optional description and the questions.
        #[clap(short = 'f', long, value_parser)]
        definition: String,
    },
    /// Replaces the title, the description or the questions of a form.
    Update {
        #[clap(value_parser)]
        form_id: String,
        /// (file path) A JSON object with the fields to replace.
        #[clap(short = 'f', long, value_parser)]
        definition: String,
    },
    /// Deletes a form and all its responses.
    Delete {
        #[clap(value_parser)]
        form_id: String,
    },
    /// Records a response and prints its id.
    Submit {
        #[clap(value_parser)]
        form_id: String,
        /// (file path, optional) A JSON object from question ids to answers.
        #[clap(short, long, value_parser)]
        answers: Option<String>,
        /// (repeatable) A change to the ranking of a question, applied in order:
        /// QID:up:POS, QID:down:POS, QID:move:SOURCE>TARGET or QID:keep. Positions start at 1.
        #[clap(long, value_parser)]
        rank: Vec<String>,
    },
    /// Prints the responses of a form as text, newest first.
    Responses {
        #[clap(value_parser)]
        form_id: String,
    },
    /// Exports the responses of a form in CSV format, newest first.
    Export {
        #[clap(value_parser)]
        form_id: String,
        /// (file path, 'stdout' or empty) If specified, the export will be written to the given location.
        /// Otherwise it is written to the output directory, under a name derived from the title.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// (file path) A reference export. If provided, rforms will check that the export matches it.
        #[clap(short, long, value_parser)]
        reference: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_submit() {
        let args = Args::parse_from([
            "rforms",
            "--data-dir",
            "d",
            "submit",
            "f1",
            "-a",
            "answers.json",
            "--rank",
            "q:up:2",
            "--rank",
            "q:keep",
            "--verbose",
        ]);
        assert_eq!(args.data_dir.as_deref(), Some("d"));
        assert!(args.verbose);
        match args.command {
            Command::Submit {
                form_id,
                answers,
                rank,
            } => {
                assert_eq!(form_id, "f1");
                assert_eq!(answers.as_deref(), Some("answers.json"));
                assert_eq!(rank, vec!["q:up:2".to_string(), "q:keep".to_string()]);
            }
            x => panic!("unexpected command {:?}", x),
        }
    }

    #[test]
    fn parse_responses() {
        let args = Args::parse_from(["rforms", "responses", "f1"]);
        assert!(matches!(args.command, Command::Responses { ref form_id } if form_id == "f1"));
    }

    #[test]
    fn parse_export() {
        let args = Args::parse_from(["rforms", "export", "f1", "-o", "stdout", "-c", "conf.json"]);
        assert_eq!(args.config.as_deref(), Some("conf.json"));
        assert!(matches!(
            args.command,
            Command::Export { out: Some(ref o), reference: None, .. } if o == "stdout"
        ));
    }
}
