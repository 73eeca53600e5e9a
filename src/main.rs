mod args;
mod forms;

use clap::Parser;
use env_logger::Env;

fn main() {
    let args = args::Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = forms::run(&args) {
        forms::report_error(&e);
        std::process::exit(1);
    }
}
