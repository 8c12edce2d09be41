use std::process::ExitCode;

use env_logger::Env;

use depscope::cli;

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Run the CLI application
    cli::run()
}
