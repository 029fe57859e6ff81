//! modver binary entry point.

use std::process::ExitCode;

use modver::ui::output;

fn main() -> ExitCode {
    match modver::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
