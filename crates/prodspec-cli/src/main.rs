use std::process::ExitCode;

fn main() -> ExitCode {
    match prodspec_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("prodspec: {e}");
            ExitCode::FAILURE
        }
    }
}
