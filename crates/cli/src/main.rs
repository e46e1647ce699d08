use std::process::ExitCode;

fn main() -> ExitCode {
    kilo_cli::run()
}
