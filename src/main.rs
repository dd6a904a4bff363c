use std::process::ExitCode;

fn main() -> ExitCode {
    nexcart::app::startup::startup()
}
