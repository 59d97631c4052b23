use std::process::ExitCode;

fn main() -> ExitCode {
	pyrite::cli::init()
}
