use clap::{Parser, Subcommand};
use std::process::ExitCode;

pub use self::start::StartCommandArguments;

mod start;

#[derive(Parser, Debug)]
#[command(name = "pyrite", bin_name = "pyrite")]
#[command(about = "A time-series metrics daemon", version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[command(about = "Start the metrics daemon")]
	Start(StartCommandArguments),
}

/// Parse the command line and run the requested command
pub fn init() -> ExitCode {
	let args = Cli::parse();
	let output = match args.command {
		Commands::Start(args) => start::init(args),
	};
	match output {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			// The subscriber may not be installed yet, so print directly
			eprintln!("{error}");
			ExitCode::FAILURE
		}
	}
}
