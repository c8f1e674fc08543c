#![allow(missing_docs)]

use clap::Parser;

mod argv;
mod cmd;
mod logging;

#[derive(Parser)]
#[command(name = "btfexport", about = "Export BTF type information from ELF objects or raw blobs as JSON")]
struct Cli {
	#[command(flatten)]
	export: cmd::export::Args,
	/// Log every converted type to stderr.
	#[arg(long)]
	verbose: bool,
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> btfexport::btf::Result<()> {
	let cli = Cli::parse_from(argv::normalize_long_flags(std::env::args_os()));
	logging::init(cli.verbose);
	cmd::export::run(cli.export)
}
