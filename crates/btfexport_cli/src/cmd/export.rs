use std::path::PathBuf;

use btfexport::btf::{BtfError, BtfFile, ExportOptions, Result, build_document, default_output_path, parse_targets, write_json};
use tracing::info;

#[derive(clap::Args)]
pub struct Args {
	/// ELF object or raw BTF blob to read.
	pub input: PathBuf,
	/// Comma-separated roots, each `name` or `category:name`; exports everything when absent.
	#[arg(long)]
	pub target: Option<String>,
	/// Resolve references through typedef and qualifier wrappers.
	#[arg(long)]
	pub dereference: bool,
	/// Emit members and enum values keyed by name.
	#[arg(long)]
	pub as_map: bool,
	/// Indent the JSON output.
	#[arg(long)]
	pub pretty: bool,
}

/// Export the input's types to `<input>.json`.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		target,
		dereference,
		as_map,
		pretty,
	} = args;

	let targets = match target.as_deref() {
		Some(list) => {
			let targets = parse_targets(list)?;
			if targets.is_empty() {
				return Err(BtfError::InvalidTarget { target: list.to_owned() });
			}
			targets
		}
		None => Vec::new(),
	};
	let options = ExportOptions { dereference, as_map };

	let spec = BtfFile::open(&input)?.spec()?;
	info!(targets = targets.len(), dereference, as_map, "export.start");
	let doc = build_document(&spec, &targets, &options)?;

	let output = default_output_path(&input);
	write_json(&output, &doc, pretty)
}
