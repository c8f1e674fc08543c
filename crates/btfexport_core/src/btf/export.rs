use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::btf::target::{Target, resolve_targets};
use crate::btf::traverse::{dump_all, walk_closure};
use crate::btf::{BtfSpec, ExportOptions, ExportedNode, Result, TypeId};

/// Top-level JSON value written for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExportDocument {
	/// Every node in ID order, serialized as an array.
	Dump(Vec<ExportedNode>),
	/// Closure of the requested roots, serialized as an object keyed by decimal ID.
	Closure(BTreeMap<TypeId, ExportedNode>),
}

impl ExportDocument {
	/// Number of exported nodes.
	pub fn len(&self) -> usize {
		match self {
			Self::Dump(nodes) => nodes.len(),
			Self::Closure(nodes) => nodes.len(),
		}
	}

	/// Whether no node was exported.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Stable lowercase label of the traversal mode.
	pub fn mode(&self) -> &'static str {
		match self {
			Self::Dump(_) => "dump",
			Self::Closure(_) => "closure",
		}
	}
}

/// Build the document for `targets`: a full dump when empty, otherwise their closure.
pub fn build_document(spec: &BtfSpec, targets: &[Target], options: &ExportOptions) -> Result<ExportDocument> {
	if targets.is_empty() {
		return dump_all(spec, options).map(ExportDocument::Dump);
	}

	let roots = resolve_targets(spec, targets)?;
	walk_closure(spec, &roots, options).map(ExportDocument::Closure)
}

/// Output path for `input`: the full input path with `.json` appended.
pub fn default_output_path(input: &Path) -> PathBuf {
	let mut path = OsString::from(input.as_os_str());
	path.push(".json");
	PathBuf::from(path)
}

/// Serialize `doc` to any writer.
pub fn write_json_to<W: Write>(writer: W, doc: &ExportDocument, pretty: bool) -> Result<()> {
	let mut writer = BufWriter::new(writer);
	if pretty {
		serde_json::to_writer_pretty(&mut writer, doc)?;
	} else {
		serde_json::to_writer(&mut writer, doc)?;
	}
	writer.write_all(b"\n")?;
	writer.flush()?;
	Ok(())
}

/// Create (or truncate) `path` and serialize `doc` into it.
pub fn write_json(path: &Path, doc: &ExportDocument, pretty: bool) -> Result<()> {
	let file = File::create(path)?;
	write_json_to(file, doc, pretty)?;
	info!(path = %path.display(), mode = doc.mode(), nodes = doc.len(), "export.written");
	Ok(())
}
