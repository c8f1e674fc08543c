use std::fs;
use std::ops::Range;
use std::path::Path;

use tracing::info;

use crate::btf::compression::decode_bytes;
use crate::btf::elf::{ELF_MAGIC, find_section};
use crate::btf::{BtfError, BtfHeader, BtfSpec, Compression, Result};

/// Container the BTF blob was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
	/// ELF object carrying a `.BTF` section.
	Elf,
	/// Bare BTF blob, as exposed under `/sys/kernel/btf`.
	Raw,
}

impl Container {
	/// Detect the container from leading magic bytes.
	pub fn detect(bytes: &[u8]) -> Option<Self> {
		if bytes.starts_with(&ELF_MAGIC) {
			return Some(Self::Elf);
		}
		BtfHeader::detect(bytes).map(|_| Self::Raw)
	}

	/// Render container kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Elf => "elf",
			Self::Raw => "raw",
		}
	}
}

/// Opened input with decoded bytes and the located BTF blob.
pub struct BtfFile {
	/// Compression mode detected for source bytes.
	pub compression: Compression,
	/// Container holding the blob.
	pub container: Container,
	/// Parsed BTF header.
	pub header: BtfHeader,
	bytes: Vec<u8>,
	btf_range: Range<usize>,
}

impl BtfFile {
	/// Read, decompress, and locate BTF data in a file on disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let raw = fs::read(path)?;
		Self::from_bytes(raw)
	}

	/// Locate BTF data in an in-memory input.
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		let container = Container::detect(&bytes).ok_or(BtfError::NotBtfAfterDecompress)?;
		let btf_range = match container {
			Container::Elf => find_section(&bytes, ".BTF")?.ok_or(BtfError::BtfSectionNotFound)?,
			Container::Raw => 0..bytes.len(),
		};
		let header = BtfHeader::parse(&bytes[btf_range.clone()])?;

		Ok(Self {
			compression,
			container,
			header,
			bytes,
			btf_range,
		})
	}

	/// Return the raw BTF blob.
	pub fn btf_bytes(&self) -> &[u8] {
		&self.bytes[self.btf_range.clone()]
	}

	/// Decode the type store.
	pub fn spec(&self) -> Result<BtfSpec> {
		let spec = BtfSpec::parse(self.btf_bytes())?;
		info!(
			types = spec.len(),
			container = self.container.as_str(),
			compression = self.compression.as_str(),
			endianness = self.header.endianness.as_str(),
			"btf.loaded"
		);
		Ok(spec)
	}
}
