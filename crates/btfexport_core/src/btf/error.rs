use thiserror::Error;

use crate::btf::TypeId;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, BtfError>;

/// Errors produced while loading, converting, and exporting BTF type graphs.
#[derive(Debug, Error)]
pub enum BtfError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON serialization failure.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Input is neither an ELF image, a raw BTF blob, nor zstd-compressed.
	#[error("unsupported input, expected ELF, raw BTF or zstd (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Decompressed stream was neither ELF nor raw BTF.
	#[error("decompressed data is neither ELF nor raw BTF")]
	NotBtfAfterDecompress,
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// ELF identification or section table is malformed.
	#[error("invalid ELF image: {reason}")]
	InvalidElf {
		/// Short description of the failed check.
		reason: &'static str,
	},
	/// ELF image carries no `.BTF` section.
	#[error("ELF image has no .BTF section")]
	BtfSectionNotFound,
	/// BTF blob does not start with `0xEB9F`.
	#[error("bad BTF magic 0x{magic:04x}")]
	BadBtfMagic {
		/// Magic read in little-endian order.
		magic: u16,
	},
	/// Unsupported BTF header version.
	#[error("unsupported BTF version {version} (expected 1)")]
	UnsupportedBtfVersion {
		/// Parsed header version.
		version: u8,
	},
	/// Header length field is smaller than the fixed header.
	#[error("invalid BTF header length {hdr_len}")]
	InvalidHeaderLen {
		/// Declared header length.
		hdr_len: u32,
	},
	/// Type or string section exceeds the BTF blob.
	#[error("BTF {section} section out of range: offset={offset}, len={len}, available={available}")]
	SectionOutOfRange {
		/// Section label.
		section: &'static str,
		/// Section start relative to the blob.
		offset: usize,
		/// Declared section length.
		len: usize,
		/// Blob length.
		available: usize,
	},
	/// Name offset points outside the string section.
	#[error("string offset {offset} out of range (string section is {len} bytes)")]
	StringOffsetOutOfRange {
		/// Offending offset.
		offset: u32,
		/// String section length.
		len: usize,
	},
	/// Type record uses a kind number this loader does not know.
	#[error("unknown BTF kind {kind} for type {id} at offset {at}")]
	UnknownKind {
		/// Raw kind number.
		kind: u8,
		/// ID the record would have been assigned.
		id: TypeId,
		/// Record offset inside the type section.
		at: usize,
	},
	/// Type reference points past the end of the type table.
	#[error("type {id} not found")]
	TypeNotFound {
		/// Missing type ID.
		id: TypeId,
	},
	/// Qualifier/typedef chain did not terminate.
	#[error("dereference of type {id} exceeded max type depth")]
	DereferenceTooDeep {
		/// Type the walk started from.
		id: TypeId,
	},
	/// Size requested for a type without a size.
	#[error("type {id} ({kind}) has no size")]
	Unsized {
		/// Unsized type reached by the walk.
		id: TypeId,
		/// Kind label of that type.
		kind: &'static str,
	},
	/// Size computation overflowed or did not terminate.
	#[error("size of type {id} overflowed or exceeded max type depth")]
	SizeOverflow {
		/// Type the computation started from.
		id: TypeId,
	},
	/// Node category the exporter has no representation for.
	#[error("unsupported type category {kind} for type {id}")]
	UnsupportedKind {
		/// Type ID being converted.
		id: TypeId,
		/// Kind label of the type.
		kind: &'static str,
	},
	/// Target name matched no type.
	#[error("target not found: {target}")]
	TargetNotFound {
		/// Target as written by the caller.
		target: String,
	},
	/// Target matched more than one type.
	#[error("target {target} is ambiguous ({count} matches), qualify it as category:name")]
	AmbiguousTarget {
		/// Target as written by the caller.
		target: String,
		/// Number of matching types.
		count: usize,
	},
	/// `category:` token names no exportable category.
	#[error(
		"bad category {category}, expected one of void, int, pointer, array, struct, union, enum, fwd, typedef, volatile, const, restrict, func, funcproto, var, datasec, float"
	)]
	BadCategory {
		/// Category token as written.
		category: String,
	},
	/// Target string is empty.
	#[error("invalid target {target:?}")]
	InvalidTarget {
		/// Target as written by the caller.
		target: String,
	},
}
