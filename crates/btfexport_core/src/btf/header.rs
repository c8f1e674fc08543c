use crate::btf::bytes::Cursor;
use crate::btf::{BtfError, Result};

/// Byte order of a BTF blob or ELF image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Little-endian byte order.
	Little,
	/// Big-endian byte order.
	Big,
}

impl Endianness {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Parsed BTF header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BtfHeader {
	/// Byte order detected from the magic.
	pub endianness: Endianness,
	/// Format version (always `1`).
	pub version: u8,
	/// Header flags (currently unused by the format).
	pub flags: u8,
	/// Header length in bytes; section offsets are relative to its end.
	pub hdr_len: u32,
	/// Type section offset after the header.
	pub type_off: u32,
	/// Type section length.
	pub type_len: u32,
	/// String section offset after the header.
	pub str_off: u32,
	/// String section length.
	pub str_len: u32,
}

impl BtfHeader {
	/// BTF magic number.
	pub const MAGIC: u16 = 0xEB9F;
	/// Size of the fixed header prefix.
	pub const MIN_SIZE: usize = 24;
	/// Only supported format version.
	pub const VERSION: u8 = 1;

	/// Parse a BTF header from the beginning of `bytes`.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let endianness = Self::detect(bytes).ok_or_else(|| BtfError::BadBtfMagic {
			magic: bytes.get(0..2).map(|raw| u16::from_le_bytes([raw[0], raw[1]])).unwrap_or(0),
		})?;

		let mut cursor = Cursor::new(bytes, endianness);
		cursor.skip(2)?;
		let version = cursor.read_u8()?;
		if version != Self::VERSION {
			return Err(BtfError::UnsupportedBtfVersion { version });
		}
		let flags = cursor.read_u8()?;
		let hdr_len = cursor.read_u32()?;
		if (hdr_len as usize) < Self::MIN_SIZE {
			return Err(BtfError::InvalidHeaderLen { hdr_len });
		}

		let header = Self {
			endianness,
			version,
			flags,
			hdr_len,
			type_off: cursor.read_u32()?,
			type_len: cursor.read_u32()?,
			str_off: cursor.read_u32()?,
			str_len: cursor.read_u32()?,
		};

		header.check_section("type", header.type_off, header.type_len, bytes.len())?;
		header.check_section("string", header.str_off, header.str_len, bytes.len())?;
		Ok(header)
	}

	/// Detect byte order from the leading magic, if present.
	pub fn detect(bytes: &[u8]) -> Option<Endianness> {
		match bytes.get(0..2)? {
			[0x9F, 0xEB] => Some(Endianness::Little),
			[0xEB, 0x9F] => Some(Endianness::Big),
			_ => None,
		}
	}

	/// Byte range of the type section within the blob.
	pub fn type_range(&self) -> std::ops::Range<usize> {
		let start = self.hdr_len as usize + self.type_off as usize;
		start..start + self.type_len as usize
	}

	/// Byte range of the string section within the blob.
	pub fn str_range(&self) -> std::ops::Range<usize> {
		let start = self.hdr_len as usize + self.str_off as usize;
		start..start + self.str_len as usize
	}

	fn check_section(&self, section: &'static str, off: u32, len: u32, available: usize) -> Result<()> {
		let offset = self.hdr_len as usize + off as usize;
		let len = len as usize;
		if offset.checked_add(len).is_none_or(|end| end > available) {
			return Err(BtfError::SectionOutOfRange {
				section,
				offset,
				len,
				available,
			});
		}
		Ok(())
	}
}
