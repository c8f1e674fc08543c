use std::ops::Range;

use crate::btf::bytes::{Cursor, slice_at};
use crate::btf::{BtfError, Endianness, Result};

/// ELF identification magic.
pub const ELF_MAGIC: [u8; 4] = *b"\x7fELF";

const SHT_NOBITS: u32 = 8;
const SHN_XINDEX: u16 = 0xffff;

/// Class and byte order read from `e_ident`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfIdent {
	/// `ELFCLASS64` when set, `ELFCLASS32` otherwise.
	pub class64: bool,
	/// Byte order of all multi-byte header fields.
	pub endianness: Endianness,
}

impl ElfIdent {
	/// Validate magic, class, and data encoding.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let ident = bytes.get(0..16).ok_or(BtfError::InvalidElf { reason: "short identification" })?;
		if ident[0..4] != ELF_MAGIC {
			return Err(BtfError::InvalidElf { reason: "bad magic" });
		}
		let class64 = match ident[4] {
			1 => false,
			2 => true,
			_ => return Err(BtfError::InvalidElf { reason: "unknown class" }),
		};
		let endianness = match ident[5] {
			1 => Endianness::Little,
			2 => Endianness::Big,
			_ => return Err(BtfError::InvalidElf { reason: "unknown data encoding" }),
		};
		Ok(Self { class64, endianness })
	}
}

struct SectionHeader {
	name: u32,
	kind: u32,
	link: u32,
	offset: u64,
	size: u64,
}

/// Locate the file byte range of the first section called `name`.
pub fn find_section(bytes: &[u8], name: &str) -> Result<Option<Range<usize>>> {
	let ident = ElfIdent::parse(bytes)?;
	let wide = ident.class64;

	let mut cursor = Cursor::at(bytes, if wide { 0x28 } else { 0x20 }, ident.endianness)?;
	let shoff = to_usize(cursor.read_word(wide)?)?;
	cursor.skip(if wide { 0x3A - 0x30 } else { 0x2E - 0x24 })?;
	let shentsize = usize::from(cursor.read_u16()?);
	let mut shnum = usize::from(cursor.read_u16()?);
	let mut shstrndx = cursor.read_u16()?;

	if shoff == 0 {
		return Ok(None);
	}
	let min_entsize = if wide { 64 } else { 40 };
	if shentsize < min_entsize {
		return Err(BtfError::InvalidElf { reason: "section header entry too small" });
	}

	let first = read_section_header(bytes, ident, shoff, shentsize)?;
	if shnum == 0 {
		shnum = to_usize(first.size)?;
	}
	if shstrndx == SHN_XINDEX {
		shstrndx = u16::try_from(first.link).map_err(|_| BtfError::InvalidElf { reason: "section name table index" })?;
	}

	let headers = (0..shnum)
		.map(|idx| {
			let at = idx
				.checked_mul(shentsize)
				.and_then(|rel| rel.checked_add(shoff))
				.ok_or(BtfError::InvalidElf { reason: "section table offset overflow" })?;
			read_section_header(bytes, ident, at, shentsize)
		})
		.collect::<Result<Vec<_>>>()?;

	let names = headers
		.get(usize::from(shstrndx))
		.ok_or(BtfError::InvalidElf { reason: "section name table index" })?;
	let names = slice_at(bytes, to_usize(names.offset)?, to_usize(names.size)?)?;

	for header in &headers {
		let Some(candidate) = names.get(header.name as usize..) else {
			continue;
		};
		let Ok(candidate) = Cursor::new(candidate, ident.endianness).read_cstring_bytes() else {
			continue;
		};
		if candidate != name.as_bytes() || header.kind == SHT_NOBITS {
			continue;
		}

		let start = to_usize(header.offset)?;
		let len = to_usize(header.size)?;
		slice_at(bytes, start, len)?;
		return Ok(Some(start..start + len));
	}

	Ok(None)
}

fn read_section_header(bytes: &[u8], ident: ElfIdent, at: usize, entsize: usize) -> Result<SectionHeader> {
	let wide = ident.class64;
	let entry = slice_at(bytes, at, entsize)?;
	let mut cursor = Cursor::new(entry, ident.endianness);
	let name = cursor.read_u32()?;
	let kind = cursor.read_u32()?;
	let _flags = cursor.read_word(wide)?;
	let _addr = cursor.read_word(wide)?;
	let offset = cursor.read_word(wide)?;
	let size = cursor.read_word(wide)?;
	let link = cursor.read_u32()?;
	Ok(SectionHeader {
		name,
		kind,
		link,
		offset,
		size,
	})
}

fn to_usize(value: u64) -> Result<usize> {
	usize::try_from(value).map_err(|_| BtfError::InvalidElf {
		reason: "offset exceeds address space",
	})
}
