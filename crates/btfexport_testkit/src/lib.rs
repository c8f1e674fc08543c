//! Shared test helpers for workspace crates.
//!
//! [`BtfBuilder`] encodes raw BTF blobs type by type, and [`elf_with_sections`] wraps
//! them into minimal ELF images so loader and CLI tests never need binary fixtures.

use std::collections::HashMap;

/// `int` encoding flag: signed.
pub const INT_SIGNED: u8 = 1;
/// `int` encoding flag: char.
pub const INT_CHAR: u8 = 2;
/// `int` encoding flag: bool.
pub const INT_BOOL: u8 = 4;

/// Linkage value: static.
pub const LINKAGE_STATIC: u32 = 0;
/// Linkage value: global.
pub const LINKAGE_GLOBAL: u32 = 1;
/// Linkage value: extern.
pub const LINKAGE_EXTERN: u32 = 2;

const KIND_INT: u32 = 1;
const KIND_PTR: u32 = 2;
const KIND_ARRAY: u32 = 3;
const KIND_STRUCT: u32 = 4;
const KIND_UNION: u32 = 5;
const KIND_ENUM: u32 = 6;
const KIND_FWD: u32 = 7;
const KIND_TYPEDEF: u32 = 8;
const KIND_VOLATILE: u32 = 9;
const KIND_CONST: u32 = 10;
const KIND_RESTRICT: u32 = 11;
const KIND_FUNC: u32 = 12;
const KIND_FUNC_PROTO: u32 = 13;
const KIND_VAR: u32 = 14;
const KIND_DATASEC: u32 = 15;
const KIND_FLOAT: u32 = 16;
const KIND_DECL_TAG: u32 = 17;
const KIND_TYPE_TAG: u32 = 18;
const KIND_ENUM64: u32 = 19;

/// Incremental encoder for raw BTF blobs.
///
/// Every `add` method returns the type ID the record will be assigned, starting at 1.
pub struct BtfBuilder {
	big_endian: bool,
	types: Vec<u8>,
	strings: Vec<u8>,
	string_offsets: HashMap<String, u32>,
	next_id: u32,
}

impl Default for BtfBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl BtfBuilder {
	/// Create an empty little-endian builder.
	pub fn new() -> Self {
		let mut string_offsets = HashMap::new();
		string_offsets.insert(String::new(), 0);
		Self {
			big_endian: false,
			types: Vec::new(),
			strings: vec![0],
			string_offsets,
			next_id: 1,
		}
	}

	/// Encode every field big-endian.
	pub fn big_endian(mut self) -> Self {
		self.big_endian = true;
		self
	}

	/// Intern `value` in the string section and return its offset.
	pub fn string(&mut self, value: &str) -> u32 {
		if let Some(offset) = self.string_offsets.get(value) {
			return *offset;
		}
		let offset = self.strings.len() as u32;
		self.strings.extend_from_slice(value.as_bytes());
		self.strings.push(0);
		self.string_offsets.insert(value.to_owned(), offset);
		offset
	}

	/// Add an `int` covering all `size * 8` bits.
	pub fn int(&mut self, name: &str, size: u32, encoding: u8) -> u32 {
		let id = self.record(name, KIND_INT, 0, false, size);
		self.u32((u32::from(encoding) << 24) | (size * 8));
		id
	}

	/// Add a pointer.
	pub fn pointer(&mut self, target: u32) -> u32 {
		self.record("", KIND_PTR, 0, false, target)
	}

	/// Add an array.
	pub fn array(&mut self, elem: u32, index: u32, nelems: u32) -> u32 {
		let id = self.record("", KIND_ARRAY, 0, false, 0);
		self.u32(elem);
		self.u32(index);
		self.u32(nelems);
		id
	}

	/// Add a struct whose members are `(name, type, bit_offset)`.
	pub fn structure(&mut self, name: &str, size: u32, members: &[(&str, u32, u32)]) -> u32 {
		self.composite(KIND_STRUCT, name, size, members, false)
	}

	/// Add a union whose members are `(name, type, bit_offset)`.
	pub fn union(&mut self, name: &str, size: u32, members: &[(&str, u32, u32)]) -> u32 {
		self.composite(KIND_UNION, name, size, members, false)
	}

	/// Add a struct with kind_flag set; members are `(name, type, bit_offset, bitfield_size)`.
	pub fn bitfield_struct(&mut self, name: &str, size: u32, members: &[(&str, u32, u32, u32)]) -> u32 {
		let encoded: Vec<(&str, u32, u32)> = members
			.iter()
			.map(|(name, ty, offset, bits)| (*name, *ty, (bits << 24) | offset))
			.collect();
		self.composite(KIND_STRUCT, name, size, &encoded, true)
	}

	/// Add a 32-bit enum.
	pub fn enumeration(&mut self, name: &str, size: u32, signed: bool, values: &[(&str, i32)]) -> u32 {
		let id = self.record(name, KIND_ENUM, values.len() as u32, signed, size);
		for (value_name, value) in values {
			let offset = self.string(value_name);
			self.u32(offset);
			self.u32(*value as u32);
		}
		id
	}

	/// Add a 64-bit enum.
	pub fn enum64(&mut self, name: &str, size: u32, signed: bool, values: &[(&str, u64)]) -> u32 {
		let id = self.record(name, KIND_ENUM64, values.len() as u32, signed, size);
		for (value_name, value) in values {
			let offset = self.string(value_name);
			self.u32(offset);
			self.u32(*value as u32);
			self.u32((*value >> 32) as u32);
		}
		id
	}

	/// Add a forward declaration.
	pub fn fwd(&mut self, name: &str, union: bool) -> u32 {
		self.record(name, KIND_FWD, 0, union, 0)
	}

	/// Add a typedef.
	pub fn typedef(&mut self, name: &str, ty: u32) -> u32 {
		self.record(name, KIND_TYPEDEF, 0, false, ty)
	}

	/// Add a volatile qualifier.
	pub fn volatile(&mut self, ty: u32) -> u32 {
		self.record("", KIND_VOLATILE, 0, false, ty)
	}

	/// Add a const qualifier.
	pub fn constant(&mut self, ty: u32) -> u32 {
		self.record("", KIND_CONST, 0, false, ty)
	}

	/// Add a restrict qualifier.
	pub fn restrict(&mut self, ty: u32) -> u32 {
		self.record("", KIND_RESTRICT, 0, false, ty)
	}

	/// Add a function pointing at a prototype.
	pub fn func(&mut self, name: &str, proto: u32, linkage: u32) -> u32 {
		self.record(name, KIND_FUNC, linkage, false, proto)
	}

	/// Add a function prototype with `(name, type)` parameters.
	pub fn func_proto(&mut self, ret: u32, params: &[(&str, u32)]) -> u32 {
		let id = self.record("", KIND_FUNC_PROTO, params.len() as u32, false, ret);
		for (param_name, ty) in params {
			let offset = self.string(param_name);
			self.u32(offset);
			self.u32(*ty);
		}
		id
	}

	/// Add a variable.
	pub fn var(&mut self, name: &str, ty: u32, linkage: u32) -> u32 {
		let id = self.record(name, KIND_VAR, 0, false, ty);
		self.u32(linkage);
		id
	}

	/// Add a data section with `(type, offset, size)` entries.
	pub fn datasec(&mut self, name: &str, size: u32, vars: &[(u32, u32, u32)]) -> u32 {
		let id = self.record(name, KIND_DATASEC, vars.len() as u32, false, size);
		for (ty, offset, var_size) in vars {
			self.u32(*ty);
			self.u32(*offset);
			self.u32(*var_size);
		}
		id
	}

	/// Add a float.
	pub fn float(&mut self, name: &str, size: u32) -> u32 {
		self.record(name, KIND_FLOAT, 0, false, size)
	}

	/// Add a declaration tag.
	pub fn decl_tag(&mut self, name: &str, ty: u32, component_idx: i32) -> u32 {
		let id = self.record(name, KIND_DECL_TAG, 0, false, ty);
		self.u32(component_idx as u32);
		id
	}

	/// Add a type tag.
	pub fn type_tag(&mut self, name: &str, ty: u32) -> u32 {
		self.record(name, KIND_TYPE_TAG, 0, false, ty)
	}

	/// Append a record header with an arbitrary kind number and no payload.
	pub fn raw_record(&mut self, kind: u32, size_or_type: u32) -> u32 {
		self.record("", kind, 0, false, size_or_type)
	}

	/// Encode header, type section, and string section.
	pub fn build(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(24 + self.types.len() + self.strings.len());
		if self.big_endian {
			out.extend_from_slice(&[0xEB, 0x9F]);
		} else {
			out.extend_from_slice(&[0x9F, 0xEB]);
		}
		out.push(1);
		out.push(0);
		for value in [24, 0, self.types.len() as u32, self.types.len() as u32, self.strings.len() as u32] {
			out.extend_from_slice(&self.encode_u32(value));
		}
		out.extend_from_slice(&self.types);
		out.extend_from_slice(&self.strings);
		out
	}

	fn composite(&mut self, kind: u32, name: &str, size: u32, members: &[(&str, u32, u32)], kind_flag: bool) -> u32 {
		let id = self.record(name, kind, members.len() as u32, kind_flag, size);
		for (member_name, ty, offset) in members {
			let name_off = self.string(member_name);
			self.u32(name_off);
			self.u32(*ty);
			self.u32(*offset);
		}
		id
	}

	fn record(&mut self, name: &str, kind: u32, vlen: u32, kind_flag: bool, size_or_type: u32) -> u32 {
		let name_off = self.string(name);
		let info = (u32::from(kind_flag) << 31) | (kind << 24) | (vlen & 0xffff);
		self.u32(name_off);
		self.u32(info);
		self.u32(size_or_type);
		let id = self.next_id;
		self.next_id += 1;
		id
	}

	fn u32(&mut self, value: u32) {
		let raw = self.encode_u32(value);
		self.types.extend_from_slice(&raw);
	}

	fn encode_u32(&self, value: u32) -> [u8; 4] {
		if self.big_endian { value.to_be_bytes() } else { value.to_le_bytes() }
	}
}

/// ELF layout parameters for [`elf_with_sections`].
#[derive(Debug, Clone, Copy)]
pub struct ElfLayout {
	/// Emit `ELFCLASS64` headers instead of `ELFCLASS32`.
	pub class64: bool,
	/// Emit big-endian headers.
	pub big_endian: bool,
}

impl Default for ElfLayout {
	fn default() -> Self {
		Self {
			class64: true,
			big_endian: false,
		}
	}
}

/// Build a 64-bit little-endian ELF image holding a `.BTF` section.
pub fn elf_with_btf_section(btf: &[u8]) -> Vec<u8> {
	elf_with_sections(ElfLayout::default(), &[(".text", &[0xC3_u8][..]), (".BTF", btf)])
}

/// Build a minimal relocatable ELF image with the given `(name, bytes)` sections.
///
/// Section 0 is the null section and the last one is `.shstrtab`.
pub fn elf_with_sections(layout: ElfLayout, sections: &[(&str, &[u8])]) -> Vec<u8> {
	let (ehsize, shentsize) = if layout.class64 { (64_usize, 64_usize) } else { (52, 40) };

	let mut shstrtab = vec![0_u8];
	let mut name_offsets = Vec::with_capacity(sections.len());
	for (name, _) in sections {
		name_offsets.push(shstrtab.len() as u32);
		shstrtab.extend_from_slice(name.as_bytes());
		shstrtab.push(0);
	}
	let shstrtab_name = shstrtab.len() as u32;
	shstrtab.extend_from_slice(b".shstrtab\0");

	let mut body = Vec::new();
	let mut placed = Vec::with_capacity(sections.len() + 1);
	for (_, bytes) in sections {
		placed.push((ehsize + body.len(), bytes.len()));
		body.extend_from_slice(bytes);
	}
	placed.push((ehsize + body.len(), shstrtab.len()));
	body.extend_from_slice(&shstrtab);
	while body.len() % 8 != 0 {
		body.push(0);
	}

	let shoff = ehsize + body.len();
	let shnum = sections.len() + 2;
	let mut writer = ElfWriter {
		layout,
		out: Vec::with_capacity(shoff + shnum * shentsize),
	};

	writer.out.extend_from_slice(b"\x7fELF");
	writer.out.push(if layout.class64 { 2 } else { 1 });
	writer.out.push(if layout.big_endian { 2 } else { 1 });
	writer.out.push(1);
	writer.out.extend_from_slice(&[0; 9]);
	writer.u16(1);
	writer.u16(0xF7);
	writer.u32(1);
	writer.word(0);
	writer.word(0);
	writer.word(shoff as u64);
	writer.u32(0);
	writer.u16(ehsize as u16);
	writer.u16(0);
	writer.u16(0);
	writer.u16(shentsize as u16);
	writer.u16(shnum as u16);
	writer.u16((shnum - 1) as u16);
	writer.out.extend_from_slice(&body);

	writer.out.extend(std::iter::repeat_n(0, shentsize));
	let names = name_offsets.into_iter().chain(std::iter::once(shstrtab_name));
	for (name, (offset, size)) in names.zip(placed) {
		let sh_type = if name == shstrtab_name { 3 } else { 1 };
		writer.u32(name);
		writer.u32(sh_type);
		writer.word(0);
		writer.word(0);
		writer.word(offset as u64);
		writer.word(size as u64);
		writer.u32(0);
		writer.u32(0);
		writer.word(1);
		writer.word(0);
	}

	writer.out
}

struct ElfWriter {
	layout: ElfLayout,
	out: Vec<u8>,
}

impl ElfWriter {
	fn u16(&mut self, value: u16) {
		let raw = if self.layout.big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
		self.out.extend_from_slice(&raw);
	}

	fn u32(&mut self, value: u32) {
		let raw = if self.layout.big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
		self.out.extend_from_slice(&raw);
	}

	fn word(&mut self, value: u64) {
		if self.layout.class64 {
			let raw = if self.layout.big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
			self.out.extend_from_slice(&raw);
		} else {
			self.u32(value as u32);
		}
	}
}
