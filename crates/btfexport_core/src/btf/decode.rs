use crate::btf::bytes::Cursor;
use crate::btf::types::{
	Array, Composite, Datasec, DeclTag, Enum, EnumValue, Float, Func, FuncProto, Fwd, FwdKind, Int, IntEncoding, Linkage, Member, Param, Pointer,
	Qualifier, TypeTag, Typedef, Var, VarSecinfo,
};
use crate::btf::{BtfError, BtfType, Endianness, Result, TypeId};

const KIND_INT: u8 = 1;
const KIND_PTR: u8 = 2;
const KIND_ARRAY: u8 = 3;
const KIND_STRUCT: u8 = 4;
const KIND_UNION: u8 = 5;
const KIND_ENUM: u8 = 6;
const KIND_FWD: u8 = 7;
const KIND_TYPEDEF: u8 = 8;
const KIND_VOLATILE: u8 = 9;
const KIND_CONST: u8 = 10;
const KIND_RESTRICT: u8 = 11;
const KIND_FUNC: u8 = 12;
const KIND_FUNC_PROTO: u8 = 13;
const KIND_VAR: u8 = 14;
const KIND_DATASEC: u8 = 15;
const KIND_FLOAT: u8 = 16;
const KIND_DECL_TAG: u8 = 17;
const KIND_TYPE_TAG: u8 = 18;
const KIND_ENUM64: u8 = 19;

/// Zero-terminated name table addressed by byte offset.
pub struct StringTable<'a> {
	bytes: &'a [u8],
}

impl<'a> StringTable<'a> {
	/// Wrap raw string-section bytes.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes }
	}

	/// Resolve a name offset; invalid UTF-8 is replaced lossily.
	pub fn get(&self, offset: u32) -> Result<Box<str>> {
		let out_of_range = || BtfError::StringOffsetOutOfRange {
			offset,
			len: self.bytes.len(),
		};
		if offset as usize >= self.bytes.len() {
			if offset == 0 {
				return Ok(Box::from(""));
			}
			return Err(out_of_range());
		}

		let mut cursor = Cursor::at(self.bytes, offset as usize, Endianness::Little)?;
		let raw = cursor.read_cstring_bytes().map_err(|_| out_of_range())?;
		Ok(String::from_utf8_lossy(raw).into_owned().into_boxed_str())
	}
}

/// Decode a type section into nodes for IDs `1..`; ID 0 is not part of the section.
pub fn decode_types(section: &[u8], strings: &StringTable<'_>, endianness: Endianness) -> Result<Vec<BtfType>> {
	let mut cursor = Cursor::new(section, endianness);
	let mut types = Vec::new();

	while !cursor.is_empty() {
		let id = types.len() as TypeId + 1;
		let at = cursor.pos();
		let name = strings.get(cursor.read_u32()?)?;
		let info = cursor.read_u32()?;
		let size_or_type = cursor.read_u32()?;

		let vlen = (info & 0xffff) as usize;
		let kind = ((info >> 24) & 0x1f) as u8;
		let kind_flag = info >> 31 == 1;

		let item = match kind {
			KIND_INT => {
				let data = cursor.read_u32()?;
				BtfType::Int(Int {
					name,
					size: size_or_type,
					encoding: IntEncoding(((data >> 24) & 0x0f) as u8),
					bit_offset: ((data >> 16) & 0xff) as u8,
					bits: (data & 0xff) as u8,
				})
			}
			KIND_PTR => BtfType::Pointer(Pointer { target: size_or_type }),
			KIND_ARRAY => BtfType::Array(Array {
				elem: cursor.read_u32()?,
				index: cursor.read_u32()?,
				nelems: cursor.read_u32()?,
			}),
			KIND_STRUCT | KIND_UNION => {
				let body = Composite {
					name,
					size: size_or_type,
					members: decode_members(&mut cursor, strings, vlen, kind_flag)?,
				};
				if kind == KIND_STRUCT { BtfType::Struct(body) } else { BtfType::Union(body) }
			}
			KIND_ENUM => {
				let mut values = Vec::with_capacity(vlen);
				for _ in 0..vlen {
					let name = strings.get(cursor.read_u32()?)?;
					let raw = cursor.read_i32()?;
					let value = if kind_flag { i64::from(raw) as u64 } else { u64::from(raw as u32) };
					values.push(EnumValue { name, value });
				}
				BtfType::Enum(Enum {
					name,
					size: size_or_type,
					signed: kind_flag,
					values,
				})
			}
			KIND_ENUM64 => {
				let mut values = Vec::with_capacity(vlen);
				for _ in 0..vlen {
					let name = strings.get(cursor.read_u32()?)?;
					let lo = u64::from(cursor.read_u32()?);
					let hi = u64::from(cursor.read_u32()?);
					values.push(EnumValue { name, value: (hi << 32) | lo });
				}
				BtfType::Enum(Enum {
					name,
					size: size_or_type,
					signed: kind_flag,
					values,
				})
			}
			KIND_FWD => BtfType::Fwd(Fwd {
				name,
				kind: if kind_flag { FwdKind::Union } else { FwdKind::Struct },
			}),
			KIND_TYPEDEF => BtfType::Typedef(Typedef { name, ty: size_or_type }),
			KIND_VOLATILE => BtfType::Volatile(Qualifier { ty: size_or_type }),
			KIND_CONST => BtfType::Const(Qualifier { ty: size_or_type }),
			KIND_RESTRICT => BtfType::Restrict(Qualifier { ty: size_or_type }),
			KIND_FUNC => BtfType::Func(Func {
				name,
				ty: size_or_type,
				linkage: Linkage::from_raw(vlen as u32),
			}),
			KIND_FUNC_PROTO => {
				let mut params = Vec::with_capacity(vlen);
				for _ in 0..vlen {
					let name = strings.get(cursor.read_u32()?)?;
					let ty = cursor.read_u32()?;
					params.push(Param { name, ty });
				}
				BtfType::FuncProto(FuncProto { ret: size_or_type, params })
			}
			KIND_VAR => BtfType::Var(Var {
				name,
				ty: size_or_type,
				linkage: Linkage::from_raw(cursor.read_u32()?),
			}),
			KIND_DATASEC => {
				let mut vars = Vec::with_capacity(vlen);
				for _ in 0..vlen {
					vars.push(VarSecinfo {
						ty: cursor.read_u32()?,
						offset: cursor.read_u32()?,
						size: cursor.read_u32()?,
					});
				}
				BtfType::Datasec(Datasec {
					name,
					size: size_or_type,
					vars,
				})
			}
			KIND_FLOAT => BtfType::Float(Float { name, size: size_or_type }),
			KIND_DECL_TAG => BtfType::DeclTag(DeclTag {
				name,
				ty: size_or_type,
				component_idx: cursor.read_i32()?,
			}),
			KIND_TYPE_TAG => BtfType::TypeTag(TypeTag { name, ty: size_or_type }),
			other => return Err(BtfError::UnknownKind { kind: other, id, at }),
		};

		types.push(item);
	}

	Ok(types)
}

fn decode_members(cursor: &mut Cursor<'_>, strings: &StringTable<'_>, vlen: usize, kind_flag: bool) -> Result<Vec<Member>> {
	let mut members = Vec::with_capacity(vlen);
	for _ in 0..vlen {
		let name = strings.get(cursor.read_u32()?)?;
		let ty = cursor.read_u32()?;
		let offset = cursor.read_u32()?;
		let (bit_offset, bitfield_size) = if kind_flag { (offset & 0x00ff_ffff, offset >> 24) } else { (offset, 0) };
		members.push(Member {
			name,
			ty,
			bit_offset,
			bitfield_size,
		});
	}
	Ok(members)
}
