use std::collections::HashMap;

use crate::btf::decode::{StringTable, decode_types};
use crate::btf::{BtfError, BtfHeader, BtfType, Kind, Result, TypeId};

/// Maximum number of references followed by [`BtfSpec::underlying`] and [`BtfSpec::size_of`].
pub const MAX_TYPE_DEPTH: usize = 32;

/// Byte size reported for pointers.
pub const POINTER_SIZE: u64 = 8;

/// Read-only type store addressable by ID and by name.
#[derive(Debug, Clone)]
pub struct BtfSpec {
	types: Vec<BtfType>,
	by_name: HashMap<Box<str>, Vec<TypeId>>,
}

impl BtfSpec {
	/// Decode a raw BTF blob (header, type section, string section).
	pub fn parse(blob: &[u8]) -> Result<Self> {
		let header = BtfHeader::parse(blob)?;
		let strings = StringTable::new(&blob[header.str_range()]);
		let types = decode_types(&blob[header.type_range()], &strings, header.endianness)?;
		Ok(Self::from_types(types))
	}

	/// Build a store from nodes for IDs `1..`; ID 0 is always void.
	pub fn from_types(types: Vec<BtfType>) -> Self {
		let mut all = Vec::with_capacity(types.len() + 1);
		all.push(BtfType::Void);
		all.extend(types);

		let mut by_name: HashMap<Box<str>, Vec<TypeId>> = HashMap::new();
		for (id, item) in all.iter().enumerate() {
			let name = item.name();
			if !name.is_empty() {
				by_name.entry(Box::from(name)).or_default().push(id as TypeId);
			}
		}

		Self { types: all, by_name }
	}

	/// Number of types including void.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Whether the store holds only void.
	pub fn is_empty(&self) -> bool {
		self.types.len() <= 1
	}

	/// Look up a type by ID.
	pub fn type_by_id(&self, id: TypeId) -> Result<&BtfType> {
		self.types.get(id as usize).ok_or(BtfError::TypeNotFound { id })
	}

	/// Iterate `(id, type)` pairs in declaration order, starting with void.
	pub fn iter(&self) -> impl Iterator<Item = (TypeId, &BtfType)> + '_ {
		self.types.iter().enumerate().map(|(id, item)| (id as TypeId, item))
	}

	/// IDs of every type called `name`, in ID order.
	pub fn any_types_by_name(&self, name: &str) -> &[TypeId] {
		self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
	}

	/// IDs of every type of `kind` called `name`, in ID order.
	pub fn types_by_kind_and_name(&self, kind: Kind, name: &str) -> Vec<TypeId> {
		self.any_types_by_name(name)
			.iter()
			.copied()
			.filter(|id| self.types[*id as usize].kind() == kind)
			.collect()
	}

	/// Follow typedef, qualifier and type-tag wrappers from `id` to the first other type.
	pub fn underlying(&self, id: TypeId) -> Result<TypeId> {
		let mut current = id;
		for _ in 0..=MAX_TYPE_DEPTH {
			match self.type_by_id(current)?.wrapped() {
				Some(inner) => current = inner,
				None => return Ok(current),
			}
		}
		Err(BtfError::DereferenceTooDeep { id })
	}

	/// Byte size of `id`, looking through wrappers and multiplying array counts.
	pub fn size_of(&self, id: TypeId) -> Result<u64> {
		let mut count = 1_u64;
		let mut current = id;

		for _ in 0..MAX_TYPE_DEPTH {
			let item = self.type_by_id(current)?;
			let elem_size = match item {
				BtfType::Array(array) => {
					count = count.checked_mul(u64::from(array.nelems)).ok_or(BtfError::SizeOverflow { id })?;
					current = array.elem;
					continue;
				}
				BtfType::Typedef(_) | BtfType::Volatile(_) | BtfType::Const(_) | BtfType::Restrict(_) => {
					current = item.wrapped().ok_or(BtfError::SizeOverflow { id })?;
					continue;
				}
				BtfType::TypeTag(tag) => {
					current = tag.ty;
					continue;
				}
				BtfType::Int(int) => u64::from(int.size),
				BtfType::Float(float) => u64::from(float.size),
				BtfType::Enum(item) => u64::from(item.size),
				BtfType::Struct(item) | BtfType::Union(item) => u64::from(item.size),
				BtfType::Datasec(item) => u64::from(item.size),
				BtfType::Pointer(_) => POINTER_SIZE,
				BtfType::Void | BtfType::Fwd(_) | BtfType::Func(_) | BtfType::FuncProto(_) | BtfType::Var(_) | BtfType::DeclTag(_) => {
					return Err(BtfError::Unsized {
						id: current,
						kind: item.kind().as_str(),
					});
				}
			};
			return count.checked_mul(elem_size).ok_or(BtfError::SizeOverflow { id });
		}

		Err(BtfError::SizeOverflow { id })
	}
}

#[cfg(test)]
mod tests;
