/// Category of a type node.
///
/// `DeclTag` and `TypeTag` exist in the store so IDs stay dense, but are not
/// exportable categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// The implicit type with ID 0.
	Void,
	/// Integer.
	Int,
	/// Pointer.
	Pointer,
	/// Fixed-length array.
	Array,
	/// Struct aggregate.
	Struct,
	/// Union aggregate.
	Union,
	/// Enumeration, 32- or 64-bit.
	Enum,
	/// Forward declaration.
	Fwd,
	/// Typedef.
	Typedef,
	/// `volatile` qualifier.
	Volatile,
	/// `const` qualifier.
	Const,
	/// `restrict` qualifier.
	Restrict,
	/// Function.
	Func,
	/// Function prototype.
	FuncProto,
	/// Variable.
	Var,
	/// Data section.
	Datasec,
	/// Floating point.
	Float,
	/// Declaration tag.
	DeclTag,
	/// Type tag.
	TypeTag,
}

impl Kind {
	/// Every kind that can appear in exported output, in BTF kind order.
	pub const EXPORTABLE: [Kind; 17] = [
		Kind::Void,
		Kind::Int,
		Kind::Pointer,
		Kind::Array,
		Kind::Struct,
		Kind::Union,
		Kind::Enum,
		Kind::Fwd,
		Kind::Typedef,
		Kind::Volatile,
		Kind::Const,
		Kind::Restrict,
		Kind::Func,
		Kind::FuncProto,
		Kind::Var,
		Kind::Datasec,
		Kind::Float,
	];

	/// Stable lowercase label, identical to the exported `type_name`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Void => "void",
			Self::Int => "int",
			Self::Pointer => "pointer",
			Self::Array => "array",
			Self::Struct => "struct",
			Self::Union => "union",
			Self::Enum => "enum",
			Self::Fwd => "fwd",
			Self::Typedef => "typedef",
			Self::Volatile => "volatile",
			Self::Const => "const",
			Self::Restrict => "restrict",
			Self::Func => "func",
			Self::FuncProto => "funcproto",
			Self::Var => "var",
			Self::Datasec => "datasec",
			Self::Float => "float",
			Self::DeclTag => "decl_tag",
			Self::TypeTag => "type_tag",
		}
	}

	/// Parse a `category:` token of a target, ignoring case and surrounding whitespace.
	pub fn from_category(token: &str) -> Option<Self> {
		let token = token.trim();
		Self::EXPORTABLE.into_iter().find(|kind| kind.as_str().eq_ignore_ascii_case(token))
	}

	/// Whether this kind is a typedef, qualifier or type tag stripped by dereferencing.
	pub fn is_wrapper(self) -> bool {
		matches!(self, Self::Typedef | Self::Volatile | Self::Const | Self::Restrict | Self::TypeTag)
	}
}

impl std::fmt::Display for Kind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use crate::btf::Kind;

	#[test]
	fn category_tokens_are_case_insensitive() {
		assert_eq!(Kind::from_category("struct"), Some(Kind::Struct));
		assert_eq!(Kind::from_category(" Datasec "), Some(Kind::Datasec));
		assert_eq!(Kind::from_category("Float"), Some(Kind::Float));
		assert_eq!(Kind::from_category("funcproto"), Some(Kind::FuncProto));
		assert_eq!(Kind::from_category("const"), Some(Kind::Const));
	}

	#[test]
	fn tag_and_unknown_tokens_are_rejected() {
		assert_eq!(Kind::from_category("decl_tag"), None);
		assert_eq!(Kind::from_category("type_tag"), None);
		assert_eq!(Kind::from_category("class"), None);
		assert_eq!(Kind::from_category(""), None);
	}

	#[test]
	fn labels_round_trip_through_category_parser() {
		for kind in Kind::EXPORTABLE {
			assert_eq!(Kind::from_category(kind.as_str()), Some(kind));
		}
	}
}
