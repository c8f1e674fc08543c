use crate::btf::Kind;

/// Dense type identifier; `0` is void.
pub type TypeId = u32;

/// One node of the type store. References to other nodes are always [`TypeId`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BtfType {
	/// The implicit void type.
	Void,
	/// Integer.
	Int(Int),
	/// Pointer.
	Pointer(Pointer),
	/// Array.
	Array(Array),
	/// Struct.
	Struct(Composite),
	/// Union.
	Union(Composite),
	/// Enumeration (both 32- and 64-bit encodings).
	Enum(Enum),
	/// Forward declaration.
	Fwd(Fwd),
	/// Typedef.
	Typedef(Typedef),
	/// `volatile` qualifier.
	Volatile(Qualifier),
	/// `const` qualifier.
	Const(Qualifier),
	/// `restrict` qualifier.
	Restrict(Qualifier),
	/// Function.
	Func(Func),
	/// Function prototype.
	FuncProto(FuncProto),
	/// Variable.
	Var(Var),
	/// Data section.
	Datasec(Datasec),
	/// Floating point.
	Float(Float),
	/// Declaration tag.
	DeclTag(DeclTag),
	/// Type tag.
	TypeTag(TypeTag),
}

impl BtfType {
	/// Category of this node.
	pub fn kind(&self) -> Kind {
		match self {
			Self::Void => Kind::Void,
			Self::Int(_) => Kind::Int,
			Self::Pointer(_) => Kind::Pointer,
			Self::Array(_) => Kind::Array,
			Self::Struct(_) => Kind::Struct,
			Self::Union(_) => Kind::Union,
			Self::Enum(_) => Kind::Enum,
			Self::Fwd(_) => Kind::Fwd,
			Self::Typedef(_) => Kind::Typedef,
			Self::Volatile(_) => Kind::Volatile,
			Self::Const(_) => Kind::Const,
			Self::Restrict(_) => Kind::Restrict,
			Self::Func(_) => Kind::Func,
			Self::FuncProto(_) => Kind::FuncProto,
			Self::Var(_) => Kind::Var,
			Self::Datasec(_) => Kind::Datasec,
			Self::Float(_) => Kind::Float,
			Self::DeclTag(_) => Kind::DeclTag,
			Self::TypeTag(_) => Kind::TypeTag,
		}
	}

	/// Declared name, empty for anonymous and unnamed kinds.
	pub fn name(&self) -> &str {
		match self {
			Self::Int(item) => &item.name,
			Self::Struct(item) | Self::Union(item) => &item.name,
			Self::Enum(item) => &item.name,
			Self::Fwd(item) => &item.name,
			Self::Typedef(item) => &item.name,
			Self::Func(item) => &item.name,
			Self::Var(item) => &item.name,
			Self::Datasec(item) => &item.name,
			Self::Float(item) => &item.name,
			Self::DeclTag(item) => &item.name,
			Self::TypeTag(item) => &item.name,
			Self::Void | Self::Pointer(_) | Self::Array(_) | Self::Volatile(_) | Self::Const(_) | Self::Restrict(_) | Self::FuncProto(_) => "",
		}
	}

	/// Inner type of a typedef, qualifier or type tag, the only kinds dereferencing strips.
	pub fn wrapped(&self) -> Option<TypeId> {
		match self {
			Self::Typedef(item) => Some(item.ty),
			Self::Volatile(item) | Self::Const(item) | Self::Restrict(item) => Some(item.ty),
			Self::TypeTag(item) => Some(item.ty),
			_ => None,
		}
	}
}

/// Integer encoding flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntEncoding(pub u8);

impl IntEncoding {
	/// Signed integer.
	pub const SIGNED: u8 = 1;
	/// Character type.
	pub const CHAR: u8 = 2;
	/// Boolean type.
	pub const BOOL: u8 = 4;

	/// Lowercase label: `unsigned` when no flag is set, else the set flags joined by `|`.
	pub fn label(self) -> String {
		let flags = [(Self::SIGNED, "signed"), (Self::CHAR, "char"), (Self::BOOL, "bool")];
		let set: Vec<&str> = flags.iter().filter(|(bit, _)| self.0 & bit != 0).map(|(_, label)| *label).collect();
		if set.is_empty() { "unsigned".to_owned() } else { set.join("|") }
	}
}

/// Integer type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Int {
	/// Type name.
	pub name: Box<str>,
	/// Byte size.
	pub size: u32,
	/// Encoding flags.
	pub encoding: IntEncoding,
	/// Bit offset of the value inside its storage.
	pub bit_offset: u8,
	/// Number of value bits.
	pub bits: u8,
}

/// Pointer type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
	/// Pointee.
	pub target: TypeId,
}

/// Array type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
	/// Element type.
	pub elem: TypeId,
	/// Index type.
	pub index: TypeId,
	/// Element count.
	pub nelems: u32,
}

/// Struct or union body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
	/// Tag name, empty when anonymous.
	pub name: Box<str>,
	/// Byte size.
	pub size: u32,
	/// Members in declaration order.
	pub members: Vec<Member>,
}

/// Struct or union member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
	/// Member name, empty when anonymous.
	pub name: Box<str>,
	/// Member type.
	pub ty: TypeId,
	/// Offset from the start of the aggregate, in bits.
	pub bit_offset: u32,
	/// Bitfield width in bits, `0` for plain members.
	pub bitfield_size: u32,
}

/// Enumeration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
	/// Tag name.
	pub name: Box<str>,
	/// Byte size.
	pub size: u32,
	/// Whether values are signed.
	pub signed: bool,
	/// Values in declaration order.
	pub values: Vec<EnumValue>,
}

/// One enumerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
	/// Enumerator name.
	pub name: Box<str>,
	/// Raw value; signed 32-bit values are sign-extended.
	pub value: u64,
}

/// Aggregate kind of a forward declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FwdKind {
	/// `struct name;`
	Struct,
	/// `union name;`
	Union,
}

impl FwdKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Struct => "struct",
			Self::Union => "union",
		}
	}
}

/// Forward declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fwd {
	/// Declared name.
	pub name: Box<str>,
	/// Declared aggregate kind.
	pub kind: FwdKind,
}

/// Typedef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typedef {
	/// Alias name.
	pub name: Box<str>,
	/// Aliased type.
	pub ty: TypeId,
}

/// `volatile`, `const` or `restrict` qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifier {
	/// Qualified type.
	pub ty: TypeId,
}

/// Linkage of a function or variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
	/// Translation-unit local.
	Static,
	/// Globally visible definition.
	Global,
	/// External declaration.
	Extern,
	/// Value outside the known range.
	Unknown(u32),
}

impl Linkage {
	/// Decode the raw linkage value shared by `func` and `var` records.
	pub fn from_raw(value: u32) -> Self {
		match value {
			0 => Self::Static,
			1 => Self::Global,
			2 => Self::Extern,
			other => Self::Unknown(other),
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Static => "static",
			Self::Global => "global",
			Self::Extern => "extern",
			Self::Unknown(_) => "unknown",
		}
	}
}

/// Function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Func {
	/// Function name.
	pub name: Box<str>,
	/// Prototype.
	pub ty: TypeId,
	/// Linkage.
	pub linkage: Linkage,
}

/// Function prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncProto {
	/// Return type.
	pub ret: TypeId,
	/// Parameters in order; a variadic tail is `("", 0)`.
	pub params: Vec<Param>,
}

/// Function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	/// Parameter name, possibly empty.
	pub name: Box<str>,
	/// Parameter type.
	pub ty: TypeId,
}

/// Variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
	/// Variable name.
	pub name: Box<str>,
	/// Variable type.
	pub ty: TypeId,
	/// Linkage.
	pub linkage: Linkage,
}

/// Data section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datasec {
	/// Section name, such as `.data`.
	pub name: Box<str>,
	/// Section byte size.
	pub size: u32,
	/// Contained variables.
	pub vars: Vec<VarSecinfo>,
}

/// Variable placement inside a data section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSecinfo {
	/// Variable (or func) type.
	pub ty: TypeId,
	/// Byte offset inside the section.
	pub offset: u32,
	/// Byte size.
	pub size: u32,
}

/// Floating point type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Float {
	/// Type name.
	pub name: Box<str>,
	/// Byte size.
	pub size: u32,
}

/// Declaration tag attached to a type or one of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclTag {
	/// Tag value.
	pub name: Box<str>,
	/// Tagged type.
	pub ty: TypeId,
	/// Member or parameter index, `-1` for the type itself.
	pub component_idx: i32,
}

/// Type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTag {
	/// Tag value.
	pub name: Box<str>,
	/// Tagged type.
	pub ty: TypeId,
}
