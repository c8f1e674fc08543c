use std::collections::BTreeMap;

use serde::Serialize;

use crate::btf::TypeId;

/// JSON-safe projection of one store type; references are always plain IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type_name", rename_all = "lowercase")]
pub enum ExportedNode {
	/// `void`.
	Void,
	/// `int`.
	Int(IntNode),
	/// `pointer`.
	Pointer(PointerNode),
	/// `array`.
	Array(ArrayNode),
	/// `struct`.
	Struct(AggregateNode),
	/// `union`.
	Union(AggregateNode),
	/// `enum`.
	Enum(EnumNode),
	/// `fwd`.
	Fwd(FwdNode),
	/// `typedef`.
	Typedef(TypedefNode),
	/// `volatile`.
	Volatile(QualifierNode),
	/// `const`.
	Const(QualifierNode),
	/// `restrict`.
	Restrict(QualifierNode),
	/// `func`.
	Func(LinkedNode),
	/// `funcproto`.
	FuncProto(FuncProtoNode),
	/// `var`.
	Var(LinkedNode),
	/// `datasec`.
	Datasec(DatasecNode),
	/// `float`.
	Float(FloatNode),
}

impl ExportedNode {
	/// The `type_name` discriminant written to JSON.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Void => "void",
			Self::Int(_) => "int",
			Self::Pointer(_) => "pointer",
			Self::Array(_) => "array",
			Self::Struct(_) => "struct",
			Self::Union(_) => "union",
			Self::Enum(_) => "enum",
			Self::Fwd(_) => "fwd",
			Self::Typedef(_) => "typedef",
			Self::Volatile(_) => "volatile",
			Self::Const(_) => "const",
			Self::Restrict(_) => "restrict",
			Self::Func(_) => "func",
			Self::FuncProto(_) => "funcproto",
			Self::Var(_) => "var",
			Self::Datasec(_) => "datasec",
			Self::Float(_) => "float",
		}
	}
}

/// Exported `int`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntNode {
	/// Type name.
	pub name: String,
	/// Byte size.
	pub size: u32,
	/// `unsigned`, `signed`, `char`, `bool`, or `|`-joined flags.
	pub encoding: String,
}

/// Exported `pointer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointerNode {
	/// Pointee ID.
	pub target_type: TypeId,
}

/// Exported `array`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayNode {
	/// Index type ID.
	pub index_type: TypeId,
	/// Element type ID.
	pub elem_type: TypeId,
	/// Element count.
	pub count: u32,
}

/// Exported `struct` or `union`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateNode {
	/// Byte size.
	pub size: u32,
	/// Tag name, empty when anonymous.
	pub name: String,
	/// Members as `members` or `members_map`.
	#[serde(flatten)]
	pub members: MemberSet,
}

/// Members in exactly one of the two export shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MemberSet {
	/// Declaration order.
	#[serde(rename = "members")]
	List(Vec<MemberNode>),
	/// Keyed by member name; later members overwrite earlier ones with the same name.
	#[serde(rename = "members_map")]
	Map(BTreeMap<String, MemberNode>),
}

/// Exported struct/union member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberNode {
	/// Member name.
	pub name: String,
	/// Member type ID.
	#[serde(rename = "type")]
	pub ty: TypeId,
	/// Byte offset inside the aggregate.
	pub offset: u32,
	/// Bitfield width in bits, `0` for plain members.
	pub bit_field_size: u32,
	/// Byte size of the member type, `0` when it has none.
	pub size: u64,
}

/// Exported `enum`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumNode {
	/// Tag name.
	pub name: String,
	/// Byte size.
	pub size: u32,
	/// Whether values are signed.
	pub signed: bool,
	/// Values as `values` or `values_map`.
	#[serde(flatten)]
	pub values: ValueSet,
}

/// Enumerators in exactly one of the two export shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValueSet {
	/// Declaration order.
	#[serde(rename = "values")]
	List(Vec<EnumValueNode>),
	/// Keyed by enumerator name; later entries overwrite earlier ones with the same name.
	#[serde(rename = "values_map")]
	Map(BTreeMap<String, EnumValueNode>),
}

/// Exported enumerator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValueNode {
	/// Enumerator name.
	pub name: String,
	/// Raw value.
	pub value: u64,
}

/// Exported `fwd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FwdNode {
	/// Declared name.
	pub name: String,
	/// `struct` or `union`.
	pub kind: String,
}

/// Exported `typedef`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedefNode {
	/// Alias name.
	pub name: String,
	/// Aliased type ID.
	#[serde(rename = "type")]
	pub ty: TypeId,
}

/// Exported `volatile`, `const` or `restrict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualifierNode {
	/// Qualified type ID.
	#[serde(rename = "type")]
	pub ty: TypeId,
}

/// Exported `func` or `var`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedNode {
	/// Symbol name.
	pub name: String,
	/// Prototype (func) or variable type (var) ID.
	#[serde(rename = "type")]
	pub ty: TypeId,
	/// `static`, `global` or `extern`.
	pub linkage: String,
}

/// Exported `funcproto`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuncProtoNode {
	/// Return type ID.
	#[serde(rename = "return")]
	pub ret: TypeId,
	/// Parameters in order.
	pub params: Vec<ParamNode>,
}

/// Exported function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamNode {
	/// Parameter name.
	pub name: String,
	/// Parameter type ID.
	#[serde(rename = "type")]
	pub ty: TypeId,
}

/// Exported `datasec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasecNode {
	/// Section name.
	pub name: String,
	/// Section byte size.
	pub size: u32,
	/// Contained variables.
	pub vars: Vec<VarSecinfoNode>,
}

/// Exported data-section entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VarSecinfoNode {
	/// Variable type ID.
	#[serde(rename = "type")]
	pub ty: TypeId,
	/// Byte offset.
	pub offset: u32,
	/// Byte size.
	pub size: u32,
}

/// Exported `float`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FloatNode {
	/// Type name.
	pub name: String,
	/// Byte size.
	pub size: u32,
}
