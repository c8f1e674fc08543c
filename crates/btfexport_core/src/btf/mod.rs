mod bytes;
mod compression;
mod convert;
mod decode;
mod deps;
mod elf;
mod error;
mod export;
mod file;
mod header;
mod kind;
mod node;
mod options;
mod spec;
mod target;
mod traverse;
mod types;

/// Compression detection result.
pub use compression::Compression;
/// Per-node conversion and reference resolution.
pub use convert::{convert_type, resolve_ref};
/// Type-section decoding primitives.
pub use decode::{StringTable, decode_types};
/// ELF section lookup.
pub use elf::{ElfIdent, find_section};
/// Error and result aliases.
pub use error::{BtfError, Result};
/// Output document and JSON sinks.
pub use export::{ExportDocument, build_document, default_output_path, write_json, write_json_to};
/// Input container and opened file.
pub use file::{BtfFile, Container};
/// BTF header representation.
pub use header::{BtfHeader, Endianness};
/// Type categories.
pub use kind::Kind;
/// Exported node shapes.
pub use node::{
	AggregateNode, ArrayNode, DatasecNode, EnumNode, EnumValueNode, ExportedNode, FloatNode, FuncProtoNode, FwdNode, IntNode, LinkedNode, MemberNode, MemberSet,
	ParamNode, PointerNode, QualifierNode, TypedefNode, ValueSet, VarSecinfoNode,
};
/// Run-wide export switches.
pub use options::ExportOptions;
/// Type store and its limits.
pub use spec::{BtfSpec, MAX_TYPE_DEPTH, POINTER_SIZE};
/// Root selectors and their resolution.
pub use target::{Target, parse_targets, resolve_target, resolve_targets};
/// Full-dump and closure traversals.
pub use traverse::{dump_all, walk_closure, walk_closure_with};
/// Store-side type records.
pub use types::{
	Array, BtfType, Composite, Datasec, DeclTag, Enum, EnumValue, Float, Func, FuncProto, Fwd, FwdKind, Int, IntEncoding, Linkage, Member, Param, Pointer,
	Qualifier, TypeId, TypeTag, Typedef, Var, VarSecinfo,
};
