/// Run-wide export switches, fixed before traversal starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
	/// Resolve every emitted type reference through typedef and qualifier wrappers.
	pub dereference: bool,
	/// Emit struct/union members and enum values keyed by name instead of as lists.
	pub as_map: bool,
}
