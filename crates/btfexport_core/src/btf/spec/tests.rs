use btfexport_testkit::{BtfBuilder, INT_SIGNED};

use crate::btf::types::{Array, Composite, Int, IntEncoding, Pointer, Qualifier, TypeTag, Typedef};
use crate::btf::{BtfError, BtfSpec, BtfType, Kind};

fn int(name: &str, size: u32) -> BtfType {
	BtfType::Int(Int {
		name: name.into(),
		size,
		encoding: IntEncoding(IntEncoding::SIGNED),
		bit_offset: 0,
		bits: (size * 8) as u8,
	})
}

fn typedef(name: &str, ty: u32) -> BtfType {
	BtfType::Typedef(Typedef { name: name.into(), ty })
}

#[test]
fn parsed_store_starts_with_void_and_keeps_declaration_order() {
	let mut builder = BtfBuilder::new();
	let int = builder.int("int", 4, INT_SIGNED);
	builder.structure("Foo", 4, &[("v1", int, 0)]);
	let spec = BtfSpec::parse(&builder.build()).expect("blob parses");

	assert_eq!(spec.len(), 3);
	let kinds: Vec<(u32, Kind)> = spec.iter().map(|(id, item)| (id, item.kind())).collect();
	assert_eq!(kinds, [(0, Kind::Void), (1, Kind::Int), (2, Kind::Struct)]);
}

#[test]
fn name_lookups_filter_by_kind() {
	let spec = BtfSpec::from_types(vec![
		int("u32", 4),
		BtfType::Struct(Composite {
			name: "u32".into(),
			size: 4,
			members: Vec::new(),
		}),
		typedef("u32", 1),
	]);

	assert_eq!(spec.any_types_by_name("u32"), &[1, 2, 3]);
	assert_eq!(spec.types_by_kind_and_name(Kind::Struct, "u32"), [2]);
	assert_eq!(spec.types_by_kind_and_name(Kind::Union, "u32"), Vec::<u32>::new());
	assert!(spec.any_types_by_name("missing").is_empty());
	assert!(spec.any_types_by_name("").is_empty(), "anonymous types are not indexed");
}

#[test]
fn unknown_id_is_a_resolution_error() {
	let spec = BtfSpec::from_types(vec![int("int", 4)]);
	assert!(matches!(spec.type_by_id(7), Err(BtfError::TypeNotFound { id: 7 })));
}

#[test]
fn underlying_strips_every_wrapper_kind() {
	let spec = BtfSpec::from_types(vec![
		int("int", 4),
		BtfType::Const(Qualifier { ty: 1 }),
		BtfType::Volatile(Qualifier { ty: 2 }),
		typedef("cv_int", 3),
		BtfType::Restrict(Qualifier { ty: 4 }),
		BtfType::Pointer(Pointer { target: 5 }),
		BtfType::TypeTag(TypeTag { name: "user".into(), ty: 5 }),
	]);

	for id in [1, 2, 3, 4, 5, 7] {
		assert_eq!(spec.underlying(id).expect("chain resolves"), 1, "id {id}");
	}
	assert_eq!(spec.underlying(6).expect("pointer is not a wrapper"), 6);
}

#[test]
fn self_referencing_typedef_is_reported() {
	let spec = BtfSpec::from_types(vec![typedef("loop", 1)]);
	assert!(matches!(spec.underlying(1), Err(BtfError::DereferenceTooDeep { id: 1 })));
}

#[test]
fn size_of_follows_arrays_and_wrappers() {
	let spec = BtfSpec::from_types(vec![
		int("int", 4),
		BtfType::Array(Array {
			elem: 1,
			index: 1,
			nelems: 3,
		}),
		typedef("triple", 2),
		BtfType::Array(Array {
			elem: 3,
			index: 1,
			nelems: 2,
		}),
		BtfType::Pointer(Pointer { target: 0 }),
		BtfType::Const(Qualifier { ty: 5 }),
	]);

	assert_eq!(spec.size_of(1).expect("int is sized"), 4);
	assert_eq!(spec.size_of(3).expect("typedef of array is sized"), 12);
	assert_eq!(spec.size_of(4).expect("nested array is sized"), 24);
	assert_eq!(spec.size_of(6).expect("const pointer is sized"), 8);
}

#[test]
fn size_of_void_is_unsized() {
	let spec = BtfSpec::from_types(vec![BtfType::Const(Qualifier { ty: 0 })]);
	assert!(matches!(spec.size_of(1), Err(BtfError::Unsized { id: 0, kind: "void" })));
}

#[test]
fn zero_length_array_has_zero_size() {
	let spec = BtfSpec::from_types(vec![
		int("char", 1),
		BtfType::Array(Array {
			elem: 1,
			index: 1,
			nelems: 0,
		}),
	]);
	assert_eq!(spec.size_of(2).expect("flexible array is sized"), 0);
}
