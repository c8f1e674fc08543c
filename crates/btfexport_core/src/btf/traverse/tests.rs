use std::collections::{BTreeSet, HashMap};

use btfexport_testkit::{BtfBuilder, INT_SIGNED};

use crate::btf::convert::convert_type;
use crate::btf::traverse::{dump_all, walk_closure, walk_closure_with};
use crate::btf::types::{Composite, Int, IntEncoding, Member, Pointer, Qualifier, TypeTag, Typedef};
use crate::btf::{BtfError, BtfSpec, BtfType, ExportOptions, TypeId};

fn foo_store() -> BtfSpec {
	let mut builder = BtfBuilder::new();
	let int = builder.int("int", 4, INT_SIGNED);
	builder.structure("Foo", 6, &[("v1", int, 0)]);
	BtfSpec::parse(&builder.build()).expect("blob parses")
}

/// `struct list { struct list *next; const node_t *data; }`, a self-referencing graph.
fn list_store() -> BtfSpec {
	BtfSpec::from_types(vec![
		BtfType::Struct(Composite {
			name: "list".into(),
			size: 16,
			members: vec![
				Member {
					name: "next".into(),
					ty: 2,
					bit_offset: 0,
					bitfield_size: 0,
				},
				Member {
					name: "data".into(),
					ty: 3,
					bit_offset: 64,
					bitfield_size: 0,
				},
			],
		}),
		BtfType::Pointer(Pointer { target: 1 }),
		BtfType::Pointer(Pointer { target: 4 }),
		BtfType::Const(Qualifier { ty: 5 }),
		BtfType::Typedef(Typedef { name: "node_t".into(), ty: 6 }),
		BtfType::Int(Int {
			name: "long".into(),
			size: 8,
			encoding: IntEncoding(IntEncoding::SIGNED),
			bit_offset: 0,
			bits: 64,
		}),
		BtfType::Int(Int {
			name: "unreached".into(),
			size: 1,
			encoding: IntEncoding::default(),
			bit_offset: 0,
			bits: 8,
		}),
	])
}

fn least_closure(spec: &BtfSpec, roots: &[TypeId], options: &ExportOptions) -> BTreeSet<TypeId> {
	let mut closed: BTreeSet<TypeId> = roots.iter().copied().collect();
	loop {
		let mut grown = closed.clone();
		for id in &closed {
			grown.extend(convert_type(spec, *id, options).expect("converts").dependencies());
		}
		if grown == closed {
			return closed;
		}
		closed = grown;
	}
}

#[test]
fn full_dump_follows_store_order() {
	let spec = foo_store();
	let nodes = dump_all(&spec, &ExportOptions::default()).expect("dump succeeds");
	let names: Vec<&str> = nodes.iter().map(|node| node.type_name()).collect();
	assert_eq!(names, ["void", "int", "struct"]);

	let again = dump_all(&spec, &ExportOptions::default()).expect("dump succeeds");
	assert_eq!(nodes, again);
}

#[test]
fn closure_of_foo_holds_struct_and_int_only() {
	let spec = foo_store();
	let nodes = walk_closure(&spec, &[2], &ExportOptions::default()).expect("closure succeeds");
	let ids: Vec<TypeId> = nodes.keys().copied().collect();
	assert_eq!(ids, [1, 2]);
	assert_eq!(nodes[&2].type_name(), "struct");
	assert_eq!(nodes[&1].type_name(), "int");
}

#[test]
fn closure_equals_least_fixed_point() {
	let spec = list_store();
	for options in [
		ExportOptions::default(),
		ExportOptions {
			dereference: true,
			as_map: true,
		},
	] {
		let nodes = walk_closure(&spec, &[1], &options).expect("closure succeeds");
		let keys: BTreeSet<TypeId> = nodes.keys().copied().collect();
		assert_eq!(keys, least_closure(&spec, &[1], &options), "{options:?}");
		assert!(!keys.contains(&7));
	}
}

#[test]
fn dereferenced_closure_skips_wrappers() {
	let spec = list_store();
	let plain = walk_closure(&spec, &[1], &ExportOptions::default()).expect("closure succeeds");
	assert_eq!(plain.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5, 6]);

	let options = ExportOptions {
		dereference: true,
		as_map: false,
	};
	let deref = walk_closure(&spec, &[1], &options).expect("closure succeeds");
	assert_eq!(deref.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 6]);
}

#[test]
fn cycles_convert_each_node_once() {
	let spec = list_store();
	let mut calls: HashMap<TypeId, usize> = HashMap::new();
	let nodes = walk_closure_with(&[1, 2, 1], |id| {
		*calls.entry(id).or_default() += 1;
		convert_type(&spec, id, &ExportOptions::default())
	})
	.expect("closure succeeds");

	assert_eq!(calls.len(), nodes.len());
	assert!(calls.values().all(|count| *count == 1), "{calls:?}");
}

#[test]
fn empty_roots_yield_empty_closure() {
	let spec = foo_store();
	assert!(walk_closure(&spec, &[], &ExportOptions::default()).expect("closure succeeds").is_empty());
}

#[test]
fn conversion_failure_aborts_the_walk() {
	let spec = BtfSpec::from_types(vec![BtfType::Pointer(Pointer { target: 9 })]);
	assert!(matches!(walk_closure(&spec, &[1], &ExportOptions::default()), Err(BtfError::TypeNotFound { id: 9 })));
	assert!(matches!(dump_all(&spec, &ExportOptions::default()), Err(BtfError::TypeNotFound { id: 9 })));
}

#[test]
fn dereferenced_closure_looks_through_type_tags() {
	// struct S { int __user *p; }
	let spec = BtfSpec::from_types(vec![
		BtfType::Int(Int {
			name: "int".into(),
			size: 4,
			encoding: IntEncoding(IntEncoding::SIGNED),
			bit_offset: 0,
			bits: 32,
		}),
		BtfType::TypeTag(TypeTag { name: "user".into(), ty: 1 }),
		BtfType::Pointer(Pointer { target: 2 }),
		BtfType::Struct(Composite {
			name: "S".into(),
			size: 8,
			members: vec![Member {
				name: "p".into(),
				ty: 3,
				bit_offset: 0,
				bitfield_size: 0,
			}],
		}),
	]);
	let options = ExportOptions {
		dereference: true,
		as_map: false,
	};

	let nodes = walk_closure(&spec, &[4], &options).expect("closure succeeds");
	assert_eq!(nodes.keys().copied().collect::<Vec<_>>(), [1, 3, 4]);
	assert_eq!(nodes[&3].dependencies(), [1]);

	assert!(matches!(
		walk_closure(&spec, &[4], &ExportOptions::default()),
		Err(BtfError::UnsupportedKind { id: 2, kind: "type_tag" })
	));
}
