use crate::btf::node::{MemberSet, ValueSet};
use crate::btf::{ExportedNode, TypeId};

impl ExportedNode {
	/// IDs this node references, in field order.
	///
	/// Arrays yield the index type before the element type. Aggregates follow
	/// the exported member shape, so a keyed map yields one ID per surviving key.
	pub fn dependencies(&self) -> Vec<TypeId> {
		match self {
			Self::Void | Self::Int(_) | Self::Enum(_) | Self::Fwd(_) | Self::Float(_) => Vec::new(),
			Self::Pointer(pointer) => vec![pointer.target_type],
			Self::Array(array) => vec![array.index_type, array.elem_type],
			Self::Struct(body) | Self::Union(body) => match &body.members {
				MemberSet::List(members) => members.iter().map(|member| member.ty).collect(),
				MemberSet::Map(members) => members.values().map(|member| member.ty).collect(),
			},
			Self::Typedef(typedef) => vec![typedef.ty],
			Self::Volatile(qualifier) | Self::Const(qualifier) | Self::Restrict(qualifier) => vec![qualifier.ty],
			Self::Func(linked) | Self::Var(linked) => vec![linked.ty],
			Self::FuncProto(proto) => std::iter::once(proto.ret).chain(proto.params.iter().map(|param| param.ty)).collect(),
			Self::Datasec(datasec) => datasec.vars.iter().map(|var| var.ty).collect(),
		}
	}

	/// Number of members or enumerators carried, `0` for other categories.
	pub fn entry_count(&self) -> usize {
		match self {
			Self::Struct(body) | Self::Union(body) => match &body.members {
				MemberSet::List(members) => members.len(),
				MemberSet::Map(members) => members.len(),
			},
			Self::Enum(item) => match &item.values {
				ValueSet::List(values) => values.len(),
				ValueSet::Map(values) => values.len(),
			},
			_ => 0,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use crate::btf::ExportedNode;
	use crate::btf::node::{
		AggregateNode, ArrayNode, DatasecNode, FuncProtoNode, IntNode, LinkedNode, MemberNode, MemberSet, ParamNode, PointerNode, QualifierNode, VarSecinfoNode,
	};

	fn member(name: &str, ty: u32) -> MemberNode {
		MemberNode {
			name: name.to_owned(),
			ty,
			offset: 0,
			bit_field_size: 0,
			size: 4,
		}
	}

	#[test]
	fn leaves_have_no_dependencies() {
		let int = ExportedNode::Int(IntNode {
			name: "int".to_owned(),
			size: 4,
			encoding: "signed".to_owned(),
		});
		assert!(ExportedNode::Void.dependencies().is_empty());
		assert!(int.dependencies().is_empty());
	}

	#[test]
	fn references_follow_field_order() {
		let array = ExportedNode::Array(ArrayNode {
			index_type: 9,
			elem_type: 4,
			count: 2,
		});
		assert_eq!(array.dependencies(), [9, 4]);

		let proto = ExportedNode::FuncProto(FuncProtoNode {
			ret: 1,
			params: vec![
				ParamNode { name: "a".to_owned(), ty: 3 },
				ParamNode { name: String::new(), ty: 0 },
			],
		});
		assert_eq!(proto.dependencies(), [1, 3, 0]);

		let datasec = ExportedNode::Datasec(DatasecNode {
			name: ".data".to_owned(),
			size: 8,
			vars: vec![VarSecinfoNode { ty: 5, offset: 0, size: 4 }, VarSecinfoNode { ty: 6, offset: 4, size: 4 }],
		});
		assert_eq!(datasec.dependencies(), [5, 6]);

		let wrappers = [
			ExportedNode::Pointer(PointerNode { target_type: 7 }),
			ExportedNode::Const(QualifierNode { ty: 7 }),
			ExportedNode::Func(LinkedNode {
				name: "f".to_owned(),
				ty: 7,
				linkage: "global".to_owned(),
			}),
		];
		for node in wrappers {
			assert_eq!(node.dependencies(), [7], "{}", node.type_name());
		}
	}

	#[test]
	fn aggregate_dependencies_track_member_shape() {
		let list = ExportedNode::Struct(AggregateNode {
			size: 8,
			name: "s".to_owned(),
			members: MemberSet::List(vec![member("a", 1), member("b", 2), member("b", 1)]),
		});
		assert_eq!(list.dependencies(), [1, 2, 1], "duplicates are kept");
		assert_eq!(list.entry_count(), 3);

		let map = ExportedNode::Union(AggregateNode {
			size: 4,
			name: "u".to_owned(),
			members: MemberSet::Map(BTreeMap::from([("a".to_owned(), member("a", 1)), ("b".to_owned(), member("b", 3))])),
		});
		assert_eq!(map.dependencies(), [1, 3]);
		assert_eq!(map.entry_count(), 2);
	}
}
