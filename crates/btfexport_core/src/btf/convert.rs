use std::collections::BTreeMap;

use tracing::debug;

use crate::btf::node::{
	AggregateNode, ArrayNode, DatasecNode, EnumNode, EnumValueNode, FloatNode, FuncProtoNode, FwdNode, IntNode, LinkedNode, MemberNode, MemberSet, ParamNode, PointerNode,
	QualifierNode, TypedefNode, ValueSet, VarSecinfoNode,
};
use crate::btf::types::{Composite, Enum};
use crate::btf::{BtfError, BtfSpec, BtfType, ExportOptions, ExportedNode, Result, TypeId};

/// Convert the store node `id` into its exported form.
///
/// Every reference the node carries goes through [`resolve_ref`], so a missing
/// target or a runaway wrapper chain fails the conversion.
pub fn convert_type(spec: &BtfSpec, id: TypeId, options: &ExportOptions) -> Result<ExportedNode> {
	let item = spec.type_by_id(id)?;
	let reference = |target: TypeId| resolve_ref(spec, target, options);

	let node = match item {
		BtfType::Void => ExportedNode::Void,
		BtfType::Int(int) => ExportedNode::Int(IntNode {
			name: int.name.to_string(),
			size: int.size,
			encoding: int.encoding.label(),
		}),
		BtfType::Pointer(pointer) => ExportedNode::Pointer(PointerNode {
			target_type: reference(pointer.target)?,
		}),
		BtfType::Array(array) => ExportedNode::Array(ArrayNode {
			index_type: reference(array.index)?,
			elem_type: reference(array.elem)?,
			count: array.nelems,
		}),
		BtfType::Struct(body) => ExportedNode::Struct(convert_aggregate(spec, body, options)?),
		BtfType::Union(body) => ExportedNode::Union(convert_aggregate(spec, body, options)?),
		BtfType::Enum(item) => ExportedNode::Enum(convert_enum(item, options)),
		BtfType::Fwd(fwd) => ExportedNode::Fwd(FwdNode {
			name: fwd.name.to_string(),
			kind: fwd.kind.as_str().to_owned(),
		}),
		BtfType::Typedef(typedef) => ExportedNode::Typedef(TypedefNode {
			name: typedef.name.to_string(),
			ty: reference(typedef.ty)?,
		}),
		BtfType::Volatile(qualifier) => ExportedNode::Volatile(QualifierNode { ty: reference(qualifier.ty)? }),
		BtfType::Const(qualifier) => ExportedNode::Const(QualifierNode { ty: reference(qualifier.ty)? }),
		BtfType::Restrict(qualifier) => ExportedNode::Restrict(QualifierNode { ty: reference(qualifier.ty)? }),
		BtfType::Func(func) => ExportedNode::Func(LinkedNode {
			name: func.name.to_string(),
			ty: reference(func.ty)?,
			linkage: func.linkage.as_str().to_owned(),
		}),
		BtfType::FuncProto(proto) => {
			let mut params = Vec::with_capacity(proto.params.len());
			for param in &proto.params {
				params.push(ParamNode {
					name: param.name.to_string(),
					ty: reference(param.ty)?,
				});
			}
			ExportedNode::FuncProto(FuncProtoNode {
				ret: reference(proto.ret)?,
				params,
			})
		}
		BtfType::Var(var) => ExportedNode::Var(LinkedNode {
			name: var.name.to_string(),
			ty: reference(var.ty)?,
			linkage: var.linkage.as_str().to_owned(),
		}),
		BtfType::Datasec(datasec) => {
			let mut vars = Vec::with_capacity(datasec.vars.len());
			for var in &datasec.vars {
				vars.push(VarSecinfoNode {
					ty: reference(var.ty)?,
					offset: var.offset,
					size: var.size,
				});
			}
			ExportedNode::Datasec(DatasecNode {
				name: datasec.name.to_string(),
				size: datasec.size,
				vars,
			})
		}
		BtfType::Float(float) => ExportedNode::Float(FloatNode {
			name: float.name.to_string(),
			size: float.size,
		}),
		BtfType::DeclTag(_) | BtfType::TypeTag(_) => {
			return Err(BtfError::UnsupportedKind {
				id,
				kind: item.kind().as_str(),
			});
		}
	};

	debug!(id, kind = node.type_name(), name = item.name(), "type.converted");
	Ok(node)
}

/// Map a reference to the ID written into exported output.
///
/// Without `dereference` this is `id` itself, checked to exist; with it, the
/// first non-wrapper reached through typedef and qualifier links.
pub fn resolve_ref(spec: &BtfSpec, id: TypeId, options: &ExportOptions) -> Result<TypeId> {
	if options.dereference {
		return spec.underlying(id);
	}
	spec.type_by_id(id)?;
	Ok(id)
}

fn convert_aggregate(spec: &BtfSpec, body: &Composite, options: &ExportOptions) -> Result<AggregateNode> {
	let mut members = Vec::with_capacity(body.members.len());
	for member in &body.members {
		members.push(MemberNode {
			name: member.name.to_string(),
			ty: resolve_ref(spec, member.ty, options)?,
			offset: member.bit_offset / 8,
			bit_field_size: member.bitfield_size,
			size: spec.size_of(member.ty).unwrap_or(0),
		});
	}

	let members = if options.as_map {
		MemberSet::Map(members.into_iter().map(|member| (member.name.clone(), member)).collect::<BTreeMap<_, _>>())
	} else {
		MemberSet::List(members)
	};

	Ok(AggregateNode {
		size: body.size,
		name: body.name.to_string(),
		members,
	})
}

fn convert_enum(item: &Enum, options: &ExportOptions) -> EnumNode {
	let values = item.values.iter().map(|value| EnumValueNode {
		name: value.name.to_string(),
		value: value.value,
	});

	let values = if options.as_map {
		ValueSet::Map(values.map(|value| (value.name.clone(), value)).collect())
	} else {
		ValueSet::List(values.collect())
	};

	EnumNode {
		name: item.name.to_string(),
		size: item.size,
		signed: item.signed,
		values,
	}
}
