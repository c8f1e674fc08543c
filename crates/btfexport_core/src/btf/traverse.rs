use std::collections::{BTreeMap, VecDeque};

use tracing::info;

use crate::btf::convert::convert_type;
use crate::btf::{BtfSpec, ExportOptions, ExportedNode, Result, TypeId};

/// Convert every node of the store in ID order, void included.
pub fn dump_all(spec: &BtfSpec, options: &ExportOptions) -> Result<Vec<ExportedNode>> {
	let mut nodes = Vec::with_capacity(spec.len());
	for (id, _) in spec.iter() {
		nodes.push(convert_type(spec, id, options)?);
	}
	info!(nodes = nodes.len(), "dump.done");
	Ok(nodes)
}

/// Convert the transitive closure of `roots` under [`ExportedNode::dependencies`].
pub fn walk_closure(spec: &BtfSpec, roots: &[TypeId], options: &ExportOptions) -> Result<BTreeMap<TypeId, ExportedNode>> {
	let nodes = walk_closure_with(roots, |id| convert_type(spec, id, options))?;
	info!(roots = roots.len(), nodes = nodes.len(), "closure.done");
	Ok(nodes)
}

/// Breadth-first closure driven by an arbitrary converter.
///
/// The result map is the visited set: each ID is handed to `convert` at most
/// once, however many times it is reached.
pub fn walk_closure_with<F>(roots: &[TypeId], mut convert: F) -> Result<BTreeMap<TypeId, ExportedNode>>
where
	F: FnMut(TypeId) -> Result<ExportedNode>,
{
	let mut nodes = BTreeMap::new();
	let mut queue: VecDeque<TypeId> = roots.iter().copied().collect();

	while let Some(id) = queue.pop_front() {
		if nodes.contains_key(&id) {
			continue;
		}

		let node = convert(id)?;
		for dep in node.dependencies() {
			if !nodes.contains_key(&dep) {
				queue.push_back(dep);
			}
		}
		nodes.insert(id, node);
	}

	Ok(nodes)
}

#[cfg(test)]
mod tests;
