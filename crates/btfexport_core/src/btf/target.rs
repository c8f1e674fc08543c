use std::fmt;

use crate::btf::{BtfError, BtfSpec, Kind, Result, TypeId};

/// Root selector given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
	/// Bare name, matched across every category.
	Any {
		/// Type name.
		name: String,
	},
	/// `category:name`, matched within one category.
	Kind {
		/// Category the name must belong to.
		kind: Kind,
		/// Type name.
		name: String,
	},
}

impl Target {
	/// Parse `name` or `category:name`, trimming whitespace around each part.
	pub fn parse(raw: &str) -> Result<Self> {
		let trimmed = raw.trim();
		if trimmed.is_empty() {
			return Err(BtfError::InvalidTarget { target: raw.to_owned() });
		}

		let Some((category, name)) = trimmed.split_once(':') else {
			return Ok(Self::Any { name: trimmed.to_owned() });
		};

		let kind = Kind::from_category(category).ok_or_else(|| BtfError::BadCategory {
			category: category.trim().to_owned(),
		})?;
		let name = name.trim();
		if name.is_empty() {
			return Err(BtfError::InvalidTarget { target: raw.to_owned() });
		}

		Ok(Self::Kind { kind, name: name.to_owned() })
	}

	/// Name part of the selector.
	pub fn name(&self) -> &str {
		match self {
			Self::Any { name } | Self::Kind { name, .. } => name,
		}
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Any { name } => f.write_str(name),
			Self::Kind { kind, name } => write!(f, "{kind}:{name}"),
		}
	}
}

/// Parse a comma-separated target list; empty entries between commas are skipped.
pub fn parse_targets(list: &str) -> Result<Vec<Target>> {
	list.split(',').filter(|part| !part.trim().is_empty()).map(Target::parse).collect()
}

/// Resolve a target to the ID of the single node it names.
pub fn resolve_target(spec: &BtfSpec, target: &Target) -> Result<TypeId> {
	let matches = match target {
		Target::Any { name } => spec.any_types_by_name(name).to_vec(),
		Target::Kind { kind, name } => spec.types_by_kind_and_name(*kind, name),
	};

	match matches.as_slice() {
		[] => Err(BtfError::TargetNotFound { target: target.to_string() }),
		[id] => Ok(*id),
		many => Err(BtfError::AmbiguousTarget {
			target: target.to_string(),
			count: many.len(),
		}),
	}
}

/// Resolve every target in order; the first failure aborts.
pub fn resolve_targets(spec: &BtfSpec, targets: &[Target]) -> Result<Vec<TypeId>> {
	targets.iter().map(|target| resolve_target(spec, target)).collect()
}
