use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Address of a numeric signal: a single field of a single record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalPath {
	pub kind: String,
	pub id: String,
	pub field: String,
}

impl SignalPath {
	pub fn new(kind: impl Into<String>, id: impl Into<String>, field: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			id: id.into(),
			field: field.into(),
		}
	}
}

impl fmt::Display for SignalPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}.{}", self.kind, self.id, self.field)
	}
}

impl FromStr for SignalPath {
	type Err = StoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.splitn(3, '.');
		match (parts.next(), parts.next(), parts.next()) {
			(Some(kind), Some(id), Some(field)) if !kind.is_empty() && !id.is_empty() && !field.is_empty() => Ok(Self::new(kind, id, field)),
			_ => Err(StoreError::InvalidPath(s.to_string())),
		}
	}
}

/// Numeric signals keyed by path, with a journal of writes.
///
/// Every write is journaled, including writes of an unchanged value, so
/// observers see each published tick of a clock signal.
#[derive(Debug, Clone, Default)]
pub struct Signals {
	values: HashMap<SignalPath, f64>,
	dirty: Vec<SignalPath>,
}

impl Signals {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set(&mut self, path: SignalPath, value: f64) {
		self.values.insert(path.clone(), value);
		self.dirty.push(path);
	}

	pub fn get(&self, path: &SignalPath) -> Option<f64> {
		self.values.get(path).copied()
	}

	pub fn drain_dirty(&mut self) -> Vec<SignalPath> {
		std::mem::take(&mut self.dirty)
	}
}
