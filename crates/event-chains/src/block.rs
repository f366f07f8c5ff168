use crate::types::{ChainId, LiveId, ParamMap, SignalPath, TimeMs};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag value that marks a JSON object as a value block.
pub const VALUE_BLOCK_TAG: &str = "value";

/// Plain-data description of one event occurrence to run (entity/transport type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBlock {
	pub group: String,
	pub name: String,
	#[serde(default)]
	pub params: ParamMap,
	#[serde(default)]
	pub options: EventBlockOptions,
}

impl EventBlock {
	pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			group: group.into(),
			name: name.into(),
			params: ParamMap::new(),
			options: EventBlockOptions::default(),
		}
	}

	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	pub fn with_params(mut self, params: ParamMap) -> Self {
		self.params = params;
		self
	}

	pub fn with_options(mut self, options: EventBlockOptions) -> Self {
		self.options = options;
		self
	}

	pub fn with_live_id(mut self, live_id: impl Into<LiveId>) -> Self {
		self.options.live_id = Some(live_id.into());
		self
	}

	pub fn parallel(mut self) -> Self {
		self.options.is_parallel = Some(true);
		self
	}
}

/// Per-occurrence overrides carried on an event block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventBlockOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub chain_id: Option<ChainId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub live_id: Option<LiveId>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub added_by: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_parallel: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time_path: Option<SignalPath>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub has_priority: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration: Option<TimeMs>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_fast: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent_chain_id: Option<ChainId>,
}

/// Plain-data description of a deferred value, evaluated when its owning
/// event starts. Distinguished from raw parameter objects by the literal
/// `"type": "value"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueBlock {
	#[serde(rename = "type")]
	pub block_type: String,
	pub group: String,
	pub name: String,
	#[serde(default)]
	pub params: ParamMap,
	#[serde(default)]
	pub options: ValueBlockOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueBlockOptions {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_fast: Option<bool>,
}

impl ValueBlock {
	pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			block_type: VALUE_BLOCK_TAG.to_string(),
			group: group.into(),
			name: name.into(),
			params: ParamMap::new(),
			options: ValueBlockOptions::default(),
		}
	}

	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// The JSON form used inside parameter maps.
	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}

	pub fn is_value_block(value: &Value) -> bool {
		value
			.as_object()
			.and_then(|obj| obj.get("type"))
			.and_then(Value::as_str)
			.is_some_and(|tag| tag == VALUE_BLOCK_TAG)
	}

	pub fn from_value(value: &Value) -> Option<Self> {
		if !Self::is_value_block(value) {
			return None;
		}
		serde_json::from_value(value.clone()).ok()
	}
}

impl From<ValueBlock> for Value {
	fn from(block: ValueBlock) -> Self {
		block.to_value()
	}
}
