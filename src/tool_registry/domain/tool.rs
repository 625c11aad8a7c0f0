//! Tool definition value objects.

use super::ToolRegistryDomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical metadata for a tool exposed by a provider.
///
/// The input schema is provider-supplied and passed through verbatim; the
/// engine never interprets it beyond structural comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_schema: Option<Value>,
}

impl ToolDefinition {
    /// Creates a tool definition with no description or schema.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyToolName`] when the name is
    /// empty after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized_name = name.into().trim().to_owned();
        if normalized_name.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolName);
        }

        Ok(Self {
            name: normalized_name,
            description: None,
            input_schema: None,
        })
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the input schema.
    ///
    /// `null` and `{}` are treated as an absent schema.
    #[must_use]
    pub fn with_input_schema(mut self, input_schema: Value) -> Self {
        self.input_schema = normalize_schema(Some(input_schema));
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the optional input schema.
    #[must_use]
    pub const fn input_schema(&self) -> Option<&Value> {
        self.input_schema.as_ref()
    }

    /// Returns whether the description or schema differ from `other`.
    #[must_use]
    pub fn differs_from(&self, other: &Self) -> bool {
        self.description != other.description || self.input_schema != other.input_schema
    }
}

/// One raw entry from a provider's `tools/list` response.
///
/// Entries decode leniently: a missing name, a non-string name, or an entry
/// that is not an object all yield a nameless entry rather than failing the
/// whole list. Nameless entries are dropped during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct DiscoveredTool {
    name: Option<String>,
    description: Option<String>,
    input_schema: Option<Value>,
}

impl DiscoveredTool {
    /// Creates a well-formed discovered entry.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            input_schema: None,
        }
    }

    /// Creates an entry without a name.
    #[must_use]
    pub const fn nameless() -> Self {
        Self {
            name: None,
            description: None,
            input_schema: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the input schema.
    #[must_use]
    pub fn with_input_schema(mut self, input_schema: Value) -> Self {
        self.input_schema = normalize_schema(Some(input_schema));
        self
    }

    /// Returns the raw name, if the provider supplied one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the input schema, if any.
    #[must_use]
    pub const fn input_schema(&self) -> Option<&Value> {
        self.input_schema.as_ref()
    }

    /// Converts the entry into a validated [`ToolDefinition`].
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyToolName`] when the entry has
    /// no usable name.
    pub fn to_definition(&self) -> Result<ToolDefinition, ToolRegistryDomainError> {
        let name = self.name.as_deref().unwrap_or_default();
        let mut definition = ToolDefinition::new(name)?;
        definition.description.clone_from(&self.description);
        definition.input_schema.clone_from(&self.input_schema);
        Ok(definition)
    }
}

impl From<Value> for DiscoveredTool {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::nameless();
        };

        let name = match fields.remove("name") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };
        let description = match fields.remove("description") {
            Some(Value::String(description)) => Some(description),
            _ => None,
        };

        Self {
            name,
            description,
            input_schema: normalize_schema(fields.remove("inputSchema")),
        }
    }
}

impl From<ToolDefinition> for DiscoveredTool {
    fn from(definition: ToolDefinition) -> Self {
        Self {
            name: Some(definition.name),
            description: definition.description,
            input_schema: definition.input_schema,
        }
    }
}

fn normalize_schema(schema: Option<Value>) -> Option<Value> {
    match schema {
        None | Some(Value::Null) => None,
        Some(Value::Object(fields)) if fields.is_empty() => None,
        Some(other) => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn discovered_tool_decodes_full_entry() {
        let entry: DiscoveredTool = serde_json::from_value(json!({
            "name": "read",
            "description": "Read a file",
            "inputSchema": {"type": "object", "properties": {"path": {"type": "string"}}}
        }))
        .expect("lenient decoding never fails");

        assert_eq!(entry.name(), Some("read"));
        assert_eq!(entry.description(), Some("Read a file"));
        assert!(entry.input_schema().is_some());
    }

    #[rstest]
    #[case(json!({"description": "no name"}))]
    #[case(json!({"name": 42}))]
    #[case(json!("read"))]
    #[case(json!(null))]
    fn malformed_entries_decode_as_nameless(#[case] raw: Value) {
        let entry: DiscoveredTool =
            serde_json::from_value(raw).expect("lenient decoding never fails");
        assert_eq!(entry.name(), None);
        assert_eq!(
            entry.to_definition(),
            Err(ToolRegistryDomainError::EmptyToolName)
        );
    }

    #[rstest]
    #[case(json!({"name": "read"}))]
    #[case(json!({"name": "read", "inputSchema": null}))]
    #[case(json!({"name": "read", "inputSchema": {}}))]
    fn absent_null_and_empty_schemas_are_equivalent(#[case] raw: Value) {
        let entry: DiscoveredTool =
            serde_json::from_value(raw).expect("lenient decoding never fails");
        let definition = entry.to_definition().expect("named entry is valid");
        assert_eq!(definition.input_schema(), None);
    }

    #[test]
    fn definition_comparison_ignores_schema_key_order() {
        let left = ToolDefinition::new("read")
            .expect("valid name")
            .with_input_schema(json!({"type": "object", "required": ["path"]}));
        let right = ToolDefinition::new("read")
            .expect("valid name")
            .with_input_schema(json!({"required": ["path"], "type": "object"}));

        assert!(!left.differs_from(&right));
    }

    #[test]
    fn definition_serializes_with_camel_case_schema() {
        let definition = ToolDefinition::new("read")
            .expect("valid name")
            .with_description("Read a file")
            .with_input_schema(json!({"type": "object"}));

        let encoded = serde_json::to_value(&definition).expect("serialization succeeds");
        assert_eq!(
            encoded,
            json!({"name": "read", "description": "Read a file", "inputSchema": {"type": "object"}})
        );
    }
}
