//! Tool registry for the assistant.
//!
//! Each tool the assistant can run is described once: name,
//! description, and a flat parameter schema. The same schema is
//! exported verbatim to the language model so it knows when and how to
//! request a call, and consulted by the dispatcher when a requested
//! call arrives.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Coarse parameter type, as advertised to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Free-form string.
    String,
    /// Boolean flag.
    Boolean,
}

impl ParamKind {
    /// Wire name for the gateway schema.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::String => "str",
            Self::Boolean => "bool",
        }
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Coarse type.
    pub kind: ParamKind,
    /// Whether the model must supply this parameter.
    pub required: bool,
}

impl ToolParameter {
    /// Declares a required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>, description: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
        }
    }

    /// Declares an optional parameter.
    #[must_use]
    pub fn optional(name: impl Into<String>, description: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
        }
    }
}

/// Definition of a tool available to the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Declared parameters.
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    /// Creates a tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Adds a parameter declaration.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Renders this definition in the gateway wire format.
    #[must_use]
    pub fn to_gateway_schema(&self) -> JsonValue {
        let mut definitions = serde_json::Map::new();
        for parameter in &self.parameters {
            definitions.insert(
                parameter.name.clone(),
                serde_json::json!({
                    "description": parameter.description,
                    "type": parameter.kind.wire_name(),
                    "required": parameter.required,
                }),
            );
        }

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameter_definitions": definitions,
        })
    }
}

/// Result of a tool invocation.
///
/// Always produced, never partial: every dispatched call yields exactly
/// one result, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the invocation succeeded.
    pub success: bool,
    /// Result data (if successful).
    pub data: Option<JsonValue>,
    /// Human-readable reason (if failed).
    pub error: Option<String>,
}

impl ToolResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Returns true if the call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Registry of available tools.
///
/// Built once at startup from a closed set of definitions; duplicate
/// names are rejected so every schema advertised to the model has
/// exactly one dispatch target.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Builds a registry from definitions.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DuplicateName`] if two definitions share a
    /// name.
    pub fn new(definitions: Vec<ToolDefinition>) -> Result<Self, ToolError> {
        let mut registry = Self {
            definitions: Vec::new(),
        };
        for definition in definitions {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    /// Registers one definition.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DuplicateName`] if the name is taken.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<(), ToolError> {
        if self.get(&definition.name).is_some() {
            return Err(ToolError::DuplicateName {
                name: definition.name,
            });
        }
        self.definitions.push(definition);
        Ok(())
    }

    /// Gets a definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Returns all definitions in registration order.
    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.definitions.iter()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Renders every definition in the gateway wire format.
    #[must_use]
    pub fn to_gateway_schemas(&self) -> Vec<JsonValue> {
        self.definitions
            .iter()
            .map(ToolDefinition::to_gateway_schema)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_builder() {
        let tool = ToolDefinition::new("add_task", "Add a task")
            .with_parameter(ToolParameter::required("title", "Task title", ParamKind::String))
            .with_parameter(ToolParameter::optional(
                "completed",
                "Completion state",
                ParamKind::Boolean,
            ));

        assert_eq!(tool.name, "add_task");
        assert_eq!(tool.parameters.len(), 2);
        assert!(tool.parameters[0].required);
        assert!(!tool.parameters[1].required);
    }

    #[test]
    fn gateway_schema_shape() {
        let tool = ToolDefinition::new("complete_task", "Mark a task as completed").with_parameter(
            ToolParameter::required("task_id", "Task to complete", ParamKind::String),
        );

        let schema = tool.to_gateway_schema();
        assert_eq!(schema["name"], "complete_task");
        assert_eq!(schema["parameter_definitions"]["task_id"]["type"], "str");
        assert_eq!(schema["parameter_definitions"]["task_id"]["required"], true);
    }

    #[test]
    fn registry_rejects_duplicates() {
        let err = ToolRegistry::new(vec![
            ToolDefinition::new("list_tasks", "List tasks"),
            ToolDefinition::new("list_tasks", "List tasks again"),
        ])
        .unwrap_err();

        assert!(matches!(err, ToolError::DuplicateName { name } if name == "list_tasks"));
    }

    #[test]
    fn registry_lookup_and_export() {
        let registry = ToolRegistry::new(vec![
            ToolDefinition::new("add_task", "Add a task"),
            ToolDefinition::new("delete_task", "Delete a task"),
        ])
        .expect("build registry");

        assert_eq!(registry.len(), 2);
        assert!(registry.get("add_task").is_some());
        assert!(registry.get("rename_task").is_none());

        let schemas = registry.to_gateway_schemas();
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[1]["name"], "delete_task");
    }

    #[test]
    fn tool_result_success() {
        let result = ToolResult::success(serde_json::json!({"count": 3}));
        assert!(result.is_success());
        assert!(result.error.is_none());
    }

    #[test]
    fn tool_result_failure() {
        let result = ToolResult::failure("task not found");
        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("task not found"));
    }
}
