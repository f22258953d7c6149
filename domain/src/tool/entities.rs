//! Tool domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// JSON Schema type (e.g., "string", "integer", "object")
    pub param_type: String,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Structured description of the arguments a tool accepts.
///
/// Keeps both the flattened parameter list (used for validation and display)
/// and the original JSON Schema object (forwarded verbatim to the model, so
/// nested shapes survive the round trip).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    pub parameters: Vec<ToolParameter>,
    /// Original JSON Schema object as published by the tool server.
    pub raw: serde_json::Value,
}

impl Default for ParameterSchema {
    fn default() -> Self {
        Self {
            parameters: Vec::new(),
            raw: serde_json::json!({ "type": "object", "properties": {} }),
        }
    }
}

impl ParameterSchema {
    /// Build a schema from declared parameters.
    pub fn from_parameters(parameters: Vec<ToolParameter>) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        Self {
            parameters,
            raw: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        }
    }

    /// Parse a JSON Schema `object` description (an MCP `inputSchema`).
    ///
    /// `properties` and `required` are optional; anything that is not an
    /// object schema is rejected.
    pub fn from_json_schema(schema: &serde_json::Value) -> Result<Self, DomainError> {
        let object = schema.as_object().ok_or_else(|| {
            DomainError::InvalidTool("parameter schema must be a JSON object".to_string())
        })?;

        if let Some(kind) = object.get("type").and_then(|t| t.as_str())
            && kind != "object"
        {
            return Err(DomainError::InvalidTool(format!(
                "parameter schema type must be 'object', got '{}'",
                kind
            )));
        }

        let required: Vec<&str> = match object.get("required") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str().ok_or_else(|| {
                        DomainError::InvalidTool("'required' entries must be strings".to_string())
                    })
                })
                .collect::<Result<_, _>>()?,
            Some(_) => {
                return Err(DomainError::InvalidTool(
                    "'required' must be an array".to_string(),
                ));
            }
        };

        let mut parameters = Vec::new();
        match object.get("properties") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::Object(props)) => {
                for (name, prop) in props {
                    let description = prop
                        .get("description")
                        .and_then(|d| d.as_str())
                        .unwrap_or_default();
                    parameters.push(
                        ToolParameter::new(name, description, required.contains(&name.as_str()))
                            .with_type(schema_type_of(prop)),
                    );
                }
            }
            Some(_) => {
                return Err(DomainError::InvalidTool(
                    "'properties' must be an object".to_string(),
                ));
            }
        }

        for name in &required {
            if !parameters.iter().any(|p| p.name == *name) {
                return Err(DomainError::InvalidTool(format!(
                    "required parameter '{}' is not declared in properties",
                    name
                )));
            }
        }

        Ok(Self {
            parameters,
            raw: schema.clone(),
        })
    }

    /// Whether arguments not listed in `properties` are accepted.
    ///
    /// JSON Schema defaults `additionalProperties` to `true`.
    pub fn allows_additional(&self) -> bool {
        !matches!(
            self.raw.get("additionalProperties"),
            Some(serde_json::Value::Bool(false))
        )
    }

    pub fn get(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn required(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

fn schema_type_of(prop: &serde_json::Value) -> String {
    match prop.get("type") {
        Some(serde_json::Value::String(t)) => t.clone(),
        // ["string", "null"] style nullable types
        Some(serde_json::Value::Array(types)) => types
            .iter()
            .filter_map(|t| t.as_str())
            .find(|t| *t != "null")
            .unwrap_or("any")
            .to_string(),
        _ => "any".to_string(),
    }
}

/// A callable tool as published by the remote tool server.
///
/// Immutable once discovered; the catalog is replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name of the tool (e.g., "get_markdown_content")
    pub name: String,
    /// Natural-language description the model uses to decide relevance
    pub description: String,
    /// Accepted arguments
    pub parameter_schema: ParameterSchema,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter_schema: ParameterSchema::default(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        let mut parameters = std::mem::take(&mut self.parameter_schema.parameters);
        parameters.push(param);
        self.parameter_schema = ParameterSchema::from_parameters(parameters);
        self
    }

    pub fn with_schema(mut self, schema: ParameterSchema) -> Self {
        self.parameter_schema = schema;
        self
    }
}

/// The set of tools available to every run.
///
/// Names are unique; iteration order is sorted by name so the catalog sent
/// to the model is stable across requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCatalog {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting blank or duplicate names.
    pub fn new(descriptors: impl IntoIterator<Item = ToolDescriptor>) -> Result<Self, DomainError> {
        let mut tools = BTreeMap::new();
        for tool in descriptors {
            if tool.name.trim().is_empty() {
                return Err(DomainError::InvalidTool("tool name is empty".to_string()));
            }
            if tools.contains_key(&tool.name) {
                return Err(DomainError::DuplicateTool(tool.name));
            }
            tools.insert(tool.name.clone(), tool);
        }
        Ok(Self { tools })
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Call identifier, unique within a run
    pub id: String,
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    #[serde(default)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments: serde_json::Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: serde_json::Map<String, serde_json::Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Arguments as a JSON object value
    pub fn arguments_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.arguments.clone())
    }
}
