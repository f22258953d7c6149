//! Tool domain traits
//!
//! Pure argument validation against a tool's parameter schema. The async
//! tool-server port lives in the application layer.

use super::entities::{ToolCallRequest, ToolDescriptor};

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its descriptor
    fn validate(&self, call: &ToolCallRequest, descriptor: &ToolDescriptor) -> Result<(), String>;
}

/// Checks required parameters, undeclared parameters (only when the schema
/// sets `additionalProperties: false`) and primitive JSON types.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCallRequest, descriptor: &ToolDescriptor) -> Result<(), String> {
        let schema = &descriptor.parameter_schema;

        for param in schema.required() {
            match call.arguments.get(&param.name) {
                None | Some(serde_json::Value::Null) => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, descriptor.name
                    ));
                }
                Some(_) => {}
            }
        }

        for (arg_name, value) in &call.arguments {
            match schema.get(arg_name) {
                Some(param) => {
                    if !value.is_null() && !matches_type(&param.param_type, value) {
                        return Err(format!(
                            "Parameter '{}' for tool '{}' must be of type {}",
                            arg_name, descriptor.name, param.param_type
                        ));
                    }
                }
                None if !schema.allows_additional() => {
                    return Err(format!(
                        "Unknown parameter '{}' for tool '{}'",
                        arg_name, descriptor.name
                    ));
                }
                None => {}
            }
        }

        Ok(())
    }
}

fn matches_type(param_type: &str, value: &serde_json::Value) -> bool {
    match param_type {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}
