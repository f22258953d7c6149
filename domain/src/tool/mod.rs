//! Tool domain module
//!
//! Tools are opaque remote procedures published by an MCP tool server. The
//! agent only knows their name, description and parameter schema.
//!
//! ```text
//! ┌────────────────┐    ┌─────────────────┐    ┌────────────────┐
//! │ ToolCatalog    │───▶│ ToolCallRequest │───▶│ ToolCallResult │
//! │ (discovery)    │    │ (from the model)│    │ (output|error) │
//! └────────────────┘    └─────────────────┘    └────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolCatalog`]: unique-name set of [`ToolDescriptor`]s, immutable once built
//! - [`ToolDescriptor`]: name, description and [`ParameterSchema`](entities::ParameterSchema)
//! - [`ToolCallRequest`]: a model-requested invocation
//! - [`ToolCallResult`]: exactly one of output or [`ToolError`]
//! - [`ToolValidator`]: pure argument validation

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ParameterSchema, ToolCallRequest, ToolCatalog, ToolDescriptor, ToolParameter};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolCallResult, ToolError, ToolOutcome};
