// Tool definitions and implementations for the reference server

use crate::fixtures;
use crate::intent::QueryIntent;
use anyhow::{Context, Result};
use gleaner_core::protocol::ToolDescriptor;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Descriptor advertised through tools/list
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute the tool with the caller-supplied arguments
    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value>;
}

/// Tool registry for managing available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under its advertised name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let descriptor = tool.descriptor();
        self.tools.insert(descriptor.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List all tool descriptors
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The emulated SPL execution tool. Classifies the query text and answers
/// with the canned result set for that intent; nothing is ever executed.
pub struct SplQueryTool {
    name: String,
}

impl SplQueryTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SplQueryArgs {
    #[serde(default)]
    query: String,
}

#[async_trait::async_trait]
impl Tool for SplQueryTool {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: "Execute an SPL search and return matching rows".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("SPL query text to execute")
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value> {
        // A missing or null arguments object behaves like an empty query.
        let args: SplQueryArgs = if arguments.is_null() {
            SplQueryArgs::default()
        } else {
            serde_json::from_value(arguments).context("invalid arguments for SPL query tool")?
        };
        let intent = QueryIntent::classify(&args.query);
        tracing::debug!(?intent, "serving canned result");
        Ok(fixtures::response_for(intent))
    }
}

// Helper functions for creating tool input schemas

pub fn json_schema_object(properties: serde_json::Value, required: Vec<&str>) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}
