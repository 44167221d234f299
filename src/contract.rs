//! Contract document loading and typed access to its sections.
//!
//! The document is held as a JSON tree; every accessor returns `Option`
//! so the check functions can report absence or mis-shape as findings
//! instead of failing the validation call. Only an unreadable or
//! unparseable file is a hard error - that is a load failure, a distinct
//! class from "read it, and it is broken".

use anyhow::{ensure, Context, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A contract document loaded into memory. Read-only after loading.
#[derive(Debug, Clone)]
pub struct ContractDoc {
    root: Value,
}

impl ContractDoc {
    /// Load a contract from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read contract: {}", path.display()))?;
        let root: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse contract as JSON: {}", path.display()))?;
        Self::from_value(root)
            .with_context(|| format!("Invalid contract document: {}", path.display()))
    }

    /// Wrap an already-parsed JSON tree. The root must be an object.
    pub fn from_value(root: Value) -> Result<Self> {
        ensure!(root.is_object(), "contract root must be a JSON object");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.field(name).and_then(Value::as_object)
    }

    pub fn array(&self, name: &str) -> Option<&Vec<Value>> {
        self.field(name).and_then(Value::as_array)
    }

    /// A top-level string field, or `""` when absent or not a string.
    pub fn str_field(&self, name: &str) -> &str {
        self.field(name).and_then(Value::as_str).unwrap_or("")
    }

    /// The input or output artifact list of the I/O contract.
    pub fn io_artifacts(&self, direction: &str) -> Option<&Vec<Value>> {
        self.field("io_contract")?.get(direction)?.as_array()
    }

    /// All codes declared in the error-code registry.
    pub fn declared_codes(&self) -> HashSet<&str> {
        self.array("error_codes")
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e.get("code").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The document's glossary policy; absent means `"off"`.
    pub fn glossary_policy(&self) -> &str {
        self.field("policies")
            .and_then(|p| p.get("glossary_policy"))
            .and_then(Value::as_str)
            .unwrap_or("off")
    }
}

/// A string field of a JSON object, or `""` when absent or not a string.
pub fn str_of<'a>(value: &'a Map<String, Value>, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}
