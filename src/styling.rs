use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::data::ColumnType;

/// Per-grid styling switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    /// Render negative numbers in red
    #[serde(alias = "redNegs")]
    pub red_negs: bool,
}

/// CSS-like property map merged into a cell's presentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CellStyle {
    properties: BTreeMap<String, String>,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(property.into(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Colour override, if any. An empty string means "reset to default".
    pub fn color(&self) -> Option<&str> {
        self.get("color")
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }
}

fn is_negative(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().map(|v| v < 0.0).unwrap_or(false),
        Value::String(s) => s.trim().parse::<f64>().map(|v| v < 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Resolve the display style of one cell.
///
/// Only numeric columns with `red_negs` enabled get a colour; a missing value
/// or missing options always yields an empty style.
pub fn build_styling(
    value: Option<&Value>,
    column_type: ColumnType,
    options: Option<&StyleOptions>,
) -> CellStyle {
    let mut style = CellStyle::new();

    let (Some(value), Some(options)) = (value, options) else {
        return style;
    };

    if options.red_negs && column_type.is_numeric() {
        let color = if is_negative(value) { "red" } else { "" };
        style.set("color", color);
    }

    style
}
