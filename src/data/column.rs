use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Broad class of a column's dtype, used for styling and menu decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    String,
    Bool,
    Date,
    Category,
    Unknown,
}

impl ColumnType {
    /// Classify a raw dtype label ("int64", "float32", "object", "datetime64[ns]", ...)
    pub fn from_dtype(dtype: &str) -> Self {
        let dtype = dtype.trim().to_lowercase();
        if dtype.starts_with("int") || dtype.starts_with("uint") {
            ColumnType::Int
        } else if dtype.starts_with("float") || dtype.starts_with("double") {
            ColumnType::Float
        } else if dtype.starts_with("bool") {
            ColumnType::Bool
        } else if dtype.starts_with("datetime") || dtype.starts_with("timestamp") || dtype == "date"
        {
            ColumnType::Date
        } else if dtype.starts_with("category") {
            ColumnType::Category
        } else if dtype == "object" || dtype.starts_with("str") || dtype == "unicode" {
            ColumnType::String
        } else {
            ColumnType::Unknown
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, ColumnType::String)
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        ColumnType::from_dtype(s)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Bool => "bool",
            ColumnType::Date => "date",
            ColumnType::Category => "category",
            ColumnType::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// A column as shown by the viewer. Position in the owning `ColumnSet` is the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub dtype: String,
    /// Free-form display metadata (width, format string, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locked: false,
            dtype: String::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_dtype(mut self, dtype: impl Into<String>) -> Self {
        self.dtype = dtype.into();
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::from_dtype(&self.dtype)
    }
}

/// Ordered columns with all locked columns forming a contiguous prefix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    /// Build a column set, rejecting duplicate names and locked columns outside the prefix
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                bail!("Duplicate column name '{}'", column.name);
            }
        }

        let locked_count = columns.iter().take_while(|c| c.locked).count();
        if let Some(stray) = columns[locked_count..].iter().find(|c| c.locked) {
            bail!(
                "Locked column '{}' is not part of the locked prefix ({} locked columns lead)",
                stray.name,
                locked_count
            );
        }

        Ok(Self { columns })
    }

    /// Assemble from parts already known to satisfy the prefix invariant
    pub(crate) fn from_parts(locked: Vec<Column>, unlocked: Vec<Column>) -> Self {
        debug_assert!(locked.iter().all(|c| c.locked));
        debug_assert!(unlocked.iter().all(|c| !c.locked));
        let mut columns = locked;
        columns.extend(unlocked);
        Self { columns }
    }

    /// Split into (locked prefix, unlocked suffix) copies
    pub fn partition(&self) -> (Vec<Column>, Vec<Column>) {
        let split = self.locked_count();
        (
            self.columns[..split].to_vec(),
            self.columns[split..].to_vec(),
        )
    }

    pub fn locked(&self) -> &[Column] {
        &self.columns[..self.locked_count()]
    }

    pub fn unlocked(&self) -> &[Column] {
        &self.columns[self.locked_count()..]
    }

    pub fn locked_count(&self) -> usize {
        self.columns.iter().take_while(|c| c.locked).count()
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn as_slice(&self) -> &[Column] {
        &self.columns
    }
}

impl TryFrom<Vec<Column>> for ColumnSet {
    type Error = anyhow::Error;

    fn try_from(columns: Vec<Column>) -> Result<Self> {
        ColumnSet::new(columns)
    }
}

impl From<ColumnSet> for Vec<Column> {
    fn from(set: ColumnSet) -> Self {
        set.columns
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
