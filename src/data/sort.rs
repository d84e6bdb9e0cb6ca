use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction stored in an active sort entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested sort state for a column. `None` clears any existing sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    Descending,
    #[default]
    None,
}

impl SortOrder {
    /// Menu order of the sort buttons
    pub const ALL: [SortOrder; 3] = [SortOrder::Ascending, SortOrder::Descending, SortOrder::None];

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            SortOrder::Ascending => Some(SortDirection::Asc),
            SortOrder::Descending => Some(SortDirection::Desc),
            SortOrder::None => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
            SortOrder::None => "NONE",
        }
    }

    /// Button label used by the column menu
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Asc",
            SortOrder::Descending => "Desc",
            SortOrder::None => "None",
        }
    }
}

/// Unrecognised labels fall back to `None`
impl From<&str> for SortOrder {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ASC" | "ASCENDING" => SortOrder::Ascending,
            "DESC" | "DESCENDING" => SortOrder::Descending,
            _ => SortOrder::None,
        }
    }
}

impl From<SortDirection> for SortOrder {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => SortOrder::Ascending,
            SortDirection::Desc => SortOrder::Descending,
        }
    }
}

impl From<Option<SortDirection>> for SortOrder {
    fn from(direction: Option<SortDirection>) -> Self {
        direction.map(SortOrder::from).unwrap_or_default()
    }
}

/// One `(column, direction)` pair, serialized as a two element array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, SortDirection)", into = "(String, SortDirection)")]
pub struct SortEntry {
    pub column: String,
    pub direction: SortDirection,
}

impl SortEntry {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl From<(String, SortDirection)> for SortEntry {
    fn from((column, direction): (String, SortDirection)) -> Self {
        Self { column, direction }
    }
}

impl From<SortEntry> for (String, SortDirection) {
    fn from(entry: SortEntry) -> Self {
        (entry.column, entry.direction)
    }
}

/// Multi-column sort; earlier entries take priority
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SortEntry>", into = "Vec<SortEntry>")]
pub struct SortSpec {
    entries: Vec<SortEntry>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pairs. Later duplicates of a column are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = SortEntry>) -> Self {
        let mut spec = Self::new();
        for entry in entries {
            if spec.direction_of(&entry.column).is_none() {
                spec.entries.push(entry);
            }
        }
        spec
    }

    /// Merge a requested order for the selected columns.
    ///
    /// Existing entries for the selection are removed; for ascending/descending the
    /// selection is re-appended in selection order, i.e. at the lowest priority.
    pub fn updated(&self, selected: &[String], order: SortOrder) -> Self {
        let mut entries: Vec<SortEntry> = self
            .entries
            .iter()
            .filter(|entry| !selected.contains(&entry.column))
            .cloned()
            .collect();

        if let Some(direction) = order.direction() {
            for column in selected {
                if !entries.iter().any(|e| &e.column == column) {
                    entries.push(SortEntry::new(column.clone(), direction));
                }
            }
        }

        Self { entries }
    }

    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.entries
            .iter()
            .find(|entry| entry.column == column)
            .map(|entry| entry.direction)
    }

    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<SortEntry>> for SortSpec {
    fn from(entries: Vec<SortEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<SortSpec> for Vec<SortEntry> {
    fn from(spec: SortSpec) -> Self {
        spec.entries
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{} {}", e.column, e.direction))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
