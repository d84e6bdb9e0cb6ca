//! State changes produced by column operations

use crate::data::{ColumnSet, SortSpec};

/// A partial update to viewer session state. Unset fields are left untouched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StateChange {
    pub columns: Option<ColumnSet>,
    pub sort_info: Option<SortSpec>,
    pub fixed_column_count: Option<usize>,
    pub selected_cols: Option<Vec<String>>,
    pub formatting_open: Option<bool>,
    /// Layout-affecting change; the grid must re-measure
    pub trigger_resize: bool,
}

impl StateChange {
    /// New column order, with a resize
    pub fn columns(columns: ColumnSet) -> Self {
        Self {
            columns: Some(columns),
            trigger_resize: true,
            ..Default::default()
        }
    }

    /// New sort spec, with a resize
    pub fn sort(sort_info: SortSpec) -> Self {
        Self {
            sort_info: Some(sort_info),
            trigger_resize: true,
            ..Default::default()
        }
    }

    /// Lock/unlock result: new order, new frozen count, selection cleared
    pub fn locking(columns: ColumnSet, fixed_column_count: usize) -> Self {
        Self {
            columns: Some(columns),
            fixed_column_count: Some(fixed_column_count),
            selected_cols: Some(Vec::new()),
            trigger_resize: true,
            ..Default::default()
        }
    }

    /// Open the formatting editor for the given columns
    pub fn open_formatting(selected: Vec<String>) -> Self {
        Self {
            formatting_open: Some(true),
            selected_cols: Some(selected),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_none()
            && self.sort_info.is_none()
            && self.fixed_column_count.is_none()
            && self.selected_cols.is_none()
            && self.formatting_open.is_none()
            && !self.trigger_resize
    }

    /// Combine with another change; fields set on `other` win
    pub fn and(mut self, other: StateChange) -> Self {
        if other.columns.is_some() {
            self.columns = other.columns;
        }
        if other.sort_info.is_some() {
            self.sort_info = other.sort_info;
        }
        if other.fixed_column_count.is_some() {
            self.fixed_column_count = other.fixed_column_count;
        }
        if other.selected_cols.is_some() {
            self.selected_cols = other.selected_cols;
        }
        if other.formatting_open.is_some() {
            self.formatting_open = other.formatting_open;
        }
        self.trigger_resize |= other.trigger_resize;
        self
    }

    /// Short description for logs and session history
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(columns) = &self.columns {
            parts.push(format!("columns=[{}]", columns.names().join(",")));
        }
        if let Some(sort) = &self.sort_info {
            parts.push(format!("sort=[{}]", sort));
        }
        if let Some(count) = self.fixed_column_count {
            parts.push(format!("fixed={}", count));
        }
        if let Some(selected) = &self.selected_cols {
            parts.push(format!("selected=[{}]", selected.join(",")));
        }
        if let Some(open) = self.formatting_open {
            parts.push(format!("formatting_open={}", open));
        }
        if self.trigger_resize {
            parts.push("resize".to_string());
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SortDirection, SortEntry};

    #[test]
    fn test_and_prefers_later_fields() {
        let first = StateChange::sort(SortSpec::new());
        let second = StateChange::open_formatting(vec!["a".to_string()]);
        let combined = first.and(second);

        assert_eq!(combined.sort_info, Some(SortSpec::new()));
        assert_eq!(combined.formatting_open, Some(true));
        assert_eq!(combined.selected_cols, Some(vec!["a".to_string()]));
        assert!(combined.trigger_resize);
    }

    #[test]
    fn test_summary() {
        let spec = SortSpec::from_entries(vec![SortEntry::new("a", SortDirection::Asc)]);
        assert_eq!(StateChange::sort(spec).summary(), "sort=[a ASC] resize");
        assert!(StateChange::default().is_empty());
    }
}
