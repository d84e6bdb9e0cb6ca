use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::data::{ColumnSet, SortSpec};
use crate::state::coordinator::{Callback, StatePropagator};
use crate::state::events::StateChange;

const MAX_HISTORY: usize = 100;

/// Viewer session state owned by the host UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerSession {
    pub data_id: String,
    pub columns: ColumnSet,
    #[serde(default)]
    pub sort_info: SortSpec,
    /// Columns frozen during horizontal scroll; always the locked prefix length
    #[serde(default)]
    pub fixed_column_count: usize,
    #[serde(default)]
    pub selected_cols: Vec<String>,
    #[serde(skip)]
    pub formatting_open: bool,
    /// Set by layout-affecting changes, cleared by the renderer via `take_resize`
    #[serde(skip)]
    pub resize_pending: bool,
    #[serde(skip)]
    history: VecDeque<String>,
}

impl ViewerSession {
    pub fn new(data_id: impl Into<String>, columns: ColumnSet) -> Self {
        let fixed_column_count = columns.locked_count();
        Self {
            data_id: data_id.into(),
            columns,
            sort_info: SortSpec::new(),
            fixed_column_count,
            selected_cols: Vec::new(),
            formatting_open: false,
            resize_pending: false,
            history: VecDeque::new(),
        }
    }

    pub fn with_sort(mut self, sort_info: SortSpec) -> Self {
        self.sort_info = sort_info;
        self
    }

    /// Load a session snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let mut session: ViewerSession = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid session file {}", path.display()))?;
        session.fixed_column_count = session.columns.locked_count();
        info!(target: "session", "Loaded session '{}' with {} columns", session.data_id, session.columns.len());
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write session file {}", path.display()))?;
        Ok(())
    }

    /// Merge a partial change into the session
    pub fn apply_change(&mut self, change: StateChange) {
        debug!(target: "session", "Applying state change: {}", change.summary());

        self.history.push_back(change.summary());
        if self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }

        if let Some(columns) = change.columns {
            self.columns = columns;
        }
        if let Some(sort_info) = change.sort_info {
            self.sort_info = sort_info;
        }
        if let Some(count) = change.fixed_column_count {
            self.fixed_column_count = count;
        }
        if let Some(selected) = change.selected_cols {
            self.selected_cols = selected;
        }
        if let Some(open) = change.formatting_open {
            self.formatting_open = open;
        }
        if change.trigger_resize {
            self.resize_pending = true;
        }
    }

    /// Returns whether a resize was requested since the last call, and resets it
    pub fn take_resize(&mut self) -> bool {
        std::mem::take(&mut self.resize_pending)
    }

    /// Summaries of applied changes, oldest first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }
}

impl StatePropagator for ViewerSession {
    fn propagate(&mut self, change: StateChange, callback: Option<Callback>) {
        self.apply_change(change);
        if let Some(callback) = callback {
            callback();
        }
    }
}
