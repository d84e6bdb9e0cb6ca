//! Per-column menu model.
//!
//! Decides which actions the menu for the selected column offers and routes
//! each action into the column engine. Drawing the menu is the host's job.

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use crate::api::notifier::Notifier;
use crate::column_ops::{self, ColumnTransition, MoveDirection, MoveEdge};
use crate::config::config::{PopupConfig, PopupSize};
use crate::data::{Column, ColumnSet, SortOrder, SortSpec};
use crate::popup::{full_path, should_open_popup, PopupWindow, PresentationContext};
use crate::state::{StateChange, ViewerSession};

/// Move buttons, in the order the menu shows them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    ToFront,
    Left,
    Right,
    ToBack,
}

impl MoveAction {
    pub const ALL: [MoveAction; 4] = [
        MoveAction::ToFront,
        MoveAction::Left,
        MoveAction::Right,
        MoveAction::ToBack,
    ];

    pub fn hint(&self) -> &'static str {
        match self {
            MoveAction::ToFront => "Move Column To Front",
            MoveAction::Left => "Move Column Left",
            MoveAction::Right => "Move Column Right",
            MoveAction::ToBack => "Move Column To Back",
        }
    }
}

/// Secondary views that open as a popup or inline chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    Describe,
    Histogram,
}

impl PopupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopupKind::Describe => "describe",
            PopupKind::Histogram => "histogram",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PopupKind::Describe => "Describe",
            PopupKind::Histogram => "Histogram",
        }
    }

    pub fn size(&self, config: &PopupConfig) -> PopupSize {
        match self {
            PopupKind::Describe => config.describe,
            PopupKind::Histogram => config.histogram,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Sort(SortOrder),
    Move(MoveAction),
    Lock,
    Unlock,
    Popup(PopupKind),
    Formats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortButton {
    pub order: SortOrder,
    /// The column's current order; shown pressed and disabled
    pub active: bool,
}

/// Inline chart shown inside the viewer instead of a detached window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub kind: String,
    pub title: String,
    pub col: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupTarget {
    Detached(PopupWindow),
    Inline(ChartRequest),
}

/// Menu for one selected column
#[derive(Debug, Clone)]
pub struct ColumnMenu {
    column: Column,
    current_sort: SortOrder,
}

impl ColumnMenu {
    /// Build the menu for `selected`; `None` when nothing (or an unknown column) is selected
    pub fn for_column(
        selected: Option<&str>,
        columns: &ColumnSet,
        sort_info: &SortSpec,
    ) -> Option<Self> {
        let column = columns.get(selected?)?.clone();
        let current_sort = SortOrder::from(sort_info.direction_of(&column.name));
        Some(Self {
            column,
            current_sort,
        })
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn header(&self) -> String {
        format!("Column \"{}\"", self.column.name)
    }

    pub fn current_sort(&self) -> SortOrder {
        self.current_sort
    }

    pub fn sort_buttons(&self) -> Vec<SortButton> {
        SortOrder::ALL
            .iter()
            .map(|&order| SortButton {
                order,
                active: order == self.current_sort,
            })
            .collect()
    }

    pub fn is_locked(&self) -> bool {
        self.column.locked
    }

    /// Describe is always offered; histograms only make sense for non-string columns
    pub fn popups(&self) -> Vec<PopupKind> {
        let mut popups = vec![PopupKind::Describe];
        if !self.column.column_type().is_string() {
            popups.push(PopupKind::Histogram);
        }
        popups
    }

    /// Every action the menu offers, in display order
    pub fn actions(&self) -> Vec<MenuAction> {
        let mut actions: Vec<MenuAction> = SortOrder::ALL
            .iter()
            .map(|&order| MenuAction::Sort(order))
            .collect();
        actions.extend(MoveAction::ALL.iter().map(|&m| MenuAction::Move(m)));
        actions.push(if self.is_locked() {
            MenuAction::Unlock
        } else {
            MenuAction::Lock
        });
        actions.extend(self.popups().into_iter().map(MenuAction::Popup));
        actions.push(MenuAction::Formats);
        actions
    }

    /// Resolve a popup into a detached window or an inline chart
    pub fn open_popup(
        &self,
        kind: PopupKind,
        data_id: &str,
        namespace: &str,
        context: PresentationContext,
        config: &PopupConfig,
    ) -> Result<PopupTarget> {
        let size = kind.size(config);
        if should_open_popup(size.height, size.width, context) {
            let path = full_path(
                &format!("/{}/popup/{}", namespace.trim_matches('/'), kind.as_str()),
                Some(data_id),
            );
            let window = PopupWindow::new(&path, &[("col", self.column.name.as_str())], size.width, size.height)?
                .with_offset(config.offset_x, config.offset_y);
            return Ok(PopupTarget::Detached(window));
        }

        Ok(PopupTarget::Inline(ChartRequest {
            kind: kind.as_str().to_string(),
            title: kind.title().to_string(),
            col: self.column.name.clone(),
        }))
    }

    /// Open the formatting editor with this column selected
    pub fn formatting_change(&self) -> StateChange {
        StateChange::open_formatting(vec![self.column.name.clone()])
    }

    /// Transition for a state-changing action; `None` for popups
    pub fn transition(&self, action: MenuAction, session: &ViewerSession) -> Option<ColumnTransition> {
        let name = self.column.name.as_str();
        let selection = [self.column.name.clone()];
        let data_id = session.data_id.as_str();

        let transition = match action {
            // The active sort button is disabled
            MenuAction::Sort(order) if order == self.current_sort => ColumnTransition::noop(),
            MenuAction::Sort(order) => column_ops::update_sort(&selection, order, &session.sort_info),
            MenuAction::Move(MoveAction::ToFront) => {
                column_ops::move_to(name, &session.columns, data_id, MoveEdge::Front)
            }
            MenuAction::Move(MoveAction::ToBack) => {
                column_ops::move_to(name, &session.columns, data_id, MoveEdge::Back)
            }
            MenuAction::Move(MoveAction::Left) => {
                column_ops::move_one_position(name, &session.columns, data_id, MoveDirection::Left)
            }
            MenuAction::Move(MoveAction::Right) => {
                column_ops::move_one_position(name, &session.columns, data_id, MoveDirection::Right)
            }
            MenuAction::Lock => column_ops::lock_cols(&selection, &session.columns, data_id),
            MenuAction::Unlock => column_ops::unlock_cols(&selection, &session.columns, data_id),
            MenuAction::Formats => ColumnTransition {
                change: self.formatting_change(),
                notification: None,
            },
            MenuAction::Popup(_) => return None,
        };
        Some(transition)
    }

    /// Run a state-changing action against `session`. Returns false for popup actions.
    pub fn invoke(
        &self,
        action: MenuAction,
        session: &mut ViewerSession,
        notifier: &Arc<dyn Notifier>,
    ) -> bool {
        debug!(target: "column_menu", "{}: {:?}", self.header(), action);
        match self.transition(action, session) {
            Some(transition) => {
                transition.commit(session, notifier);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::notifier::RecordingNotifier;
    use crate::data::{SortDirection, SortEntry};

    fn session() -> ViewerSession {
        let columns = ColumnSet::new(vec![
            Column::new("id").with_dtype("int64").with_locked(true),
            Column::new("name").with_dtype("object"),
            Column::new("price").with_dtype("float64"),
        ])
        .unwrap();
        ViewerSession::new("9", columns).with_sort(SortSpec::from_entries(vec![SortEntry::new(
            "price",
            SortDirection::Desc,
        )]))
    }

    #[test]
    fn test_no_selection_no_menu() {
        let s = session();
        assert!(ColumnMenu::for_column(None, &s.columns, &s.sort_info).is_none());
        assert!(ColumnMenu::for_column(Some("missing"), &s.columns, &s.sort_info).is_none());
    }

    #[test]
    fn test_current_sort_defaults_to_none() {
        let s = session();
        let menu = ColumnMenu::for_column(Some("name"), &s.columns, &s.sort_info).unwrap();
        assert_eq!(menu.current_sort(), SortOrder::None);

        let menu = ColumnMenu::for_column(Some("price"), &s.columns, &s.sort_info).unwrap();
        assert_eq!(menu.current_sort(), SortOrder::Descending);
        let active: Vec<SortOrder> = menu
            .sort_buttons()
            .into_iter()
            .filter(|b| b.active)
            .map(|b| b.order)
            .collect();
        assert_eq!(active, vec![SortOrder::Descending]);
    }

    #[test]
    fn test_lock_or_unlock_offered() {
        let s = session();
        let locked = ColumnMenu::for_column(Some("id"), &s.columns, &s.sort_info).unwrap();
        assert!(locked.actions().contains(&MenuAction::Unlock));
        assert!(!locked.actions().contains(&MenuAction::Lock));

        let unlocked = ColumnMenu::for_column(Some("name"), &s.columns, &s.sort_info).unwrap();
        assert!(unlocked.actions().contains(&MenuAction::Lock));
    }

    #[test]
    fn test_histogram_hidden_for_strings() {
        let s = session();
        let name = ColumnMenu::for_column(Some("name"), &s.columns, &s.sort_info).unwrap();
        assert_eq!(name.popups(), vec![PopupKind::Describe]);

        let price = ColumnMenu::for_column(Some("price"), &s.columns, &s.sort_info).unwrap();
        assert_eq!(price.popups(), vec![PopupKind::Describe, PopupKind::Histogram]);
    }

    #[test]
    fn test_open_popup_detached_when_embedded() {
        let s = session();
        let menu = ColumnMenu::for_column(Some("price"), &s.columns, &s.sort_info).unwrap();
        let target = menu
            .open_popup(
                PopupKind::Describe,
                "9",
                "dtale",
                PresentationContext::Embedded,
                &PopupConfig::default(),
            )
            .unwrap();

        match target {
            PopupTarget::Detached(window) => {
                assert_eq!(window.url, "/dtale/popup/describe/9?col=price");
                assert_eq!((window.width, window.height), (1100, 670));
            }
            other => panic!("expected detached popup, got {:?}", other),
        }
    }

    #[test]
    fn test_open_popup_inline_when_room() {
        let s = session();
        let menu = ColumnMenu::for_column(Some("price"), &s.columns, &s.sort_info).unwrap();
        let context = PresentationContext::TopLevel {
            viewport_width: 1920,
            viewport_height: 1080,
        };
        let target = menu
            .open_popup(PopupKind::Histogram, "9", "dtale", context, &PopupConfig::default())
            .unwrap();

        assert_eq!(
            target,
            PopupTarget::Inline(ChartRequest {
                kind: "histogram".to_string(),
                title: "Histogram".to_string(),
                col: "price".to_string(),
            })
        );
    }

    #[test]
    fn test_invoke_routes_into_engine() {
        let mut s = session();
        let recorder = Arc::new(RecordingNotifier::new());
        let notifier: Arc<dyn Notifier> = recorder.clone();

        let menu = ColumnMenu::for_column(Some("price"), &s.columns, &s.sort_info).unwrap();
        assert!(menu.invoke(MenuAction::Lock, &mut s, &notifier));
        assert_eq!(s.columns.names(), vec!["id", "price", "name"]);
        assert_eq!(s.fixed_column_count, 2);
        assert_eq!(recorder.count(), 1);

        assert!(!menu.invoke(MenuAction::Popup(PopupKind::Describe), &mut s, &notifier));
    }

    #[test]
    fn test_active_sort_button_does_nothing() {
        let mut s = session();
        let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::new());
        let menu = ColumnMenu::for_column(Some("price"), &s.columns, &s.sort_info).unwrap();

        menu.invoke(MenuAction::Sort(SortOrder::Descending), &mut s, &notifier);
        assert_eq!(s.history().count(), 0);

        menu.invoke(MenuAction::Sort(SortOrder::None), &mut s, &notifier);
        assert!(s.sort_info.is_empty());
    }

    #[test]
    fn test_formats_selects_column() {
        let mut s = session();
        let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::new());
        let menu = ColumnMenu::for_column(Some("name"), &s.columns, &s.sort_info).unwrap();

        menu.invoke(MenuAction::Formats, &mut s, &notifier);
        assert!(s.formatting_open);
        assert_eq!(s.selected_cols, vec!["name"]);
    }
}
