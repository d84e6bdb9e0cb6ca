//! Column reorder, lock and sort transitions.
//!
//! Every operation takes a snapshot of the current columns (or sort spec) and
//! returns a [`ColumnTransition`]: the state change to merge plus the backend
//! notification to send once the change is applied. Nothing here mutates the
//! caller's state.
//!
//! Two boundary definitions are in play and must stay distinct:
//! single-step moves index within the unlocked suffix only, while edge moves
//! rebuild the whole sequence relative to the full locked prefix.

use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::notifier::{Notification, Notifier};
use crate::data::{Column, ColumnSet, SortOrder, SortSpec};
use crate::state::{Callback, StateChange, StatePropagator};

/// Single-step move direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

impl MoveDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
        }
    }
}

impl FromStr for MoveDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(MoveDirection::Left),
            "right" => Ok(MoveDirection::Right),
            other => Err(anyhow!("Unknown move direction '{}'", other)),
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Edge for move-to operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveEdge {
    #[default]
    Front,
    Back,
}

impl MoveEdge {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveEdge::Front => "front",
            MoveEdge::Back => "back",
        }
    }
}

/// Anything other than "back" means front
impl From<&str> for MoveEdge {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("back") {
            MoveEdge::Back
        } else {
            MoveEdge::Front
        }
    }
}

impl fmt::Display for MoveEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a column operation: the change to merge and the follow-up notification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnTransition {
    pub change: StateChange,
    pub notification: Option<Notification>,
}

impl ColumnTransition {
    pub fn noop() -> Self {
        Self::default()
    }

    fn with_notification(change: StateChange, notification: Notification) -> Self {
        Self {
            change,
            notification: Some(notification),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.change.is_empty() && self.notification.is_none()
    }

    /// Hand the change to `propagator`; once merged, fire the notification.
    ///
    /// No-op transitions touch neither the state nor the backend.
    pub fn commit<P>(self, propagator: &mut P, notifier: &Arc<dyn Notifier>)
    where
        P: StatePropagator + ?Sized,
    {
        if self.is_noop() {
            debug!(target: "column_ops", "Skipping no-op transition");
            return;
        }

        let callback = self.notification.map(|notification| {
            let notifier = Arc::clone(notifier);
            Box::new(move || notifier.dispatch(notification)) as Callback
        });
        propagator.propagate(self.change, callback);
    }
}

/// Re-sort the selected columns. Sorting is session-local; no backend call is made.
pub fn update_sort(selected: &[String], order: SortOrder, sort_info: &SortSpec) -> ColumnTransition {
    let updated = sort_info.updated(selected, order);
    info!(
        target: "column_ops",
        "Sort {:?} -> {}: [{}] => [{}]",
        selected,
        order.as_str(),
        sort_info,
        updated
    );
    ColumnTransition {
        change: StateChange::sort(updated),
        notification: None,
    }
}

/// Swap an unlocked column with its neighbour inside the unlocked suffix
pub fn move_one_position(
    selected: &str,
    columns: &ColumnSet,
    data_id: &str,
    direction: MoveDirection,
) -> ColumnTransition {
    let (locked, mut unlocked) = columns.partition();

    let Some(index) = unlocked.iter().position(|c| c.name == selected) else {
        debug!(target: "column_ops", "'{}' is not an unlocked column, nothing to move", selected);
        return ColumnTransition::noop();
    };

    let neighbour = match direction {
        MoveDirection::Left => index.checked_sub(1),
        MoveDirection::Right => Some(index + 1).filter(|&n| n < unlocked.len()),
    };
    let Some(neighbour) = neighbour else {
        debug!(
            target: "column_ops",
            "'{}' already at the {} edge of the unlocked columns",
            selected,
            direction
        );
        return ColumnTransition::noop();
    };

    unlocked.swap(index, neighbour);
    info!(target: "column_ops", "Moved '{}' {}", selected, direction);

    ColumnTransition::with_notification(
        StateChange::columns(ColumnSet::from_parts(locked, unlocked)),
        Notification::column_position(data_id, selected, direction.as_str()),
    )
}

/// Move an unlocked column to the front or back of the unlocked columns
pub fn move_to(selected: &str, columns: &ColumnSet, data_id: &str, edge: MoveEdge) -> ColumnTransition {
    let (locked, unlocked) = columns.partition();
    let (moved, rest): (Vec<Column>, Vec<Column>) =
        unlocked.into_iter().partition(|c| c.name == selected);

    if moved.is_empty() {
        debug!(target: "column_ops", "'{}' is not an unlocked column, nothing to move", selected);
        return ColumnTransition::noop();
    }

    let suffix: Vec<Column> = match edge {
        MoveEdge::Front => moved.into_iter().chain(rest).collect(),
        MoveEdge::Back => rest.into_iter().chain(moved).collect(),
    };
    info!(target: "column_ops", "Moved '{}' to {}", selected, edge);

    ColumnTransition::with_notification(
        StateChange::columns(ColumnSet::from_parts(locked, suffix)),
        Notification::column_position(data_id, selected, edge.as_str()),
    )
}

pub fn move_to_front(selected: &str, columns: &ColumnSet, data_id: &str) -> ColumnTransition {
    move_to(selected, columns, data_id, MoveEdge::Front)
}

pub fn move_to_back(selected: &str, columns: &ColumnSet, data_id: &str) -> ColumnTransition {
    move_to(selected, columns, data_id, MoveEdge::Back)
}

pub fn move_left(selected: &str, columns: &ColumnSet, data_id: &str) -> ColumnTransition {
    move_one_position(selected, columns, data_id, MoveDirection::Left)
}

pub fn move_right(selected: &str, columns: &ColumnSet, data_id: &str) -> ColumnTransition {
    move_one_position(selected, columns, data_id, MoveDirection::Right)
}

/// Pin the selected unlocked columns to the end of the locked prefix, in selection order
pub fn lock_cols(selected: &[String], columns: &ColumnSet, data_id: &str) -> ColumnTransition {
    let (mut locked, unlocked) = columns.partition();

    let mut newly_locked: Vec<Column> = Vec::new();
    for name in selected {
        if newly_locked.iter().any(|c| &c.name == name) {
            continue;
        }
        if let Some(column) = unlocked.iter().find(|c| &c.name == name) {
            newly_locked.push(column.clone().with_locked(true));
        }
    }

    let Some(first) = newly_locked.first().map(|c| c.name.clone()) else {
        debug!(target: "column_ops", "No unlocked columns in selection {:?}", selected);
        return ColumnTransition::noop();
    };

    let remaining: Vec<Column> = unlocked
        .into_iter()
        .filter(|c| !newly_locked.iter().any(|n| n.name == c.name))
        .collect();
    locked.extend(newly_locked);
    let fixed_column_count = locked.len();

    info!(
        target: "column_ops",
        "Locked {:?}, {} columns now fixed",
        selected,
        fixed_column_count
    );

    ColumnTransition::with_notification(
        StateChange::locking(ColumnSet::from_parts(locked, remaining), fixed_column_count),
        Notification::locked(data_id, &first, "lock"),
    )
}

/// Release the selected locked columns to the head of the unlocked suffix
pub fn unlock_cols(selected: &[String], columns: &ColumnSet, data_id: &str) -> ColumnTransition {
    let (locked, unlocked) = columns.partition();
    let (released, kept): (Vec<Column>, Vec<Column>) =
        locked.into_iter().partition(|c| selected.contains(&c.name));

    let Some(first) = selected
        .iter()
        .find(|name| released.iter().any(|c| c.name == **name))
        .cloned()
    else {
        debug!(target: "column_ops", "No locked columns in selection {:?}", selected);
        return ColumnTransition::noop();
    };

    let fixed_column_count = kept.len();
    let suffix: Vec<Column> = released
        .into_iter()
        .map(|c| c.with_locked(false))
        .chain(unlocked)
        .collect();

    info!(
        target: "column_ops",
        "Unlocked {:?}, {} columns now fixed",
        selected,
        fixed_column_count
    );

    ColumnTransition::with_notification(
        StateChange::locking(ColumnSet::from_parts(kept, suffix), fixed_column_count),
        Notification::locked(data_id, &first, "unlock"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(transition: &ColumnTransition) -> Vec<String> {
        transition
            .change
            .columns
            .as_ref()
            .map(|c| c.names().iter().map(|n| n.to_string()).collect())
            .unwrap_or_default()
    }

    fn sample() -> ColumnSet {
        ColumnSet::new(vec![
            Column::new("A").with_locked(true),
            Column::new("B"),
            Column::new("C"),
            Column::new("D"),
        ])
        .unwrap()
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("Right".parse::<MoveDirection>().unwrap(), MoveDirection::Right);
        assert!("up".parse::<MoveDirection>().is_err());
        assert_eq!(MoveEdge::from("back"), MoveEdge::Back);
        assert_eq!(MoveEdge::from("middle"), MoveEdge::Front);
    }

    #[test]
    fn test_move_right_swaps_within_unlocked() {
        let t = move_right("B", &sample(), "1");
        assert_eq!(names(&t), vec!["A", "C", "B", "D"]);
        assert!(t.change.trigger_resize);
        let n = t.notification.unwrap();
        assert_eq!(n.param("col"), Some("B"));
        assert_eq!(n.param("action"), Some("right"));
    }

    #[test]
    fn test_locked_column_never_moves_one_position() {
        assert!(move_left("A", &sample(), "1").is_noop());
        assert!(move_right("A", &sample(), "1").is_noop());
    }

    #[test]
    fn test_unknown_column_is_noop() {
        assert!(move_right("Z", &sample(), "1").is_noop());
        assert!(move_to_front("Z", &sample(), "1").is_noop());
        assert!(lock_cols(&["Z".to_string()], &sample(), "1").is_noop());
        assert!(unlock_cols(&["B".to_string()], &sample(), "1").is_noop());
    }

    #[test]
    fn test_move_to_back() {
        let t = move_to_back("B", &sample(), "1");
        assert_eq!(names(&t), vec!["A", "C", "D", "B"]);
        assert_eq!(t.notification.unwrap().param("action"), Some("back"));
    }

    #[test]
    fn test_lock_clears_selection() {
        let t = lock_cols(&["C".to_string()], &sample(), "1");
        assert_eq!(names(&t), vec!["A", "C", "B", "D"]);
        assert_eq!(t.change.fixed_column_count, Some(2));
        assert_eq!(t.change.selected_cols, Some(Vec::new()));
    }

    #[test]
    fn test_unlock_places_after_remaining_prefix() {
        let columns = ColumnSet::new(vec![
            Column::new("A").with_locked(true),
            Column::new("B").with_locked(true),
            Column::new("C").with_locked(true),
            Column::new("D"),
        ])
        .unwrap();

        let t = unlock_cols(&["C".to_string(), "A".to_string()], &columns, "1");
        let result = t.change.columns.clone().unwrap();
        assert_eq!(result.names(), vec!["B", "A", "C", "D"]);
        assert_eq!(result.locked_count(), 1);
        assert_eq!(t.change.fixed_column_count, Some(1));
        assert_eq!(t.notification.unwrap().param("col"), Some("C"));
    }
}
