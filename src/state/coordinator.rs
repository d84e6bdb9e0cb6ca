//! State propagation contract between the column engine and its host

use crate::state::events::StateChange;

/// Work to run once a change has been merged into session state
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Anything that owns viewer state and can merge partial changes into it.
///
/// `propagate` must apply `change` first and only then invoke `callback`,
/// so the callback always observes the committed state.
pub trait StatePropagator {
    fn propagate(&mut self, change: StateChange, callback: Option<Callback>);
}

impl<F> StatePropagator for F
where
    F: FnMut(StateChange, Option<Callback>),
{
    fn propagate(&mut self, change: StateChange, callback: Option<Callback>) {
        self(change, callback)
    }
}
