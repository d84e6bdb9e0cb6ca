//! Session state and its propagation contract
//!
//! The column engine never mutates state directly. It produces a
//! `StateChange` and hands it to a `StatePropagator`, which merges it
//! and then runs the follow-up callback.

pub mod coordinator;
pub mod events;
pub mod session;

pub use coordinator::{Callback, StatePropagator};
pub use events::StateChange;
pub use session::ViewerSession;
