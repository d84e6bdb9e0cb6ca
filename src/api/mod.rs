//! Backend communication

pub mod notifier;

pub use notifier::{
    HttpNotifier, LoggingNotifier, Notification, Notifier, RecordingNotifier, Route,
};
