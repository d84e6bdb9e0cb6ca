pub mod api;
pub mod column_menu;
pub mod column_ops;
pub mod config;
pub mod data;
pub mod popup;
pub mod state;
pub mod styling;
pub mod utils;
