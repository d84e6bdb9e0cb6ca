//! Detached popup window decisions.
//!
//! The viewer either shows secondary views inline or opens them in a
//! separate, fixed-size window. This module only decides which, and
//! describes the window; opening it is up to the host.

use anyhow::{Context, Result};
use reqwest::Url;

use crate::config::config::PopupConfig;

/// Where the viewer is currently being presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationContext {
    /// Top-level window with the given viewport size in pixels
    TopLevel {
        viewport_width: u32,
        viewport_height: u32,
    },
    /// Inside a frame of some other page
    Embedded,
}

/// Should a view of `width` x `height` open in a detached window?
///
/// Embedded viewers always detach. Top-level viewers only detach when the
/// viewport cannot fit the requested size.
pub fn should_open_popup(height: u32, width: u32, context: PresentationContext) -> bool {
    match context {
        PresentationContext::TopLevel {
            viewport_width,
            viewport_height,
        } => viewport_width < width || viewport_height < height,
        PresentationContext::Embedded => true,
    }
}

/// Append `/<data_id>` to `path` when a data id is given
pub fn full_path(path: &str, data_id: Option<&str>) -> String {
    match data_id {
        Some(id) if !id.is_empty() => format!("{}/{}", path.trim_end_matches('/'), id),
        _ => path.to_string(),
    }
}

/// A detached window: target URL, exact size and offset from the invoking control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupWindow {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl PopupWindow {
    /// Window for a relative `path` with URL-encoded `query` parameters
    pub fn new(path: &str, query: &[(&str, &str)], width: u32, height: u32) -> Result<Self> {
        let base = Url::parse("http://localhost/")?;
        let mut url = base
            .join(path)
            .with_context(|| format!("Invalid popup path '{}'", path))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let url = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };

        Ok(Self {
            url,
            width,
            height,
            offset_x: 0,
            offset_y: 0,
        })
    }

    /// Window sized from config defaults
    pub fn with_defaults(path: &str, query: &[(&str, &str)], config: &PopupConfig) -> Result<Self> {
        Ok(Self::new(path, query, config.width, config.height)?
            .with_offset(config.offset_x, config.offset_y))
    }

    pub fn with_offset(mut self, x: i32, y: i32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Window chrome flags: title bar, address bar and status bar visible, fixed size
    pub fn features(&self) -> String {
        format!(
            "titlebar=1,location=1,status=1,width={},height={}",
            self.width, self.height
        )
    }
}
