//! Capabilities the embedding page supplies to the builder.
//!
//! Everything here runs on a single-threaded event loop (the browser main
//! thread, or a current-thread runtime in tests), so the async traits are
//! declared `?Send`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Block, PageData, SaveRequest, SaveState};

use crate::config::ScreenshotSize;
use crate::error::{HostError, ScreenshotError};

/// Persistence callbacks owned by the host application
#[async_trait(?Send)]
pub trait SaveHost {
    async fn on_save(&self, request: SaveRequest) -> Result<(), HostError>;

    fn on_save_state_change(&self, _state: SaveState) {}

    /// Stores an uploaded asset and returns its public URL.
    async fn on_image_upload(&self, file: ImageUpload) -> Result<String, HostError>;
}

/// Read access to the editor's live state
pub trait EditorContext {
    fn page_data(&self) -> PageData;

    fn theme(&self) -> serde_json::Value;

    fn has_permission(&self, capability: &str) -> bool;

    fn is_page_loaded(&self) -> bool;

    fn selected_language(&self) -> Option<String>;

    fn fallback_language(&self) -> Option<String>;
}

/// Projects blocks to HTML for the active theme
#[async_trait(?Send)]
pub trait HtmlRenderer {
    /// Outer HTML of each top-level element of the rendered page.
    async fn render(
        &self,
        blocks: &[Block],
        theme: &serde_json::Value,
    ) -> Result<Vec<String>, HostError>;
}

/// Rasterizes the live preview canvas
#[async_trait(?Send)]
pub trait PreviewRasterizer {
    async fn rasterize(&self, size: ScreenshotSize) -> Result<Raster, ScreenshotError>;
}

#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// RGBA8 pixels, row-major, no padding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// File picked by the user for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}
