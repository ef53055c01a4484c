use thiserror::Error;

/// Failure reported by a host callback (save, upload, render).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("failed to render page html: {0}")]
    Render(#[source] HostError),

    #[error("host save callback failed: {0}")]
    Persist(#[source] HostError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("image upload failed: {0}")]
pub struct UploadError(#[source] pub HostError);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenshotError {
    #[error("no preview frame is attached")]
    NoPreviewFrame,

    #[error("preview frame has no renderable body")]
    NoRenderableBody,

    #[error("rasterizer failed: {0}")]
    Rasterize(String),

    #[error("raster buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    InvalidRaster {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("png encoding failed: {0}")]
    Encode(String),
}

impl ScreenshotError {
    /// True when there was simply nothing to capture, as opposed to a
    /// capture that was attempted and broke.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NoPreviewFrame | Self::NoRenderableBody)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to look up block type '{block_type}': {reason}")]
pub struct RegistryError {
    pub block_type: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown builder event '{0}'")]
    UnknownEvent(String),

    #[error("invalid payload for '{event}': {reason}")]
    InvalidPayload { event: String, reason: String },
}
