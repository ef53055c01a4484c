//! Page builder core
//!
//! Platform-agnostic logic behind the builder UI:
//! - `orchestrator` – throttled and immediate page saves
//! - `dialog` – add-block dialog state and typed commands
//! - `translations` – missing-translation detection
//! - `screenshot` – preview capture encoded as PNG data URLs
//!
//! Host capabilities are injected through the traits in `host`.

pub mod config;
pub mod dialog;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod registry;
pub mod screenshot;
pub mod state;
pub mod throttle;
pub mod translations;

pub use config::{SaveConfig, ScreenshotSize};
pub use dialog::{AddBlockDialogState, BuilderCommand, InsertPosition, InsertionPoint, ParentRef};
pub use error::{CommandError, HostError, RegistryError, SaveError, ScreenshotError, UploadError};
pub use host::{
    EditorContext, HtmlRenderer, ImageUpload, PreviewRasterizer, Raster, SaveHost, Timer,
};
pub use orchestrator::{Collaborators, SaveOrchestrator, SaveOutcome, SkipReason};
pub use registry::{BlockRegistry, StaticBlockRegistry};
pub use state::SaveStateCell;
pub use translations::MissingTranslation;
