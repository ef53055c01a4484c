//! Save pipeline: snapshot the page, project it to HTML, screenshot the
//! preview, check translations, and hand the bundle to the host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shared_types::{Block, SaveRequest, SaveState};
use tokio::sync::watch;

use crate::config::SaveConfig;
use crate::error::{SaveError, ScreenshotError, UploadError};
use crate::host::{EditorContext, HtmlRenderer, ImageUpload, PreviewRasterizer, SaveHost, Timer};
use crate::registry::BlockRegistry;
use crate::screenshot;
use crate::state::SaveStateCell;
use crate::throttle::{Throttled, TrailingThrottle};
use crate::translations::{self, MissingTranslation};

/// Host-provided services the orchestrator depends on
#[derive(Clone)]
pub struct Collaborators {
    pub host: Rc<dyn SaveHost>,
    pub editor: Rc<dyn EditorContext>,
    pub registry: Rc<dyn BlockRegistry>,
    pub renderer: Rc<dyn HtmlRenderer>,
    pub timer: Rc<dyn Timer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoPermission,
    PageNotLoaded,
    SaveInFlight,
    ShutDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Folded into a throttled save that another caller is waiting on
    Coalesced,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy)]
enum SaveMode {
    Throttled { auto_save: bool },
    Immediate,
}

pub struct SaveOrchestrator {
    config: SaveConfig,
    host: Rc<dyn SaveHost>,
    editor: Rc<dyn EditorContext>,
    registry: Rc<dyn BlockRegistry>,
    renderer: Rc<dyn HtmlRenderer>,
    timer: Rc<dyn Timer>,
    preview: RefCell<Option<Rc<dyn PreviewRasterizer>>>,
    state: SaveStateCell,
    throttle: TrailingThrottle<bool>,
    alive: Cell<bool>,
}

impl SaveOrchestrator {
    pub fn new(config: SaveConfig, deps: Collaborators) -> Self {
        let throttle = TrailingThrottle::new(config.throttle_window);
        Self {
            config,
            host: deps.host,
            editor: deps.editor,
            registry: deps.registry,
            renderer: deps.renderer,
            timer: deps.timer,
            preview: RefCell::new(None),
            state: SaveStateCell::default(),
            throttle,
            alive: Cell::new(true),
        }
    }

    pub fn state(&self) -> SaveState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.state.subscribe()
    }

    /// Called by the host whenever the page is edited.
    pub fn mark_unsaved(&self) {
        if self.state.mark_unsaved() {
            self.notify(SaveState::Unsaved);
        }
    }

    pub fn attach_preview(&self, preview: Rc<dyn PreviewRasterizer>) {
        self.preview.replace(Some(preview));
    }

    pub fn detach_preview(&self) {
        self.preview.replace(None);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Stops further saves and host notifications. Saves already past the
    /// host callback still settle the internal state.
    pub fn shutdown(&self) {
        if self.alive.replace(false) {
            tracing::debug!("Save orchestrator shut down");
            self.throttle.cancel();
        }
    }

    /// Throttled save. A burst of calls inside the throttle window runs once,
    /// at the end of the window, with the `auto_save` flag of the last call.
    pub async fn save(&self, auto_save: bool) -> Result<SaveOutcome, SaveError> {
        if !self.is_alive() {
            return Ok(SaveOutcome::Skipped(SkipReason::ShutDown));
        }

        let throttled = self.throttle.call(self.timer.as_ref(), auto_save).await;
        if !self.is_alive() {
            return Ok(SaveOutcome::Skipped(SkipReason::ShutDown));
        }

        match throttled {
            Throttled::Run(auto_save) => self.run(SaveMode::Throttled { auto_save }).await,
            Throttled::Coalesced => {
                tracing::debug!(auto_save, "Save coalesced into pending throttled save");
                Ok(SaveOutcome::Coalesced)
            }
        }
    }

    /// Immediate auto-save, gated on the save permission and page readiness.
    pub async fn save_async(&self) -> Result<SaveOutcome, SaveError> {
        if !self.editor.has_permission(&self.config.save_permission) {
            tracing::debug!(
                permission = %self.config.save_permission,
                "Skipping save: permission missing"
            );
            return Ok(SaveOutcome::Skipped(SkipReason::NoPermission));
        }
        if !self.editor.is_page_loaded() {
            tracing::debug!("Skipping save: page not loaded");
            return Ok(SaveOutcome::Skipped(SkipReason::PageNotLoaded));
        }

        self.run(SaveMode::Immediate).await
    }

    pub fn need_translations(&self) -> bool {
        self.need_translations_for(&self.editor.page_data().blocks)
    }

    pub fn missing_translations(&self) -> Vec<MissingTranslation> {
        let selected = self.editor.selected_language();
        let fallback = self.editor.fallback_language();
        match translations::language_to_check(selected.as_deref(), fallback.as_deref()) {
            Some(lang) => translations::missing_translations(
                &self.editor.page_data().blocks,
                lang,
                self.registry.as_ref(),
            ),
            None => Vec::new(),
        }
    }

    pub async fn upload_image(&self, file: ImageUpload) -> Result<String, UploadError> {
        let name = file.name.clone();
        let url = self.host.on_image_upload(file).await.map_err(UploadError)?;
        tracing::info!(file = %name, url = %url, "Image uploaded");
        Ok(url)
    }

    /// Captures the attached preview without degrading errors.
    pub async fn screenshot(&self) -> Result<String, ScreenshotError> {
        let preview = self.preview.borrow().clone();
        screenshot::capture_screenshot(preview.as_deref(), self.config.screenshot_size).await
    }

    async fn run(&self, mode: SaveMode) -> Result<SaveOutcome, SaveError> {
        if !self.is_alive() {
            return Ok(SaveOutcome::Skipped(SkipReason::ShutDown));
        }
        if !self.state.try_begin() {
            tracing::debug!(?mode, "Save already in flight; rejecting");
            return Ok(SaveOutcome::Skipped(SkipReason::SaveInFlight));
        }
        self.notify(SaveState::Saving);

        let page = self.editor.page_data();
        let theme = self.editor.theme();

        let (auto_save, dom_elements) = match mode {
            SaveMode::Throttled { auto_save } => {
                match self.renderer.render(&page.blocks, &theme).await {
                    Ok(elements) => (auto_save, Some(elements)),
                    Err(e) => return Err(self.fail(SaveError::Render(e))),
                }
            }
            SaveMode::Immediate => (true, None),
        };

        let screenshot = match self.screenshot().await {
            Ok(url) => Some(url),
            Err(e) if e.is_unavailable() => {
                tracing::debug!(reason = %e, "Saving without screenshot");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to capture canvas screenshot");
                None
            }
        };

        let need_translations = self.need_translations_for(&page.blocks);
        let block_count = page.blocks.len();
        let request = SaveRequest {
            auto_save,
            blocks: page.blocks,
            theme,
            need_translations,
            dom_elements,
            screenshot,
        };

        if let Err(e) = self.host.on_save(request).await {
            return Err(self.fail(SaveError::Persist(e)));
        }

        self.timer.sleep(self.config.settle_delay).await;
        let settled = self.state.settle();
        if settled == SaveState::Unsaved {
            tracing::debug!("Page edited while saving; left unsaved");
        }
        if self.is_alive() {
            self.notify(settled);
        } else {
            tracing::debug!("Save settled after shutdown; host not notified");
        }

        tracing::info!(auto_save, block_count, need_translations, "Page saved");
        Ok(SaveOutcome::Saved)
    }

    fn need_translations_for(&self, blocks: &[Block]) -> bool {
        let selected = self.editor.selected_language();
        let fallback = self.editor.fallback_language();
        translations::language_to_check(selected.as_deref(), fallback.as_deref())
            .map(|lang| translations::has_missing_translations(blocks, lang, self.registry.as_ref()))
            .unwrap_or(false)
    }

    fn fail(&self, error: SaveError) -> SaveError {
        tracing::warn!(error = %error, "Page save failed");
        self.state.finish(SaveState::Unsaved);
        if self.is_alive() {
            self.notify(SaveState::Unsaved);
        }
        error
    }

    fn notify(&self, state: SaveState) {
        self.host.on_save_state_change(state);
    }
}
