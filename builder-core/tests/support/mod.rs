//! Recording fakes for the host traits.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use builder_core::{
    BlockRegistry, Collaborators, EditorContext, HostError, HtmlRenderer, ImageUpload,
    PreviewRasterizer, Raster, SaveConfig, SaveHost, SaveOrchestrator, ScreenshotError,
    ScreenshotSize, StaticBlockRegistry, Timer,
};
use serde_json::json;
use shared_types::{Block, BlockDefinition, PageData, SaveRequest, SaveState};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("builder_core=debug")
        .with_test_writer()
        .try_init();
}

pub struct TokioTimer;

#[async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Default)]
pub struct RecordingHost {
    pub saves: RefCell<Vec<SaveRequest>>,
    pub states: RefCell<Vec<SaveState>>,
    pub uploads: RefCell<Vec<ImageUpload>>,
    pub fail_save: Cell<bool>,
    pub fail_upload: Cell<bool>,
    pub save_latency: Cell<Duration>,
}

#[async_trait(?Send)]
impl SaveHost for RecordingHost {
    async fn on_save(&self, request: SaveRequest) -> Result<(), HostError> {
        let latency = self.save_latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.fail_save.get() {
            return Err(HostError::new("storage unavailable"));
        }
        self.saves.borrow_mut().push(request);
        Ok(())
    }

    fn on_save_state_change(&self, state: SaveState) {
        self.states.borrow_mut().push(state);
    }

    async fn on_image_upload(&self, file: ImageUpload) -> Result<String, HostError> {
        if self.fail_upload.get() {
            return Err(HostError::new("quota exceeded"));
        }
        let url = format!("https://cdn.example.com/{}", file.name);
        self.uploads.borrow_mut().push(file);
        Ok(url)
    }
}

pub struct FakeEditor {
    pub page: RefCell<PageData>,
    pub permissions: RefCell<Vec<String>>,
    pub loaded: Cell<bool>,
    pub selected_language: RefCell<Option<String>>,
    pub fallback_language: RefCell<Option<String>>,
}

impl Default for FakeEditor {
    fn default() -> Self {
        Self {
            page: RefCell::new(PageData {
                blocks: vec![
                    Block::new("hero", "Heading").with_prop("title", json!("Welcome")),
                    Block::new("body", "Paragraph")
                        .with_parent("hero")
                        .with_prop("content", json!("Hello")),
                ],
            }),
            permissions: RefCell::new(vec!["save_page".to_string()]),
            loaded: Cell::new(true),
            selected_language: RefCell::new(None),
            fallback_language: RefCell::new(Some("en".to_string())),
        }
    }
}

impl FakeEditor {
    pub fn set_languages(&self, selected: Option<&str>, fallback: Option<&str>) {
        *self.selected_language.borrow_mut() = selected.map(str::to_string);
        *self.fallback_language.borrow_mut() = fallback.map(str::to_string);
    }

    pub fn revoke(&self, capability: &str) {
        self.permissions.borrow_mut().retain(|c| c != capability);
    }
}

impl EditorContext for FakeEditor {
    fn page_data(&self) -> PageData {
        self.page.borrow().clone()
    }

    fn theme(&self) -> serde_json::Value {
        json!({"fontFamily": {"heading": "Inter"}, "colors": {"primary": "#2563eb"}})
    }

    fn has_permission(&self, capability: &str) -> bool {
        self.permissions.borrow().iter().any(|c| c == capability)
    }

    fn is_page_loaded(&self) -> bool {
        self.loaded.get()
    }

    fn selected_language(&self) -> Option<String> {
        self.selected_language.borrow().clone()
    }

    fn fallback_language(&self) -> Option<String> {
        self.fallback_language.borrow().clone()
    }
}

#[derive(Default)]
pub struct FakeRenderer {
    pub fail: Cell<bool>,
    pub calls: Cell<usize>,
}

#[async_trait(?Send)]
impl HtmlRenderer for FakeRenderer {
    async fn render(
        &self,
        blocks: &[Block],
        _theme: &serde_json::Value,
    ) -> Result<Vec<String>, HostError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(HostError::new("unknown block type"));
        }
        Ok(blocks
            .iter()
            .filter(|b| b.parent.is_none())
            .map(|b| format!("<section data-block-id=\"{}\"></section>", b.id))
            .collect())
    }
}

pub enum FakePreview {
    Solid,
    Detached,
    Broken,
}

#[async_trait(?Send)]
impl PreviewRasterizer for FakePreview {
    async fn rasterize(&self, size: ScreenshotSize) -> Result<Raster, ScreenshotError> {
        match self {
            FakePreview::Solid => Ok(Raster {
                width: size.width,
                height: size.height,
                rgba: vec![255; (size.width * size.height * 4) as usize],
            }),
            FakePreview::Detached => Err(ScreenshotError::NoRenderableBody),
            FakePreview::Broken => Err(ScreenshotError::Rasterize("tainted canvas".to_string())),
        }
    }
}

pub fn registry() -> StaticBlockRegistry {
    StaticBlockRegistry::new()
        .with(BlockDefinition::new("Heading").with_i18n_props(["title"]))
        .with(BlockDefinition::new("Paragraph").with_i18n_props(["content"]))
}

pub struct Harness {
    pub host: Rc<RecordingHost>,
    pub editor: Rc<FakeEditor>,
    pub renderer: Rc<FakeRenderer>,
    pub orchestrator: SaveOrchestrator,
}

pub fn test_config() -> SaveConfig {
    SaveConfig {
        screenshot_size: ScreenshotSize::new(4, 3),
        ..SaveConfig::default()
    }
}

pub fn harness() -> Harness {
    init_tracing();

    let host = Rc::new(RecordingHost::default());
    let editor = Rc::new(FakeEditor::default());
    let renderer = Rc::new(FakeRenderer::default());
    let registry: Rc<dyn BlockRegistry> = Rc::new(registry());

    let orchestrator = SaveOrchestrator::new(
        test_config(),
        Collaborators {
            host: host.clone(),
            editor: editor.clone(),
            registry,
            renderer: renderer.clone(),
            timer: Rc::new(TokioTimer),
        },
    );

    Harness {
        host,
        editor,
        renderer,
        orchestrator,
    }
}
