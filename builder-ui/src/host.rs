//! Browser-side implementations of the builder host traits.

use async_trait::async_trait;
use base64::Engine as _;
use builder_core::{EditorContext, HostError, ImageUpload, SaveConfig, SaveHost};
use dioxus::prelude::*;
use dioxus_logger::tracing::{debug, info, warn};
use shared_types::{PageData, SaveRequest, SaveState};

const PAGE_KEY: &str = "page-builder:page";

fn local_storage() -> Result<web_sys::Storage, HostError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or_else(|| HostError::new("localStorage unavailable"))
}

/// Persists save bundles to `localStorage` and inlines uploads as data URLs.
pub struct LocalStorageHost;

#[async_trait(?Send)]
impl SaveHost for LocalStorageHost {
    async fn on_save(&self, request: SaveRequest) -> Result<(), HostError> {
        let json = serde_json::to_string(&request)
            .map_err(|e| HostError::new(format!("failed to serialize page: {e}")))?;
        local_storage()?
            .set_item(PAGE_KEY, &json)
            .map_err(|_| HostError::new("localStorage quota exceeded"))?;
        info!(
            "Stored page: {} blocks, auto_save={}, need_translations={}",
            request.blocks.len(),
            request.auto_save,
            request.need_translations
        );
        Ok(())
    }

    fn on_save_state_change(&self, state: SaveState) {
        debug!("Save state changed to {}", state);
    }

    async fn on_image_upload(&self, file: ImageUpload) -> Result<String, HostError> {
        if !file.mime_type.starts_with("image/") {
            return Err(HostError::new(format!(
                "{} is not an image ({})",
                file.name, file.mime_type
            )));
        }
        let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
        Ok(format!("data:{};base64,{}", file.mime_type, encoded))
    }
}

/// Blocks from the last stored bundle, if any.
pub fn load_saved_page() -> Option<PageData> {
    let json = local_storage().ok()?.get_item(PAGE_KEY).ok().flatten()?;
    let value: serde_json::Value = serde_json::from_str(&json).ok()?;
    serde_json::from_value(value.get("blocks")?.clone())
        .map(|blocks| PageData { blocks })
        .ok()
}

/// Editor state held in signals, read without subscribing.
#[derive(Clone, Copy, PartialEq)]
pub struct SignalEditor {
    pub page: Signal<PageData>,
    pub theme: Signal<serde_json::Value>,
    pub permissions: Signal<Vec<String>>,
    pub loaded: Signal<bool>,
    pub language: Signal<Option<String>>,
    pub fallback_language: Signal<Option<String>>,
}

impl EditorContext for SignalEditor {
    fn page_data(&self) -> PageData {
        self.page.peek().clone()
    }

    fn theme(&self) -> serde_json::Value {
        self.theme.peek().clone()
    }

    fn has_permission(&self, capability: &str) -> bool {
        self.permissions.peek().iter().any(|p| p == capability)
    }

    fn is_page_loaded(&self) -> bool {
        *self.loaded.peek()
    }

    fn selected_language(&self) -> Option<String> {
        self.language.peek().clone()
    }

    fn fallback_language(&self) -> Option<String> {
        self.fallback_language.peek().clone()
    }
}

const CONFIG_KEY: &str = "page-builder:config";

/// Save tuning from a JSON object in `localStorage`; missing fields keep
/// their defaults.
pub fn load_save_config() -> SaveConfig {
    let Some(json) = local_storage()
        .ok()
        .and_then(|storage| storage.get_item(CONFIG_KEY).ok().flatten())
    else {
        return SaveConfig::default();
    };

    match serde_json::from_str(&json) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring invalid {}: {}", CONFIG_KEY, e);
            SaveConfig::default()
        }
    }
}
