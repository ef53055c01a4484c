//! Shared types between the builder core and the host page
//!
//! These types are used by both:
//! - The save orchestrator and dialog controller (native Rust and WASM)
//! - Host integrations that persist pages (JSON over JS callbacks)
//!
//! Serializable with serde; TypeScript bindings generated with ts-rs

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Save State
// ============================================================================

/// Persistence status of the page being edited
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../../builder-ui/src/types/generated.ts")]
pub enum SaveState {
    /// Everything on screen has been persisted
    #[default]
    Saved,
    /// A save is in flight
    Saving,
    /// Edits exist that have not been persisted
    Unsaved,
}

impl SaveState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveState::Saved => "SAVED",
            SaveState::Saving => "SAVING",
            SaveState::Unsaved => "UNSAVED",
        }
    }
}

impl std::fmt::Display for SaveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Page Model
// ============================================================================

/// A single content/layout unit of a page.
///
/// Only the identity fields are typed. Everything else, including
/// per-language text stored under `<property>-<languageCode>`, lives in
/// `props` and is round-tripped untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    #[serde(rename = "_id")]
    pub id: String,

    /// Registered block type; empty when the host omitted it
    #[serde(rename = "_type", default)]
    pub block_type: String,

    #[serde(rename = "_parent", default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(flatten)]
    pub props: serde_json::Map<String, serde_json::Value>,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            parent: None,
            props: serde_json::Map::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    pub fn prop(&self, key: &str) -> Option<&serde_json::Value> {
        self.props.get(key)
    }

    /// Value of `prop` in language `lang`, stored under `<prop>-<lang>`.
    pub fn translated_prop(&self, prop: &str, lang: &str) -> Option<&serde_json::Value> {
        self.props.get(&translation_key(prop, lang))
    }

    /// Partial blocks embed another page and carry no text of their own.
    pub fn is_partial(&self) -> bool {
        self.block_type == PARTIAL_BLOCK_TYPE
    }
}

/// Property key holding the `lang` translation of `prop`.
pub fn translation_key(prop: &str, lang: &str) -> String {
    format!("{prop}-{lang}")
}

/// Snapshot of the document being edited
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PageData {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Registry metadata for a block type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export, export_to = "../../builder-ui/src/types/generated.ts")]
pub struct BlockDefinition {
    #[serde(rename = "type")]
    pub block_type: String,

    /// Property names that carry per-language text
    #[serde(rename = "i18nProps", default)]
    pub i18n_props: Vec<String>,
}

impl BlockDefinition {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            i18n_props: Vec::new(),
        }
    }

    pub fn with_i18n_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.i18n_props = props.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================================
// Host Contract
// ============================================================================

/// Bundle handed to the host save callback.
///
/// The field set is the compatibility contract with existing hosts; do not
/// rename fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../builder-ui/src/types/generated.ts")]
pub struct SaveRequest {
    pub auto_save: bool,

    #[ts(type = "Array<Record<string, unknown>>")]
    pub blocks: Vec<Block>,

    #[ts(type = "unknown")]
    pub theme: serde_json::Value,

    pub need_translations: bool,

    /// Rendered HTML of the page, present on the throttled save path only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub dom_elements: Option<Vec<String>>,

    /// `data:image/png;base64,...` snapshot of the preview canvas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub screenshot: Option<String>,
}

/// Payload of the open-add-block command.
///
/// `position` stays untyped because hosts publishing named events send
/// whatever they have; it is resolved by the dialog controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export, export_to = "../../builder-ui/src/types/generated.ts")]
pub struct OpenAddBlock {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub parent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "unknown")]
    pub position: Option<serde_json::Value>,
}

impl OpenAddBlock {
    pub fn new(parent_id: impl Into<String>, position: i64) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            position: Some(serde_json::Value::from(position)),
        }
    }

    /// Payload targeting the page root, appending at the end.
    pub fn root() -> Self {
        Self::default()
    }
}

pub const PARTIAL_BLOCK_TYPE: &str = "PartialBlock";
pub const SAVE_PAGE_PERMISSION: &str = "save_page";
pub const EVENT_OPEN_ADD_BLOCK: &str = "OPEN_ADD_BLOCK";
pub const EVENT_CLOSE_ADD_BLOCK: &str = "CLOSE_ADD_BLOCK";

// ============================================================================
// Tests
// ============================================================================
