//! Single-page builder wiring the save orchestrator and add-block dialog to
//! a local preview.

use std::rc::Rc;

use builder_core::{
    BuilderCommand, Collaborators, InsertionPoint, SaveOrchestrator, StaticBlockRegistry,
};
use dioxus::prelude::*;
use serde_json::json;
use shared_types::{Block, BlockDefinition, OpenAddBlock, PageData, SAVE_PAGE_PERMISSION};

use crate::components::{AddBlocksDialog, BlockPicker, SaveStatusIndicator};
use crate::hooks::{dispatch, use_add_block_dialog_provider, use_save_page};
use crate::host::{load_save_config, load_saved_page, LocalStorageHost, SignalEditor};
use crate::interop::{listen_for_builder_events, GlooTimer, IframeRasterizer};
use crate::page::{insert_block, preview_document, render_outline, OutlineHtmlRenderer};

pub const PREVIEW_FRAME_ID: &str = "page-builder-preview";

const FALLBACK_LANGUAGE: &str = "en";
const LANGUAGES: [&str; 3] = ["en", "fr", "de"];

pub fn demo_registry() -> StaticBlockRegistry {
    StaticBlockRegistry::new()
        .with(BlockDefinition::new("Box"))
        .with(BlockDefinition::new("Heading").with_i18n_props(["content"]))
        .with(BlockDefinition::new("Paragraph").with_i18n_props(["content"]))
        .with(BlockDefinition::new("Button").with_i18n_props(["content", "title"]))
        .with(BlockDefinition::new("Image").with_i18n_props(["alt"]))
}

pub fn sample_page() -> PageData {
    PageData {
        blocks: vec![
            Block::new("hero", "Box"),
            Block::new("hero-title", "Heading")
                .with_parent("hero")
                .with_prop("content", json!("Build pages block by block"))
                .with_prop("content-fr", json!("Construisez bloc par bloc")),
            Block::new("hero-body", "Paragraph")
                .with_parent("hero")
                .with_prop("content", json!("Pick a block, drop it anywhere, and it saves itself.")),
        ],
    }
}

fn default_content(block_type: &str) -> Option<&'static str> {
    match block_type {
        "Heading" => Some("New heading"),
        "Paragraph" => Some("New paragraph"),
        "Button" => Some("Click me"),
        _ => None,
    }
}

fn new_block(block_type: String) -> Block {
    let content = default_content(&block_type);
    let block = Block::new(uuid::Uuid::new_v4().to_string(), block_type);
    match content {
        Some(text) => block.with_prop("content", json!(text)),
        None => block,
    }
}

#[component]
pub fn BuilderDemo() -> Element {
    let registry = use_hook(|| Rc::new(demo_registry()));
    let mut page = use_signal(|| load_saved_page().unwrap_or_else(sample_page));
    let mut language = use_signal(|| Some(FALLBACK_LANGUAGE.to_string()));
    let editor = SignalEditor {
        page,
        theme: use_signal(|| json!({ "mode": "dark" })),
        permissions: use_signal(|| vec![SAVE_PAGE_PERMISSION.to_string()]),
        loaded: use_signal(|| true),
        language,
        fallback_language: use_signal(|| Some(FALLBACK_LANGUAGE.to_string())),
    };
    let mut dialog = use_add_block_dialog_provider();

    let save = {
        let registry = registry.clone();
        use_save_page(move || {
            SaveOrchestrator::new(
                load_save_config(),
                Collaborators {
                    host: Rc::new(LocalStorageHost),
                    editor: Rc::new(editor),
                    registry,
                    renderer: Rc::new(OutlineHtmlRenderer),
                    timer: Rc::new(GlooTimer),
                },
            )
        })
    };

    {
        let orchestrator = save.orchestrator();
        use_hook(move || {
            orchestrator.attach_preview(Rc::new(IframeRasterizer::new(PREVIEW_FRAME_ID)));
            listen_for_builder_events(dialog);
        });
    }

    let definitions: Vec<BlockDefinition> = registry.definitions().cloned().collect();
    let selected = language.read().clone();
    let blocks = page.read().blocks.clone();
    let srcdoc = preview_document(&render_outline(&blocks, selected.as_deref()));
    let need_translations = save.need_translations();
    let state = *save.state.read();

    let render_panel = {
        let save = save.clone();
        use_callback(move |point: InsertionPoint| {
            let save = save.clone();
            let target = point.clone();
            rsx! {
                BlockPicker {
                    definitions: definitions.clone(),
                    point,
                    on_pick: move |block_type: String| {
                        page.with_mut(|p| {
                            insert_block(p, new_block(block_type), &target);
                        });
                        dialog.write().close();
                        save.page_edited();
                    },
                }
            }
        })
    };

    let save_throttled = save.clone();
    let save_now = save.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100vh;",
            // Toolbar
            div {
                style: "display: flex; align-items: center; gap: 0.75rem; padding: 0.75rem 1rem; border-bottom: 1px solid var(--border-color);",
                SaveStatusIndicator { state, need_translations }
                div { style: "flex: 1;" }
                select {
                    value: selected.clone().unwrap_or_default(),
                    onchange: move |evt| language.set(Some(evt.value())),
                    for lang in LANGUAGES {
                        option { key: "{lang}", value: lang, "{lang}" }
                    }
                }
                button {
                    style: "padding: 0.375rem 0.75rem; border-radius: 0.375rem; border: 1px solid var(--border-color); background: var(--hover-bg); color: var(--text-primary); cursor: pointer;",
                    onclick: move |_| dispatch(dialog, BuilderCommand::OpenAddBlock(None)),
                    "Add block"
                }
                button {
                    style: "padding: 0.375rem 0.75rem; border-radius: 0.375rem; border: 1px solid var(--border-color); background: var(--hover-bg); color: var(--text-primary); cursor: pointer;",
                    onclick: move |_| save_throttled.save(false),
                    "Save"
                }
                button {
                    style: "padding: 0.375rem 0.75rem; border-radius: 0.375rem; border: none; background: var(--accent-bg); color: white; cursor: pointer;",
                    onclick: move |_| save_now.save_async(),
                    "Save now"
                }
            }
            div {
                style: "display: flex; flex: 1; min-height: 0;",
                // Outline
                div {
                    style: "width: 16rem; overflow-y: auto; padding: 0.5rem; border-right: 1px solid var(--border-color);",
                    for block in blocks.iter() {
                        {
                            let children = blocks
                                .iter()
                                .filter(|b| b.parent.as_deref() == Some(block.id.as_str()))
                                .count();
                            let payload = OpenAddBlock::new(block.id.clone(), children as i64);
                            let indent = if block.parent.is_some() { "1rem" } else { "0" };
                            rsx! {
                                div {
                                    key: "{block.id}",
                                    style: "display: flex; align-items: center; justify-content: space-between; padding: 0.25rem 0.5rem; margin-left: {indent}; color: var(--text-secondary); font-size: 0.875rem;",
                                    span { "{block.block_type}" }
                                    button {
                                        style: "background: transparent; border: none; color: var(--text-secondary); cursor: pointer;",
                                        title: "Add a block inside",
                                        onclick: move |_| {
                                            dispatch(dialog, BuilderCommand::OpenAddBlock(Some(payload.clone())))
                                        },
                                        "+"
                                    }
                                }
                            }
                        }
                    }
                }
                iframe {
                    id: PREVIEW_FRAME_ID,
                    style: "flex: 1; border: none; background: white;",
                    srcdoc: "{srcdoc}",
                }
            }
            AddBlocksDialog { dialog, render_panel }
        }
    }
}
