//! Page editing and preview projection used by the demo builder.

use async_trait::async_trait;
use builder_core::{HostError, HtmlRenderer, InsertPosition, InsertionPoint, ParentRef};
use shared_types::{Block, PageData};

/// Inserts `block` among the children of the insertion point's parent and
/// returns its index in `page.blocks`.
pub fn insert_block(page: &mut PageData, mut block: Block, point: &InsertionPoint) -> usize {
    block.parent = match &point.parent {
        ParentRef::Block(id) => Some(id.clone()),
        ParentRef::Root | ParentRef::Cleared => None,
    };

    let siblings: Vec<usize> = page
        .blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.parent == block.parent)
        .map(|(idx, _)| idx)
        .collect();

    let index = match point.position {
        InsertPosition::At(n) => siblings
            .get(n as usize)
            .copied()
            .unwrap_or(page.blocks.len()),
        InsertPosition::Append => page.blocks.len(),
    };
    page.blocks.insert(index, block);
    index
}

/// Outline HTML of the page: one element per root block, children nested in
/// page order, text taken from `content` or `title` in `lang` when present.
pub fn render_outline(blocks: &[Block], lang: Option<&str>) -> Vec<String> {
    blocks
        .iter()
        .filter(|b| b.parent.is_none())
        .map(|b| render_block(blocks, b, lang))
        .collect()
}

fn render_block(blocks: &[Block], block: &Block, lang: Option<&str>) -> String {
    let children: String = blocks
        .iter()
        .filter(|b| b.parent.as_deref() == Some(block.id.as_str()))
        .map(|child| render_block(blocks, child, lang))
        .collect();

    format!(
        "<div data-block-id=\"{}\" data-block-type=\"{}\">{}{}</div>",
        escape_html(&block.id),
        escape_html(&block.block_type),
        escape_html(&block_text(block, lang)),
        children
    )
}

fn block_text(block: &Block, lang: Option<&str>) -> String {
    ["content", "title"]
        .iter()
        .find_map(|prop| {
            lang.and_then(|lang| block.translated_prop(prop, lang))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .or_else(|| block.prop(prop).and_then(|v| v.as_str()))
        })
        .unwrap_or_default()
        .to_string()
}

pub fn preview_document(elements: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body style=\"font-family: sans-serif; margin: 0; padding: 1rem;\">{}</body></html>",
        elements.concat()
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `HtmlRenderer` producing the outline projection in the base language
pub struct OutlineHtmlRenderer;

#[async_trait(?Send)]
impl HtmlRenderer for OutlineHtmlRenderer {
    async fn render(
        &self,
        blocks: &[Block],
        _theme: &serde_json::Value,
    ) -> Result<Vec<String>, HostError> {
        Ok(render_outline(blocks, None))
    }
}
