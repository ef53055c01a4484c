//! Modal for inserting blocks at a chosen point of the page.

use builder_core::{AddBlockDialogState, InsertionPoint};
use dioxus::prelude::*;

/// Renders nothing while closed. When open, shows a backdrop that dismisses
/// on click and a surface hosting the block picker for the insertion point.
#[component]
pub fn AddBlocksDialog(
    dialog: Signal<AddBlockDialogState>,
    render_panel: Callback<InsertionPoint, Element>,
) -> Element {
    let mut dialog = dialog;
    let Some(point) = dialog.read().insertion_point() else {
        return rsx! {};
    };

    rsx! {
        div {
            style: "position: fixed; inset: 0; z-index: 50; display: flex; align-items: center; justify-content: center;",
            // Backdrop
            div {
                style: "position: fixed; inset: 0; background: rgba(0, 0, 0, 0.8);",
                onclick: move |_| dialog.write().dismiss(),
            }
            // Dialog
            div {
                role: "dialog",
                style: "position: relative; z-index: 50; width: 100%; max-width: 64rem; border-radius: 0.5rem; background: var(--window-bg); padding: 1.5rem; box-shadow: 0 10px 15px rgba(0, 0, 0, 0.3);",
                div {
                    style: "display: flex; align-items: center; justify-content: space-between;",
                    h2 { style: "margin: 0; font-size: 1.125rem; font-weight: 600; color: var(--text-primary);", "Add blocks" }
                    button {
                        style: "background: transparent; border: none; color: var(--text-secondary); cursor: pointer; font-size: 1.25rem;",
                        title: "Close",
                        onclick: move |_| dialog.write().dismiss(),
                        "✕"
                    }
                }
                div {
                    style: "margin-top: 1rem; height: 500px; max-height: 100%; overflow: hidden;",
                    {render_panel.call(point)}
                }
            }
        }
    }
}
