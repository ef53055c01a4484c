use dioxus::prelude::*;
use shared_types::SaveState;

pub fn save_state_label(state: SaveState) -> &'static str {
    match state {
        SaveState::Saved => "Saved",
        SaveState::Saving => "Saving...",
        SaveState::Unsaved => "Unsaved changes",
    }
}

fn save_state_color(state: SaveState) -> &'static str {
    match state {
        SaveState::Saved => "var(--success-bg)",
        SaveState::Saving => "var(--accent-bg)",
        SaveState::Unsaved => "var(--warning-bg)",
    }
}

#[component]
pub fn SaveStatusIndicator(state: SaveState, need_translations: bool) -> Element {
    let label = save_state_label(state);
    let color = save_state_color(state);

    rsx! {
        div {
            style: "display: flex; align-items: center; gap: 0.5rem;",
            span {
                style: "font-size: 0.875rem; color: {color};",
                "data-save-state": state.as_str(),
                "{label}"
            }
            if need_translations {
                span {
                    style: "font-size: 0.75rem; padding: 0.125rem 0.375rem; border-radius: 0.25rem; color: var(--warning-bg); background: var(--hover-bg);",
                    "Translations missing"
                }
            }
        }
    }
}
