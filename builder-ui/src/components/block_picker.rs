use builder_core::{InsertPosition, InsertionPoint, ParentRef};
use dioxus::prelude::*;
use shared_types::BlockDefinition;

fn insertion_label(point: &InsertionPoint) -> String {
    let parent = match &point.parent {
        ParentRef::Block(id) => format!("inside {id}"),
        ParentRef::Root | ParentRef::Cleared => "at page root".to_string(),
    };
    match point.position {
        InsertPosition::At(n) => format!("{parent}, position {n}"),
        InsertPosition::Append => format!("{parent}, at the end"),
    }
}

/// Grid of registered block types; picking one reports its type name.
#[component]
pub fn BlockPicker(
    definitions: Vec<BlockDefinition>,
    point: InsertionPoint,
    on_pick: EventHandler<String>,
) -> Element {
    let label = insertion_label(&point);

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 0.75rem; height: 100%;",
            p { style: "margin: 0; font-size: 0.875rem; color: var(--text-secondary);", "Insert {label}" }
            div {
                style: "display: grid; grid-template-columns: repeat(auto-fill, minmax(10rem, 1fr)); gap: 0.5rem; overflow-y: auto;",
                for definition in definitions {
                    {
                        let block_type = definition.block_type.clone();
                        let translatable = definition.i18n_props.join(", ");
                        rsx! {
                            button {
                                key: "{definition.block_type}",
                                style: "padding: 0.75rem; border-radius: 0.375rem; border: 1px solid var(--border-color); background: var(--hover-bg); color: var(--text-primary); cursor: pointer; text-align: left;",
                                onclick: move |_| on_pick.call(block_type.clone()),
                                "{definition.block_type}"
                                if !translatable.is_empty() {
                                    span {
                                        style: "display: block; margin-top: 0.25rem; font-size: 0.75rem; color: var(--text-secondary);",
                                        "Translatable: {translatable}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
