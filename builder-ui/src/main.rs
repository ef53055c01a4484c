use dioxus::launch;
use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

use builder_ui::BuilderDemo;

fn main() {
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());
    dioxus_logger::init(Level::INFO).ok();

    launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        div {
            style: "min-height: 100vh; background-color: #111827; color: white; --window-bg: #1f2937; --border-color: #374151; --hover-bg: #374151; --text-primary: #f9fafb; --text-secondary: #9ca3af; --accent-bg: #3b82f6; --success-bg: #10b981; --warning-bg: #f59e0b;",
            BuilderDemo {}
        }
    }
}
