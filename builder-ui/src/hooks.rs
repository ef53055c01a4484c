//! Dioxus hooks over the builder core.

use std::rc::Rc;

use builder_core::{
    AddBlockDialogState, BuilderCommand, SaveError, SaveOrchestrator, SaveOutcome,
};
use dioxus::prelude::*;
use shared_types::SaveState;

/// Save controls handed to builder components
#[derive(Clone)]
pub struct SavePage {
    orchestrator: Rc<SaveOrchestrator>,
    /// Mirrors the orchestrator's state for rendering
    pub state: Signal<SaveState>,
}

impl PartialEq for SavePage {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.orchestrator, &other.orchestrator) && self.state == other.state
    }
}

impl SavePage {
    pub fn orchestrator(&self) -> Rc<SaveOrchestrator> {
        self.orchestrator.clone()
    }

    /// Throttled save; bursts collapse into one host save.
    pub fn save(&self, auto_save: bool) {
        let orchestrator = self.orchestrator.clone();
        spawn(async move {
            log_outcome("save", orchestrator.save(auto_save).await);
        });
    }

    /// Immediate save, skipped without the save permission or before load.
    pub fn save_async(&self) {
        let orchestrator = self.orchestrator.clone();
        spawn(async move {
            log_outcome("save_async", orchestrator.save_async().await);
        });
    }

    /// Flags an edit and schedules a throttled auto-save.
    pub fn page_edited(&self) {
        self.orchestrator.mark_unsaved();
        self.save(true);
    }

    pub fn need_translations(&self) -> bool {
        self.orchestrator.need_translations()
    }
}

fn log_outcome(kind: &str, result: Result<SaveOutcome, SaveError>) {
    match result {
        Ok(outcome) => dioxus_logger::tracing::debug!("{} finished: {:?}", kind, outcome),
        Err(e) => dioxus_logger::tracing::error!("{} failed: {}", kind, e),
    }
}

/// Owns a save orchestrator for the lifetime of the calling component.
///
/// State changes are pushed into a signal, and the orchestrator is shut
/// down when the component unmounts so late timers stay silent.
pub fn use_save_page(init: impl FnOnce() -> SaveOrchestrator) -> SavePage {
    let orchestrator = use_hook(|| Rc::new(init()));
    let mut state = use_signal(|| orchestrator.state());

    {
        let orchestrator = orchestrator.clone();
        use_future(move || {
            let mut rx = orchestrator.subscribe();
            async move {
                while rx.changed().await.is_ok() {
                    let next = *rx.borrow_and_update();
                    state.set(next);
                }
            }
        });
    }

    {
        let orchestrator = orchestrator.clone();
        use_drop(move || orchestrator.shutdown());
    }

    SavePage {
        orchestrator,
        state,
    }
}

/// Provides the add-block dialog state to descendants.
pub fn use_add_block_dialog_provider() -> Signal<AddBlockDialogState> {
    use_context_provider(|| Signal::new(AddBlockDialogState::default()))
}

pub fn use_add_block_dialog() -> Signal<AddBlockDialogState> {
    use_context::<Signal<AddBlockDialogState>>()
}

pub fn dispatch(mut dialog: Signal<AddBlockDialogState>, command: BuilderCommand) {
    dialog.write().apply(&command);
}
