use std::cell::Cell;

use shared_types::SaveState;
use tokio::sync::watch;

/// Observable save state owned by one orchestrator.
///
/// Every transition goes through the watch sender, so `try_begin` is a
/// single compare-and-set and subscribers never see a torn update.
/// Edits flagged while a save is in flight are remembered so that save
/// settles as `Unsaved`.
#[derive(Debug)]
pub struct SaveStateCell {
    tx: watch::Sender<SaveState>,
    edited_while_saving: Cell<bool>,
}

impl SaveStateCell {
    pub fn new(initial: SaveState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            edited_while_saving: Cell::new(false),
        }
    }

    pub fn get(&self) -> SaveState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.tx.subscribe()
    }

    /// Moves to `Saving` unless a save is already in flight.
    pub fn try_begin(&self) -> bool {
        let began = self.tx.send_if_modified(|state| {
            if *state == SaveState::Saving {
                return false;
            }
            *state = SaveState::Saving;
            true
        });
        if began {
            self.edited_while_saving.set(false);
        }
        began
    }

    /// Ends a successful save. Returns `Unsaved` if the page was edited
    /// while it was in flight, `Saved` otherwise.
    pub fn settle(&self) -> SaveState {
        let outcome = if self.edited_while_saving.replace(false) {
            SaveState::Unsaved
        } else {
            SaveState::Saved
        };
        self.tx.send_replace(outcome);
        outcome
    }

    pub fn finish(&self, outcome: SaveState) {
        self.edited_while_saving.set(false);
        self.tx.send_replace(outcome);
    }

    /// Flags pending edits. Returns true only on a `Saved -> Unsaved`
    /// transition; while saving the edit is recorded for `settle`.
    pub fn mark_unsaved(&self) -> bool {
        self.tx.send_if_modified(|state| match *state {
            SaveState::Saved => {
                *state = SaveState::Unsaved;
                true
            }
            SaveState::Saving => {
                self.edited_while_saving.set(true);
                false
            }
            SaveState::Unsaved => false,
        })
    }
}

impl Default for SaveStateCell {
    fn default() -> Self {
        Self::new(SaveState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_begin_is_exclusive() {
        let cell = SaveStateCell::default();
        assert!(cell.try_begin());
        assert!(!cell.try_begin());
        assert_eq!(cell.get(), SaveState::Saving);

        cell.finish(SaveState::Saved);
        assert!(cell.try_begin());
    }

    #[test]
    fn test_mark_unsaved_only_from_saved() {
        let cell = SaveStateCell::default();
        assert!(cell.mark_unsaved());
        assert!(!cell.mark_unsaved());
        assert_eq!(cell.get(), SaveState::Unsaved);

        assert!(cell.try_begin());
        assert!(!cell.mark_unsaved());
        assert_eq!(cell.get(), SaveState::Saving);
    }

    #[test]
    fn test_edit_during_save_settles_unsaved() {
        let cell = SaveStateCell::default();
        assert!(cell.try_begin());
        assert_eq!(cell.settle(), SaveState::Saved);

        assert!(cell.try_begin());
        cell.mark_unsaved();
        assert_eq!(cell.settle(), SaveState::Unsaved);
        assert_eq!(cell.get(), SaveState::Unsaved);

        // The flag does not leak into the next save.
        assert!(cell.try_begin());
        assert_eq!(cell.settle(), SaveState::Saved);
    }

    #[test]
    fn test_subscribers_see_transitions() {
        let cell = SaveStateCell::default();
        let mut rx = cell.subscribe();
        assert!(!rx.has_changed().unwrap());

        cell.try_begin();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SaveState::Saving);

        cell.finish(SaveState::Saved);
        assert_eq!(*rx.borrow_and_update(), SaveState::Saved);
    }
}
