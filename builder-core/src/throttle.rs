use std::cell::RefCell;
use std::time::Duration;

use crate::host::Timer;

/// Result of entering a [`TrailingThrottle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Throttled<T> {
    /// The window closed; run with the last arguments seen during it.
    Run(T),
    /// Another caller owns the window and will run with these arguments.
    Coalesced,
}

/// Trailing-edge throttle without a background task.
///
/// The first caller of a burst opens the window and sleeps until it ends.
/// Callers arriving while it is open overwrite the pending arguments and
/// return [`Throttled::Coalesced`] at once. When the window ends the
/// opener takes whatever arguments are pending, so a burst produces one
/// execution with the last arguments.
#[derive(Debug)]
pub struct TrailingThrottle<T> {
    window: Duration,
    pending: RefCell<Option<T>>,
}

impl<T> TrailingThrottle<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: RefCell::new(None),
        }
    }

    pub fn is_open(&self) -> bool {
        self.pending.borrow().is_some()
    }

    pub async fn call(&self, timer: &dyn Timer, args: T) -> Throttled<T> {
        {
            let mut pending = self.pending.borrow_mut();
            let opened_by_us = pending.is_none();
            *pending = Some(args);
            if !opened_by_us {
                return Throttled::Coalesced;
            }
        }

        let window = OpenWindow {
            pending: &self.pending,
        };
        timer.sleep(self.window).await;

        match window.close() {
            Some(args) => Throttled::Run(args),
            None => Throttled::Coalesced,
        }
    }

    /// Drops pending arguments; the window opener will report `Coalesced`.
    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}

/// Held by the window opener across its sleep. Closes the window when the
/// opener is dropped mid-sleep so later callers can open a new one.
struct OpenWindow<'a, T> {
    pending: &'a RefCell<Option<T>>,
}

impl<T> OpenWindow<'_, T> {
    fn close(self) -> Option<T> {
        // Release the borrow before `Drop` takes it again.
        #[allow(clippy::let_and_return)]
        let args = self.pending.borrow_mut().take();
        args
    }
}

impl<T> Drop for OpenWindow<'_, T> {
    fn drop(&mut self) {
        self.pending.borrow_mut().take();
    }
}
