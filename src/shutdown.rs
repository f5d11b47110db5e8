//! Cooperative shutdown for the emit loop
//!
//! The Ctrl+C handler only flips the flag and wakes the waiter; the loop
//! itself decides when to stop, at an iteration boundary.

use crate::error::Result;
use colored::Colorize;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Cloneable stop flag with an interruptible sleep
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request shutdown and wake any pending wait
    pub fn trigger(&self) {
        *self.flag() = true;
        self.inner.1.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.flag()
    }

    /// Sleep for `timeout` unless shutdown is requested first
    ///
    /// Returns `true` if shutdown was requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        let (_, condvar) = &*self.inner;
        let (stopped, _) = condvar
            .wait_timeout_while(self.flag(), timeout, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }

    /// Trigger this token on Ctrl+C
    pub fn install_ctrlc(&self) -> Result<()> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            println!("\n{}", "Stopping simulator...".yellow());
            token.trigger();
        })?;
        log::debug!("Ctrl+C handler installed");
        Ok(())
    }
}
