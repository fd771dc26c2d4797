//! Signal-safe shutdown flag.
//!
//! The registered handler does exactly one thing — an atomic store — which
//! is all that is safe to do from within a signal handler. The event loop
//! polls the flag at the top of every iteration; no other synchronisation
//! is needed since nothing else touches it from the handler side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    /// An unset flag with no signal handlers registered, for driving the
    /// event loop from a test without sending the process a real signal.
    #[must_use]
    pub fn unset() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Register `SIGINT` and `SIGTERM` handlers that set the returned flag.
    pub fn install() -> anyhow::Result<Self> {
        let flag = Self::unset();
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&flag.0))?;
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&flag.0))?;
        Ok(flag)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset() {
        let flag = ShutdownFlag::unset();
        assert!(!flag.is_set());
    }

    #[test]
    fn set_is_observed() {
        let flag = ShutdownFlag::unset();
        flag.set();
        assert!(flag.is_set());
    }
}
