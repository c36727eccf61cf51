//! Ctrl-C while a verb is running.
//!
//! At the prompt the line editor reads Ctrl-C as a key and cancels the line.
//! While a verb runs the terminal delivers SIGINT instead; the handler only
//! raises a flag. Verbs that loop poll it, and the dispatcher clears it after
//! each line, so the open container survives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

/// Shared interrupt flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Route SIGINT to a new flag for the rest of the process.
    pub fn install() -> Result<Self> {
        let interrupt = Self::default();
        let handler = interrupt.clone();
        ctrlc::set_handler(move || handler.raise()).context("install Ctrl-C handler")?;
        Ok(interrupt)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}
