//! Process-wide transport setup and teardown.
//!
//! # Contract
//! The owning process calls [`global_init`] once before any exchange and
//! [`global_cleanup`] once after the last one, on a single thread, with no
//! exchanges in flight. Neither call is thread-safe. Repeating a call is the
//! transport's concern; this module adds no state of its own.
//!
//! [`GlobalGuard`] ties cleanup to a scope for processes that prefer RAII.

use tracing::{error, info};

use crate::error::Failure;
use crate::transport::Transport;

/// Initialize the transport's process-wide state.
///
/// Any non-zero code from the transport becomes [`Failure::Init`], which
/// always carries the same sentinel code.
pub fn global_init<T: Transport + ?Sized>(transport: &T) -> Result<(), Failure> {
    match transport.global_init() {
        0 => {
            info!("transport initialized");
            Ok(())
        }
        code => {
            error!(code, "transport global initialization failed");
            Err(Failure::Init)
        }
    }
}

/// Tear down the transport's process-wide state.
pub fn global_cleanup<T: Transport + ?Sized>(transport: &T) {
    transport.global_cleanup();
    info!("transport cleaned up");
}

/// Runs [`global_cleanup`] when dropped.
pub struct GlobalGuard<'a, T: Transport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> GlobalGuard<'a, T> {
    pub fn acquire(transport: &'a T) -> Result<Self, Failure> {
        global_init(transport)?;
        Ok(Self { transport })
    }
}

impl<T: Transport + ?Sized> Drop for GlobalGuard<'_, T> {
    fn drop(&mut self) {
        global_cleanup(self.transport);
    }
}
