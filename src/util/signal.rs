//! Interrupt handling for long-running attached subprocesses.
//!
//! Ctrl-C is delivered to the whole foreground process group, so the child
//! (e.g. `tailwindcss --watch`) receives it directly. The handler installed
//! here only records that it happened so the parent can return cleanly
//! instead of being killed alongside the child.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Process-wide handler registration; ctrlc allows only one per process.
static HANDLER: OnceLock<Option<Arc<AtomicBool>>> = OnceLock::new();

/// Shared "an interrupt arrived" flag.
#[derive(Debug, Clone)]
pub struct InterruptFlag {
    flag: Arc<AtomicBool>,
    installed: bool,
}

impl InterruptFlag {
    /// Install the process-wide Ctrl-C handler (once) and return its flag.
    ///
    /// If the host process already owns the handler, the returned flag is
    /// never set and `is_installed()` reports `false`.
    pub fn install() -> Self {
        let registered = HANDLER.get_or_init(|| {
            let flag = Arc::new(AtomicBool::new(false));
            let handler_flag = Arc::clone(&flag);
            match ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst)) {
                Ok(()) => Some(flag),
                Err(e) => {
                    tracing::debug!("interrupt handler not installed: {}", e);
                    None
                }
            }
        });

        match registered {
            Some(flag) => InterruptFlag {
                flag: Arc::clone(flag),
                installed: true,
            },
            None => InterruptFlag::detached(),
        }
    }

    /// A flag not connected to any signal handler.
    pub fn detached() -> Self {
        InterruptFlag {
            flag: Arc::new(AtomicBool::new(false)),
            installed: false,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Check if an interrupt has been received since the last `clear`.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Record an interrupt.
    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Forget earlier interrupts.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_flag() {
        let flag = InterruptFlag::detached();
        assert!(!flag.is_installed());
        assert!(!flag.is_set());

        let clone = flag.clone();
        clone.set();
        assert!(flag.is_set());

        flag.clear();
        assert!(!clone.is_set());
    }
}
