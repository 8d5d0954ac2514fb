/// GL error checkpoints
///
/// A `ScopedErrorCheck` labels a region of rendering code. Errors found at a
/// checkpoint are logged together with the labels of every active region on
/// the calling thread, outermost first.

use std::cell::RefCell;
use std::sync::{OnceLock, RwLock};

use crate::device::{GlDevice, gl_error};
use crate::glutil_error;

const SOURCE: &str = "glutil::ErrorCheck";

thread_local! {
    /// Active checkpoint labels of this thread, outermost first
    static CHECKPOINTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Global checkpoint configuration
static CONFIG: OnceLock<RwLock<ErrorCheckConfig>> = OnceLock::new();

// ============================================================================
// Configuration
// ============================================================================

/// Error checkpoint configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCheckConfig {
    /// Query and report errors at checkpoints
    pub enabled: bool,
    /// Panic after reporting an error (never while already unwinding)
    pub panic_on_error: bool,
    /// Upper bound on error codes drained per checkpoint; a lost context
    /// can report errors forever
    pub max_drained_errors: usize,
}

impl Default for ErrorCheckConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            panic_on_error: false,
            max_drained_errors: 16,
        }
    }
}

fn config_slot() -> &'static RwLock<ErrorCheckConfig> {
    CONFIG.get_or_init(|| RwLock::new(ErrorCheckConfig::default()))
}

/// Install a new checkpoint configuration (process-wide)
pub fn set_error_check_config(config: ErrorCheckConfig) {
    if let Ok(mut lock) = config_slot().write() {
        *lock = config;
    }
}

/// Current checkpoint configuration
pub fn error_check_config() -> ErrorCheckConfig {
    config_slot()
        .read()
        .map(|config| *config)
        .unwrap_or_default()
}

// ============================================================================
// Checkpoint stack introspection
// ============================================================================

/// Labels of the calling thread's active checkpoints, outermost first
pub fn checkpoint_stack() -> Vec<String> {
    CHECKPOINTS.with(|stack| stack.borrow().clone())
}

/// Number of active checkpoints on the calling thread
pub fn checkpoint_depth() -> usize {
    CHECKPOINTS.with(|stack| stack.borrow().len())
}

fn checkpoint_context() -> String {
    CHECKPOINTS.with(|stack| stack.borrow().join(" > "))
}

// ============================================================================
// ScopedErrorCheck
// ============================================================================

/// Labeled error-checking region
///
/// Creating the guard reports errors left over from before the region
/// ("precondition") and pushes `label`. Dropping it reports errors raised
/// inside the region ("postcondition") and pops the label.
///
/// Checks only query the device while `ErrorCheckConfig::enabled` is set,
/// which by default is the case in debug builds only. Release builds keep
/// the checkpoint stack, but `check` and the pre/postconditions return
/// without calling `get_error` until checks are switched on (`reset`
/// always drains):
///
/// ```no_run
/// use glutil::error_check::{set_error_check_config, ErrorCheckConfig};
///
/// set_error_check_config(ErrorCheckConfig {
///     enabled: true,
///     ..ErrorCheckConfig::default()
/// });
/// ```
pub struct ScopedErrorCheck<'a> {
    device: &'a dyn GlDevice,
    depth: usize,
}

impl<'a> ScopedErrorCheck<'a> {
    pub fn new(device: &'a dyn GlDevice, label: impl Into<String>) -> Self {
        let checker = Self {
            device,
            depth: checkpoint_depth(),
        };
        let pending = checker.report("precondition");
        CHECKPOINTS.with(|stack| stack.borrow_mut().push(label.into()));
        checker.panic_if_configured(&pending);
        checker
    }

    /// Checkpoint: report every pending error and return the codes found
    pub fn check(&self, what: &str) -> Vec<u32> {
        let errors = self.report(what);
        self.panic_if_configured(&errors);
        errors
    }

    /// `check` with the generic `"check()"` label
    pub fn check_default(&self) -> Vec<u32> {
        self.check("check()")
    }

    /// Discard pending errors without reporting them
    pub fn reset(device: &dyn GlDevice) {
        let limit = error_check_config().max_drained_errors;
        for _ in 0..limit {
            if device.get_error() == gl_error::NO_ERROR {
                break;
            }
        }
    }

    /// Human-readable name of a raw error code
    pub fn msg(code: u32) -> &'static str {
        match code {
            gl_error::NO_ERROR => "No error",
            gl_error::INVALID_ENUM => "Invalid enum",
            gl_error::INVALID_VALUE => "Invalid value",
            gl_error::INVALID_OPERATION => "Invalid operation",
            gl_error::STACK_OVERFLOW => "Stack overflow",
            gl_error::STACK_UNDERFLOW => "Stack underflow",
            gl_error::OUT_OF_MEMORY => "Out of memory",
            gl_error::INVALID_FRAMEBUFFER_OPERATION => "Invalid framebuffer operation",
            gl_error::CONTEXT_LOST => "Context lost",
            _ => "Unknown error",
        }
    }

    fn report(&self, what: &str) -> Vec<u32> {
        let config = error_check_config();
        if !config.enabled {
            return Vec::new();
        }

        let mut errors = Vec::new();
        while errors.len() < config.max_drained_errors {
            let code = self.device.get_error();
            if code == gl_error::NO_ERROR {
                break;
            }
            errors.push(code);
        }

        if !errors.is_empty() {
            let context = checkpoint_context();
            for code in &errors {
                glutil_error!(SOURCE, "{} (0x{:04X}) at {} [{}]",
                    Self::msg(*code), code, what, context);
            }
        }
        errors
    }

    fn panic_if_configured(&self, errors: &[u32]) {
        if errors.is_empty() || std::thread::panicking() {
            return;
        }
        if error_check_config().panic_on_error {
            panic!("GL error: {} [{}]", Self::msg(errors[0]), checkpoint_context());
        }
    }
}

impl Drop for ScopedErrorCheck<'_> {
    fn drop(&mut self) {
        let errors = self.report("postcondition");
        CHECKPOINTS.with(|stack| stack.borrow_mut().truncate(self.depth));
        self.panic_if_configured(&errors);
    }
}

#[cfg(test)]
#[path = "error_check_tests.rs"]
mod tests;
