/// Tests for ScopedErrorCheck
///
/// Checkpoint tests touch the process-wide config and logger, so they run
/// serially and set the config they need up front.

use super::*;
use crate::device::mock_device::MockGlDevice;
use crate::log::{self, Logger, LogEntry, LogSeverity};
use serial_test::serial;
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

/// Enable checks and capture ErrorCheck log entries
fn setup(config: ErrorCheckConfig) -> Arc<Mutex<Vec<LogEntry>>> {
    set_error_check_config(config);
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger { entries: entries.clone() });
    entries
}

fn enabled() -> ErrorCheckConfig {
    ErrorCheckConfig {
        enabled: true,
        ..ErrorCheckConfig::default()
    }
}

fn teardown() {
    log::reset_logger();
    set_error_check_config(ErrorCheckConfig::default());
}

/// Runs `teardown` on drop, including while a test unwinds
struct Teardown;

impl Drop for Teardown {
    fn drop(&mut self) {
        teardown();
    }
}

fn reports(entries: &Arc<Mutex<Vec<LogEntry>>>) -> Vec<LogEntry> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.source == SOURCE)
        .cloned()
        .collect()
}

// ============================================================================
// Tests: msg
// ============================================================================

#[test]
fn test_msg_known_codes() {
    assert_eq!(ScopedErrorCheck::msg(gl_error::NO_ERROR), "No error");
    assert_eq!(ScopedErrorCheck::msg(gl_error::INVALID_ENUM), "Invalid enum");
    assert_eq!(ScopedErrorCheck::msg(gl_error::INVALID_VALUE), "Invalid value");
    assert_eq!(ScopedErrorCheck::msg(gl_error::INVALID_OPERATION), "Invalid operation");
    assert_eq!(ScopedErrorCheck::msg(gl_error::STACK_OVERFLOW), "Stack overflow");
    assert_eq!(ScopedErrorCheck::msg(gl_error::STACK_UNDERFLOW), "Stack underflow");
    assert_eq!(ScopedErrorCheck::msg(gl_error::OUT_OF_MEMORY), "Out of memory");
    assert_eq!(ScopedErrorCheck::msg(gl_error::INVALID_FRAMEBUFFER_OPERATION), "Invalid framebuffer operation");
    assert_eq!(ScopedErrorCheck::msg(gl_error::CONTEXT_LOST), "Context lost");
}

#[test]
fn test_msg_unknown_codes_fall_back() {
    for code in [1u32, 0x04FF, 0x0508, 0xDEAD, u32::MAX] {
        assert_eq!(ScopedErrorCheck::msg(code), "Unknown error");
    }
}

#[test]
fn test_msg_is_stable() {
    assert_eq!(
        ScopedErrorCheck::msg(gl_error::INVALID_ENUM),
        ScopedErrorCheck::msg(gl_error::INVALID_ENUM)
    );
}

// ============================================================================
// Tests: checkpoint stack
// ============================================================================

#[test]
#[serial]
fn test_stack_push_pop() {
    let _entries = setup(enabled());
    let device = MockGlDevice::new();
    assert_eq!(checkpoint_depth(), 0);

    {
        let _outer = ScopedErrorCheck::new(&device, "frame");
        assert_eq!(checkpoint_stack(), vec!["frame".to_string()]);
        {
            let _inner = ScopedErrorCheck::new(&device, "draw notes");
            assert_eq!(checkpoint_stack(), vec!["frame".to_string(), "draw notes".to_string()]);
        }
        assert_eq!(checkpoint_depth(), 1);
    }

    assert_eq!(checkpoint_depth(), 0);
    teardown();
}

#[test]
#[serial]
fn test_out_of_order_drop_restores_depth() {
    let _entries = setup(enabled());
    let device = MockGlDevice::new();

    let outer = ScopedErrorCheck::new(&device, "outer");
    let inner = ScopedErrorCheck::new(&device, "inner");
    drop(outer);
    assert_eq!(checkpoint_depth(), 0);
    drop(inner);
    assert_eq!(checkpoint_depth(), 0);

    teardown();
}

#[test]
fn test_stack_is_thread_local() {
    let device = MockGlDevice::new();
    let _guard = ScopedErrorCheck::new(&device, "main thread");

    let other = std::thread::spawn(|| checkpoint_depth()).join().unwrap();
    assert_eq!(other, 0);
    assert!(checkpoint_depth() >= 1);
}

// ============================================================================
// Tests: check / reset
// ============================================================================

#[test]
#[serial]
fn test_check_without_errors_reports_nothing() {
    let entries = setup(enabled());
    let device = MockGlDevice::new();
    let checker = ScopedErrorCheck::new(&device, "quiet");

    assert!(checker.check_default().is_empty());
    drop(checker);

    assert!(reports(&entries).is_empty());
    teardown();
}

#[test]
#[serial]
fn test_check_reports_with_context() {
    let entries = setup(enabled());
    let device = MockGlDevice::new();
    let _outer = ScopedErrorCheck::new(&device, "render");
    let inner = ScopedErrorCheck::new(&device, "upload");

    device.push_error(gl_error::INVALID_ENUM);
    let found = inner.check("after buffer_data");

    assert_eq!(found, vec![gl_error::INVALID_ENUM]);
    let logged = reports(&entries);
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].severity, LogSeverity::Error);
    assert!(logged[0].message.contains("Invalid enum"));
    assert!(logged[0].message.contains("0x0500"));
    assert!(logged[0].message.contains("after buffer_data"));
    assert!(logged[0].message.contains("render > upload"));

    drop(inner);
    teardown();
}

#[test]
#[serial]
fn test_check_drains_all_pending_errors() {
    let entries = setup(enabled());
    let device = MockGlDevice::new();
    let checker = ScopedErrorCheck::new(&device, "multi");

    device.push_error(gl_error::INVALID_VALUE);
    device.push_error(gl_error::OUT_OF_MEMORY);
    let found = checker.check_default();

    assert_eq!(found, vec![gl_error::INVALID_VALUE, gl_error::OUT_OF_MEMORY]);
    assert_eq!(device.pending_error_count(), 0);
    assert_eq!(reports(&entries).len(), 2);
    assert!(reports(&entries)[0].message.contains("check()"));

    drop(checker);
    teardown();
}

#[test]
#[serial]
fn test_check_drain_is_bounded() {
    let _entries = setup(ErrorCheckConfig {
        enabled: true,
        panic_on_error: false,
        max_drained_errors: 2,
    });
    let device = MockGlDevice::new();
    let checker = ScopedErrorCheck::new(&device, "bounded");

    for _ in 0..5 {
        device.push_error(gl_error::CONTEXT_LOST);
    }
    assert_eq!(checker.check_default().len(), 2);
    assert_eq!(device.pending_error_count(), 3);

    ScopedErrorCheck::reset(&device);
    assert_eq!(device.pending_error_count(), 1);
    ScopedErrorCheck::reset(&device);
    assert_eq!(device.pending_error_count(), 0);

    drop(checker);
    teardown();
}

#[test]
#[serial]
fn test_precondition_and_postcondition_reports() {
    let entries = setup(enabled());
    let device = MockGlDevice::new();

    device.push_error(gl_error::INVALID_OPERATION);
    let checker = ScopedErrorCheck::new(&device, "scoped region");
    device.push_error(gl_error::INVALID_VALUE);
    drop(checker);

    let logged = reports(&entries);
    assert_eq!(logged.len(), 2);
    assert!(logged[0].message.contains("precondition"));
    assert!(!logged[0].message.contains("scoped region"));
    assert!(logged[1].message.contains("postcondition"));
    assert!(logged[1].message.contains("scoped region"));

    teardown();
}

#[test]
#[serial]
fn test_reset_discards_silently() {
    let entries = setup(enabled());
    let device = MockGlDevice::new();
    device.push_error(gl_error::INVALID_ENUM);
    device.push_error(gl_error::INVALID_VALUE);

    ScopedErrorCheck::reset(&device);

    assert_eq!(device.pending_error_count(), 0);
    assert!(reports(&entries).is_empty());
    teardown();
}

#[test]
#[serial]
fn test_disabled_config_skips_queries() {
    let entries = setup(ErrorCheckConfig {
        enabled: false,
        ..ErrorCheckConfig::default()
    });
    let device = MockGlDevice::new();
    let checker = ScopedErrorCheck::new(&device, "disabled");

    device.push_error(gl_error::INVALID_ENUM);
    assert!(checker.check_default().is_empty());
    assert_eq!(device.pending_error_count(), 1);
    assert_eq!(checkpoint_depth(), 1);

    drop(checker);
    assert!(reports(&entries).is_empty());
    teardown();
}

#[test]
#[serial]
#[should_panic(expected = "GL error: Invalid value")]
fn test_panic_on_error() {
    let _entries = setup(ErrorCheckConfig {
        enabled: true,
        panic_on_error: true,
        max_drained_errors: 16,
    });
    let _teardown = Teardown;
    let device = MockGlDevice::new();
    let checker = ScopedErrorCheck::new(&device, "strict");

    device.push_error(gl_error::INVALID_VALUE);
    checker.check_default();
}

#[test]
#[serial]
fn test_panic_on_error_config_is_restored_after_unwind() {
    let result = std::panic::catch_unwind(|| {
        let _entries = setup(ErrorCheckConfig {
            enabled: true,
            panic_on_error: true,
            max_drained_errors: 16,
        });
        let _teardown = Teardown;
        let device = MockGlDevice::new();
        let checker = ScopedErrorCheck::new(&device, "strict");
        device.push_error(gl_error::INVALID_VALUE);
        checker.check_default();
    });

    assert!(result.is_err());
    assert!(!error_check_config().panic_on_error);
    assert_eq!(checkpoint_depth(), 0);
}

#[test]
fn test_default_config() {
    let config = ErrorCheckConfig::default();
    assert_eq!(config.enabled, cfg!(debug_assertions));
    assert!(!config.panic_on_error);
    assert_eq!(config.max_drained_errors, 16);
}
