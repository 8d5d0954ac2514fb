//! Error checkpoint module
//!
//! Labeled GL error checkpoints with a per-thread context stack.

mod error_check;

pub use error_check::{
    ScopedErrorCheck, ErrorCheckConfig,
    set_error_check_config, error_check_config,
    checkpoint_stack, checkpoint_depth,
};
