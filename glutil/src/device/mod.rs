/// Device module - the driver trait, its value types, and the headless mock

pub mod gl_device;
pub mod mock_device;

pub use gl_device::*;
