/// Tests for DepthTestScope

use super::*;
use crate::device::mock_device::{MockGlDevice, GlCall};

#[test]
fn test_scope_clears_depth_and_toggles_depth_test() {
    let device = MockGlDevice::new();

    {
        let _scope = DepthTestScope::new(&device);
        assert!(device.capability_enabled(Capability::DepthTest));
    }

    assert!(!device.capability_enabled(Capability::DepthTest));
    assert_eq!(device.calls(), vec![
        GlCall::Clear(ClearMask::DEPTH),
        GlCall::SetCapability { capability: Capability::DepthTest, enabled: true },
        GlCall::SetCapability { capability: Capability::DepthTest, enabled: false },
    ]);
}

#[test]
fn test_scope_disables_on_early_return() {
    fn draw_or_bail(device: &MockGlDevice, bail: bool) -> Option<()> {
        let _scope = DepthTestScope::new(device);
        if bail {
            return None;
        }
        Some(())
    }

    let device = MockGlDevice::new();
    assert!(draw_or_bail(&device, true).is_none());
    assert!(!device.capability_enabled(Capability::DepthTest));
}
