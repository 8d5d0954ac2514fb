/// Tests for RenderTarget
///
/// These tests validate creation, attachment, resize, binding and cleanup
/// against the mock device.

use super::*;
use crate::device::FramebufferStatus;
use crate::device::mock_device::{MockGlDevice, GlCall, TextureStorage};

fn mock() -> (Rc<MockGlDevice>, Rc<dyn GlDevice>) {
    let mock = Rc::new(MockGlDevice::new());
    let device: Rc<dyn GlDevice> = mock.clone();
    (mock, device)
}

fn storage_allocations(mock: &MockGlDevice) -> Vec<(TextureFormat, u32, u32)> {
    mock.calls()
        .into_iter()
        .filter_map(|call| match call {
            GlCall::TexImage2D { format, width, height, .. } => Some((format, width, height)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Tests: Creation
// ============================================================================

#[test]
fn test_new_sets_dimensions() {
    let (_mock, device) = mock();
    let target = RenderTarget::new(device, 256, 128).unwrap();
    assert_eq!(target.width(), 256);
    assert_eq!(target.height(), 128);
}

#[test]
fn test_new_allocates_both_attachments_at_size() {
    let (mock, device) = mock();
    let target = RenderTarget::new(device, 256, 256).unwrap();

    assert_eq!(mock.texture_storage(target.texture().id()), Some(TextureStorage {
        format: COLOR_FORMAT,
        width: 256,
        height: 256,
    }));
    assert_eq!(mock.texture_storage(target.depth_texture().id()), Some(TextureStorage {
        format: DEPTH_FORMAT,
        width: 256,
        height: 256,
    }));
    assert_eq!(mock.texture_parameter(target.texture().id(), TextureParameter::MaxLevel), Some(0));
    assert_eq!(mock.texture_parameter(target.depth_texture().id(), TextureParameter::MaxLevel), Some(0));
}

#[test]
fn test_new_attaches_color_and_depth() {
    let (mock, device) = mock();
    let target = RenderTarget::new(device, 64, 64).unwrap();
    let fb = Some(target.framebuffer());

    let attachments = mock.calls_matching(|c| matches!(c, GlCall::AttachTexture { .. }));
    assert_eq!(attachments, vec![
        GlCall::AttachTexture { framebuffer: fb, attachment: Attachment::Color(0), texture: target.texture().id() },
        GlCall::AttachTexture { framebuffer: fb, attachment: Attachment::Depth, texture: target.depth_texture().id() },
    ]);
}

#[test]
fn test_new_leaves_default_framebuffer_bound() {
    let (mock, device) = mock();
    let _target = RenderTarget::new(device, 64, 64).unwrap();
    assert_eq!(mock.bound_framebuffer(), None);
    assert_eq!(mock.bound_texture(), None);
    assert_eq!(mock.pending_error_count(), 0);
}

#[test]
fn test_new_rejects_zero_size() {
    let (mock, device) = mock();
    assert!(matches!(RenderTarget::new(device.clone(), 0, 64), Err(Error::InvalidResource(_))));
    assert!(matches!(RenderTarget::new(device, 64, 0), Err(Error::InvalidResource(_))));
    assert!(mock.calls().is_empty());
}

#[test]
fn test_new_incomplete_framebuffer_fails_without_leaks() {
    let (mock, device) = mock();
    mock.set_framebuffer_status(FramebufferStatus::Unsupported);

    let result = RenderTarget::new(device, 64, 64);

    assert_eq!(result.err(), Some(Error::IncompleteFramebuffer(FramebufferStatus::Unsupported)));
    assert_eq!(mock.live_object_count(), 0);
    assert_eq!(mock.bound_framebuffer(), None);
}

#[test]
fn test_new_allocation_failure_fails_without_leaks() {
    let (mock, device) = mock();
    mock.fail_allocations(true);

    let result = RenderTarget::new(device, 64, 64);

    assert!(matches!(result, Err(Error::ResourceExhausted(_))));
    assert_eq!(mock.live_object_count(), 0);
}

// ============================================================================
// Tests: Resize
// ============================================================================

#[test]
fn test_resize_updates_dimensions_and_storage() {
    let (mock, device) = mock();
    let mut target = RenderTarget::new(device, 256, 256).unwrap();
    mock.clear_calls();

    target.resize(128, 64).unwrap();

    assert_eq!(target.width(), 128);
    assert_eq!(target.height(), 64);
    assert_eq!(storage_allocations(&mock), vec![
        (COLOR_FORMAT, 128, 64),
        (DEPTH_FORMAT, 128, 64),
    ]);
    assert_eq!(mock.texture_storage(target.texture().id()).map(|s| (s.width, s.height)), Some((128, 64)));
    assert_eq!(target.texture().info().map(|i| (i.width, i.height)), Some((128, 64)));
}

#[test]
fn test_resize_keeps_framebuffer_and_textures() {
    let (_mock, device) = mock();
    let mut target = RenderTarget::new(device, 32, 32).unwrap();
    let fb = target.framebuffer();
    let color = target.texture().id();

    target.resize(48, 16).unwrap();

    assert_eq!(target.framebuffer(), fb);
    assert_eq!(target.texture().id(), color);
}

#[test]
fn test_resize_rejects_zero_and_keeps_old_size() {
    let (_mock, device) = mock();
    let mut target = RenderTarget::new(device, 32, 32).unwrap();

    assert!(target.resize(0, 10).is_err());
    assert_eq!(target.width(), 32);
    assert_eq!(target.height(), 32);
}

fn assert_size_matches_storage(mock: &MockGlDevice, target: &RenderTarget) {
    let size = Some((target.width(), target.height()));
    assert_eq!(target.texture().info().map(|i| (i.width, i.height)), size);
    assert_eq!(target.depth_texture().info().map(|i| (i.width, i.height)), size);
    assert_eq!(mock.texture_storage(target.texture().id()).map(|s| (s.width, s.height)), size);
    assert_eq!(mock.texture_storage(target.depth_texture().id()).map(|s| (s.width, s.height)), size);
}

#[test]
fn test_resize_rejects_size_beyond_glsizei() {
    let (mock, device) = mock();
    let mut target = RenderTarget::new(device, 64, 64).unwrap();
    mock.clear_calls();

    assert!(matches!(target.resize(u32::MAX, 32), Err(Error::InvalidResource(_))));
    assert_eq!((target.width(), target.height()), (64, 64));
    assert!(storage_allocations(&mock).is_empty());
    assert_size_matches_storage(&mock, &target);
}

#[test]
fn test_failed_resize_keeps_old_size() {
    let (mock, device) = mock();
    let mut target = RenderTarget::new(device, 64, 64).unwrap();
    mock.set_max_texture_size(1024);

    assert!(matches!(target.resize(4096, 32), Err(Error::BackendError(_))));
    assert_eq!((target.width(), target.height()), (64, 64));
    assert_size_matches_storage(&mock, &target);

    target.resize(1024, 512).unwrap();
    assert_size_matches_storage(&mock, &target);
}

#[test]
fn test_failed_depth_storage_rolls_color_back() {
    let (mock, device) = mock();
    let mut target = RenderTarget::new(device, 64, 64).unwrap();
    mock.fail_storage(&[DEPTH_FORMAT]);
    mock.clear_calls();

    assert_eq!(target.resize(128, 128), Err(Error::OutOfMemory));
    assert_eq!((target.width(), target.height()), (64, 64));
    assert_size_matches_storage(&mock, &target);
    assert_eq!(storage_allocations(&mock), vec![
        (COLOR_FORMAT, 128, 128),
        (DEPTH_FORMAT, 128, 128),
        (COLOR_FORMAT, 64, 64),
        (DEPTH_FORMAT, 64, 64),
    ]);
    assert_eq!(mock.bound_texture(), None);
}

#[test]
fn test_new_storage_failure_fails_without_leaks() {
    let (mock, device) = mock();
    mock.fail_storage(&[COLOR_FORMAT]);

    assert_eq!(RenderTarget::new(device, 64, 64).unwrap_err(), Error::OutOfMemory);
    assert_eq!(mock.live_object_count(), 0);
}

// ============================================================================
// Tests: Binding
// ============================================================================

#[test]
fn test_bind_and_unbind() {
    let (mock, device) = mock();
    let target = RenderTarget::new(device.clone(), 16, 16).unwrap();

    target.bind();
    assert_eq!(mock.bound_framebuffer(), Some(target.framebuffer()));

    RenderTarget::unbind(&*device);
    assert_eq!(mock.bound_framebuffer(), None);
}

#[test]
fn test_use_target_restores_default_framebuffer() {
    let (mock, device) = mock();
    let target = RenderTarget::new(device, 16, 16).unwrap();
    mock.clear_calls();

    {
        let binding = target.use_target();
        assert_eq!(binding.target().framebuffer(), target.framebuffer());
        assert_eq!(mock.bound_framebuffer(), Some(target.framebuffer()));
    }

    assert_eq!(mock.bound_framebuffer(), None);
    assert_eq!(mock.calls(), vec![
        GlCall::BindFramebuffer(Some(target.framebuffer())),
        GlCall::BindFramebuffer(None),
    ]);
}

#[test]
fn test_nested_use_target_does_not_restore_outer_binding() {
    let (mock, device) = mock();
    let outer = RenderTarget::new(device.clone(), 16, 16).unwrap();
    let inner = RenderTarget::new(device, 8, 8).unwrap();

    let _outer_binding = outer.use_target();
    {
        let _inner_binding = inner.use_target();
        assert_eq!(mock.bound_framebuffer(), Some(inner.framebuffer()));
    }
    assert_eq!(mock.bound_framebuffer(), None);
}

// ============================================================================
// Tests: Cleanup
// ============================================================================

#[test]
fn test_drop_releases_everything() {
    let (mock, device) = mock();
    let target = RenderTarget::new(device, 16, 16).unwrap();
    let fb = target.framebuffer();
    assert_eq!(mock.live_object_count(), 3);

    drop(target);

    assert!(!mock.is_framebuffer_live(fb));
    assert_eq!(mock.live_object_count(), 0);
    assert_eq!(mock.pending_error_count(), 0);
}

#[test]
fn test_texture_mut_gives_bindable_color_attachment() {
    let (mock, device) = mock();
    let mut target = RenderTarget::new(device, 16, 16).unwrap();
    let color = target.texture().id();

    let _binding = target.texture_mut().bind();
    assert_eq!(mock.bound_texture(), Some(color));
}
