/*!
# glutil glow device

`GlDevice` implementation for native OpenGL 3.0+ / OpenGL ES 3.0+ contexts
loaded through [`glow`].

```no_run
use std::rc::Rc;
use glutil::glutil::{GlDevice, RenderTarget};
use glutil_device_glow::GlowDevice;

# fn run(gl: glow::Context) -> glutil::glutil::Result<()> {
let device: Rc<dyn GlDevice> = Rc::new(GlowDevice::new(gl)?);
let mut target = RenderTarget::new(device, 1280, 720)?;
target.resize(1920, 1080)?;
# Ok(())
# }
```
*/

mod glow_format;

#[cfg(not(target_arch = "wasm32"))]
mod glow_device;

#[cfg(not(target_arch = "wasm32"))]
pub use glow_device::GlowDevice;
