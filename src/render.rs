// Copyright (c) 2026 James O. Schreckengast
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Presentation backends for the backdrop frame buffer.
//!
//! The field is rasterized into an RGBA buffer at logical resolution. That
//! buffer is shown through `pixels` (wgpu) when a GPU is available and
//! through `softbuffer` otherwise.

use std::num::NonZeroU32;
use std::rc::Rc;

use ouroboros::self_referencing;
use pixels::{Pixels, SurfaceTexture};
use winit::window::Window;

use crate::error::{BackdropError, BackdropResult};

/// Convert physical pixels to logical pixels given a scale factor.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn physical_to_logical(physical: u32, scale_factor: f64) -> u32 {
    (f64::from(physical) / scale_factor) as u32
}

/// Logical size the field runs at, and the physical size of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub physical_width: u32,
    pub physical_height: u32,
}

impl SurfaceSize {
    pub fn from_physical(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            width: physical_to_logical(physical_width, scale_factor),
            height: physical_to_logical(physical_height, scale_factor),
            physical_width,
            physical_height,
        }
    }

    /// True when either dimension is zero, e.g. while minimized.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.physical_width == 0 || self.physical_height == 0
    }

    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// GPU surface using ouroboros for a safe self-referential struct.
/// Pixels borrows from Window, so they must live together.
#[self_referencing]
struct GpuSurface {
    window: Rc<Window>,
    #[borrows(window)]
    #[covariant]
    pixels: Pixels<'this>,
}

pub struct GpuRenderContext {
    surface: GpuSurface,
    size: SurfaceSize,
}

/// CPU render context using softbuffer (no self-reference needed).
pub struct CpuRenderContext {
    size: SurfaceSize,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    /// RGBA buffer at logical size; scaled to the surface on present.
    buffer: Vec<u8>,
}

/// Render context supporting both GPU and CPU backends.
pub enum RenderContext {
    Gpu(Box<GpuRenderContext>),
    Cpu(CpuRenderContext),
}

impl RenderContext {
    pub fn size(&self) -> SurfaceSize {
        match self {
            RenderContext::Gpu(ctx) => ctx.size,
            RenderContext::Cpu(ctx) => ctx.size,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            RenderContext::Gpu(_) => "GPU (pixels/wgpu)",
            RenderContext::Cpu(_) => "CPU (softbuffer)",
        }
    }

    /// Call `f` with the logical RGBA frame buffer.
    pub fn with_frame<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        match self {
            RenderContext::Gpu(ctx) => ctx.surface.with_pixels_mut(|pixels| f(pixels.frame_mut())),
            RenderContext::Cpu(ctx) => f(ctx.buffer.as_mut_slice()),
        }
    }

    /// Present the frame to the screen.
    pub fn present(&mut self) -> BackdropResult<()> {
        match self {
            RenderContext::Gpu(ctx) => ctx.surface.with_pixels_mut(|pixels| pixels.render())?,
            RenderContext::Cpu(ctx) => {
                let mut sb_buffer = ctx.surface.buffer_mut()?;

                // Scale from logical to physical dimensions using nearest-neighbor
                let logical_width = ctx.size.width as usize;
                let logical_height = ctx.size.height as usize;
                let physical_width = ctx.size.physical_width as usize;
                let physical_height = ctx.size.physical_height as usize;

                for py in 0..physical_height {
                    let ly = py * logical_height / physical_height;
                    for px in 0..physical_width {
                        let lx = px * logical_width / physical_width;
                        let src_idx = (ly * logical_width + lx) * 4;
                        let dst_idx = py * physical_width + px;

                        if let (Some(src), Some(dst)) =
                            (ctx.buffer.get(src_idx..src_idx + 3), sb_buffer.get_mut(dst_idx))
                        {
                            *dst = (u32::from(src[0]) << 16) | (u32::from(src[1]) << 8) | u32::from(src[2]);
                        }
                    }
                }

                sb_buffer.present()?;
            }
        }
        Ok(())
    }

    /// Match a new window size: resize the surface and the logical buffer.
    pub fn resize(&mut self, size: SurfaceSize) -> BackdropResult<()> {
        if size.is_empty() {
            return Err(BackdropError::EmptySurface {
                width: size.physical_width,
                height: size.physical_height,
            });
        }
        match self {
            RenderContext::Gpu(ctx) => {
                ctx.surface.with_pixels_mut(|pixels| {
                    pixels.resize_surface(size.physical_width, size.physical_height)?;
                    pixels.resize_buffer(size.width, size.height)
                })?;
                ctx.size = size;
            }
            RenderContext::Cpu(ctx) => {
                let (width, height) = non_zero(size)?;
                ctx.surface.resize(width, height)?;
                ctx.buffer.clear();
                ctx.buffer.resize(size.buffer_len(), 0);
                ctx.size = size;
            }
        }
        Ok(())
    }
}

fn non_zero(size: SurfaceSize) -> BackdropResult<(NonZeroU32, NonZeroU32)> {
    let empty = || BackdropError::EmptySurface {
        width: size.physical_width,
        height: size.physical_height,
    };
    Ok((
        NonZeroU32::new(size.physical_width).ok_or_else(empty)?,
        NonZeroU32::new(size.physical_height).ok_or_else(empty)?,
    ))
}

fn try_create_gpu_context(window: &Rc<Window>, size: SurfaceSize) -> BackdropResult<GpuRenderContext> {
    let surface = GpuSurfaceTryBuilder {
        window: Rc::clone(window),
        pixels_builder: |win: &Rc<Window>| {
            let surface_texture =
                SurfaceTexture::new(size.physical_width, size.physical_height, win.as_ref());
            Pixels::new(size.width, size.height, surface_texture)
        },
    }
    .try_build()?;
    Ok(GpuRenderContext { surface, size })
}

fn create_cpu_context(window: &Rc<Window>, size: SurfaceSize) -> BackdropResult<CpuRenderContext> {
    let context = softbuffer::Context::new(Rc::clone(window))?;
    let mut surface = softbuffer::Surface::new(&context, Rc::clone(window))?;
    let (width, height) = non_zero(size)?;
    surface.resize(width, height)?;
    Ok(CpuRenderContext {
        size,
        surface,
        buffer: vec![0u8; size.buffer_len()],
    })
}

/// Create a render context, trying GPU first with CPU fallback unless
/// `force_cpu` is set.
pub fn create_render_context(
    window: &Rc<Window>,
    size: SurfaceSize,
    force_cpu: bool,
) -> BackdropResult<RenderContext> {
    if size.is_empty() {
        return Err(BackdropError::EmptySurface {
            width: size.physical_width,
            height: size.physical_height,
        });
    }
    if force_cpu {
        log::info!("Rendering: CPU (softbuffer) [forced]");
        return Ok(RenderContext::Cpu(create_cpu_context(window, size)?));
    }

    match try_create_gpu_context(window, size) {
        Ok(ctx) => {
            log::info!("Rendering: GPU (pixels/wgpu)");
            Ok(RenderContext::Gpu(Box::new(ctx)))
        }
        Err(gpu_error) => {
            log::warn!("GPU unavailable ({gpu_error}), using CPU rendering");
            let ctx = create_cpu_context(window, size)?;
            log::info!("Rendering: CPU (softbuffer)");
            Ok(RenderContext::Cpu(ctx))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1600, 1200, 2.0, (800, 600))]
    #[case(1024, 768, 1.0, (1024, 768))]
    #[case(1000, 750, 1.25, (800, 600))]
    fn logical_size_divides_by_scale(
        #[case] pw: u32,
        #[case] ph: u32,
        #[case] scale: f64,
        #[case] logical: (u32, u32),
    ) {
        let size = SurfaceSize::from_physical(pw, ph, scale);
        assert_eq!((size.width, size.height), logical);
        assert_eq!((size.physical_width, size.physical_height), (pw, ph));
        assert!(!size.is_empty());
    }

    #[test]
    fn minimized_window_is_empty() {
        assert!(SurfaceSize::from_physical(0, 0, 1.0).is_empty());
        assert!(SurfaceSize::from_physical(1, 600, 2.0).is_empty());
        assert_eq!(SurfaceSize::from_physical(0, 0, 1.0).buffer_len(), 0);
    }

    #[test]
    fn empty_size_cannot_back_a_cpu_surface() {
        let err = non_zero(SurfaceSize::default()).expect_err("zero size");
        assert!(matches!(err, BackdropError::EmptySurface { width: 0, height: 0 }));
    }
}
