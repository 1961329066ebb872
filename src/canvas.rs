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

//! Drawing surface used by the particle field and the section panels.
//!
//! [`Canvas`] is the small set of 2D operations the backdrop needs. The
//! window host draws through [`FrameCanvas`], a software rasterizer over an
//! RGBA8 frame buffer; tests draw through a recording stand-in.

/// An RGB color with a straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Color {
    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Same hue with a different alpha.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }
}

/// 2D drawing operations consumed by the backdrop.
pub trait Canvas {
    /// Reset a region to the background.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill a circle centered at `(x, y)`.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color);

    /// Stroke a straight segment between two points.
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
}

// =============================================================================
// Type conversion helpers for raster code
// =============================================================================

/// Convert f64 coordinate to a signed pixel position (floors).
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn coord_to_pixel(v: f64) -> i64 {
    v.floor().clamp(i64::MIN as f64, i64::MAX as f64) as i64
}

/// Convert f64 color component (0.0-255.0) to u8.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn color_component(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Liang-Barsky clip of the segment `a -> b` against the box `min..max`.
/// Returns `None` when nothing of the segment lies inside, or when any
/// coordinate is not finite.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

/// Software rasterizer over an RGBA8 frame of `width * height` pixels.
///
/// Every operation clips to the frame, so drawing partially or entirely
/// off-surface is always safe. Blending is source-over against an opaque
/// frame.
pub struct FrameCanvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
    background: [u8; 3],
}

impl<'a> FrameCanvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32, background: [u8; 3]) -> Self {
        debug_assert!(frame.len() >= width as usize * height as usize * 4);
        Self {
            frame,
            width,
            height,
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA value of a pixel, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.frame.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn in_bounds(&self, px: i64, py: i64) -> bool {
        px >= 0 && py >= 0 && px < i64::from(self.width) && py < i64::from(self.height)
    }

    /// Blend one pixel; coordinates outside the frame are ignored.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn blend(&mut self, px: i64, py: i64, color: Color) {
        if !self.in_bounds(px, py) {
            return;
        }
        let idx = (py as usize * self.width as usize + px as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = color.alpha.clamp(0.0, 1.0);
        let mix = |src: u8, dst: u8| color_component(f64::from(src) * a + f64::from(dst) * (1.0 - a));
        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = 255;
    }

    /// Clamp a span of real coordinates to pixel indices `[start, end)`.
    fn span(&self, lo: f64, hi: f64, extent: u32) -> (i64, i64) {
        let start = coord_to_pixel(lo).max(0);
        let end = coord_to_pixel(hi.ceil()).min(i64::from(extent));
        (start, end)
    }
}

impl Canvas for FrameCanvas<'_> {
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (x0, x1) = self.span(x, x + width, self.width);
        let (y0, y1) = self.span(y, y + height, self.height);
        let [r, g, b] = self.background;
        for py in y0..y1 {
            for px in x0..x1 {
                let idx = (py as usize * self.width as usize + px as usize) * 4;
                if let Some(dst) = self.frame.get_mut(idx..idx + 4) {
                    dst.copy_from_slice(&[r, g, b, 255]);
                }
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let radius_sq = radius * radius;
        let (x0, x1) = self.span(x - radius, x + radius, self.width);
        let (y0, y1) = self.span(y - radius, y + radius, self.height);

        // Pixel (px, py) is covered when its center lies inside the circle.
        for py in y0..y1 {
            let dy = py as f64 + 0.5 - y;
            for px in x0..x1 {
                let dx = px as f64 + 0.5 - x;
                if dx * dx + dy * dy <= radius_sq {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
        let margin = width.max(1.0);
        let Some((from, to)) = clip_segment(
            from,
            to,
            (-margin, -margin),
            (f64::from(self.width) + margin, f64::from(self.height) + margin),
        ) else {
            return;
        };
        let (mut x0, mut y0) = (coord_to_pixel(from.0), coord_to_pixel(from.1));
        let (x1, y1) = (coord_to_pixel(to.0), coord_to_pixel(to.1));

        let thickness = coord_to_pixel(width.round()).max(1);
        let lo = -(thickness - 1) / 2;
        let hi = lo + thickness;

        // Bresenham
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            for oy in lo..hi {
                for ox in lo..hi {
                    self.blend(x0 + ox, y0 + oy, color);
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let (x0, x1) = self.span(x, x + width, self.width);
        let (y0, y1) = self.span(y, y + height, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }
}

/// Canvas stand-in that records every call instead of drawing.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawOp {
    Clear { x: f64, y: f64, width: f64, height: f64 },
    Circle { x: f64, y: f64, radius: f64, color: Color },
    Line { from: (f64, f64), to: (f64, f64), width: f64, color: Color },
    Rect { x: f64, y: f64, width: f64, height: f64, color: Color },
}

#[cfg(test)]
impl RecordingCanvas {
    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }
}

#[cfg(test)]
impl Canvas for RecordingCanvas {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Clear { x, y, width, height });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) {
        self.ops.push(DrawOp::Circle { x, y, radius, color });
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
        self.ops.push(DrawOp::Line { from, to, width, color });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.ops.push(DrawOp::Rect { x, y, width, height, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BG: [u8; 3] = [10, 12, 20];
    const BLUE: Color = Color::rgb(100, 149, 237);

    fn frame(width: u32, height: u32) -> Vec<u8> {
        vec![0u8; width as usize * height as usize * 4]
    }

    #[test]
    fn clear_fills_every_pixel_with_background() {
        let mut buf = frame(8, 6);
        let mut canvas = FrameCanvas::new(&mut buf, 8, 6, BG);
        canvas.clear_rect(0.0, 0.0, 8.0, 6.0);
        for y in 0..6 {
            for x in 0..8 {
                assert_eq!(canvas.pixel(x, y), Some([10, 12, 20, 255]));
            }
        }
    }

    #[test]
    fn opaque_circle_covers_center_and_spares_far_pixels() {
        let mut buf = frame(20, 20);
        let mut canvas = FrameCanvas::new(&mut buf, 20, 20, BG);
        canvas.clear_rect(0.0, 0.0, 20.0, 20.0);
        canvas.fill_circle(10.5, 10.5, 2.0, BLUE);
        assert_eq!(canvas.pixel(10, 10), Some([100, 149, 237, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([10, 12, 20, 255]));
        assert_eq!(canvas.pixel(15, 10), Some([10, 12, 20, 255]));
    }

    #[test]
    fn translucent_circle_blends_with_background() {
        let mut buf = frame(4, 4);
        let mut canvas = FrameCanvas::new(&mut buf, 4, 4, [0, 0, 0]);
        canvas.clear_rect(0.0, 0.0, 4.0, 4.0);
        canvas.fill_circle(1.5, 1.5, 1.0, Color::rgb(200, 100, 50).with_alpha(0.5));
        assert_eq!(canvas.pixel(1, 1), Some([100, 50, 25, 255]));
    }

    #[test]
    fn line_touches_both_endpoints() {
        let mut buf = frame(16, 16);
        let mut canvas = FrameCanvas::new(&mut buf, 16, 16, BG);
        canvas.clear_rect(0.0, 0.0, 16.0, 16.0);
        canvas.stroke_line((1.2, 2.7), (13.9, 11.1), 1.0, BLUE);
        assert_eq!(canvas.pixel(1, 2), Some([100, 149, 237, 255]));
        assert_eq!(canvas.pixel(13, 11), Some([100, 149, 237, 255]));
        assert_eq!(canvas.pixel(13, 2), Some([10, 12, 20, 255]));
    }

    #[rstest]
    #[case((-50.0, -50.0), (-10.0, -5.0))]
    #[case((-5.0, 3.0), (40.0, 3.0))]
    #[case((1e12, 1e12), (2e12, 3e12))]
    #[case((f64::NAN, 0.0), (3.0, 3.0))]
    #[case((-1e300, 4.0), (5.0, 4.0))]
    fn off_surface_lines_never_panic(#[case] from: (f64, f64), #[case] to: (f64, f64)) {
        let mut buf = frame(8, 8);
        let mut canvas = FrameCanvas::new(&mut buf, 8, 8, BG);
        canvas.stroke_line(from, to, 1.0, BLUE);
    }

    #[test]
    fn circle_partially_off_surface_is_clipped() {
        let mut buf = frame(8, 8);
        let mut canvas = FrameCanvas::new(&mut buf, 8, 8, BG);
        canvas.clear_rect(0.0, 0.0, 8.0, 8.0);
        canvas.fill_circle(-0.5, 7.9, 3.0, BLUE);
        assert_eq!(canvas.pixel(0, 7), Some([100, 149, 237, 255]));
    }

    #[test]
    fn zero_sized_frame_accepts_all_operations() {
        let mut buf = Vec::new();
        let mut canvas = FrameCanvas::new(&mut buf, 0, 0, BG);
        canvas.clear_rect(0.0, 0.0, 0.0, 0.0);
        canvas.fill_circle(0.0, 0.0, 3.0, BLUE);
        canvas.stroke_line((0.0, 0.0), (0.0, 0.0), 1.0, BLUE);
        canvas.fill_rect(0.0, 0.0, 5.0, 5.0, BLUE);
        assert_eq!(canvas.pixel(0, 0), None);
    }
}
