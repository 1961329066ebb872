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

//! Decorative particle backdrop: a fixed batch of drifting particles that
//! bounce off the viewport edges and link to their near neighbours, plus a
//! one-shot fade-in for page sections as they scroll into view.

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod fade_in;
pub mod field;
pub mod particle;
pub mod render;

pub use app::{App, AppOptions};
pub use canvas::{Canvas, Color, FrameCanvas};
pub use config::{Cli, FieldConfig};
pub use error::{BackdropError, BackdropResult};
pub use fade_in::{AnimationState, FadeInObserver, Intersection, Section, SectionLayout};
pub use field::{Link, ParticleField};
pub use particle::Particle;
