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

//! Field configuration and the command line that overrides it.

use clap::{value_parser, Parser};

use crate::canvas::Color;

/// Cornflower blue, shared by particles and their links.
pub const DEFAULT_HUE: Color = Color::rgb(100, 149, 237);

/// Tuning for the particle field. Defaults reproduce the stock backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    /// Particles generated on every (re)initialization.
    pub particle_count: usize,
    /// Pairs closer than this (px) are linked.
    pub connection_distance: f64,
    /// Per-axis velocity spread (px/frame); each axis draws from
    /// `[-move_speed / 2, move_speed / 2)`.
    pub move_speed: f64,
    /// Fixed hue of particles and links; its alpha is ignored.
    pub hue: Color,
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_alpha: f64,
    pub max_alpha: f64,
    /// Link alpha at zero distance.
    pub link_opacity: f64,
    pub link_width: f64,
    /// Clear color of the drawing surface.
    pub background: [u8; 3],
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 50,
            connection_distance: 150.0,
            move_speed: 0.5,
            hue: DEFAULT_HUE,
            min_radius: 1.0,
            max_radius: 3.0,
            min_alpha: 0.1,
            max_alpha: 0.4,
            link_opacity: 0.15,
            link_width: 1.0,
            background: [11, 15, 25],
        }
    }
}

fn parse_non_negative(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("`{s}` must be a finite value >= 0"));
    }
    Ok(value)
}

/// Animated particle backdrop with one-shot section fade-in.
///
/// Scroll with the mouse wheel or arrow keys; Escape or Q exits.
#[derive(Debug, Parser)]
#[command(name = "particle-backdrop", version, about)]
pub struct Cli {
    /// Number of particles (0-1000)
    #[arg(long, default_value_t = 50, value_parser = value_parser!(u32).range(0..=1000))]
    pub particles: u32,

    /// Maximum distance in pixels at which two particles are linked
    #[arg(long, default_value_t = 150.0, value_parser = parse_non_negative)]
    pub connection_distance: f64,

    /// Per-axis velocity spread in pixels per frame
    #[arg(long, default_value_t = 0.5, value_parser = parse_non_negative)]
    pub move_speed: f64,

    /// Number of page sections layered over the field (0-32)
    #[arg(long, default_value_t = 4, value_parser = value_parser!(u32).range(0..=32))]
    pub sections: u32,

    /// Window width in logical pixels; requires --height. Omit both for fullscreen
    #[arg(long, requires = "height", value_parser = value_parser!(u32).range(100..=7680))]
    pub width: Option<u32>,

    /// Window height in logical pixels; requires --width
    #[arg(long, requires = "width", value_parser = value_parser!(u32).range(100..=4320))]
    pub height: Option<u32>,

    /// Force CPU presentation (softbuffer) instead of GPU
    #[arg(long)]
    pub cpu: bool,

    /// Seed for a reproducible particle field
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn field_config(&self) -> FieldConfig {
        FieldConfig {
            particle_count: self.particles as usize,
            connection_distance: self.connection_distance,
            move_speed: self.move_speed,
            ..FieldConfig::default()
        }
    }

    /// Requested fixed window size, or `None` for fullscreen.
    pub fn window_size(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}
