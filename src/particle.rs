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

use rand::Rng;

use crate::canvas::{Canvas, Color};
use crate::config::FieldConfig;

/// A point drifting across the viewport at constant speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub color: Color,
}

impl Particle {
    /// Create a particle uniformly placed inside a `width` x `height` viewport.
    ///
    /// Positions are scaled unit samples, so a zero-sized viewport yields
    /// particles at the origin rather than an empty sampling range.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64, config: &FieldConfig) -> Self {
        let x = rng.gen::<f64>() * width;
        let y = rng.gen::<f64>() * height;
        let vx = (rng.gen::<f64>() - 0.5) * config.move_speed;
        let vy = (rng.gen::<f64>() - 0.5) * config.move_speed;
        let radius = rng.gen::<f64>() * (config.max_radius - config.min_radius) + config.min_radius;
        let alpha = rng.gen::<f64>() * (config.max_alpha - config.min_alpha) + config.min_alpha;
        Particle {
            x,
            y,
            vx,
            vy,
            radius,
            color: config.hue.with_alpha(alpha),
        }
    }

    /// Advance one frame and bounce off the viewport edges.
    ///
    /// The velocity component is inverted once the new coordinate lies
    /// outside `[0, extent]`; the position itself is not clamped, so a
    /// particle may sit up to one step past an edge for a single frame.
    pub fn step(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.fill_circle(self.x, self.y, self.radius, self.color);
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn at(x: f64, y: f64, vx: f64, vy: f64) -> Particle {
        Particle {
            x,
            y,
            vx,
            vy,
            radius: 2.0,
            color: Color::rgb(100, 149, 237).with_alpha(0.2),
        }
    }

    #[test]
    fn spawn_respects_configured_ranges() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, 800.0, 600.0, &config);
            assert!((0.0..=800.0).contains(&p.x));
            assert!((0.0..=600.0).contains(&p.y));
            assert!((-0.25..0.25).contains(&p.vx));
            assert!((-0.25..0.25).contains(&p.vy));
            assert!((1.0..3.0).contains(&p.radius));
            assert!((0.1..0.4).contains(&p.color.alpha));
            assert_eq!((p.color.r, p.color.g, p.color.b), (100, 149, 237));
        }
    }

    #[test]
    fn spawn_in_zero_sized_viewport_lands_on_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = Particle::spawn(&mut rng, 0.0, 0.0, &FieldConfig::default());
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn step_moves_by_velocity_inside_bounds() {
        let mut p = at(100.0, 50.0, 0.2, -0.1);
        p.step(800.0, 600.0);
        assert!((p.x - 100.2).abs() < 1e-12);
        assert!((p.y - 49.9).abs() < 1e-12);
        assert_eq!((p.vx, p.vy), (0.2, -0.1));
    }

    #[rstest]
    #[case::right_edge(799.9, 300.0, 0.2, 0.0)]
    #[case::left_edge(0.1, 300.0, -0.2, 0.0)]
    fn crossing_x_edge_flips_vx_once(#[case] x: f64, #[case] y: f64, #[case] vx: f64, #[case] vy: f64) {
        let mut p = at(x, y, vx, vy);
        p.step(800.0, 600.0);
        assert_eq!(p.vx, -vx, "velocity reflects on crossing");
        // Overshoot is not clamped.
        assert!(p.x < 0.0 || p.x > 800.0);

        p.step(800.0, 600.0);
        assert_eq!(p.vx, -vx, "no second flip after re-entering");
        assert!((0.0..=800.0).contains(&p.x));
    }

    #[test]
    fn axes_reflect_independently() {
        let mut p = at(400.0, 599.9, 0.1, 0.25);
        p.step(800.0, 600.0);
        assert_eq!(p.vx, 0.1);
        assert_eq!(p.vy, -0.25);
    }

    #[test]
    fn landing_exactly_on_edge_does_not_reflect() {
        let mut p = at(799.5, 300.0, 0.5, 0.0);
        p.step(800.0, 600.0);
        assert_eq!(p.x, 800.0);
        assert_eq!(p.vx, 0.5);
    }

    #[test]
    fn overshoot_stays_within_one_step_of_bounds() {
        let config = FieldConfig {
            move_speed: 6.0,
            ..FieldConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(9);
        let mut particles: Vec<_> = (0..50)
            .map(|_| Particle::spawn(&mut rng, 120.0, 90.0, &config))
            .collect();
        for _ in 0..2_000 {
            for p in &mut particles {
                p.step(120.0, 90.0);
                assert!(p.x >= -p.vx.abs() && p.x <= 120.0 + p.vx.abs());
                assert!(p.y >= -p.vy.abs() && p.y <= 90.0 + p.vy.abs());
            }
        }
    }

    #[test]
    fn distance_is_euclidean_and_symmetric() {
        let a = at(0.0, 0.0, 0.0, 0.0);
        let b = at(3.0, 4.0, 0.0, 0.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }
}
