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

//! The particle field: a fixed-size batch of particles confined to the
//! viewport, advanced and drawn once per frame, with faint links between
//! every pair closer than the connection distance.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::canvas::Canvas;
use crate::config::FieldConfig;
use crate::particle::Particle;

/// A proximity link between two particles, by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub opacity: f64,
}

/// Link alpha for a pair `distance` apart, or `None` at or beyond `threshold`.
///
/// Falls linearly from `scale` at zero distance towards zero at the threshold.
pub fn link_opacity(distance: f64, threshold: f64, scale: f64) -> Option<f64> {
    (distance < threshold).then(|| (1.0 - distance / threshold) * scale)
}

/// Owns the viewport bounds and the live particle set.
pub struct ParticleField {
    config: FieldConfig,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field for the given viewport, seeded from OS entropy.
    pub fn new(config: FieldConfig, width: f64, height: f64) -> Self {
        Self::with_rng(config, width, height, StdRng::from_entropy())
    }

    /// Create a reproducible field.
    pub fn with_seed(config: FieldConfig, width: f64, height: f64, seed: u64) -> Self {
        Self::with_rng(config, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FieldConfig, width: f64, height: f64, rng: StdRng) -> Self {
        let mut field = ParticleField {
            config,
            width,
            height,
            particles: Vec::with_capacity(config.particle_count),
            rng,
        };
        field.regenerate();
        field
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Stage a hand-placed particle set.
    #[cfg(test)]
    pub(crate) fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
    }

    /// Adopt new viewport bounds and discard every particle in favour of a
    /// fresh batch.
    pub fn resize(&mut self, width: f64, height: f64) {
        log::debug!(
            "Field resized {}x{} -> {}x{}, regenerating {} particles",
            self.width,
            self.height,
            width,
            height,
            self.config.particle_count
        );
        self.width = width;
        self.height = height;
        self.regenerate();
    }

    /// Generate exactly `particle_count` new particles within the bounds.
    pub fn regenerate(&mut self) {
        let (width, height) = (self.width, self.height);
        let config = self.config;
        let rng = &mut self.rng;
        self.particles.clear();
        self.particles
            .extend((0..config.particle_count).map(|_| Particle::spawn(&mut *rng, width, height, &config)));
    }

    /// All pairs closer than the connection distance.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let threshold = self.config.connection_distance;
        let scale = self.config.link_opacity;
        let particles = &self.particles;
        (0..particles.len()).flat_map(move |a| {
            ((a + 1)..particles.len()).filter_map(move |b| {
                let distance = particles[a].distance_to(&particles[b]);
                link_opacity(distance, threshold, scale).map(|opacity| Link {
                    a,
                    b,
                    distance,
                    opacity,
                })
            })
        })
    }

    /// Stroke every proximity link.
    pub fn draw_links(&self, canvas: &mut impl Canvas) {
        for link in self.links() {
            let (pa, pb) = (&self.particles[link.a], &self.particles[link.b]);
            canvas.stroke_line(
                (pa.x, pa.y),
                (pb.x, pb.y),
                self.config.link_width,
                self.config.hue.with_alpha(link.opacity),
            );
        }
    }

    /// Run one frame: clear, advance and draw each particle, then links.
    pub fn frame(&mut self, canvas: &mut impl Canvas) {
        canvas.clear_rect(0.0, 0.0, self.width, self.height);
        for particle in &mut self.particles {
            particle.step(self.width, self.height);
            particle.draw(canvas);
        }
        self.draw_links(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Color, DrawOp, RecordingCanvas};
    use rstest::rstest;

    fn still(x: f64, y: f64) -> Particle {
        Particle {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: 1.5,
            color: Color::rgb(100, 149, 237).with_alpha(0.25),
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(50)]
    #[case(300)]
    fn count_holds_after_init_and_resize(#[case] count: usize) {
        let config = FieldConfig {
            particle_count: count,
            ..FieldConfig::default()
        };
        let mut field = ParticleField::with_seed(config, 800.0, 600.0, 3);
        assert_eq!(field.particles().len(), count);
        field.resize(1024.0, 768.0);
        assert_eq!(field.particles().len(), count);
        field.resize(1024.0, 768.0);
        assert_eq!(field.particles().len(), count);
    }

    #[test]
    fn resize_regenerates_inside_new_bounds() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 11);
        let before = field.particles().to_vec();
        field.resize(1024.0, 768.0);

        assert_eq!(field.particles().len(), 50);
        assert_eq!((field.width(), field.height()), (1024.0, 768.0));
        for p in field.particles() {
            assert!((0.0..=1024.0).contains(&p.x));
            assert!((0.0..=768.0).contains(&p.y));
        }
        assert_ne!(before, field.particles(), "particles are discarded, not kept");
    }

    #[test]
    fn frame_clears_then_draws_particles_then_links() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 5);
        field.set_particles(vec![still(10.0, 10.0), still(20.0, 10.0), still(700.0, 500.0)]);
        let mut canvas = RecordingCanvas::default();
        field.frame(&mut canvas);

        assert_eq!(
            canvas.ops[0],
            DrawOp::Clear {
                x: 0.0,
                y: 0.0,
                width: 800.0,
                height: 600.0
            }
        );
        assert!(canvas.ops[1..4]
            .iter()
            .all(|op| matches!(op, DrawOp::Circle { .. })));
        assert_eq!(canvas.circles().count(), 3);
        assert_eq!(canvas.lines().count(), 1);
        assert!(matches!(canvas.ops[4], DrawOp::Line { .. }));
    }

    #[test]
    fn far_apart_pair_is_never_linked() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 1);
        let mut left = still(0.0, 300.0);
        let mut right = still(800.0, 300.0);
        left.vx = -0.25;
        right.vx = 0.25;
        field.set_particles(vec![left, right, still(400.0, 0.0)]);

        for _ in 0..5 {
            let mut canvas = RecordingCanvas::default();
            field.frame(&mut canvas);
            let linked = field.links().any(|l| (l.a, l.b) == (0, 1));
            assert!(!linked);
            assert_eq!(canvas.lines().count(), 0);
        }
    }

    #[test]
    fn link_drawn_iff_closer_than_threshold() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 1);
        field.set_particles(vec![
            still(100.0, 100.0),
            still(249.9, 100.0),
            still(100.0, 250.0),
        ]);
        let pairs: Vec<_> = field.links().map(|l| (l.a, l.b)).collect();
        // (0,1) is 149.9 apart, (0,2) exactly 150, (1,2) ~212.
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn link_uses_hue_width_and_scaled_opacity() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 1);
        field.set_particles(vec![still(100.0, 100.0), still(175.0, 100.0)]);
        let mut canvas = RecordingCanvas::default();
        field.draw_links(&mut canvas);

        let Some(DrawOp::Line { from, to, width, color }) = canvas.ops.first() else {
            panic!("expected a line, got {:?}", canvas.ops);
        };
        assert_eq!(*from, (100.0, 100.0));
        assert_eq!(*to, (175.0, 100.0));
        assert_eq!(*width, 1.0);
        assert_eq!((color.r, color.g, color.b), (100, 149, 237));
        assert!((color.alpha - 0.075).abs() < 1e-12);
    }

    #[test]
    fn opacity_strictly_decreases_with_distance() {
        let mut last = f64::INFINITY;
        for step in 0..150 {
            let d = f64::from(step);
            let opacity = link_opacity(d, 150.0, 0.15).expect("below threshold");
            assert!(opacity < last);
            assert!(opacity > 0.0);
            last = opacity;
        }
        assert_eq!(link_opacity(0.0, 150.0, 0.15), Some(0.15));
        assert_eq!(link_opacity(150.0, 150.0, 0.15), None);
        assert_eq!(link_opacity(800.0, 150.0, 0.15), None);
    }

    #[test]
    fn links_are_symmetric_in_pair_order() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 400.0, 300.0, 21);
        field.frame(&mut RecordingCanvas::default());
        let forward: Vec<_> = field.links().collect();
        let mut reversed = field.particles().to_vec();
        reversed.reverse();
        let n = reversed.len();
        field.set_particles(reversed);
        let mut mirrored: Vec<_> = field
            .links()
            .map(|l| (n - 1 - l.b, n - 1 - l.a, l.distance))
            .collect();
        mirrored.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        let forward: Vec<_> = forward.iter().map(|l| (l.a, l.b, l.distance)).collect();
        assert_eq!(forward, mirrored);
    }

    #[test]
    fn boundary_holds_over_many_frames() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 320.0, 240.0, 77);
        let mut canvas = RecordingCanvas::default();
        for _ in 0..5_000 {
            canvas.ops.clear();
            field.frame(&mut canvas);
            for p in field.particles() {
                assert!(p.x >= -p.vx.abs() && p.x <= 320.0 + p.vx.abs());
                assert!(p.y >= -p.vy.abs() && p.y <= 240.0 + p.vy.abs());
            }
        }
    }

    #[test]
    fn frames_never_change_particle_count() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 1);
        let mut canvas = RecordingCanvas::default();
        for _ in 0..100 {
            field.frame(&mut canvas);
        }
        field.regenerate();
        assert_eq!(field.particles().len(), field.config().particle_count);
    }

    #[test]
    fn empty_field_only_clears() {
        let config = FieldConfig {
            particle_count: 0,
            ..FieldConfig::default()
        };
        let mut field = ParticleField::with_seed(config, 800.0, 600.0, 0);
        let mut canvas = RecordingCanvas::default();
        field.frame(&mut canvas);
        assert_eq!(canvas.ops.len(), 1);
    }
}
