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

//! One-shot fade-in for page sections.
//!
//! [`SectionLayout`] stacks the page sections vertically under a scrollable
//! viewport and reports how much of each is visible. [`FadeInObserver`]
//! turns those reports into a single, irreversible trigger per section once
//! at least [`FADE_IN_THRESHOLD`] of it is on screen.

use std::collections::BTreeSet;

use crate::canvas::{Canvas, Color};

/// Fraction of a section that must be visible to trigger its fade-in.
pub const FADE_IN_THRESHOLD: f64 = 0.1;

/// Frames a triggered section takes to reach full opacity.
pub const FADE_IN_FRAMES: u32 = 45;

/// Section height as a fraction of the viewport height.
const SECTION_HEIGHT_RATIO: f64 = 0.8;
/// Vertical gap before each section, as a fraction of the viewport height.
const SECTION_GAP_RATIO: f64 = 0.2;
/// Horizontal inset of the panels on each side.
const SECTION_INSET_RATIO: f64 = 0.1;

const PANEL_COLOR: Color = Color::rgb(226, 232, 240);
const PANEL_ALPHA: f64 = 0.06;
const PANEL_RULE_ALPHA: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Paused,
    Running,
}

/// A top-level page section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: usize,
    /// Offset of the section's top edge from the top of the page.
    pub top: f64,
    pub height: f64,
    /// Set once the section is observed; its animation waits for the trigger.
    pub fade_in: bool,
    pub state: AnimationState,
    frames_running: u32,
}

impl Section {
    fn new(id: usize) -> Self {
        Self {
            id,
            top: 0.0,
            height: 0.0,
            fade_in: false,
            state: AnimationState::Running,
            frames_running: 0,
        }
    }

    /// Current fade progress in `[0, 1]`; sections that never opted in are
    /// fully shown.
    pub fn opacity(&self) -> f64 {
        if !self.fade_in {
            return 1.0;
        }
        match self.state {
            AnimationState::Paused => 0.0,
            AnimationState::Running => {
                f64::from(self.frames_running.min(FADE_IN_FRAMES)) / f64::from(FADE_IN_FRAMES)
            }
        }
    }

    fn advance(&mut self) {
        if self.state == AnimationState::Running && self.frames_running < FADE_IN_FRAMES {
            self.frames_running += 1;
        }
    }
}

/// Visibility report for one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub section: usize,
    /// Visible fraction of the section in `[0, 1]`.
    pub ratio: f64,
}

/// Page sections laid out top to bottom under a scrolling viewport.
#[derive(Debug, Clone)]
pub struct SectionLayout {
    sections: Vec<Section>,
    viewport_width: f64,
    viewport_height: f64,
    scroll: f64,
}

impl SectionLayout {
    pub fn new(count: usize, viewport_width: f64, viewport_height: f64) -> Self {
        let mut layout = SectionLayout {
            sections: (0..count).map(Section::new).collect(),
            viewport_width,
            viewport_height,
            scroll: 0.0,
        };
        layout.relayout();
        layout
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Total page height, including the gap before every section.
    pub fn page_height(&self) -> f64 {
        self.sections
            .last()
            .map_or(0.0, |s| s.top + s.height)
            .max(self.viewport_height)
    }

    pub fn max_scroll(&self) -> f64 {
        (self.page_height() - self.viewport_height).max(0.0)
    }

    fn relayout(&mut self) {
        let height = self.viewport_height * SECTION_HEIGHT_RATIO;
        let gap = self.viewport_height * SECTION_GAP_RATIO;
        let mut top = gap;
        for section in &mut self.sections {
            section.top = top;
            section.height = height;
            top += height + gap;
        }
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    /// Adopt new viewport dimensions; section states are kept.
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
        self.relayout();
    }

    /// Scroll by `delta` pixels (positive moves down the page). Returns
    /// whether the offset changed.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        let next = (self.scroll + delta).clamp(0.0, self.max_scroll());
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }

    /// Visible fraction of every section at the current scroll offset.
    pub fn intersections(&self) -> Vec<Intersection> {
        let view_top = self.scroll;
        let view_bottom = self.scroll + self.viewport_height;
        self.sections
            .iter()
            .map(|s| {
                let overlap = (s.top + s.height).min(view_bottom) - s.top.max(view_top);
                let ratio = if s.height > 0.0 {
                    (overlap / s.height).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                Intersection {
                    section: s.id,
                    ratio,
                }
            })
            .collect()
    }

    /// Step running fade-ins by one frame.
    pub fn advance(&mut self) {
        for section in &mut self.sections {
            section.advance();
        }
    }

    /// Draw every section as a translucent panel at its on-screen position.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        let inset = self.viewport_width * SECTION_INSET_RATIO;
        let width = self.viewport_width - 2.0 * inset;
        for section in &self.sections {
            let opacity = section.opacity();
            let y = section.top - self.scroll;
            if opacity <= 0.0 || y + section.height < 0.0 || y > self.viewport_height {
                continue;
            }
            canvas.fill_rect(
                inset,
                y,
                width,
                section.height,
                PANEL_COLOR.with_alpha(PANEL_ALPHA * opacity),
            );
            canvas.stroke_line(
                (inset, y),
                (inset + width, y),
                1.0,
                PANEL_COLOR.with_alpha(PANEL_RULE_ALPHA * opacity),
            );
        }
    }
}

/// Tracks which sections still wait for their first sufficient intersection.
#[derive(Debug, Clone)]
pub struct FadeInObserver {
    threshold: f64,
    observed: BTreeSet<usize>,
}

impl Default for FadeInObserver {
    fn default() -> Self {
        Self::new(FADE_IN_THRESHOLD)
    }
}

impl FadeInObserver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            observed: BTreeSet::new(),
        }
    }

    /// Start observing a section: tag it for fade-in and hold its animation.
    ///
    /// A section whose fade-in already started is left alone.
    pub fn observe(&mut self, section: &mut Section) {
        if section.fade_in && section.state == AnimationState::Running {
            return;
        }
        section.fade_in = true;
        section.state = AnimationState::Paused;
        section.frames_running = 0;
        self.observed.insert(section.id);
    }

    /// Observe every section in a layout.
    pub fn observe_all(&mut self, layout: &mut SectionLayout) {
        for section in layout.sections_mut() {
            self.observe(section);
        }
    }

    pub fn unobserve(&mut self, id: usize) {
        self.observed.remove(&id);
    }

    pub fn is_observing(&self, id: usize) -> bool {
        self.observed.contains(&id)
    }

    /// Apply a batch of intersection reports. Every observed section whose
    /// visible ratio reaches the threshold starts its animation and is
    /// unobserved. Returns the ids triggered by this batch.
    pub fn process(&mut self, entries: &[Intersection], sections: &mut [Section]) -> Vec<usize> {
        let mut triggered = Vec::new();
        for entry in entries {
            if entry.ratio <= 0.0 || entry.ratio < self.threshold || !self.is_observing(entry.section) {
                continue;
            }
            if let Some(section) = sections.iter_mut().find(|s| s.id == entry.section) {
                section.state = AnimationState::Running;
                self.unobserve(entry.section);
                triggered.push(entry.section);
            }
        }
        triggered
    }

    /// Recompute intersections for `layout` and apply them.
    pub fn update(&mut self, layout: &mut SectionLayout) -> Vec<usize> {
        let entries = layout.intersections();
        let triggered = self.process(&entries, layout.sections_mut());
        for id in &triggered {
            log::debug!("Section {id} entered the viewport, fading in");
        }
        triggered
    }
}
