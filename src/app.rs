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

//! Window host: owns the field, the section layout, and the presentation
//! surface, and drives them from winit events.

use std::rc::Rc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use crate::canvas::FrameCanvas;
use crate::config::{Cli, FieldConfig};
use crate::fade_in::{FadeInObserver, SectionLayout};
use crate::field::ParticleField;
use crate::render::{create_render_context, RenderContext, SurfaceSize};

/// Pixels scrolled per wheel notch or arrow key press.
const LINE_SCROLL: f64 = 40.0;
/// Fraction of the viewport scrolled by page keys.
const PAGE_SCROLL_RATIO: f64 = 0.9;

/// Everything the host needs to know before the window exists.
#[derive(Debug, Clone, PartialEq)]
pub struct AppOptions {
    pub field: FieldConfig,
    pub sections: usize,
    /// Fixed logical window size, or `None` for borderless fullscreen.
    pub window_size: Option<(u32, u32)>,
    pub force_cpu: bool,
    pub seed: Option<u64>,
}

impl From<&Cli> for AppOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            field: cli.field_config(),
            sections: cli.sections as usize,
            window_size: cli.window_size(),
            force_cpu: cli.cpu,
            seed: cli.seed,
        }
    }
}

/// Page delta (positive scrolls down) for a mouse wheel event.
pub fn wheel_scroll(delta: MouseScrollDelta, scale_factor: f64) -> f64 {
    match delta {
        MouseScrollDelta::LineDelta(_, lines) => -f64::from(lines) * LINE_SCROLL,
        MouseScrollDelta::PixelDelta(pos) => -pos.y / scale_factor,
    }
}

/// Page delta for a navigation key, or `None` if the key does not scroll.
pub fn key_scroll(key_code: KeyCode, viewport_height: f64) -> Option<f64> {
    let page = viewport_height * PAGE_SCROLL_RATIO;
    match key_code {
        KeyCode::ArrowDown => Some(LINE_SCROLL),
        KeyCode::ArrowUp => Some(-LINE_SCROLL),
        KeyCode::PageDown | KeyCode::Space => Some(page),
        KeyCode::PageUp => Some(-page),
        KeyCode::Home => Some(f64::NEG_INFINITY),
        KeyCode::End => Some(f64::INFINITY),
        _ => None,
    }
}

/// Main application state for the backdrop.
pub struct App {
    options: AppOptions,

    // Window and rendering (initialized on resume)
    window: Option<Rc<Window>>,
    render: Option<RenderContext>,
    /// Set once surface acquisition has failed; frames become no-ops.
    surface_failed: bool,
    size: SurfaceSize,

    // Scene
    field: Option<ParticleField>,
    layout: SectionLayout,
    observer: FadeInObserver,

    // Timing
    frame_count: u64,
    fps_timer: Instant,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        App {
            layout: SectionLayout::new(options.sections, 0.0, 0.0),
            options,
            window: None,
            render: None,
            surface_failed: false,
            size: SurfaceSize::default(),
            field: None,
            observer: FadeInObserver::default(),
            frame_count: 0,
            fps_timer: Instant::now(),
        }
    }

    /// Build the field and the section layout for the initial viewport.
    fn init_scene(&mut self, size: SurfaceSize) {
        let (width, height) = (f64::from(size.width), f64::from(size.height));
        let config = self.options.field;
        self.field = Some(match self.options.seed {
            Some(seed) => ParticleField::with_seed(config, width, height, seed),
            None => ParticleField::new(config, width, height),
        });
        log::info!(
            "Field: {} particles in {}x{}",
            config.particle_count,
            size.width,
            size.height
        );

        self.layout = SectionLayout::new(self.options.sections, width, height);
        self.observer = FadeInObserver::default();
        self.observer.observe_all(&mut self.layout);
        self.observer.update(&mut self.layout);
        self.fps_timer = Instant::now();
    }

    /// Acquire the drawing surface. On failure the backdrop disables
    /// itself for the rest of the run.
    fn acquire_surface(&mut self, window: &Rc<Window>, size: SurfaceSize) {
        match create_render_context(window, size, self.options.force_cpu) {
            Ok(render) => {
                log::debug!("Surface ready: {}", render.backend_name());
                self.render = Some(render);
            }
            Err(e) => {
                log::warn!("Drawing surface unavailable, backdrop disabled: {e}");
                self.surface_failed = true;
            }
        }
    }

    fn handle_resize(&mut self, physical: PhysicalSize<u32>) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let size = SurfaceSize::from_physical(physical.width, physical.height, window.scale_factor());
        self.resize_scene(size);
        if size.is_empty() {
            log::debug!("Viewport is empty, pausing presentation");
            return;
        }

        match self.render.as_mut() {
            Some(render) => {
                if let Err(e) = render.resize(size) {
                    log::error!("Failed to resize drawing surface, backdrop disabled: {e}");
                    self.render = None;
                    self.surface_failed = true;
                }
            }
            None if !self.surface_failed => self.acquire_surface(&window, size),
            None => {}
        }
    }

    /// Regenerate the field for a new viewport. The section layout keeps its
    /// last non-empty geometry so a minimized window does not lose its scroll.
    fn resize_scene(&mut self, size: SurfaceSize) {
        self.size = size;
        let (width, height) = (f64::from(size.width), f64::from(size.height));
        if let Some(field) = self.field.as_mut() {
            field.resize(width, height);
        }
        if !size.is_empty() {
            self.layout.resize(width, height);
            self.observer.update(&mut self.layout);
        }
    }

    fn scroll(&mut self, delta: f64) {
        if self.layout.scroll_by(delta) {
            self.observer.update(&mut self.layout);
        }
    }

    fn handle_key(&mut self, key_code: KeyCode, event_loop: &ActiveEventLoop) {
        if matches!(key_code, KeyCode::Escape | KeyCode::KeyQ) {
            event_loop.exit();
        } else if let Some(delta) = key_scroll(key_code, f64::from(self.size.height)) {
            self.scroll(delta);
        }
    }

    /// Log frame rate once per second.
    fn update_fps_counter(&mut self) {
        self.frame_count += 1;
        let elapsed = self.fps_timer.elapsed().as_secs_f64();
        if elapsed >= 1.0 {
            #[allow(clippy::cast_precision_loss)]
            let fps = self.frame_count as f64 / elapsed;
            log::debug!("FPS: {fps:.1}, scroll: {:.0}", self.layout.scroll());
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }
    }

    fn update_and_render(&mut self) {
        if !self.size.is_empty() {
            if let (Some(render), Some(field)) = (self.render.as_mut(), self.field.as_mut()) {
                let size = render.size();
                let layout = &mut self.layout;
                layout.advance();
                let background = field.config().background;
                render.with_frame(|frame| {
                    let mut canvas = FrameCanvas::new(frame, size.width, size.height, background);
                    field.frame(&mut canvas);
                    layout.draw(&mut canvas);
                });
                if let Err(e) = render.present() {
                    log::warn!("Dropped frame: {e}");
                }
                self.update_fps_counter();
            }
        }

        // The loop has no terminal state: always ask for the next frame.
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attrs = Window::default_attributes()
            .with_title("Particle Backdrop")
            .with_resizable(true);

        let window_attrs = if let Some((w, h)) = self.options.window_size {
            if let Some(monitor) = event_loop.available_monitors().next() {
                let monitor_size = monitor.size();
                let max = SurfaceSize::from_physical(
                    monitor_size.width,
                    monitor_size.height,
                    monitor.scale_factor(),
                );
                if w > max.width || h > max.height {
                    log::error!(
                        "Requested size {w}x{h} exceeds display size {}x{}",
                        max.width,
                        max.height
                    );
                    event_loop.exit();
                    return;
                }
            }
            log::info!("Window mode: {w}x{h}");
            window_attrs.with_inner_size(LogicalSize::new(w, h))
        } else {
            log::info!("Window mode: fullscreen");
            window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                log::error!("{}", crate::error::BackdropError::from(e));
                event_loop.exit();
                return;
            }
        };

        let physical = window.inner_size();
        let size = SurfaceSize::from_physical(physical.width, physical.height, window.scale_factor());
        log::info!(
            "Window: {}x{} physical, {}x{} logical, scale={}",
            size.physical_width,
            size.physical_height,
            size.width,
            size.height,
            window.scale_factor()
        );

        self.size = size;
        self.init_scene(size);
        if !size.is_empty() {
            self.acquire_surface(&window, size);
        }
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.handle_key(key_code, event_loop);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.scroll(wheel_scroll(delta, scale));
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                self.update_and_render();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
