// src/ui/manager.rs
//! ImGui UI manager for the editor
//!
//! Owns the ImGui context and its winit platform glue, builds one UI frame
//! per window frame and hands the resulting draw data to the render backend.

use imgui::{Context, DrawData, FontConfig, FontSource, MouseCursor};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

/// ImGui UI manager
///
/// Manages the ImGui context and platform integration. Handles input
/// capture, frame timing and cursor changes; drawing the UI is left to the
/// [`RenderBackend`](crate::gfx::rendering::RenderBackend), which receives
/// the draw data together with the scene.
pub struct UiManager {
    pub context: Context,
    platform: WinitPlatform,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// Uses locked DPI mode so panel sizes stay in window pixels, the same
    /// space the viewport and picking work in.
    pub fn new(window: &Window) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        let font_size = 18.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        Self {
            context,
            platform,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Updates ImGui's display size to match the window
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Whether the last UI frame wants the mouse for itself.
    pub fn wants_mouse(&self) -> bool {
        self.context.io().want_capture_mouse
    }

    /// Whether a text field or other widget has keyboard focus.
    pub fn wants_keyboard(&self) -> bool {
        self.context.io().want_capture_keyboard
    }

    /// Handles input events and returns whether UI captured them
    ///
    /// Returns true if the UI wants to capture the input, so it should not
    /// reach behaviors or the viewport.
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) -> bool {
        match event {
            Event::WindowEvent {
                event: window_event,
                ..
            } => match window_event {
                WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::Focused(_) => {
                    self.platform
                        .handle_event(self.context.io_mut(), window, event);

                    let io = self.context.io();
                    match window_event {
                        WindowEvent::KeyboardInput { .. } => io.want_capture_keyboard,
                        WindowEvent::Focused(_) => false,
                        _ => io.want_capture_mouse,
                    }
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Builds one UI frame and returns whether UI wants input capture
    ///
    /// Call once per frame, before [`render`](Self::render).
    pub fn update_logic<F>(&mut self, window: &Window, run_ui: F) -> bool
    where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("Failed to prepare UI frame: {}", e);
        }

        let ui = self.context.frame();
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Finishes the frame built by [`update_logic`](Self::update_logic).
    ///
    /// Returns `None` when the display has no area to draw into.
    pub fn render(&mut self) -> Option<&DrawData> {
        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return None;
        }
        Some(draw_data)
    }
}
