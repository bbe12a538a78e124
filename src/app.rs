use anyhow::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::config::EditorConfig;
use crate::gfx::rendering::{HeadlessBackend, RenderBackend};
use crate::runtime::Runtime;
use crate::ui::{editor_panels, UiManager};

// Extra UI drawn after the editor panels
pub type UiCallback<B> = Box<dyn Fn(&imgui::Ui, &mut Runtime<B>)>;

/// Window shell around a [`Runtime`]
///
/// Opens the window, routes input to the UI and the runtime, and runs one
/// frame per redraw, paced to the configured frame rate.
pub struct CairnApp<B: RenderBackend = HeadlessBackend> {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState<B>,
}

struct AppState<B: RenderBackend> {
    window: Option<Arc<Window>>,
    ui_manager: Option<UiManager>,
    runtime: Runtime<B>,
    ui_callback: Option<UiCallback<B>>,
    frame_period: Duration,
    next_frame: Instant,
    last_frame: Instant,
}

impl CairnApp<HeadlessBackend> {
    /// Editor without a GPU renderer.
    ///
    /// Input, behaviors, picking and the panels all run, but frames go to a
    /// [`HeadlessBackend`], so nothing is drawn into the window. Pass a real
    /// backend to [`CairnApp::new`] to see the scene.
    pub fn headless(config: EditorConfig) -> anyhow::Result<Self> {
        Self::new(config, HeadlessBackend::new())
    }
}

impl<B: RenderBackend> CairnApp<B> {
    pub fn new(config: EditorConfig, backend: B) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let frame_period = Duration::from_secs_f64(1.0 / config.window.target_fps.max(1) as f64);

        let mut runtime = Runtime::new(config, backend);
        runtime.ensure_camera();

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                ui_manager: None,
                runtime,
                ui_callback: None,
                frame_period,
                next_frame: Instant::now(),
                last_frame: Instant::now(),
            },
        })
    }

    pub fn runtime(&mut self) -> &mut Runtime<B> {
        &mut self.app_state.runtime
    }

    /// Set UI callback
    pub fn set_ui<F>(&mut self, ui_fn: F)
    where
        F: Fn(&imgui::Ui, &mut Runtime<B>) + 'static,
    {
        self.app_state.ui_callback = Some(Box::new(ui_fn));
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now()));

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop failed")?;
        Ok(())
    }
}

impl<B: RenderBackend> AppState<B> {
    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            PhysicalKey::Code(KeyCode::Delete) => self.runtime.delete_selection(),
            _ => (),
        }
    }

    fn redraw(&mut self, window: &Window) {
        let now = Instant::now();
        let delta_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let Some(ui_manager) = self.ui_manager.as_mut() else {
            self.runtime.frame(delta_time);
            return;
        };

        self.runtime.step(delta_time, ui_manager.wants_mouse());

        let runtime = &mut self.runtime;
        let ui_callback = &self.ui_callback;
        ui_manager.update_logic(window, |ui| {
            editor_panels(ui, runtime);
            if let Some(callback) = ui_callback {
                callback(ui, runtime);
            }
        });
        self.runtime.render(ui_manager.render());
    }
}

impl<B: RenderBackend> ApplicationHandler for AppState<B> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let config = &self.runtime.config.window;
        let attributes = WindowAttributes::default()
            .with_title("Cairn")
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                let window = Arc::new(window);
                let (width, height): (u32, u32) = window.inner_size().into();
                self.runtime.resize(width, height);

                let mut ui_manager = UiManager::new(&window);
                ui_manager.update_display_size(width, height);
                self.ui_manager = Some(ui_manager);
                self.window = Some(window);
                self.last_frame = Instant::now();
            }
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                return;
            }
        }

        self.runtime.input.process_window_event(&event);

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.runtime.resize(width, height);
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(&window),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        if self.ui_manager.as_ref().is_some_and(UiManager::wants_mouse) {
            return;
        }
        self.runtime.input.process_device_event(&event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(window) = self.window.as_ref() {
                window.request_redraw();
            }
            self.next_frame = (self.next_frame + self.frame_period).max(now);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}
