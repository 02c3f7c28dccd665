use std::sync::Arc;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::ActionStates;
use super::{InputAction, InputSnapshot, Renderer, Scene};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub reference_width: u32,
    pub reference_height: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Labyrinth".to_string(),
            window_width: 920,
            window_height: 960,
            reference_width: 460,
            reference_height: 480,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs the window until it is closed. The scene is ticked once per key
/// press and redrawn after every tick, resize or key release.
pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let window_for_loop = Arc::clone(&window);
    let mut renderer = Renderer::new(window, config.reference_width, config.reference_height)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Wait);

    scene.load();
    info!(
        reference_width = config.reference_width,
        reference_height = config.reference_height,
        window_width = config.window_width,
        window_height = config.window_height,
        "loop_config"
    );

    let mut input_collector = InputCollector::default();
    let mut last_applied_title: Option<String> = None;
    window_for_loop.request_redraw();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window_for_loop.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                        let layout = renderer.layout();
                        debug!(
                            scale = layout.scale,
                            margin_x = layout.margin_x,
                            margin_y = layout.margin_y,
                            "canvas_resized"
                        );
                        window_for_loop.request_redraw();
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = window_for_loop.inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            window_target.exit();
                        }
                        window_for_loop.request_redraw();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        match input_collector.handle_keyboard_input(&event) {
                            KeyOutcome::Tick(snapshot) => {
                                scene.update(&snapshot);
                                let next_title = scene.window_title();
                                if next_title != last_applied_title {
                                    match &next_title {
                                        Some(title) => window_for_loop.set_title(title),
                                        None => window_for_loop.set_title(&config.window_title),
                                    }
                                    last_applied_title = next_title;
                                }
                                window_for_loop.request_redraw();
                            }
                            KeyOutcome::Redraw => window_for_loop.request_redraw(),
                            KeyOutcome::Ignored => {}
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(error) = renderer.render_scene(scene.as_ref()) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Ignored,
    Redraw,
    Tick(InputSnapshot),
}

/// Directional keys are held state so two arrows make a diagonal. Every
/// other action only counts during the tick its own press produced.
#[derive(Debug, Default)]
struct InputCollector {
    held: ActionStates,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &winit::event::KeyEvent) -> KeyOutcome {
        self.handle_key(key_event.physical_key, key_event.state, key_event.repeat)
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) -> KeyOutcome {
        let Some(action) = action_for_key(key) else {
            return KeyOutcome::Ignored;
        };
        let is_pressed = state == ElementState::Pressed;

        if is_directional(action) {
            self.held.set(action, is_pressed);
            return if is_pressed {
                KeyOutcome::Tick(InputSnapshot::new(self.held))
            } else {
                KeyOutcome::Redraw
            };
        }

        if !is_pressed || repeat {
            return KeyOutcome::Ignored;
        }
        let mut actions = self.held;
        actions.set(action, true);
        KeyOutcome::Tick(InputSnapshot::new(actions))
    }
}

fn is_directional(action: InputAction) -> bool {
    matches!(
        action,
        InputAction::MoveUp | InputAction::MoveDown | InputAction::MoveLeft | InputAction::MoveRight
    )
}

fn action_for_key(key: PhysicalKey) -> Option<InputAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(InputAction::MoveUp),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(InputAction::MoveDown),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(InputAction::MoveLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(InputAction::MoveRight),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(InputAction::Interact),
        KeyCode::Space => Some(InputAction::Acknowledge),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(InputAction::ToggleThrow),
        KeyCode::Escape => Some(InputAction::Menu),
        _ => None,
    }
}
