//=========================================================================
// Platform Subsystem
//
// Owns the window and forwards pointer/keyboard input to the logic thread.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  EventCollector      │
//  │   ↓                      │    │   ↓                  │
//  │  InputProcessor          │    │  InputSystem         │
//  │   ↓                      │    │   ↓ (hit-test)       │
//  │  InputBuffer             │    │  SceneController     │
//  │   ├─ discrete (ordered)  │    │   ↓                  │
//  │   └─ pending move        │    │  Surface (Stage)     │
//  │   ↓                      │    └──────────────────────┘
//  │  RedrawRequested (flush) │             ↑
//  │   ↓                      │             │
//  │  crossbeam Sender ───────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// RedrawRequested is the frame boundary: everything buffered since the
// last redraw is sent as one message. Empty frames are not sent.
// If the logic thread is gone the platform keeps running so the window
// can still be closed.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::input::InputEvent;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Window manager and input aggregator.
///
/// Runs on the thread that called `Engine::run()` (winit requires the
/// main thread on macOS/iOS). The window is created lazily in `resumed()`.
pub(crate) struct Platform {
    window: Option<Window>,
    title: String,
    size: (f64, f64),
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(event_sender: Sender<PlatformEvent>, title: &str, size: (f64, f64)) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title: title.to_owned(),
            size,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends the frame's buffered input to the logic thread.
    ///
    /// On a disconnected channel the events are dropped with a warning.
    fn flush_input_buffer(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };
        let discrete_count = discrete.len();
        let continuous_count = continuous.len();

        trace!(
            target: "platform::input",
            "Flushing {} discrete + {} continuous events",
            discrete_count,
            continuous_count
        );

        if self.event_sender.send(PlatformEvent::Inputs { discrete, continuous }).is_err() {
            warn!(
                target: "platform::input",
                "Channel disconnected, dropping {} events",
                discrete_count + continuous_count
            );
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        let _ = self.event_sender.send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, Window::scale_factor)
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event =
                    self.input_processor.process_pointer_move(position.x, position.y, self.scale_factor());
                self.buffer.push_continuous(event);
            }

            WindowEvent::CursorLeft { .. } => {
                self.buffer.push_discrete(InputEvent::PointerLeft);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
