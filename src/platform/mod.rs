//=========================================================================
// Platform Subsystem
//=========================================================================
//
// Owns the winit window on the main thread and forwards input to the
// core thread.
//
//  Main thread                           Core thread
//  ┌──────────────────────────┐          ┌──────────────────┐
//  │ winit event loop         │          │ EventCollector   │
//  │  ↓                       │          │  ↓               │
//  │ InputProcessor           │          │ Simulation       │
//  │  ↓                       │          │                  │
//  │ InputBuffer              │          └──────────────────┘
//  │  ↓ (RedrawRequested)     │                   ↑
//  │ channel ─────────────────┼───────────────────┘
//  └──────────────────────────┘   PlatformEvent
//
// RedrawRequested is the frame boundary: buffered input goes out as one
// message. Resizes are forwarded immediately. If the core thread has
// gone away, sends fail quietly so the window can still be closed.
//
//=========================================================================

//=== Module Declarations =================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Dependencies ===============================================

use crate::core::error::PlatformError;
use crate::core::platform_bridge::PlatformEvent;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== Platform ============================================================

/// Not `Send`; lives on the thread that called `Engine::run`.
pub(crate) struct Platform {
    window: Option<Window>,
    title: String,
    buffer: InputBuffer,
    event_sender: Sender<PlatformEvent>,
    input_processor: InputProcessor,
}

impl Platform {
    pub(crate) fn new(event_sender: Sender<PlatformEvent>, title: &str) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title: title.to_string(),
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    /// Runs the winit event loop until the window closes.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    fn send(&self, event: PlatformEvent) {
        if self.event_sender.send(event).is_err() {
            warn!(target: "platform", "Core thread gone, dropping platform event");
        }
    }

    fn flush_input_buffer(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };

        trace!(
            target: "platform::input",
            "Flushing {} discrete + {} continuous events",
            discrete.len(),
            continuous.len()
        );
        self.send(PlatformEvent::Inputs { discrete, continuous });
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
            .with_inner_size(LogicalSize::new(1280, 720));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.send(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.send(PlatformEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.buffer.push(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let event = self.input_processor.process_wheel(delta);
                self.buffer.push(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                for event in self.input_processor.process_key_event(&key_event) {
                    self.buffer.push(event);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.buffer.push(event);
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
