//! Window and device event handling for GameState.

use winit::event::{DeviceEvent, WindowEvent};
use winit::keyboard::PhysicalKey;

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.frame.camera.camera_mut().set_aspect(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);
                }
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.process_scroll(delta);
                false
            }
            WindowEvent::Focused(focused) => {
                self.set_cursor_captured(focused);
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
                self.renderer.window.request_redraw();
                !self.running
            }
            _ => false,
        }
    }

    /// Handle device events (e.g. raw mouse motion).
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.is_cursor_locked() {
                self.input.process_mouse_motion(delta);
            }
        }
    }
}
