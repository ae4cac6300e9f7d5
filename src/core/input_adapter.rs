use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use super::controller::{Button, Controller, PointerDelta};

/// Pixels of trackpad travel treated as one wheel line
const PIXELS_PER_LINE: f32 = 50.0;

/// Adapter that bridges Winit pointer events to the Controller trait
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Pressed buttons in press order
    pressed: Vec<Button>,
    /// Last cursor position in logical pixels
    cursor: Option<Vec2>,
    pending: PointerDelta,
}

impl WinitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update internal state from a window event.
    ///
    /// `scale_factor` converts winit's physical cursor positions to logical
    /// pixels so drag distances match the viewport units.
    pub fn process_event(&mut self, event: &WindowEvent, scale_factor: f64) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = Self::mouse_button_to_button(*button) {
                    self.set_button(button, *state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale_factor);
                self.cursor_moved(Vec2::new(logical.x, logical.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.pending.scroll += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
            }
            WindowEvent::Focused(false) => {
                // Releases that happen outside the window never arrive
                self.pressed.clear();
            }
            _ => {}
        }
    }

    /// Takes the motion accumulated since the previous call
    pub fn drain(&mut self) -> PointerDelta {
        std::mem::take(&mut self.pending)
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Travel is credited to the button dragging at the time of the move
    fn cursor_moved(&mut self, position: Vec2) {
        if let (Some(previous), Some(button)) = (self.cursor, self.dragging()) {
            *self.pending.drag_mut(button) += position - previous;
        }
        self.cursor = Some(position);
    }

    fn set_button(&mut self, button: Button, down: bool) {
        if down {
            if !self.pressed.contains(&button) {
                self.pressed.push(button);
            }
        } else {
            self.pressed.retain(|&b| b != button);
        }
    }

    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::Primary),
            MouseButton::Right => Some(Button::Secondary),
            MouseButton::Middle => Some(Button::Middle),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn get_down_buttons(&self) -> &[Button] {
        &self.pressed
    }
}
