use glam::Vec2;

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
}

/// Controller - handles pointer button states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons, in press order
    fn get_down_buttons(&self) -> &[Button];

    /// Button whose gesture owns cursor travel right now.
    ///
    /// Primary wins over secondary, secondary over middle.
    fn dragging(&self) -> Option<Button> {
        [Button::Primary, Button::Secondary, Button::Middle]
            .into_iter()
            .find(|&button| self.is_down(button))
    }
}

/// Pointer motion accumulated between two frames.
///
/// Drag travel is split by the button that was driving it when the cursor
/// moved, so a drag released before the frame is drained still counts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerDelta {
    /// Cursor travel in logical pixels per dragging button
    pub primary: Vec2,
    pub secondary: Vec2,
    pub middle: Vec2,
    /// Wheel travel in lines; positive means scrolling up (towards zoom in)
    pub scroll: f32,
}

impl PointerDelta {
    pub fn drag(button: Button, travel: Vec2) -> Self {
        let mut delta = Self::default();
        *delta.drag_mut(button) = travel;
        delta
    }

    pub fn wheel(lines: f32) -> Self {
        Self {
            scroll: lines,
            ..Self::default()
        }
    }

    pub fn drag_of(&self, button: Button) -> Vec2 {
        match button {
            Button::Primary => self.primary,
            Button::Secondary => self.secondary,
            Button::Middle => self.middle,
        }
    }

    pub fn drag_mut(&mut self, button: Button) -> &mut Vec2 {
        match button {
            Button::Primary => &mut self.primary,
            Button::Secondary => &mut self.secondary,
            Button::Middle => &mut self.middle,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary == Vec2::ZERO
            && self.secondary == Vec2::ZERO
            && self.middle == Vec2::ZERO
            && self.scroll == 0.0
    }
}
