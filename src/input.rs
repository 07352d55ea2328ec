use glam::Vec2;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

/// A pointer action in window coordinates, independent of the device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
    /// The pointer left the window; any drag must end.
    Leave,
}

/// Turns mouse and touch window events into [`PointerEvent`]s.
///
/// Only the left mouse button and the first active finger drive the pointer.
#[derive(Debug, Default)]
pub struct PointerInput {
    cursor: Vec2,
    touch: Option<u64>,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position.
    pub fn position(&self) -> Vec2 {
        self.cursor
    }

    /// Process a window event, returning the pointer action it represents.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::MouseInput { state, button, .. } => self.mouse_button(*state, *button),
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.cursor_moved(position.x, position.y))
            }
            WindowEvent::CursorLeft { .. } => Some(self.cursor_left()),
            WindowEvent::Touch(touch) => {
                self.touch(touch.id, touch.phase, touch.location.x, touch.location.y)
            }
            _ => None,
        }
    }

    pub fn mouse_button(&mut self, state: ElementState, button: MouseButton) -> Option<PointerEvent> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => Some(PointerEvent::Down(self.cursor)),
            ElementState::Released => Some(PointerEvent::Up),
        }
    }

    pub fn cursor_moved(&mut self, x: f64, y: f64) -> PointerEvent {
        self.cursor = Vec2::new(x as f32, y as f32);
        PointerEvent::Move(self.cursor)
    }

    pub fn cursor_left(&mut self) -> PointerEvent {
        PointerEvent::Leave
    }

    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) -> Option<PointerEvent> {
        let location = Vec2::new(x as f32, y as f32);

        match (phase, self.touch) {
            (TouchPhase::Started, None) => {
                self.touch = Some(id);
                self.cursor = location;
                Some(PointerEvent::Down(location))
            }
            (TouchPhase::Moved, Some(active)) if active == id => {
                self.cursor = location;
                Some(PointerEvent::Move(location))
            }
            (TouchPhase::Ended, Some(active)) if active == id => {
                self.touch = None;
                Some(PointerEvent::Up)
            }
            (TouchPhase::Cancelled, Some(active)) if active == id => {
                self.touch = None;
                Some(PointerEvent::Leave)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_uses_last_cursor_position() {
        let mut input = PointerInput::new();
        assert_eq!(
            input.cursor_moved(12.0, 34.5),
            PointerEvent::Move(Vec2::new(12.0, 34.5))
        );
        assert_eq!(
            input.mouse_button(ElementState::Pressed, MouseButton::Left),
            Some(PointerEvent::Down(Vec2::new(12.0, 34.5)))
        );
        assert_eq!(
            input.mouse_button(ElementState::Released, MouseButton::Left),
            Some(PointerEvent::Up)
        );
    }

    #[test]
    fn other_buttons_are_ignored() {
        let mut input = PointerInput::new();
        assert_eq!(input.mouse_button(ElementState::Pressed, MouseButton::Right), None);
        assert_eq!(input.mouse_button(ElementState::Released, MouseButton::Middle), None);
    }

    #[test]
    fn cursor_leaving_maps_to_leave() {
        let mut input = PointerInput::new();
        assert_eq!(input.cursor_left(), PointerEvent::Leave);
    }

    #[test]
    fn first_finger_drives_the_pointer() {
        let mut input = PointerInput::new();

        assert_eq!(
            input.touch(7, TouchPhase::Started, 1.0, 2.0),
            Some(PointerEvent::Down(Vec2::new(1.0, 2.0)))
        );
        // A second finger is ignored for the whole gesture.
        assert_eq!(input.touch(8, TouchPhase::Started, 50.0, 50.0), None);
        assert_eq!(input.touch(8, TouchPhase::Moved, 60.0, 60.0), None);

        assert_eq!(
            input.touch(7, TouchPhase::Moved, 3.0, 4.0),
            Some(PointerEvent::Move(Vec2::new(3.0, 4.0)))
        );
        assert_eq!(input.position(), Vec2::new(3.0, 4.0));
        assert_eq!(input.touch(8, TouchPhase::Ended, 60.0, 60.0), None);
        assert_eq!(
            input.touch(7, TouchPhase::Ended, 3.0, 4.0),
            Some(PointerEvent::Up)
        );
    }

    #[test]
    fn cancelled_touch_ends_drag() {
        let mut input = PointerInput::new();
        input.touch(1, TouchPhase::Started, 0.0, 0.0);

        assert_eq!(
            input.touch(1, TouchPhase::Cancelled, 0.0, 0.0),
            Some(PointerEvent::Leave)
        );
        // The slot is free again.
        assert!(matches!(
            input.touch(2, TouchPhase::Started, 5.0, 5.0),
            Some(PointerEvent::Down(_))
        ));
    }
}
