//! Input state tracking
//!
//! Turns winit mouse, touch and wheel events into pointer events for the
//! gesture detector, and tracks keys pressed this frame.

use std::collections::HashSet;
use std::time::Instant;

use glam::Vec2;
use winit::event::{
    ElementState, KeyEvent, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::gesture::{GestureDetector, GestureHandler, PointerButton, PointerId};

/// Pointer id used for the mouse, outside the range of touch ids
pub const MOUSE_POINTER: PointerId = u64::MAX;

/// Wheel pixels treated as one scrolled line
pub const PIXELS_PER_LINE: f32 = 40.0;

/// A pointer event in top-left window pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { pointer: PointerId, x: f32, y: f32, button: PointerButton },
    Moved { pointer: PointerId, x: f32, y: f32 },
    Up { pointer: PointerId, x: f32, y: f32, button: PointerButton },
    /// The platform aborted all pointers
    Cancelled,
    /// Mouse wheel; positive lines scroll up
    Wheel { lines: f32 },
}

impl PointerEvent {
    /// Feed the event to a gesture detector
    ///
    /// Wheel events are not gestures and return `false`.
    pub fn dispatch<H: GestureHandler>(
        self,
        detector: &mut GestureDetector,
        handler: &mut H,
        now: Instant,
    ) -> bool {
        match self {
            PointerEvent::Down { pointer, x, y, button } => {
                detector.touch_down(handler, pointer, x, y, button, now)
            }
            PointerEvent::Moved { pointer, x, y } => detector.touch_dragged(handler, pointer, x, y, now),
            PointerEvent::Up { pointer, x, y, button } => {
                detector.touch_up(handler, pointer, x, y, button, now)
            }
            PointerEvent::Cancelled => {
                detector.cancel();
                false
            }
            PointerEvent::Wheel { .. } => false,
        }
    }
}

/// Tracks keyboard and pointer input state
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,
    /// Current cursor position
    cursor: Vec2,
    /// Mouse button acting as the gesture pointer, if held
    mouse_button: Option<PointerButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            keys_just_pressed: HashSet::new(),
            cursor: Vec2::ZERO,
            mouse_button: None,
        }
    }

    /// Process a window event, returning the pointer event it produces
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(key_code),
                    state,
                    ..
                },
                ..
            } => {
                self.key(*key_code, *state);
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => self.mouse_wheel(*delta),
            WindowEvent::Touch(touch) => self.touch(
                touch.id,
                touch.phase,
                touch.location.x as f32,
                touch.location.y as f32,
            ),
            WindowEvent::Focused(false) => {
                self.keys_pressed.clear();
                self.mouse_button.take().map(|_| PointerEvent::Cancelled)
            }
            _ => None,
        }
    }

    fn key(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_pressed.insert(key_code) {
                    self.keys_just_pressed.insert(key_code);
                }
            }
            ElementState::Released => {
                self.keys_pressed.remove(&key_code);
            }
        }
    }

    fn cursor_moved(&mut self, x: f32, y: f32) -> Option<PointerEvent> {
        self.cursor = Vec2::new(x, y);
        self.mouse_button.map(|_| PointerEvent::Moved { pointer: MOUSE_POINTER, x, y })
    }

    fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> Option<PointerEvent> {
        let button = match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            _ => return None,
        };
        let (x, y) = (self.cursor.x, self.cursor.y);

        match state {
            ElementState::Pressed if self.mouse_button.is_none() => {
                self.mouse_button = Some(button);
                Some(PointerEvent::Down { pointer: MOUSE_POINTER, x, y, button })
            }
            ElementState::Released if self.mouse_button == Some(button) => {
                self.mouse_button = None;
                Some(PointerEvent::Up { pointer: MOUSE_POINTER, x, y, button })
            }
            // Extra buttons while one is held are not separate pointers.
            _ => None,
        }
    }

    fn mouse_wheel(&mut self, delta: MouseScrollDelta) -> Option<PointerEvent> {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
        };
        (lines != 0.0).then_some(PointerEvent::Wheel { lines })
    }

    fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) -> Option<PointerEvent> {
        let button = PointerButton::Primary;
        Some(match phase {
            TouchPhase::Started => PointerEvent::Down { pointer: id, x, y, button },
            TouchPhase::Moved => PointerEvent::Moved { pointer: id, x, y },
            TouchPhase::Ended => PointerEvent::Up { pointer: id, x, y, button },
            TouchPhase::Cancelled => PointerEvent::Cancelled,
        })
    }

    /// Call at end of frame to reset per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if key was just pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_key_press() {
        let mut input = InputState::new();
        assert!(!input.is_key_pressed(KeyCode::KeyO));

        input.key(KeyCode::KeyO, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyO));
        assert!(input.is_key_just_pressed(KeyCode::KeyO));

        input.end_frame();
        // Key repeat does not count as a new press
        input.key(KeyCode::KeyO, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyO));
        assert!(!input.is_key_just_pressed(KeyCode::KeyO));

        input.key(KeyCode::KeyO, ElementState::Released);
        assert!(!input.is_key_pressed(KeyCode::KeyO));
    }

    #[test]
    fn test_mouse_drag_produces_pointer_events() {
        let mut input = InputState::new();

        assert_eq!(input.cursor_moved(10.0, 20.0), None);
        assert_eq!(
            input.mouse_input(ElementState::Pressed, MouseButton::Left),
            Some(PointerEvent::Down { pointer: MOUSE_POINTER, x: 10.0, y: 20.0, button: PointerButton::Primary })
        );
        assert_eq!(
            input.cursor_moved(15.0, 25.0),
            Some(PointerEvent::Moved { pointer: MOUSE_POINTER, x: 15.0, y: 25.0 })
        );
        assert_eq!(
            input.mouse_input(ElementState::Released, MouseButton::Left),
            Some(PointerEvent::Up { pointer: MOUSE_POINTER, x: 15.0, y: 25.0, button: PointerButton::Primary })
        );
        assert_eq!(input.cursor_moved(30.0, 30.0), None);
    }

    #[test]
    fn test_second_mouse_button_is_ignored_while_held() {
        let mut input = InputState::new();
        assert!(input.mouse_input(ElementState::Pressed, MouseButton::Right).is_some());
        assert_eq!(input.mouse_input(ElementState::Pressed, MouseButton::Left), None);
        assert_eq!(input.mouse_input(ElementState::Released, MouseButton::Left), None);
        assert!(matches!(
            input.mouse_input(ElementState::Released, MouseButton::Right),
            Some(PointerEvent::Up { button: PointerButton::Secondary, .. })
        ));
    }

    #[test]
    fn test_wheel_lines() {
        let mut input = InputState::new();
        assert_eq!(
            input.mouse_wheel(MouseScrollDelta::LineDelta(0.0, 2.0)),
            Some(PointerEvent::Wheel { lines: 2.0 })
        );
        assert_eq!(
            input.mouse_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0))),
            Some(PointerEvent::Wheel { lines: -2.0 })
        );
        assert_eq!(input.mouse_wheel(MouseScrollDelta::LineDelta(3.0, 0.0)), None);
    }

    #[test]
    fn test_touch_phases() {
        let mut input = InputState::new();
        assert!(matches!(
            input.touch(7, TouchPhase::Started, 1.0, 2.0),
            Some(PointerEvent::Down { pointer: 7, .. })
        ));
        assert!(matches!(
            input.touch(7, TouchPhase::Moved, 3.0, 4.0),
            Some(PointerEvent::Moved { pointer: 7, .. })
        ));
        assert!(matches!(
            input.touch(7, TouchPhase::Ended, 3.0, 4.0),
            Some(PointerEvent::Up { pointer: 7, .. })
        ));
        assert_eq!(input.touch(7, TouchPhase::Cancelled, 0.0, 0.0), Some(PointerEvent::Cancelled));
    }

    #[derive(Default)]
    struct Taps(Vec<(f32, f32, u32)>);

    impl GestureHandler for Taps {
        fn tap(&mut self, x: f32, y: f32, count: u32, _button: PointerButton) -> bool {
            self.0.push((x, y, count));
            true
        }
        fn long_press(&mut self, _x: f32, _y: f32) -> bool {
            false
        }
        fn pan(&mut self, _x: f32, _y: f32, _dx: f32, _dy: f32) -> bool {
            false
        }
        fn zoom(&mut self, _initial: f32, _distance: f32) -> bool {
            false
        }
        fn pinch_stop(&mut self) {}
    }

    #[test]
    fn test_click_dispatches_tap() {
        let mut input = InputState::new();
        let mut detector = GestureDetector::default();
        let mut taps = Taps::default();
        let now = Instant::now();

        input.cursor_moved(200.0, 100.0);
        let down = input.mouse_input(ElementState::Pressed, MouseButton::Left).expect("down");
        down.dispatch(&mut detector, &mut taps, now);
        let up = input.mouse_input(ElementState::Released, MouseButton::Left).expect("up");
        assert!(up.dispatch(&mut detector, &mut taps, now));

        assert_eq!(taps.0, vec![(200.0, 100.0, 1)]);
        assert!(!PointerEvent::Wheel { lines: 1.0 }.dispatch(&mut detector, &mut taps, now));
    }
}
