//! Gesture recognition
//!
//! Raw pointer events (mouse buttons or touches) go into a [`GestureDetector`],
//! which turns them into the high-level callbacks of [`GestureHandler`]:
//! taps with a tap count, long presses, pans, flings and two-finger zooms.

pub mod detector;

pub use detector::{GestureConfig, GestureDetector};

use serde::{Deserialize, Serialize};

/// Identifier of an active pointer (touch id, or a fixed id for the mouse)
pub type PointerId = u64;

/// Which button produced a pointer event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Left mouse button or a touch
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Receiver of recognized gestures
///
/// Coordinates are in screen pixels with the origin at the top-left corner.
/// Every method returns whether the gesture was handled; optional gestures
/// default to "not handled".
pub trait GestureHandler {
    /// A pointer touched the screen
    fn touch_down(&mut self, _x: f32, _y: f32, _pointer: PointerId, _button: PointerButton) -> bool {
        false
    }

    /// A pointer was released inside its tap square. `count` grows for
    /// consecutive taps within the tap interval.
    fn tap(&mut self, x: f32, y: f32, count: u32, button: PointerButton) -> bool;

    /// A pointer was held still for the long-press duration
    fn long_press(&mut self, x: f32, y: f32) -> bool;

    /// A pointer was released quickly after moving, velocity in pixels per second
    fn fling(&mut self, _velocity_x: f32, _velocity_y: f32, _button: PointerButton) -> bool {
        false
    }

    /// A single pointer moved outside its tap square
    fn pan(&mut self, x: f32, y: f32, delta_x: f32, delta_y: f32) -> bool;

    /// A panning pointer was released
    fn pan_stop(&mut self, _x: f32, _y: f32, _pointer: PointerId, _button: PointerButton) -> bool {
        false
    }

    /// Two pointers are down; distances between them at pinch start and now
    fn zoom(&mut self, initial_distance: f32, distance: f32) -> bool;

    /// One of the two pinching pointers was released
    fn pinch_stop(&mut self);
}
