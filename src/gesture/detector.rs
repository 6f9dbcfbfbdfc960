//! Pointer-event gesture detector

use std::time::{Duration, Instant};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{GestureHandler, PointerButton, PointerId};

/// Gesture recognition thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Side length in pixels of the square a pointer may wander in and still tap
    pub tap_square_size: f32,
    /// Maximum seconds between taps counted as a multi-tap
    pub tap_count_interval: f32,
    /// Seconds a pointer must be held still to trigger a long press
    pub long_press_duration: f32,
    /// Maximum seconds between the last move and release for a fling
    pub max_fling_delay: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_square_size: 20.0,
            tap_count_interval: 0.4,
            long_press_duration: 1.1,
            max_fling_delay: 0.15,
        }
    }
}

/// Longest accepted threshold; larger values effectively disable a gesture
const MAX_THRESHOLD_SECS: f32 = 1.0e6;

impl GestureConfig {
    fn duration(secs: f32) -> Duration {
        Duration::try_from_secs_f32(secs.clamp(0.0, MAX_THRESHOLD_SECS)).unwrap_or(Duration::ZERO)
    }
}

#[derive(Clone, Copy, Debug)]
struct TrackedPointer {
    id: PointerId,
    position: Vec2,
    button: PointerButton,
}

#[derive(Clone, Copy, Debug)]
struct TapRecord {
    time: Instant,
    position: Vec2,
    pointer: PointerId,
    button: PointerButton,
}

/// Turns raw pointer events into taps, long presses, pans, flings and zooms
///
/// Only the first two pointers take part; a third pointer is ignored until
/// one of them lifts. Long presses are timer driven, so the host must call
/// [`GestureDetector::update`] every frame.
pub struct GestureDetector {
    config: GestureConfig,
    primary: Option<TrackedPointer>,
    secondary: Option<TrackedPointer>,
    tap_square_center: Vec2,
    in_tap_square: bool,
    tap_count: u32,
    last_tap: Option<TapRecord>,
    long_press_deadline: Option<Instant>,
    long_press_fired: bool,
    panning: bool,
    pinching: bool,
    initial_pinch_distance: f32,
    last_move: Option<Instant>,
    velocity: Vec2,
}

impl GestureDetector {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            primary: None,
            secondary: None,
            tap_square_center: Vec2::ZERO,
            in_tap_square: false,
            tap_count: 0,
            last_tap: None,
            long_press_deadline: None,
            long_press_fired: false,
            panning: false,
            pinching: false,
            initial_pinch_distance: 0.0,
            last_move: None,
            velocity: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Whether two pointers are currently pinching
    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    /// Whether a single pointer is currently panning
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn touch_down<H: GestureHandler>(
        &mut self,
        handler: &mut H,
        pointer: PointerId,
        x: f32,
        y: f32,
        button: PointerButton,
        now: Instant,
    ) -> bool {
        let position = Vec2::new(x, y);
        let tracked = TrackedPointer { id: pointer, position, button };

        if self.primary.is_none() {
            self.primary = Some(tracked);
            self.tap_square_center = position;
            self.in_tap_square = true;
            self.pinching = false;
            self.panning = false;
            self.long_press_fired = false;
            self.long_press_deadline =
                Some(now + GestureConfig::duration(self.config.long_press_duration));
            self.last_move = Some(now);
            self.velocity = Vec2::ZERO;
        } else if self.secondary.is_none() {
            self.secondary = Some(tracked);
            self.in_tap_square = false;
            self.pinching = true;
            self.panning = false;
            self.long_press_deadline = None;
            self.initial_pinch_distance = self.pointer_distance();
        } else {
            return false;
        }

        handler.touch_down(x, y, pointer, button)
    }

    pub fn touch_dragged<H: GestureHandler>(
        &mut self,
        handler: &mut H,
        pointer: PointerId,
        x: f32,
        y: f32,
        now: Instant,
    ) -> bool {
        let position = Vec2::new(x, y);
        let previous = match self.pointer_mut(pointer) {
            Some(tracked) => std::mem::replace(&mut tracked.position, position),
            None => return false,
        };

        if self.long_press_fired {
            return false;
        }

        if self.pinching {
            if self.primary.is_some() && self.secondary.is_some() {
                return handler.zoom(self.initial_pinch_distance, self.pointer_distance());
            }
            return false;
        }

        let delta = position - previous;
        if let Some(last) = self.last_move {
            let dt = now.saturating_duration_since(last).as_secs_f32();
            if dt > 0.0 {
                self.velocity = delta / dt;
            }
        }
        self.last_move = Some(now);

        if self.in_tap_square && !self.is_within_tap_square(position, self.tap_square_center) {
            self.in_tap_square = false;
            self.long_press_deadline = None;
        }

        if self.in_tap_square {
            return false;
        }

        self.panning = true;
        handler.pan(x, y, delta.x, delta.y)
    }

    pub fn touch_up<H: GestureHandler>(
        &mut self,
        handler: &mut H,
        pointer: PointerId,
        x: f32,
        y: f32,
        button: PointerButton,
        now: Instant,
    ) -> bool {
        if self.pointer_mut(pointer).is_none() {
            return false;
        }
        let position = Vec2::new(x, y);
        let was_panning = self.panning;
        self.panning = false;
        self.long_press_deadline = None;

        if self.pinching {
            self.pinching = false;
            self.remove_pointer(pointer);
            handler.pinch_stop();
            // The remaining pointer keeps panning from where it is now.
            self.panning = true;
            self.in_tap_square = false;
            self.last_move = Some(now);
            self.velocity = Vec2::ZERO;
            return false;
        }

        self.remove_pointer(pointer);

        if self.long_press_fired {
            return false;
        }

        if self.in_tap_square {
            let continues_sequence = self.last_tap.is_some_and(|last| {
                last.button == button
                    && last.pointer == pointer
                    && now.saturating_duration_since(last.time)
                        <= GestureConfig::duration(self.config.tap_count_interval)
                    && self.is_within_tap_square(position, last.position)
            });
            self.tap_count = if continues_sequence { self.tap_count + 1 } else { 1 };
            self.last_tap = Some(TapRecord { time: now, position, pointer, button });
            return handler.tap(x, y, self.tap_count, button);
        }

        let mut handled = false;
        if was_panning {
            handled = handler.pan_stop(x, y, pointer, button);
        }

        let recently_moved = self.last_move.is_some_and(|last| {
            now.saturating_duration_since(last) <= GestureConfig::duration(self.config.max_fling_delay)
        });
        if recently_moved {
            handled = handler.fling(self.velocity.x, self.velocity.y, button) || handled;
        }
        handled
    }

    /// Fire a pending long press once its deadline has passed
    pub fn update<H: GestureHandler>(&mut self, handler: &mut H, now: Instant) -> bool {
        let Some(deadline) = self.long_press_deadline else {
            return false;
        };
        if now < deadline || !self.in_tap_square || self.pinching {
            return false;
        }
        let Some(primary) = self.primary else {
            self.long_press_deadline = None;
            return false;
        };

        self.long_press_deadline = None;
        self.long_press_fired = true;
        handler.long_press(primary.position.x, primary.position.y)
    }

    /// Forget all pointers, e.g. when the window loses focus
    pub fn cancel(&mut self) {
        self.primary = None;
        self.secondary = None;
        self.in_tap_square = false;
        self.long_press_deadline = None;
        self.long_press_fired = false;
        self.panning = false;
        self.pinching = false;
        self.last_move = None;
        self.velocity = Vec2::ZERO;
    }

    fn pointer_mut(&mut self, pointer: PointerId) -> Option<&mut TrackedPointer> {
        if let Some(tracked) = self.primary.as_mut().filter(|p| p.id == pointer) {
            return Some(tracked);
        }
        self.secondary.as_mut().filter(|p| p.id == pointer)
    }

    fn remove_pointer(&mut self, pointer: PointerId) {
        if self.primary.is_some_and(|p| p.id == pointer) {
            self.primary = self.secondary.take();
        } else if self.secondary.is_some_and(|p| p.id == pointer) {
            self.secondary = None;
        }
    }

    fn pointer_distance(&self) -> f32 {
        match (self.primary, self.secondary) {
            (Some(a), Some(b)) => a.position.distance(b.position),
            _ => 0.0,
        }
    }

    fn is_within_tap_square(&self, position: Vec2, center: Vec2) -> bool {
        let half = self.config.tap_square_size * 0.5;
        (position.x - center.x).abs() < half && (position.y - center.y).abs() < half
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
