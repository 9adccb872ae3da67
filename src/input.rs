//! Pointer and keyboard state tracked between winit events.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use glam::Vec2;
use winit::keyboard::KeyCode;

use crate::constants::{DOUBLE_CLICK_DISTANCE, DOUBLE_CLICK_INTERVAL};
use crate::viewer::Modifiers;

/// Input state tracking
pub struct InputState {
    pub keys_pressed: HashSet<KeyCode>,
    /// Window position in physical pixels
    pub mouse_pos: Vec2,
    pub mouse_down: bool,
    pub modifiers: Modifiers,
    /// Pointer is over the image canvas (not over a panel)
    pub in_canvas: bool,
    last_press: Option<(Instant, Vec2)>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            mouse_pos: Vec2::ZERO,
            mouse_down: false,
            modifiers: Modifiers::default(),
            in_canvas: false,
            last_press: None,
        }
    }

    /// Record a left-button press. Returns true when it completes a
    /// double-click; the pair is then consumed so a third press starts over.
    pub fn register_press(&mut self, now: Instant, pos: Vec2) -> bool {
        let interval = Duration::from_secs_f32(DOUBLE_CLICK_INTERVAL);
        let is_double = match self.last_press {
            Some((at, last)) => {
                now.saturating_duration_since(at) <= interval
                    && last.distance(pos) <= DOUBLE_CLICK_DISTANCE
            }
            None => false,
        };
        self.last_press = if is_double { None } else { Some((now, pos)) };
        is_double
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of processing keyboard input
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InputResult {
    pub toggle_fullscreen: bool,
    pub toggle_grid_lines: bool,
    pub prev_image: bool,
    pub next_image: bool,
}

/// Process keyboard input and return actions to take
pub fn process_keyboard(input: &mut InputState) -> InputResult {
    InputResult {
        toggle_fullscreen: input.keys_pressed.remove(&KeyCode::F11),
        toggle_grid_lines: input.keys_pressed.remove(&KeyCode::KeyG),
        prev_image: input.keys_pressed.remove(&KeyCode::ArrowLeft),
        next_image: input.keys_pressed.remove(&KeyCode::ArrowRight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_click_detected() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        let pos = Vec2::new(100.0, 100.0);
        assert!(!input.register_press(t0, pos));
        assert!(input.register_press(t0 + Duration::from_millis(200), pos + Vec2::new(2.0, 1.0)));
        // Third press starts a new pair
        assert!(!input.register_press(t0 + Duration::from_millis(300), pos));
    }

    #[test]
    fn test_slow_or_distant_presses_are_single() {
        let mut input = InputState::new();
        let t0 = Instant::now();
        let pos = Vec2::new(100.0, 100.0);
        input.register_press(t0, pos);
        assert!(!input.register_press(t0 + Duration::from_millis(900), pos));
        assert!(!input.register_press(
            t0 + Duration::from_millis(1000),
            pos + Vec2::new(50.0, 0.0)
        ));
    }

    #[test]
    fn test_keys_consumed_once() {
        let mut input = InputState::new();
        input.keys_pressed.insert(KeyCode::ArrowRight);
        input.keys_pressed.insert(KeyCode::KeyG);
        let result = process_keyboard(&mut input);
        assert!(result.next_image && result.toggle_grid_lines);
        assert!(!result.prev_image && !result.toggle_fullscreen);
        assert_eq!(process_keyboard(&mut input), InputResult::default());
    }
}
