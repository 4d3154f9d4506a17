//=========================================================================
// State Tracker
//=========================================================================
//
// Pointer and keyboard state, persistent plus per-frame deltas.
//
// Architecture:
//   InputEvent → process_events() → held keys/buttons, pointer → query
//
// Frame lifecycle: clear() → process_events() → finalize_frame() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== StateTracker ========================================================

/// Tracks held keys/buttons, the pointer, and what changed this frame.
#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent State ------------------------------------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    pointer: (f32, f32),
    pointer_inside: bool,
    modifiers: Modifiers,

    //--- Frame Deltas ----------------------------------------------------
    keys_pressed: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    pointer_delta: (f32, f32),
    last_pointer: (f32, f32),
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears per-frame deltas.
    pub(super) fn clear(&mut self) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.last_pointer = self.pointer;
    }

    #[cfg(test)]
    pub(super) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Applies one event. Used by the binding layer, which needs the state
    /// as of each event rather than the end of the frame.
    pub(super) fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = *modifiers;
                if self.keys_down.insert(*key) {
                    self.keys_pressed.insert(*key);
                }
            }

            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = *modifiers;
                self.keys_down.remove(key);
            }

            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed.insert(*button);
                }
            }

            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = *modifiers;
                // A release without a press (button went down outside the
                // window) is still reported.
                self.buttons_down.remove(button);
                self.buttons_released.insert(*button);
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer = (*x, *y);
                self.pointer_inside = true;
            }

            InputEvent::PointerLeft => {
                self.pointer_inside = false;
            }

            InputEvent::Unidentified => {}
        }
    }

    /// Computes the pointer delta for the frame.
    pub(super) fn finalize_frame(&mut self) {
        self.pointer_delta = (
            self.pointer.0 - self.last_pointer.0,
            self.pointer.1 - self.last_pointer.1,
        );
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// `true` only on the frame the key went down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Last known pointer position in window pixels.
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Pointer movement over the last frame.
    pub fn pointer_delta(&self) -> (f32, f32) {
        self.pointer_delta
    }

    /// Whether the pointer is over the window.
    pub fn pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tracker: &mut StateTracker, events: &[InputEvent]) {
        tracker.clear();
        tracker.process_events(events);
        tracker.finalize_frame();
    }

    fn down(button: MouseButton) -> InputEvent {
        InputEvent::MouseButtonDown { button, modifiers: Modifiers::NONE }
    }

    fn up(button: MouseButton) -> InputEvent {
        InputEvent::MouseButtonUp { button, modifiers: Modifiers::NONE }
    }

    //=====================================================================
    // Keyboard
    //=====================================================================

    #[test]
    fn key_pressed_lasts_one_frame() {
        let mut tracker = StateTracker::new();
        let key_n = InputEvent::KeyDown { key: KeyCode::KeyN, modifiers: Modifiers::NONE };

        frame(&mut tracker, &[key_n.clone()]);
        assert!(tracker.is_key_pressed(KeyCode::KeyN));
        assert!(tracker.is_key_down(KeyCode::KeyN));

        frame(&mut tracker, &[]);
        assert!(!tracker.is_key_pressed(KeyCode::KeyN));
        assert!(tracker.is_key_down(KeyCode::KeyN), "Still held");
    }

    #[test]
    fn key_repeat_is_not_a_new_press() {
        let mut tracker = StateTracker::new();
        let key_t = InputEvent::KeyDown { key: KeyCode::KeyT, modifiers: Modifiers::NONE };

        frame(&mut tracker, &[key_t.clone()]);
        frame(&mut tracker, &[key_t]);
        assert!(!tracker.is_key_pressed(KeyCode::KeyT));
    }

    #[test]
    fn modifiers_follow_latest_event() {
        let mut tracker = StateTracker::new();
        frame(
            &mut tracker,
            &[InputEvent::KeyDown { key: KeyCode::KeyR, modifiers: Modifiers::SHIFT }],
        );
        assert!(tracker.modifiers().shift);
    }

    //=====================================================================
    // Mouse & Pointer
    //=====================================================================

    #[test]
    fn button_press_and_release() {
        let mut tracker = StateTracker::new();

        frame(&mut tracker, &[down(MouseButton::Left)]);
        assert!(tracker.is_button_pressed(MouseButton::Left));
        assert!(tracker.is_button_down(MouseButton::Left));

        frame(&mut tracker, &[up(MouseButton::Left)]);
        assert!(tracker.is_button_released(MouseButton::Left));
        assert!(!tracker.is_button_down(MouseButton::Left));
    }

    #[test]
    fn stray_release_is_reported() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[up(MouseButton::Left)]);
        assert!(tracker.is_button_released(MouseButton::Left));
    }

    #[test]
    fn pointer_delta_spans_frame() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::PointerMoved { x: 10.0, y: 10.0 }]);
        frame(
            &mut tracker,
            &[
                InputEvent::PointerMoved { x: 20.0, y: 15.0 },
                InputEvent::PointerMoved { x: 40.0, y: 5.0 },
            ],
        );

        assert_eq!(tracker.pointer(), (40.0, 5.0));
        assert_eq!(tracker.pointer_delta(), (30.0, -5.0));
    }

    #[test]
    fn pointer_leave_and_return() {
        let mut tracker = StateTracker::new();
        frame(&mut tracker, &[InputEvent::PointerMoved { x: 1.0, y: 1.0 }]);
        assert!(tracker.pointer_inside());

        frame(&mut tracker, &[InputEvent::PointerLeft]);
        assert!(!tracker.pointer_inside());
        assert_eq!(tracker.pointer(), (1.0, 1.0), "Position is kept");
    }
}
