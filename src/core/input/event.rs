//=========================================================================
// Input Event Types
//
// Portable representation of the pointer and keyboard input the city
// scene reacts to.
//
// The platform layer (Winit) converts OS events into these types before
// they cross the thread boundary, so the scene controller and its input
// binding never see a platform type.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (pointer position, held buttons, drag deltas)
//         ↓
//    ActionMapper (n / t / r / Escape → CityAction)
//         ↓
//    SceneController commands
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Only `Left` drives panning and clicks; the other buttons are carried
/// through so bindings can be added without touching the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Keys are physical locations, so `KeyN` is reported whether or not
/// Shift or Caps Lock is active. This is what makes the scene shortcuts
/// case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,

    /// Keys the platform reported but the scene has no name for.
    Unidentified,
}

impl KeyCode {
    /// Resolves a typed character to its physical key, ignoring case.
    ///
    /// Returns `None` for characters outside `a-z` / `0-9` / space.
    ///
    /// ```
    /// use virtual_city::core::input::KeyCode;
    ///
    /// assert_eq!(KeyCode::from_char('n'), Some(KeyCode::KeyN));
    /// assert_eq!(KeyCode::from_char('N'), Some(KeyCode::KeyN));
    /// assert_eq!(KeyCode::from_char('?'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        use KeyCode::*;
        const LETTERS: [KeyCode; 26] = [
            KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
            KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
            KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            Digit0, Digit1, Digit2, Digit3, Digit4,
            Digit5, Digit6, Digit7, Digit8, Digit9,
        ];

        let lower = c.to_ascii_lowercase();
        match lower {
            'a'..='z' => Some(LETTERS[(lower as u8 - b'a') as usize]),
            '0'..='9' => Some(DIGITS[(lower as u8 - b'0') as usize]),
            ' ' => Some(Space),
            _ => None,
        }
    }
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// # Equality & Hashing Semantics
///
/// Events compare by type + payload (key/button + modifiers), except
/// `PointerMoved`, which compares equal regardless of coordinates so the
/// input buffer can coalesce moves (last position wins).
///
/// ```text
/// KeyDown{N, NONE}   == KeyDown{N, NONE}     ✓
/// KeyDown{N, NONE}   == KeyDown{N, SHIFT}    ✗
/// PointerMoved{...}  == PointerMoved{...}    ✓
/// ```
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Key released.
    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    /// Mouse button pressed at the current pointer position.
    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Mouse button released.
    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Pointer moved to a new position (client pixels, top-left origin).
    PointerMoved { x: f32, y: f32 },

    /// Pointer left the window entirely.
    PointerLeft,

    /// Unrecognized event, ignored downstream.
    Unidentified,
}

impl InputEvent {
    /// Returns `true` for events whose latest value supersedes earlier ones.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::PointerMoved { .. })
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown { key: a, modifiers: ma }, KeyDown { key: b, modifiers: mb })
            | (KeyUp { key: a, modifiers: ma }, KeyUp { key: b, modifiers: mb }) => {
                a == b && ma == mb
            }
            (
                MouseButtonDown { button: a, modifiers: ma },
                MouseButtonDown { button: b, modifiers: mb },
            )
            | (
                MouseButtonUp { button: a, modifiers: ma },
                MouseButtonUp { button: b, modifiers: mb },
            ) => a == b && ma == mb,
            (PointerMoved { .. }, PointerMoved { .. }) => true,
            (PointerLeft, PointerLeft) => true,
            (Unidentified, Unidentified) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Hashes discriminant + key/button + modifiers; pointer coordinates are
/// left out to stay consistent with equality.
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown { key, modifiers } | Self::KeyUp { key, modifiers } => {
                key.hash(state);
                modifiers.hash(state);
            }
            Self::MouseButtonDown { button, modifiers }
            | Self::MouseButtonUp { button, modifiers } => {
                button.hash(state);
                modifiers.hash(state);
            }
            _ => {}
        }
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Bindings match modifiers exactly, so `Ctrl+R` (browser reload habit)
/// does not reset the scene while plain `R` and `Shift+R` do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };

    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };

    /// Ctrl only.
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };

    /// Alt only.
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
}

//=========================================================================
// Unit Tests
//=========================================================================
