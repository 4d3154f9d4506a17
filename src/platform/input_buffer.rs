//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-frame store between the winit callbacks and the channel flush.
//
// Architecture:
//   push_discrete()   → discrete: Vec<InputEvent>   (ordered)
//   push_continuous() → pending pointer move         (last wins)
//   drain()           → (discrete, continuous) or None when empty
//
// A button press or pointer-leave is position-sensitive: any pending
// pointer move is moved into the ordered list first, so the logic thread
// hit-tests the press where it actually happened.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    pending_move: Option<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            pending_move: None,
        }
    }

    /// Replaces the pending pointer move.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.pending_move = Some(event);
    }

    /// Appends an ordered event. Consecutive duplicates are dropped.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        let positional = matches!(
            event,
            InputEvent::MouseButtonDown { .. } | InputEvent::MouseButtonUp { .. } | InputEvent::PointerLeft
        );
        if positional {
            if let Some(pointer) = self.pending_move.take() {
                self.discrete.push(pointer);
            }
        }

        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    /// Takes the frame's events, or `None` if nothing was buffered.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }
        let capacity = self.discrete.capacity();
        let discrete = std::mem::replace(&mut self.discrete, Vec::with_capacity(capacity));
        let continuous = self.pending_move.take().into_iter().collect();
        Some((discrete, continuous))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.pending_move.is_none()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
