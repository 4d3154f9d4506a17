//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// What crosses the thread boundary between the window and the scene.
//
// Only `PlatformEvent` values travel over the channel; the scene never
// sees a windowing type.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Message from the platform thread to the logic thread.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// One flush of the platform input buffer.
    ///
    /// `discrete` keeps arrival order; `continuous` holds the coalesced
    /// pointer move that followed it.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// The window was closed; the logic thread should stop.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Failure to start or run the window event loop.
#[derive(Debug)]
pub enum PlatformError {
    /// The OS refused to create an event loop.
    EventLoopCreation(String),

    /// The event loop stopped with an error.
    EventLoopExecution(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_stage() {
        let creation = PlatformError::EventLoopCreation("no display".into());
        let execution = PlatformError::EventLoopExecution("lost surface".into());

        assert_eq!(creation.to_string(), "Event loop creation failed: no display");
        assert_eq!(execution.to_string(), "Event loop error: lost surface");
    }

    #[test]
    fn errors_box_as_std_error() {
        let boxed: Box<dyn std::error::Error> =
            Box::new(PlatformError::EventLoopCreation("x".into()));
        assert!(boxed.to_string().contains("creation"));
    }
}
