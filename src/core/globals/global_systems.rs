//=========================================================================
// Global Systems
//=========================================================================
//
// Container for the logic-thread systems.
//
// Each tick the input system dispatches the frame's batches to the scene,
// then the scene's timers are advanced by the real elapsed time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, InputSystem};
use crate::core::scene::{SceneConfig, SceneController};
use crate::core::surface::Stage;

//=== GlobalSystems =======================================================

/// Engine-level systems, exposed to [`crate::Engine::init`].
///
/// - `input`: key bindings and pointer dispatch
/// - `scene`: the city scene over an in-memory [`Stage`]
pub struct GlobalSystems {
    pub input: InputSystem,
    pub scene: SceneController<Stage>,
}

impl GlobalSystems {
    /// Creates the systems over a city stage of the given logical size.
    pub(crate) fn new(size: (f32, f32), config: SceneConfig, seed: u64) -> Self {
        Self {
            input: InputSystem::new(),
            scene: SceneController::new(Stage::city(size.0, size.1), config, seed),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one logic tick: input first, then `elapsed` of scene time.
    pub(crate) fn update(&mut self, batches: &[Vec<InputEvent>], elapsed: Duration) {
        self.input.process_frame(&mut self.scene, batches);
        self.scene.advance(elapsed);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
