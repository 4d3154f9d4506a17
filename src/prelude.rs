//=========================================================================
// Prelude
//=========================================================================
//
// Re-exports of the commonly used types.
//
// Usage:
//   use virtual_city::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder};
pub use crate::PlatformError;

// Systems
pub use crate::core::globals::GlobalSystems;

// Input
pub use crate::core::input::{CityAction, KeyCode, Modifiers, MouseButton};

// Scene
pub use crate::core::scene::{
    LightPhase, NodeKind, SceneConfig, SceneController, SceneOffset, SoundCue, WeatherKind,
};

// Surface & time
pub use crate::core::surface::{PointerTarget, Stage, Surface};
pub use crate::core::timer::{Scheduler, VirtualScheduler};
