//=========================================================================
// Scene System
//=========================================================================
//
// The virtual city's scene: one controller owning all state, the
// decorative nodes it creates, and its configuration.
//
// Architecture:
//   SceneController
//     ├─ config: SceneConfig
//     ├─ offset + drag: SceneOffset, DragState
//     ├─ traffic_light: TrafficLight
//     ├─ scheduler: Box<dyn Scheduler>   (timers as TimerTask values)
//     ├─ rng: Box<dyn RngCore + Send>
//     └─ surface: S: Surface             (DecorativeNode in/out)
//
// Flow:
//   command / advance(dt) → surface mutations → observe → load shedding
//
//=========================================================================

//=== Module Declarations =================================================

mod config;
mod controller;
mod decoration;
mod offset;
mod traffic_light;

//=== Public API ==========================================================

pub use config::SceneConfig;
pub use controller::{SceneController, DAY_LABEL, NIGHT_LABEL, WELCOME_BODY, WELCOME_TITLE};
pub use decoration::{
    Animation, Appearance, DecorativeNode, LightPhase, NodeId, NodeKind, Particle, Placement,
    Repeat, SoundCue, WeatherKind, AMBIENT_GLYPHS, CAR_ANIMATIONS, VEHICLE_SPRITES,
};
pub use offset::{DragState, SceneOffset};
pub use traffic_light::TrafficLight;
