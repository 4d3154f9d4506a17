//=========================================================================
// Virtual City Library Root
//
// An interactive decorative city scene: landmarks with tooltips and info
// panels, a draggable view, looping traffic, a cycling traffic light and
// timed ambient effects, all driven through one scene controller.
//
// Typical usage:
// ```no_run
// use virtual_city::EngineBuilder;
//
// fn main() -> Result<(), virtual_city::PlatformError> {
//     EngineBuilder::new().with_seed(7).build().run()
// }
// ```
//
// The scene itself does not need a window: `core::scene::SceneController`
// runs over any `core::surface::Surface` with virtual time.
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` holds the winit window and input conversion; nothing in it
// is part of the public API.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use crate::core::platform_bridge::PlatformError;
pub use engine::{Engine, EngineBuilder};
