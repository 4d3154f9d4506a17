//=========================================================================
// Global Systems
//=========================================================================
//
// The systems the logic thread owns and ticks.
//
// Architecture:
//   GlobalSystems: InputSystem + SceneController<Stage>
//
//=========================================================================

//=== Module Declarations =================================================

mod global_systems;

//=== Public API ==========================================================

pub use global_systems::GlobalSystems;
