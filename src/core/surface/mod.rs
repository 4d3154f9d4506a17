//=========================================================================
// Rendering Surface
//=========================================================================
//
// The injected render target the scene controller mutates.
//
// Architecture:
// ```text
//   SceneController ──commands──> dyn Surface
//                                   ├─ tooltip      (optional part)
//                                   ├─ info panel   (optional part)
//                                   ├─ container    (optional part)
//                                   │    ├─ offset
//                                   │    └─ decorative nodes
//                                   ├─ overlay      (weather, sound)
//                                   ├─ landmarks    (static)
//                                   └─ mutation counter
// ```
//
// A surface may lack its tooltip, panel or container. Operations on a
// missing part do nothing; `attach` reports whether the node landed.
//
// Structural changes (nodes attached or detached, text replaced) bump a
// mutation counter the controller drains after every command batch.
//
//=========================================================================

//=== Module Declarations =================================================

mod landmark;
mod stage;

//=== Public API ==========================================================

pub use landmark::{Landmark, LandmarkId, LandmarkKind, Rect};
pub use stage::{PanelView, Stage, TooltipView};

//=== Internal Dependencies ===============================================

use crate::core::scene::{DecorativeNode, LightPhase, NodeId, NodeKind, SceneOffset};

//=== PointerTarget =======================================================

/// What lies under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerTarget {
    /// Empty scene background (draggable).
    Scene,

    /// A static landmark.
    Landmark(LandmarkId, LandmarkKind),

    /// A dynamically added traffic car.
    Traffic(NodeId),

    /// The open info panel itself.
    Panel,

    /// The dimmed area around the open info panel.
    PanelBackdrop,

    /// Nothing at all (no container under the pointer).
    Outside,
}

impl PointerTarget {
    /// Whether pressing on this target must not start a drag.
    ///
    /// Buildings, vehicles, plants and controls are interactive; so are
    /// dynamic cars, which are vehicles too.
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Landmark(..) | Self::Traffic(_))
    }
}

//=== Population ==========================================================

/// Landmark census published once the scene has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Population {
    pub buildings: usize,
    pub vehicles: usize,
    pub plants: usize,
}

//=== Surface Trait =======================================================

/// Render target driven by the scene controller.
pub trait Surface: Send {
    //--- Tooltip ----------------------------------------------------------

    /// Moves the tooltip anchor (already offset from the pointer).
    fn move_tooltip(&mut self, x: f32, y: f32);

    fn show_tooltip(&mut self, text: &str);

    fn hide_tooltip(&mut self);

    //--- Info Panel -------------------------------------------------------

    /// Overwrites the panel contents and makes it visible.
    fn show_panel(&mut self, title: &str, body: &str);

    fn hide_panel(&mut self);

    //--- Theme ------------------------------------------------------------

    fn set_night_mode(&mut self, night: bool);

    fn set_toggle_label(&mut self, label: &str);

    //--- Container --------------------------------------------------------

    fn set_scene_offset(&mut self, offset: SceneOffset);

    /// Attaches a decorative node. Returns `false` if the part that would
    /// hold it is missing.
    fn attach(&mut self, node: DecorativeNode) -> bool;

    /// Removes a node. Returns `false` if it was not attached.
    fn detach(&mut self, id: NodeId) -> bool;

    fn node(&self, id: NodeId) -> Option<&DecorativeNode>;

    /// Ids of attached nodes of one kind, in attach order.
    fn nodes_of(&self, kind: NodeKind) -> Vec<NodeId>;

    fn count(&self, kind: NodeKind) -> usize {
        self.nodes_of(kind).len()
    }

    /// Lights one lamp of a traffic-light node.
    fn set_signal_phase(&mut self, id: NodeId, phase: LightPhase);

    //--- Landmarks --------------------------------------------------------

    fn landmarks(&self) -> &[Landmark];

    fn landmark(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks().iter().find(|l| l.id == id)
    }

    fn landmark_count(&self, kind: LandmarkKind) -> usize {
        self.landmarks().iter().filter(|l| l.kind == kind).count()
    }

    fn set_landmark_highlight(&mut self, id: LandmarkId, on: bool);

    fn set_landmark_scale(&mut self, id: LandmarkId, scale: f32);

    fn publish_population(&mut self, population: Population);

    //--- Queries ----------------------------------------------------------

    /// Topmost target at a viewport position.
    fn hit_test(&self, x: f32, y: f32) -> PointerTarget;

    /// Structural mutations since the last call, resetting the count.
    fn take_mutations(&mut self) -> usize;

    /// Counter bumped on every visible change, structural or not.
    fn revision(&self) -> u64;
}
