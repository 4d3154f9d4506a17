//=========================================================================
// Traffic Light
//=========================================================================
//
// Free-running three-phase cycle: red → yellow → green → red ...
//
// The light starts on red; after k ticks the active phase has index
// k mod 3. The cycle keeps running even if the surface has no container
// to show the light in.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::decoration::{LightPhase, NodeId};

//=== TrafficLight ========================================================

/// Cycle state plus the surface node displaying it, once created.
#[derive(Debug, Clone, Default)]
pub struct TrafficLight {
    node: Option<NodeId>,
    ticks: u64,
    created: bool,
}

impl TrafficLight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the light as created, remembering its node if it was attached.
    pub fn install(&mut self, node: Option<NodeId>) {
        self.created = true;
        self.node = node;
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Currently lit phase.
    pub fn active(&self) -> LightPhase {
        LightPhase::ALL[(self.ticks % LightPhase::ALL.len() as u64) as usize]
    }

    /// Number of ticks since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances one phase and returns the new active phase.
    pub fn tick(&mut self) -> LightPhase {
        self.ticks += 1;
        self.active()
    }

    /// Lamp opacity for a phase: full when lit, dimmed otherwise.
    pub fn opacity(&self, phase: LightPhase) -> f32 {
        if phase == self.active() {
            1.0
        } else {
            0.3
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
