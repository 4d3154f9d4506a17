//=========================================================================
// Stage
//=========================================================================
//
// In-memory retained surface.
//
// Holds exactly what a page would show: tooltip, info panel, the pannable
// container with its decorative nodes, a viewport overlay for weather and
// sound indicators, and the static landmarks. Tests inspect it directly;
// the desktop runtime logs its changes.
//
// Layout used for hit-testing:
// ```text
//   ┌────────────────────────── viewport ──────────────────────────┐
//   │ [controls] (fixed)                                           │
//   │        container (translated by offset)                      │
//   │          landmarks, traffic cars (60×30 at their %)          │
//   │                  ┌──── panel 400×240 ────┐                    │
//   │   backdrop       │                       │   backdrop        │
//   │                  └───────────────────────┘                    │
//   └──────────────────────────────────────────────────────────────┘
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::landmark::{Landmark, LandmarkId, LandmarkKind, Rect};
use super::{PointerTarget, Population, Surface};
use crate::core::input::CityAction;
use crate::core::scene::{Appearance, DecorativeNode, LightPhase, NodeId, NodeKind, SceneOffset};

//=== Constants ===========================================================

const PANEL_SIZE: (f32, f32) = (400.0, 240.0);
const TRAFFIC_FOOTPRINT: (f32, f32) = (60.0, 30.0);

//=== Part Views ==========================================================

/// Tooltip state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipView {
    pub text: String,
    pub visible: bool,
    pub x: f32,
    pub y: f32,
}

/// Info panel state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelView {
    pub title: String,
    pub body: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
struct Container {
    offset: SceneOffset,
    nodes: Vec<DecorativeNode>,
}

//=== Stage ===============================================================

/// Retained in-memory [`Surface`].
///
/// # Examples
///
/// ```
/// use virtual_city::core::surface::{Stage, Surface};
///
/// let stage = Stage::city(1280.0, 720.0).without_tooltip();
/// assert!(stage.tooltip().is_none());
/// assert!(!stage.landmarks().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Stage {
    width: f32,
    height: f32,

    tooltip: Option<TooltipView>,
    panel: Option<PanelView>,
    container: Option<Container>,
    overlay: Vec<DecorativeNode>,

    night: bool,
    toggle_label: Option<String>,
    landmarks: Vec<Landmark>,
    population: Option<Population>,

    mutations: usize,
    revision: u64,
}

impl Stage {
    //--- Construction -----------------------------------------------------

    /// Empty stage with every part present and no landmarks.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            tooltip: Some(TooltipView::default()),
            panel: Some(PanelView::default()),
            container: Some(Container::default()),
            overlay: Vec::new(),
            night: false,
            toggle_label: None,
            landmarks: Vec::new(),
            population: None,
            mutations: 0,
            revision: 0,
        }
    }

    /// Stage with the default city: three buildings, two parked cars,
    /// two plants and the control bar.
    pub fn city(width: f32, height: f32) -> Self {
        let w = width / 100.0;
        let h = height / 100.0;

        Self::new(width, height)
            .with_landmark(
                LandmarkKind::Building,
                Rect::new(10.0 * w, 20.0 * h, 12.0 * w, 30.0 * h),
                Some("City Hall"),
                Some("The heart of the city's government, open to visitors on weekdays."),
            )
            .with_landmark(
                LandmarkKind::Building,
                Rect::new(40.0 * w, 15.0 * h, 14.0 * w, 35.0 * h),
                Some("Skyline Tower"),
                Some("The tallest building in town, home to offices and a rooftop garden."),
            )
            .with_landmark(
                LandmarkKind::Building,
                Rect::new(70.0 * w, 25.0 * h, 12.0 * w, 25.0 * h),
                Some("Public Library"),
                Some("Thousands of books and a quiet reading room overlooking the park."),
            )
            .with_landmark(
                LandmarkKind::Vehicle,
                Rect::new(25.0 * w, 60.0 * h, 60.0, 30.0),
                Some("City Bus"),
                None,
            )
            .with_landmark(
                LandmarkKind::Vehicle,
                Rect::new(55.0 * w, 68.0 * h, 60.0, 30.0),
                Some("Taxi"),
                None,
            )
            .with_landmark(
                LandmarkKind::Plant,
                Rect::new(30.0 * w, 40.0 * h, 5.0 * w, 10.0 * h),
                Some("Oak Tree"),
                Some("Planted when the city was founded."),
            )
            .with_landmark(
                LandmarkKind::Plant,
                Rect::new(85.0 * w, 45.0 * h, 5.0 * w, 8.0 * h),
                None,
                Some("A small flower bed kept by neighbours."),
            )
            .with_controls()
    }

    /// Adds the control bar: toggle, add traffic, reset.
    pub fn with_controls(mut self) -> Self {
        let controls = [
            (CityAction::ToggleDayNight, "Toggle day and night"),
            (CityAction::AddTraffic, "Add traffic"),
            (CityAction::ResetScene, "Reset city"),
        ];
        for (i, (action, tip)) in controls.into_iter().enumerate() {
            let bounds = Rect::new(20.0 + i as f32 * 150.0, 20.0, 140.0, 40.0);
            self = self.with_landmark(LandmarkKind::Control(action), bounds, Some(tip), None);
        }
        self.toggle_label = Some("🌙 Night Mode".to_owned());
        self
    }

    /// Appends a landmark. Later landmarks sit on top of earlier ones.
    pub fn with_landmark(
        mut self,
        kind: LandmarkKind,
        bounds: Rect,
        tooltip: Option<&str>,
        info: Option<&str>,
    ) -> Self {
        let id = LandmarkId(self.landmarks.len() as u32);
        self.landmarks.push(Landmark::new(id, kind, bounds).with_texts(tooltip, info));
        self
    }

    pub fn without_tooltip(mut self) -> Self {
        self.tooltip = None;
        self
    }

    pub fn without_panel(mut self) -> Self {
        self.panel = None;
        self
    }

    pub fn without_container(mut self) -> Self {
        self.container = None;
        self
    }

    //--- Inspection -------------------------------------------------------

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn tooltip(&self) -> Option<&TooltipView> {
        self.tooltip.as_ref()
    }

    pub fn panel(&self) -> Option<&PanelView> {
        self.panel.as_ref()
    }

    pub fn has_container(&self) -> bool {
        self.container.is_some()
    }

    /// Current container translation; origin when there is no container.
    pub fn offset(&self) -> SceneOffset {
        self.container.as_ref().map(|c| c.offset).unwrap_or_default()
    }

    pub fn is_night(&self) -> bool {
        self.night
    }

    pub fn toggle_label(&self) -> Option<&str> {
        self.toggle_label.as_deref()
    }

    pub fn population(&self) -> Option<Population> {
        self.population
    }

    /// All attached nodes: container first, then overlay.
    pub fn nodes(&self) -> impl Iterator<Item = &DecorativeNode> {
        self.container
            .iter()
            .flat_map(|c| c.nodes.iter())
            .chain(self.overlay.iter())
    }

    //--- Internals --------------------------------------------------------

    fn structural(&mut self) {
        self.mutations += 1;
        self.revision += 1;
    }

    fn cosmetic(&mut self) {
        self.revision += 1;
    }

    fn landmark_mut(&mut self, id: LandmarkId) -> Option<&mut Landmark> {
        self.landmarks.iter_mut().find(|l| l.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut DecorativeNode> {
        let in_container = self.container.as_mut().map(|c| c.nodes.as_mut_slice()).unwrap_or_default();
        in_container
            .iter_mut()
            .chain(self.overlay.iter_mut())
            .find(|n| n.id == id)
    }

    fn traffic_bounds(&self, node: &DecorativeNode, offset: SceneOffset) -> Rect {
        Rect::new(
            node.placement.left_pct / 100.0 * self.width + offset.x as f32,
            node.placement.top_pct / 100.0 * self.height + offset.y as f32,
            TRAFFIC_FOOTPRINT.0,
            TRAFFIC_FOOTPRINT.1,
        )
    }
}

//=== Surface Implementation ==============================================

impl Surface for Stage {
    //--- Tooltip ----------------------------------------------------------

    fn move_tooltip(&mut self, x: f32, y: f32) {
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.x = x;
            tooltip.y = y;
            self.revision += 1;
        }
    }

    fn show_tooltip(&mut self, text: &str) {
        let Some(tooltip) = &mut self.tooltip else {
            return;
        };
        tooltip.text = text.to_owned();
        tooltip.visible = true;
        self.structural();
    }

    fn hide_tooltip(&mut self) {
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.visible = false;
            self.cosmetic();
        }
    }

    //--- Info Panel -------------------------------------------------------

    fn show_panel(&mut self, title: &str, body: &str) {
        let Some(panel) = &mut self.panel else {
            return;
        };
        panel.title = title.to_owned();
        panel.body = body.to_owned();
        panel.visible = true;
        self.structural();
    }

    fn hide_panel(&mut self) {
        if let Some(panel) = &mut self.panel {
            panel.visible = false;
            self.cosmetic();
        }
    }

    //--- Theme ------------------------------------------------------------

    fn set_night_mode(&mut self, night: bool) {
        self.night = night;
        self.cosmetic();
    }

    fn set_toggle_label(&mut self, label: &str) {
        if let Some(current) = &mut self.toggle_label {
            *current = label.to_owned();
            self.structural();
        }
    }

    //--- Container --------------------------------------------------------

    fn set_scene_offset(&mut self, offset: SceneOffset) {
        if let Some(container) = &mut self.container {
            container.offset = offset;
            self.revision += 1;
        }
    }

    fn attach(&mut self, node: DecorativeNode) -> bool {
        trace!(target: "scene", "Attach {:?} #{}", node.kind(), node.id.get());
        if node.kind().in_container() {
            let Some(container) = &mut self.container else {
                return false;
            };
            container.nodes.push(node);
        } else {
            self.overlay.push(node);
        }
        self.structural();
        true
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let before = self.nodes().count();
        if let Some(container) = &mut self.container {
            container.nodes.retain(|n| n.id != id);
        }
        self.overlay.retain(|n| n.id != id);

        let removed = self.nodes().count() != before;
        if removed {
            trace!(target: "scene", "Detach #{}", id.get());
            self.structural();
        }
        removed
    }

    fn node(&self, id: NodeId) -> Option<&DecorativeNode> {
        self.nodes().find(|n| n.id == id)
    }

    fn nodes_of(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes().filter(|n| n.kind() == kind).map(|n| n.id).collect()
    }

    fn set_signal_phase(&mut self, id: NodeId, phase: LightPhase) {
        let changed = match self.node_mut(id).map(|n| &mut n.appearance) {
            Some(Appearance::TrafficLight { active }) => {
                *active = phase;
                true
            }
            _ => false,
        };
        if changed {
            self.cosmetic();
        }
    }

    //--- Landmarks --------------------------------------------------------

    fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    fn set_landmark_highlight(&mut self, id: LandmarkId, on: bool) {
        if let Some(landmark) = self.landmark_mut(id) {
            landmark.highlighted = on;
            self.cosmetic();
        }
    }

    fn set_landmark_scale(&mut self, id: LandmarkId, scale: f32) {
        if let Some(landmark) = self.landmark_mut(id) {
            landmark.scale = scale;
            self.cosmetic();
        }
    }

    fn publish_population(&mut self, population: Population) {
        self.population = Some(population);
        self.structural();
    }

    //--- Queries ----------------------------------------------------------

    fn hit_test(&self, x: f32, y: f32) -> PointerTarget {
        if self.panel.as_ref().is_some_and(|p| p.visible) {
            let rect = Rect::centered(self.width, self.height, PANEL_SIZE.0, PANEL_SIZE.1);
            return if rect.contains(x, y) {
                PointerTarget::Panel
            } else {
                PointerTarget::PanelBackdrop
            };
        }

        let fixed = self
            .landmarks
            .iter()
            .rev()
            .filter(|l| !l.kind.pans_with_scene())
            .find(|l| l.bounds.contains(x, y));
        if let Some(control) = fixed {
            return PointerTarget::Landmark(control.id, control.kind);
        }

        let offset = self.offset();
        if let Some(container) = &self.container {
            let car = container
                .nodes
                .iter()
                .rev()
                .filter(|n| n.kind() == NodeKind::Vehicle)
                .find(|n| self.traffic_bounds(n, offset).contains(x, y));
            if let Some(car) = car {
                return PointerTarget::Traffic(car.id);
            }
        }

        let (dx, dy) = (offset.x as f32, offset.y as f32);
        let landmark = self
            .landmarks
            .iter()
            .rev()
            .filter(|l| l.kind.pans_with_scene())
            .find(|l| l.bounds.translated(dx, dy).contains(x, y));
        if let Some(landmark) = landmark {
            return PointerTarget::Landmark(landmark.id, landmark.kind);
        }

        if self.container.is_some() {
            PointerTarget::Scene
        } else {
            PointerTarget::Outside
        }
    }

    fn take_mutations(&mut self) -> usize {
        std::mem::take(&mut self.mutations)
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{Placement, SoundCue};

    fn glyph(id: u64) -> DecorativeNode {
        DecorativeNode {
            id: NodeId(id),
            appearance: Appearance::Glyph { glyph: "✨", font_px: 20.0 },
            placement: Placement::new(50.0, 50.0),
            animation: None,
        }
    }

    fn car(id: u64, top: f32, left: f32) -> DecorativeNode {
        DecorativeNode {
            id: NodeId(id),
            appearance: Appearance::Vehicle { sprite: "car.png", tooltip: format!("Traffic Car {}", id) },
            placement: Placement::new(top, left),
            animation: None,
        }
    }

    fn indicator(id: u64) -> DecorativeNode {
        DecorativeNode {
            id: NodeId(id),
            appearance: Appearance::SoundIndicator { cue: SoundCue::Honk },
            placement: Placement::default(),
            animation: None,
        }
    }

    //=====================================================================
    // Optional Parts
    //=====================================================================

    #[test]
    fn missing_tooltip_ignores_tooltip_calls() {
        let mut stage = Stage::new(800.0, 600.0).without_tooltip();
        stage.show_tooltip("Hello");
        stage.move_tooltip(10.0, 10.0);
        stage.hide_tooltip();

        assert!(stage.tooltip().is_none());
        assert_eq!(stage.take_mutations(), 0);
    }

    #[test]
    fn missing_panel_ignores_panel_calls() {
        let mut stage = Stage::new(800.0, 600.0).without_panel();
        stage.show_panel("Title", "Body");
        assert!(stage.panel().is_none());
        assert_eq!(stage.hit_test(400.0, 300.0), PointerTarget::Scene);
    }

    #[test]
    fn missing_container_rejects_scene_nodes_only() {
        let mut stage = Stage::new(800.0, 600.0).without_container();

        assert!(!stage.attach(glyph(1)), "Glyphs need the container");
        assert!(stage.attach(indicator(2)), "Indicators live on the overlay");
        assert_eq!(stage.count(NodeKind::SoundIndicator), 1);
        assert_eq!(stage.hit_test(10.0, 10.0), PointerTarget::Outside);
    }

    #[test]
    fn toggle_label_requires_controls() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.set_toggle_label("☀️ Day Mode");
        assert_eq!(stage.toggle_label(), None);

        let mut stage = Stage::new(800.0, 600.0).with_controls();
        assert_eq!(stage.toggle_label(), Some("🌙 Night Mode"));
        stage.set_toggle_label("☀️ Day Mode");
        assert_eq!(stage.toggle_label(), Some("☀️ Day Mode"));
    }

    //=====================================================================
    // Nodes & Mutations
    //=====================================================================

    #[test]
    fn attach_and_detach_count_as_mutations() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.attach(glyph(1));
        stage.attach(glyph(2));
        assert!(stage.detach(NodeId(1)));
        assert!(!stage.detach(NodeId(1)), "Already gone");

        assert_eq!(stage.take_mutations(), 3);
        assert_eq!(stage.take_mutations(), 0, "Counter resets on take");
        assert_eq!(stage.nodes_of(NodeKind::Glyph), vec![NodeId(2)]);
    }

    #[test]
    fn offset_and_tooltip_moves_are_not_structural() {
        let mut stage = Stage::new(800.0, 600.0);
        let before = stage.revision();

        stage.set_scene_offset(SceneOffset::new(5, 5));
        stage.move_tooltip(1.0, 1.0);

        assert_eq!(stage.take_mutations(), 0);
        assert!(stage.revision() > before);
    }

    #[test]
    fn signal_phase_updates_only_traffic_lights() {
        let mut stage = Stage::new(800.0, 600.0);
        stage.attach(DecorativeNode {
            id: NodeId(7),
            appearance: Appearance::TrafficLight { active: LightPhase::Red },
            placement: Placement::default(),
            animation: None,
        });
        stage.set_signal_phase(NodeId(7), LightPhase::Green);

        let node = stage.node(NodeId(7)).map(|n| n.appearance.clone());
        assert_eq!(node, Some(Appearance::TrafficLight { active: LightPhase::Green }));
    }

    //=====================================================================
    // Hit Testing
    //=====================================================================

    #[test]
    fn city_has_expected_census() {
        let stage = Stage::city(1000.0, 1000.0);
        assert_eq!(stage.landmark_count(LandmarkKind::Building), 3);
        assert_eq!(stage.landmark_count(LandmarkKind::Vehicle), 2);
        assert_eq!(stage.landmark_count(LandmarkKind::Plant), 2);
    }

    #[test]
    fn landmarks_move_with_offset_controls_do_not() {
        let mut stage = Stage::city(1000.0, 1000.0);
        // City Hall spans x 100..220, y 200..500
        assert!(matches!(stage.hit_test(110.0, 210.0), PointerTarget::Landmark(_, LandmarkKind::Building)));

        stage.set_scene_offset(SceneOffset::new(200, 0));
        assert_eq!(stage.hit_test(110.0, 210.0), PointerTarget::Scene);
        assert!(matches!(stage.hit_test(310.0, 210.0), PointerTarget::Landmark(_, LandmarkKind::Building)));

        assert_eq!(
            stage.hit_test(25.0, 25.0),
            PointerTarget::Landmark(LandmarkId(7), LandmarkKind::Control(CityAction::ToggleDayNight))
        );
    }

    #[test]
    fn traffic_cars_are_hit_above_landmarks() {
        let mut stage = Stage::city(1000.0, 1000.0);
        // On top of City Hall
        stage.attach(car(42, 30.0, 12.0));

        assert_eq!(stage.hit_test(130.0, 310.0), PointerTarget::Traffic(NodeId(42)));
    }

    #[test]
    fn open_panel_captures_pointer() {
        let mut stage = Stage::city(800.0, 600.0);
        stage.show_panel("Title", "Body");

        assert_eq!(stage.hit_test(400.0, 300.0), PointerTarget::Panel);
        assert_eq!(stage.hit_test(5.0, 5.0), PointerTarget::PanelBackdrop);

        stage.hide_panel();
        assert_ne!(stage.hit_test(400.0, 300.0), PointerTarget::Panel);
    }

    #[test]
    fn interactive_targets() {
        assert!(PointerTarget::Traffic(NodeId(1)).is_interactive());
        assert!(PointerTarget::Landmark(LandmarkId(0), LandmarkKind::Plant).is_interactive());
        assert!(!PointerTarget::Scene.is_interactive());
        assert!(!PointerTarget::Outside.is_interactive());
    }
}
