//=========================================================================
// Input System
//=========================================================================
//
// Binds raw pointer and keyboard events to scene commands.
//
// Architecture:
//   InputEvent → StateTracker → {hit-test, ActionMapper} → SceneController
//
// Pointer events are dispatched through the surface's hit-test:
//   move  → tooltip anchor, drag continue, hover enter/leave
//   down  → remember target, begin drag on empty scene
//   up    → end drag, click if released on the pressed target
// Key presses resolve through the action mapper.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod action;
pub(crate) mod action_mapper;
pub mod event;
pub mod state_tracker;

//=== Public API ==========================================================

pub use action::CityAction;
pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use state_tracker::StateTracker;

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneController;
use crate::core::surface::{PointerTarget, Surface};
use action_mapper::ActionMapper;

//=== InputSystem =========================================================

/// Input binding layer between the platform and the scene controller.
pub struct InputSystem {
    tracker: StateTracker,
    mapper: ActionMapper,
    hovered: Option<PointerTarget>,
    pressed: Option<PointerTarget>,
    actions: Vec<CityAction>,
}

impl InputSystem {
    /// Creates an input system with the standard shortcuts bound.
    pub fn new() -> Self {
        Self {
            tracker: StateTracker::new(),
            mapper: ActionMapper::with_default_bindings(),
            hovered: None,
            pressed: None,
            actions: Vec::new(),
        }
    }

    //--- Bindings ---------------------------------------------------------

    /// Binds a key (no modifiers) to an action.
    pub fn bind_key(&mut self, key: KeyCode, action: CityAction) {
        self.mapper.bind_key(key, action);
    }

    /// Binds a key with exact modifiers to an action.
    pub fn bind_key_with_mods(&mut self, key: KeyCode, modifiers: Modifiers, action: CityAction) {
        self.mapper.bind_key_with_mods(key, modifiers, action);
    }

    /// Binds a character case-insensitively. Returns `false` if the
    /// character has no physical key.
    pub fn bind_char(&mut self, c: char, action: CityAction) -> bool {
        self.mapper.bind_char(c, action)
    }

    pub fn unbind_key(&mut self, key: KeyCode) {
        self.mapper.unbind_key(key);
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> &StateTracker {
        &self.tracker
    }

    /// Target currently under the pointer, if any.
    pub fn hovered(&self) -> Option<PointerTarget> {
        self.hovered
    }

    /// Actions fired by key bindings during the last frame.
    pub fn actions(&self) -> &[CityAction] {
        &self.actions
    }

    //--- Frame Processing -------------------------------------------------

    /// Processes one frame of input batches against the scene, in order.
    pub fn process_frame<S: Surface>(
        &mut self,
        scene: &mut SceneController<S>,
        batches: &[Vec<InputEvent>],
    ) {
        self.tracker.clear();
        self.actions.clear();

        for event in batches.iter().flatten() {
            self.tracker.process_event(event);
            self.dispatch(scene, event);
        }

        self.tracker.finalize_frame();
    }

    fn dispatch<S: Surface>(&mut self, scene: &mut SceneController<S>, event: &InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => {
                scene.set_pointer_position(*x, *y);
                if scene.is_dragging() {
                    scene.continue_drag(*x, *y);
                }
                let target = scene.surface().hit_test(*x, *y);
                self.hover(scene, target);
            }

            InputEvent::PointerLeft => {
                if let Some(previous) = self.hovered.take() {
                    scene.pointer_left(previous);
                }
            }

            InputEvent::MouseButtonDown { button: MouseButton::Left, .. } => {
                let (x, y) = self.tracker.pointer();
                let target = scene.surface().hit_test(x, y);
                trace!(target: "platform::input", "Press on {:?}", target);

                self.pressed = Some(target);
                scene.begin_drag(x, y, target);
            }

            InputEvent::MouseButtonUp { button: MouseButton::Left, .. } => {
                scene.end_drag();

                let (x, y) = self.tracker.pointer();
                let target = scene.surface().hit_test(x, y);
                if self.pressed.take() == Some(target) {
                    scene.click(target);
                }
            }

            InputEvent::KeyDown { .. } => {
                if let Some(action) = self.mapper.map_event(event) {
                    self.actions.push(action);
                    scene.apply(action);
                }
            }

            _ => {}
        }
    }

    fn hover<S: Surface>(&mut self, scene: &mut SceneController<S>, target: PointerTarget) {
        if self.hovered == Some(target) {
            return;
        }
        if let Some(previous) = self.hovered.replace(target) {
            scene.pointer_left(previous);
        }
        scene.pointer_entered(target);
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{NodeKind, SceneConfig, SceneOffset, WeatherKind};
    use crate::core::surface::{LandmarkKind, Stage};

    // City layout at 1000×800: City Hall spans (100..220, 160..400),
    // (900, 700) is empty ground.
    fn scene() -> SceneController<Stage> {
        SceneController::new(Stage::city(1000.0, 800.0), SceneConfig::default(), 5)
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved { x, y }
    }

    fn left_down() -> InputEvent {
        InputEvent::MouseButtonDown { button: MouseButton::Left, modifiers: Modifiers::NONE }
    }

    fn left_up() -> InputEvent {
        InputEvent::MouseButtonUp { button: MouseButton::Left, modifiers: Modifiers::NONE }
    }

    fn key(key: KeyCode, modifiers: Modifiers) -> InputEvent {
        InputEvent::KeyDown { key, modifiers }
    }

    //=====================================================================
    // Keyboard
    //=====================================================================

    #[test]
    fn shortcuts_drive_scene() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        input.process_frame(
            &mut scene,
            &[vec![key(KeyCode::KeyN, Modifiers::NONE), key(KeyCode::KeyT, Modifiers::SHIFT)]],
        );

        assert!(scene.is_night());
        assert_eq!(scene.traffic_count(), 1);
        assert_eq!(input.actions(), &[CityAction::ToggleDayNight, CityAction::AddTraffic]);
    }

    #[test]
    fn escape_closes_panel() {
        let mut input = InputSystem::new();
        let mut scene = scene();
        scene.show_info_panel("t", "b");

        input.process_frame(&mut scene, &[vec![key(KeyCode::Escape, Modifiers::NONE)]]);
        assert!(!scene.surface().panel().is_some_and(|p| p.visible));
    }

    #[test]
    fn actions_reset_each_frame() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        input.process_frame(&mut scene, &[vec![key(KeyCode::KeyR, Modifiers::NONE)]]);
        assert_eq!(input.actions().len(), 1);

        input.process_frame(&mut scene, &[]);
        assert!(input.actions().is_empty());
    }

    #[test]
    fn extra_bindings_reach_scene() {
        let mut input = InputSystem::new();
        let mut scene = scene();
        assert!(input.bind_char('w', CityAction::Weather(WeatherKind::Rain)));

        input.process_frame(&mut scene, &[vec![key(KeyCode::KeyW, Modifiers::NONE)]]);
        assert_eq!(scene.surface().count(NodeKind::Weather), 1);
    }

    //=====================================================================
    // Pointer
    //=====================================================================

    #[test]
    fn drag_on_empty_ground_pans() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        input.process_frame(&mut scene, &[vec![moved(900.0, 700.0), left_down()]]);
        assert!(scene.is_dragging());

        input.process_frame(&mut scene, &[vec![moved(950.0, 680.0)]]);
        assert_eq!(scene.offset(), SceneOffset::new(50, -20));

        input.process_frame(&mut scene, &[vec![left_up()], vec![moved(990.0, 600.0)]]);
        assert!(!scene.is_dragging());
        assert_eq!(scene.offset(), SceneOffset::new(50, -20));
    }

    #[test]
    fn press_on_building_does_not_drag() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        input.process_frame(&mut scene, &[vec![moved(150.0, 200.0), left_down()]]);
        input.process_frame(&mut scene, &[vec![moved(300.0, 300.0)]]);

        assert!(!scene.is_dragging());
        assert_eq!(scene.offset(), SceneOffset::ORIGIN);
    }

    #[test]
    fn click_on_building_opens_panel() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        input.process_frame(&mut scene, &[vec![moved(150.0, 200.0), left_down(), left_up()]]);

        let panel = scene.surface().panel().cloned().unwrap_or_default();
        assert!(panel.visible);
        assert_eq!(panel.title, "City Hall");
    }

    #[test]
    fn release_elsewhere_is_not_a_click() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        input.process_frame(&mut scene, &[vec![moved(150.0, 200.0), left_down()]]);
        input.process_frame(&mut scene, &[vec![moved(900.0, 700.0), left_up()]]);

        assert!(!scene.surface().panel().is_some_and(|p| p.visible));
    }

    #[test]
    fn click_on_backdrop_closes_panel() {
        let mut input = InputSystem::new();
        let mut scene = scene();
        scene.show_info_panel("t", "b");

        input.process_frame(&mut scene, &[vec![moved(10.0, 790.0), left_down(), left_up()]]);
        assert!(!scene.surface().panel().is_some_and(|p| p.visible));
    }

    #[test]
    fn hover_enter_and_leave() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        input.process_frame(&mut scene, &[vec![moved(150.0, 200.0)]]);
        assert!(matches!(input.hovered(), Some(PointerTarget::Landmark(_, LandmarkKind::Building))));
        assert!(scene.surface().tooltip().is_some_and(|t| t.visible && t.text == "City Hall"));

        let tooltip = scene.surface().tooltip().cloned().unwrap_or_default();
        assert_eq!((tooltip.x, tooltip.y), (160.0, 210.0));

        input.process_frame(&mut scene, &[vec![moved(900.0, 700.0)]]);
        assert_eq!(input.hovered(), Some(PointerTarget::Scene));
        assert!(!scene.surface().tooltip().is_some_and(|t| t.visible));
    }

    #[test]
    fn leaving_window_drops_hover() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        input.process_frame(&mut scene, &[vec![moved(150.0, 200.0)]]);
        input.process_frame(&mut scene, &[vec![InputEvent::PointerLeft]]);

        assert_eq!(input.hovered(), None);
        assert!(!scene.surface().tooltip().is_some_and(|t| t.visible));
        assert!(!input.state().pointer_inside());
    }

    #[test]
    fn control_click_runs_action() {
        let mut input = InputSystem::new();
        let mut scene = scene();

        // "Add traffic" control sits at (170..310, 20..60)
        input.process_frame(&mut scene, &[vec![moved(200.0, 30.0), left_down(), left_up()]]);
        assert_eq!(scene.traffic_count(), 1);
        assert!(input.actions().is_empty(), "Only key bindings are reported as actions");
    }
}
