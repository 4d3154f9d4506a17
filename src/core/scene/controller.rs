//=========================================================================
// Scene Controller
//=========================================================================
//
// Owns all scene state and maps commands to surface mutations.
//
// Architecture:
// ```text
//   InputSystem ──commands──┐
//                           ▼
//   Scheduler ──TimerTask──> SceneController ──mutations──> Surface
//        ▲                    │   ├─ night mode, traffic counter
//        └──after()/every()───┘   ├─ offset + drag state
//                                 ├─ traffic light
//                                 └─ rng
// ```
//
// Every command runs to completion. Afterwards the controller drains the
// surface's mutation counter; if anything structural changed it runs the
// load-shedding pass. Removals by that pass are mutations too, so passes
// repeat until the scene is no longer crowded or a pass removes nothing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, info, trace};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

//=== Internal Dependencies ===============================================

use super::config::SceneConfig;
use super::decoration::{
    pick, Animation, Appearance, DecorativeNode, LightPhase, NodeId, NodeKind, Particle, Placement,
    SoundCue, WeatherKind, AMBIENT_GLYPHS, CAR_ANIMATIONS, VEHICLE_SPRITES,
};
use super::offset::{DragState, SceneOffset};
use super::traffic_light::TrafficLight;
use crate::core::input::CityAction;
use crate::core::surface::{LandmarkId, LandmarkKind, PointerTarget, Population, Surface};
use crate::core::timer::{Scheduler, TimerId, TimerTask, VirtualScheduler};

//=== Texts ===============================================================

pub const NIGHT_LABEL: &str = "☀️ Day Mode";
pub const DAY_LABEL: &str = "🌙 Night Mode";

pub const WELCOME_TITLE: &str = "Welcome to Virtual City!";
pub const WELCOME_BODY: &str = "Click on buildings to learn more about them. Use the controls to \
switch between day and night mode, add more traffic, or reset the city. You can also drag the \
city around to explore different areas! Hover over any element to see tooltips.";

const TOOLTIP_OFFSET: f32 = 10.0;
const PULSE_SCALE: f32 = 1.1;
const TRAFFIC_LIGHT_PLACEMENT: Placement = Placement { top_pct: 30.0, left_pct: 45.0 };

//=== SceneController =====================================================

/// The single owner of scene state.
///
/// Randomness and time are injected: [`SceneController::new`] seeds a
/// `ChaCha8Rng` and uses a [`VirtualScheduler`]; both can be replaced.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use virtual_city::core::scene::{SceneConfig, SceneController};
/// use virtual_city::core::surface::Stage;
///
/// let mut scene = SceneController::new(Stage::city(1280.0, 720.0), SceneConfig::default(), 7);
/// scene.add_traffic_unit();
/// scene.add_traffic_unit();
/// assert_eq!(scene.traffic_count(), 2);
///
/// scene.start();
/// scene.advance(Duration::from_secs(1));
/// assert!(scene.surface().panel().is_some_and(|p| p.visible), "Welcome panel is up");
///
/// scene.reset_scene();
/// assert_eq!(scene.traffic_count(), 0);
/// ```
pub struct SceneController<S: Surface> {
    surface: S,
    scheduler: Box<dyn Scheduler>,
    rng: Box<dyn RngCore + Send>,
    config: SceneConfig,

    night_mode: bool,
    traffic_count: u64,
    offset: SceneOffset,
    drag: DragState,
    traffic_light: TrafficLight,

    day_night_timer: Option<TimerId>,
    started: bool,
    next_node: u64,
}

impl<S: Surface> SceneController<S> {
    //--- Construction -----------------------------------------------------

    /// Creates a controller over `surface` with a seeded RNG and virtual time.
    pub fn new(surface: S, config: SceneConfig, seed: u64) -> Self {
        Self {
            surface,
            scheduler: Box::new(VirtualScheduler::new()),
            rng: Box::new(ChaCha8Rng::seed_from_u64(seed)),
            config,
            night_mode: false,
            traffic_count: 0,
            offset: SceneOffset::ORIGIN,
            drag: DragState::default(),
            traffic_light: TrafficLight::new(),
            day_night_timer: None,
            started: false,
            next_node: 0,
        }
    }

    /// Replaces the timer source. Timers armed on the old one are dropped.
    pub fn with_scheduler(mut self, scheduler: Box<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Replaces the random source.
    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = rng;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn is_night(&self) -> bool {
        self.night_mode
    }

    /// Number of cars added since the last reset.
    pub fn traffic_count(&self) -> u64 {
        self.traffic_count
    }

    pub fn offset(&self) -> SceneOffset {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Active traffic-light phase, once the light exists.
    pub fn traffic_light(&self) -> Option<LightPhase> {
        self.traffic_light.is_created().then(|| self.traffic_light.active())
    }

    /// Scheduler time since the controller was created.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    //=====================================================================
    // Lifecycle
    //=====================================================================

    /// Arms the background timers: ambient spawner, welcome panel, deferred
    /// start-up and (if configured) the day/night cycle. Runs once.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        self.scheduler.every(self.config.spawn_interval, TimerTask::SpawnAmbient);
        self.scheduler.after(self.config.welcome_delay, TimerTask::ShowWelcome);
        self.scheduler.after(self.config.deferred_start, TimerTask::DeferredStart);
        if let Some(period) = self.config.day_night_cycle {
            self.start_day_night_cycle(period);
        }

        info!(target: "scene", "Scene started ({} timers armed)", self.scheduler.pending());
    }

    /// Moves time forward by `dt`, firing every due timer in deadline order.
    ///
    /// Timers armed by a firing task run in the same call if they fall
    /// inside the window.
    pub fn advance(&mut self, dt: Duration) {
        let target = self.scheduler.now() + dt;
        while let Some(task) = self.scheduler.pop_due(target) {
            self.run_task(task);
            self.observe_mutations();
        }
        self.scheduler.settle(target);
    }

    fn run_task(&mut self, task: TimerTask) {
        match task {
            TimerTask::SpawnAmbient => {
                self.roll_ambient();
            }
            TimerTask::CycleTrafficLight => {
                self.tick_traffic_light();
            }
            TimerTask::ToggleDayNight => self.flip_theme(),
            TimerTask::ShowWelcome => self.surface.show_panel(WELCOME_TITLE, WELCOME_BODY),
            TimerTask::DeferredStart => {
                self.install_traffic_light();
                let population = self.population();
                self.surface.publish_population(population);
            }
            TimerTask::Expire(id) => {
                self.surface.detach(id);
            }
            TimerTask::RestoreScale(id) => self.surface.set_landmark_scale(id, 1.0),
        }
    }

    //=====================================================================
    // Tooltip & Panel
    //=====================================================================

    /// Anchors the tooltip just below-right of the pointer.
    pub fn set_pointer_position(&mut self, x: f32, y: f32) {
        trace!(target: "scene", "Pointer at ({}, {})", x, y);
        self.surface.move_tooltip(x + TOOLTIP_OFFSET, y + TOOLTIP_OFFSET);
    }

    /// Shows the tooltip. Empty text is ignored.
    pub fn show_tooltip(&mut self, text: &str) {
        self.command(|scene| scene.reveal_tooltip(text));
    }

    pub fn hide_tooltip(&mut self) {
        self.surface.hide_tooltip();
    }

    /// Shows the info panel, overwriting whatever it displayed.
    pub fn show_info_panel(&mut self, title: &str, body: &str) {
        debug!(target: "scene", "Info panel: {}", title);
        self.command(|scene| scene.surface.show_panel(title, body));
    }

    pub fn close_info_panel(&mut self) {
        self.surface.hide_panel();
    }

    fn reveal_tooltip(&mut self, text: &str) {
        if !text.is_empty() {
            self.surface.show_tooltip(text);
        }
    }

    //=====================================================================
    // City Controls
    //=====================================================================

    /// Flips night mode and relabels the toggle control.
    pub fn toggle_day_night(&mut self) {
        self.command(Self::flip_theme);
    }

    /// Adds a looping traffic car and returns its node id.
    pub fn add_traffic_unit(&mut self) -> NodeId {
        self.command(Self::spawn_traffic)
    }

    /// Removes dynamic cars and glyphs, zeroes the counter, returns to day
    /// mode and recenters the scene. Weather and the traffic light stay.
    pub fn reset_scene(&mut self) {
        self.command(|scene| {
            for kind in [NodeKind::Vehicle, NodeKind::Glyph] {
                for id in scene.surface.nodes_of(kind) {
                    scene.surface.detach(id);
                }
            }
            scene.traffic_count = 0;

            if scene.night_mode {
                scene.flip_theme();
            }

            scene.offset = SceneOffset::ORIGIN;
            scene.surface.set_scene_offset(SceneOffset::ORIGIN);

            info!(target: "scene", "Scene reset");
        });
    }

    /// Runs a mapped action.
    pub fn apply(&mut self, action: CityAction) {
        debug!(target: "scene", "Action: {:?}", action);
        match action {
            CityAction::ToggleDayNight => self.toggle_day_night(),
            CityAction::AddTraffic => {
                self.add_traffic_unit();
            }
            CityAction::ResetScene => self.reset_scene(),
            CityAction::ClosePanel => self.close_info_panel(),
            CityAction::Weather(kind) => {
                self.apply_weather_effect(kind);
            }
        }
    }

    fn flip_theme(&mut self) {
        self.night_mode = !self.night_mode;
        self.surface.set_night_mode(self.night_mode);
        self.surface.set_toggle_label(if self.night_mode { NIGHT_LABEL } else { DAY_LABEL });
        debug!(target: "scene", "Night mode: {}", self.night_mode);
    }

    fn spawn_traffic(&mut self) -> NodeId {
        self.traffic_count += 1;

        let band = self.config.traffic_band_pct.clone();
        let top_pct = self.rng.gen_range(band.clone());
        let left_pct = self.rng.gen_range(band);
        let sprite = pick(&mut self.rng, &VEHICLE_SPRITES);
        let preset = pick(&mut self.rng, &CAR_ANIMATIONS);
        let secs = self.rng.gen_range(self.config.traffic_duration_secs.clone());

        let id = self.allocate_id();
        self.surface.attach(DecorativeNode {
            id,
            appearance: Appearance::Vehicle {
                sprite,
                tooltip: format!("Traffic Car {}", self.traffic_count),
            },
            placement: Placement::new(top_pct, left_pct),
            animation: Some(Animation::looping(preset, Duration::from_secs_f32(secs))),
        });

        debug!(target: "scene", "Traffic car {} added ({}, {:.1}s)", self.traffic_count, preset, secs);
        id
    }

    //=====================================================================
    // Dragging
    //=====================================================================

    /// Starts panning if the press landed on empty scene background.
    ///
    /// Returns `false` (and changes nothing) for interactive targets and for
    /// anything outside the scene container.
    pub fn begin_drag(&mut self, x: f32, y: f32, target: PointerTarget) -> bool {
        if target != PointerTarget::Scene {
            return false;
        }
        self.drag.begin((x, y), self.offset);
        debug!(target: "scene", "Drag started at ({}, {})", x, y);
        true
    }

    /// Pans to follow the pointer; no-op unless a drag is active.
    pub fn continue_drag(&mut self, x: f32, y: f32) {
        if let Some(offset) = self.drag.offset_for((x, y), self.config.drag_limit) {
            self.offset = offset;
            self.surface.set_scene_offset(offset);
        }
    }

    pub fn end_drag(&mut self) {
        if self.drag.is_active() {
            debug!(target: "scene", "Drag ended at {:?}", self.offset);
        }
        self.drag.end();
    }

    //=====================================================================
    // Pointer Hooks
    //=====================================================================

    /// Hover enter: tooltip, plus a glow for buildings.
    pub fn pointer_entered(&mut self, target: PointerTarget) {
        self.command(|scene| match target {
            PointerTarget::Landmark(id, kind) => {
                if let Some(text) = scene.surface.landmark(id).and_then(|l| l.tooltip.clone()) {
                    scene.reveal_tooltip(&text);
                }
                if kind == LandmarkKind::Building {
                    scene.surface.set_landmark_highlight(id, true);
                }
            }
            PointerTarget::Traffic(id) => {
                if let Some(text) = scene.surface.node(id).and_then(|n| n.tooltip().map(str::to_owned)) {
                    scene.reveal_tooltip(&text);
                }
            }
            _ => {}
        });
    }

    /// Hover leave: hides the tooltip and drops any building glow.
    pub fn pointer_left(&mut self, target: PointerTarget) {
        match target {
            PointerTarget::Landmark(id, kind) => {
                self.surface.hide_tooltip();
                if kind == LandmarkKind::Building {
                    self.surface.set_landmark_highlight(id, false);
                }
            }
            PointerTarget::Traffic(_) => self.surface.hide_tooltip(),
            _ => {}
        }
    }

    /// Click on a target (press and release on the same one).
    pub fn click(&mut self, target: PointerTarget) {
        match target {
            PointerTarget::Landmark(_, LandmarkKind::Control(action)) => self.apply(action),
            PointerTarget::Landmark(id, kind) => self.command(|scene| scene.activate_landmark(id, kind)),
            PointerTarget::PanelBackdrop => self.close_info_panel(),
            _ => {}
        }
    }

    fn activate_landmark(&mut self, id: LandmarkId, kind: LandmarkKind) {
        let Some(landmark) = self.surface.landmark(id) else {
            return;
        };
        if let Some(info) = landmark.info.clone() {
            let title = landmark.panel_title().to_owned();
            self.surface.show_panel(&title, &info);
        }

        if kind == LandmarkKind::Vehicle {
            self.surface.set_landmark_scale(id, PULSE_SCALE);
            self.scheduler.after(self.config.click_pulse, TimerTask::RestoreScale(id));
            self.emit_sound(SoundCue::Honk);
        }
    }

    //=====================================================================
    // Background Effects
    //=====================================================================

    /// One ambient spawner roll: with the configured chance, attaches a
    /// floating glyph that expires on its own.
    pub fn spawn_ambient_decoration(&mut self) -> Option<NodeId> {
        self.command(Self::roll_ambient)
    }

    /// Attaches a rain or snow layer that removes itself after its lifetime.
    pub fn apply_weather_effect(&mut self, kind: WeatherKind) -> NodeId {
        self.command(|scene| {
            let (name, _) = kind.fall_animation();
            let particles = (0..scene.config.weather_particles)
                .map(|_| {
                    let left_pct = scene.rng.gen_range(0.0..100.0);
                    let delay = scene.rng.gen_range(0.0..2.0);
                    let duration = scene.rng.gen_range(2.0..5.0);
                    Particle {
                        left_pct,
                        animation: Animation::looping(name, Duration::from_secs_f32(duration))
                            .with_delay(Duration::from_secs_f32(delay)),
                    }
                })
                .collect();

            let id = scene.allocate_id();
            scene.surface.attach(DecorativeNode {
                id,
                appearance: Appearance::Weather { kind, particles },
                placement: Placement::default(),
                animation: None,
            });
            scene.scheduler.after(scene.config.weather_lifetime, TimerTask::Expire(id));

            info!(target: "scene", "Weather: {:?} for {:?}", kind, scene.config.weather_lifetime);
            id
        })
    }

    /// Advances the traffic light one phase and returns the new phase.
    pub fn cycle_traffic_light(&mut self) -> LightPhase {
        self.command(Self::tick_traffic_light)
    }

    /// Load-shedding pass: if cars plus glyphs exceed the crowd threshold,
    /// removes each glyph with the cull probability. Returns how many went.
    pub fn decay_decorations_if_crowded(&mut self) -> usize {
        let crowd = self.surface.landmark_count(LandmarkKind::Vehicle)
            + self.surface.count(NodeKind::Vehicle)
            + self.surface.count(NodeKind::Glyph);
        if crowd <= self.config.crowd_threshold {
            return 0;
        }

        let mut removed = 0;
        for id in self.surface.nodes_of(NodeKind::Glyph) {
            if self.rng.gen::<f64>() < self.config.cull_chance && self.surface.detach(id) {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(target: "scene", "Crowded ({} > {}): culled {} glyphs", crowd, self.config.crowd_threshold, removed);
        }
        removed
    }

    /// Flashes a sound indicator for a moment.
    pub fn play_sound_cue(&mut self, cue: SoundCue) -> NodeId {
        self.command(|scene| scene.emit_sound(cue))
    }

    /// Starts (or restarts) the day/night auto-cycle.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn start_day_night_cycle(&mut self, period: Duration) {
        self.stop_day_night_cycle();
        self.day_night_timer = Some(self.scheduler.every(period, TimerTask::ToggleDayNight));
        info!(target: "scene", "Day/night cycle every {:?}", period);
    }

    /// Stops the auto-cycle. Returns `false` if it was not running.
    pub fn stop_day_night_cycle(&mut self) -> bool {
        match self.day_night_timer.take() {
            Some(id) => self.scheduler.cancel(id),
            None => false,
        }
    }

    fn roll_ambient(&mut self) -> Option<NodeId> {
        if self.rng.gen::<f64>() >= self.config.spawn_chance {
            return None;
        }

        let glyph = pick(&mut self.rng, &AMBIENT_GLYPHS);
        let top_pct = self.rng.gen_range(0.0..100.0);
        let left_pct = self.rng.gen_range(0.0..100.0);
        let font_px = self.rng.gen_range(self.config.glyph_font_px.clone());

        let id = self.allocate_id();
        let attached = self.surface.attach(DecorativeNode {
            id,
            appearance: Appearance::Glyph { glyph, font_px },
            placement: Placement::new(top_pct, left_pct),
            animation: Some(Animation::once("float", self.config.glyph_lifetime)),
        });
        if !attached {
            return None;
        }

        self.scheduler.after(self.config.glyph_lifetime, TimerTask::Expire(id));
        trace!(target: "scene", "Glyph {} spawned", glyph);
        Some(id)
    }

    fn tick_traffic_light(&mut self) -> LightPhase {
        let phase = self.traffic_light.tick();
        if let Some(node) = self.traffic_light.node() {
            self.surface.set_signal_phase(node, phase);
        }
        trace!(target: "scene", "Traffic light: {:?}", phase);
        phase
    }

    fn install_traffic_light(&mut self) {
        if self.traffic_light.is_created() {
            return;
        }

        let id = self.allocate_id();
        let attached = self.surface.attach(DecorativeNode {
            id,
            appearance: Appearance::TrafficLight { active: self.traffic_light.active() },
            placement: TRAFFIC_LIGHT_PLACEMENT,
            animation: None,
        });
        self.traffic_light.install(attached.then_some(id));
        self.scheduler.every(self.config.light_interval, TimerTask::CycleTrafficLight);

        info!(target: "scene", "Traffic light installed (visible: {})", attached);
    }

    fn emit_sound(&mut self, cue: SoundCue) -> NodeId {
        let id = self.allocate_id();
        self.surface.attach(DecorativeNode {
            id,
            appearance: Appearance::SoundIndicator { cue },
            placement: Placement::default(),
            animation: Some(Animation::once("soundPulse", self.config.sound_lifetime)),
        });
        self.scheduler.after(self.config.sound_lifetime, TimerTask::Expire(id));
        id
    }

    //=====================================================================
    // Internals
    //=====================================================================

    /// Landmark census plus dynamically added cars.
    pub fn population(&self) -> Population {
        Population {
            buildings: self.surface.landmark_count(LandmarkKind::Building),
            vehicles: self.surface.landmark_count(LandmarkKind::Vehicle)
                + self.surface.count(NodeKind::Vehicle),
            plants: self.surface.landmark_count(LandmarkKind::Plant),
        }
    }

    fn allocate_id(&mut self) -> NodeId {
        self.next_node += 1;
        NodeId(self.next_node)
    }

    /// Runs `f` as one command, then observes the surface once.
    fn command<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let result = f(self);
        self.observe_mutations();
        result
    }

    /// Culls until the scene is no longer crowded or a pass removes nothing.
    fn observe_mutations(&mut self) {
        if self.surface.take_mutations() == 0 {
            return;
        }
        loop {
            let removed = self.decay_decorations_if_crowded();
            self.surface.take_mutations();
            if removed == 0 {
                break;
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
