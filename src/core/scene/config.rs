//=========================================================================
// Scene Configuration
//=========================================================================
//
// Every timing, probability, limit and count the scene controller uses.
//
// Built fluently from the defaults:
// ```text
//   SceneConfig::builder()
//       .with_crowd_threshold(40)
//       .with_spawn_chance(0.3)
//       .with_day_night_cycle(Duration::from_secs(30))
// ```
// Each `with_*` method asserts on values that make no sense (negative
// ranges, probabilities outside [0, 1], zero periods).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::Range;
use std::time::Duration;

//=== SceneConfig =========================================================

/// Tunables for [`SceneController`](super::SceneController).
///
/// # Default Values
///
/// | Setting               | Default       |
/// |-----------------------|---------------|
/// | drag limit            | 200 px        |
/// | ambient spawn         | every 3 s, 15% |
/// | glyph lifetime        | 10 s          |
/// | glyph font size       | 15..30 px     |
/// | traffic position band | 10..90 %      |
/// | traffic loop duration | 5..15 s       |
/// | weather particles     | 50, for 10 s  |
/// | traffic light period  | 2 s           |
/// | crowd threshold       | 20            |
/// | glyph cull chance     | 50%           |
/// | welcome delay         | 1 s           |
/// | deferred start        | 2 s           |
/// | click pulse           | 200 ms        |
/// | sound indicator       | 1 s           |
/// | day/night auto-cycle  | off           |
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub(crate) drag_limit: i32,

    pub(crate) spawn_interval: Duration,
    pub(crate) spawn_chance: f64,
    pub(crate) glyph_lifetime: Duration,
    pub(crate) glyph_font_px: Range<f32>,

    pub(crate) traffic_band_pct: Range<f32>,
    pub(crate) traffic_duration_secs: Range<f32>,

    pub(crate) weather_particles: usize,
    pub(crate) weather_lifetime: Duration,

    pub(crate) light_interval: Duration,

    pub(crate) crowd_threshold: usize,
    pub(crate) cull_chance: f64,

    pub(crate) welcome_delay: Duration,
    pub(crate) deferred_start: Duration,
    pub(crate) click_pulse: Duration,
    pub(crate) sound_lifetime: Duration,

    pub(crate) day_night_cycle: Option<Duration>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            drag_limit: 200,

            spawn_interval: Duration::from_secs(3),
            spawn_chance: 0.15,
            glyph_lifetime: Duration::from_secs(10),
            glyph_font_px: 15.0..30.0,

            traffic_band_pct: 10.0..90.0,
            traffic_duration_secs: 5.0..15.0,

            weather_particles: 50,
            weather_lifetime: Duration::from_secs(10),

            light_interval: Duration::from_secs(2),

            crowd_threshold: 20,
            cull_chance: 0.5,

            welcome_delay: Duration::from_secs(1),
            deferred_start: Duration::from_secs(2),
            click_pulse: Duration::from_millis(200),
            sound_lifetime: Duration::from_secs(1),

            day_night_cycle: None,
        }
    }
}

impl SceneConfig {
    /// Period of the day/night auto-cycle when enabled without a value.
    pub const DEFAULT_DAY_NIGHT_PERIOD: Duration = Duration::from_secs(30);

    /// Starts from the defaults.
    pub fn builder() -> Self {
        Self::default()
    }

    //--- Builders ---------------------------------------------------------

    /// Maximum absolute pan offset on each axis.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is negative.
    pub fn with_drag_limit(mut self, limit: i32) -> Self {
        assert!(limit >= 0, "Drag limit must be non-negative, got {}", limit);
        self.drag_limit = limit;
        self
    }

    /// Ambient spawner period and per-tick spawn probability.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero or `chance` is outside [0, 1].
    pub fn with_ambient_spawn(mut self, interval: Duration, chance: f64) -> Self {
        assert!(!interval.is_zero(), "Spawn interval must be positive");
        assert_probability("Spawn chance", chance);
        self.spawn_interval = interval;
        self.spawn_chance = chance;
        self
    }

    /// Per-tick spawn probability of the ambient spawner.
    ///
    /// # Panics
    ///
    /// Panics if `chance` is outside [0, 1].
    pub fn with_spawn_chance(mut self, chance: f64) -> Self {
        assert_probability("Spawn chance", chance);
        self.spawn_chance = chance;
        self
    }

    /// How long an ambient glyph stays on screen.
    pub fn with_glyph_lifetime(mut self, lifetime: Duration) -> Self {
        self.glyph_lifetime = lifetime;
        self
    }

    /// Font size range for ambient glyphs, in pixels.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty.
    pub fn with_glyph_font_px(mut self, range: Range<f32>) -> Self {
        assert!(range.start < range.end, "Glyph font range must be non-empty");
        self.glyph_font_px = range;
        self
    }

    /// Band (percent of the container) new traffic cars are placed in.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty or leaves [0, 100].
    pub fn with_traffic_band(mut self, band: Range<f32>) -> Self {
        assert!(
            0.0 <= band.start && band.start < band.end && band.end <= 100.0,
            "Traffic band must be a non-empty range within 0..100, got {:?}",
            band
        );
        self.traffic_band_pct = band;
        self
    }

    /// Range of loop durations for traffic cars, in seconds.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty or not positive.
    pub fn with_traffic_duration(mut self, secs: Range<f32>) -> Self {
        assert!(
            0.0 < secs.start && secs.start < secs.end,
            "Traffic duration must be a non-empty positive range, got {:?}",
            secs
        );
        self.traffic_duration_secs = secs;
        self
    }

    /// Particle count and lifetime of a weather layer.
    pub fn with_weather(mut self, particles: usize, lifetime: Duration) -> Self {
        self.weather_particles = particles;
        self.weather_lifetime = lifetime;
        self
    }

    /// Traffic-light tick period.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn with_light_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "Traffic light interval must be positive");
        self.light_interval = interval;
        self
    }

    /// Crowd count above which glyphs start being culled.
    pub fn with_crowd_threshold(mut self, threshold: usize) -> Self {
        self.crowd_threshold = threshold;
        self
    }

    /// Probability each glyph is removed when the scene is crowded.
    ///
    /// # Panics
    ///
    /// Panics if `chance` is outside [0, 1].
    pub fn with_cull_chance(mut self, chance: f64) -> Self {
        assert_probability("Cull chance", chance);
        self.cull_chance = chance;
        self
    }

    /// Delays of the welcome panel and of the deferred start-up work.
    pub fn with_startup_delays(mut self, welcome: Duration, deferred: Duration) -> Self {
        self.welcome_delay = welcome;
        self.deferred_start = deferred;
        self
    }

    /// Vehicle click pulse length and sound indicator lifetime.
    pub fn with_feedback(mut self, pulse: Duration, sound: Duration) -> Self {
        self.click_pulse = pulse;
        self.sound_lifetime = sound;
        self
    }

    /// Enables the day/night auto-cycle with the given period.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn with_day_night_cycle(mut self, period: Duration) -> Self {
        assert!(!period.is_zero(), "Day/night period must be positive");
        self.day_night_cycle = Some(period);
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn drag_limit(&self) -> i32 {
        self.drag_limit
    }

    pub fn crowd_threshold(&self) -> usize {
        self.crowd_threshold
    }

    pub fn cull_chance(&self) -> f64 {
        self.cull_chance
    }

    pub fn spawn_chance(&self) -> f64 {
        self.spawn_chance
    }

    pub fn day_night_cycle(&self) -> Option<Duration> {
        self.day_night_cycle
    }
}

fn assert_probability(name: &str, p: f64) {
    assert!((0.0..=1.0).contains(&p), "{} must be within [0, 1], got {}", name, p);
}

//=========================================================================
// Unit Tests
//=========================================================================
