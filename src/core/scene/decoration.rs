//=========================================================================
// Decorative Nodes
//=========================================================================
//
// Transient visual elements the controller attaches to the surface:
// traffic cars, ambient glyphs, weather layers, the traffic light and
// sound indicators.
//
// Nodes are plain data. The surface decides how to draw them; the
// controller only creates them, restyles a few fields and removes them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use rand::Rng;

//=== Fixed Asset Sets ====================================================

/// Sprites a dynamically added car can use.
pub const VEHICLE_SPRITES: [&str; 6] = [
    "./Resources/vehicles/Asset 297@2x.png",
    "./Resources/vehicles/Asset 298@2x.png",
    "./Resources/vehicles/Asset 299@2x.png",
    "./Resources/vehicles/Asset 300@2x.png",
    "./Resources/vehicles/Asset 301@2x.png",
    "./Resources/vehicles/Asset 302@2x.png",
];

/// Motion-path keyframe presets for traffic cars.
pub const CAR_ANIMATIONS: [&str; 6] = [
    "car-animation1",
    "car-animation2",
    "car-animation3",
    "car-animation4",
    "car-animation5",
    "car-animation6",
];

/// Glyphs the ambient spawner picks from.
pub const AMBIENT_GLYPHS: [&str; 8] = ["🌸", "🦋", "🐦", "⭐", "🌟", "🌺", "🍃", "✨"];

/// Picks one element uniformly at random.
pub(crate) fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

//=== NodeId ==============================================================

/// Identifier of a decorative node, unique for the controller's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw numeric value, for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

//=== NodeKind ============================================================

/// Category of a decorative node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Traffic car added at runtime.
    Vehicle,

    /// Floating ambient glyph.
    Glyph,

    /// Rain or snow layer.
    Weather,

    /// The three-phase traffic light.
    TrafficLight,

    /// Short-lived sound cue indicator.
    SoundIndicator,
}

impl NodeKind {
    /// Whether nodes of this kind live inside the pannable scene container.
    ///
    /// Weather and sound indicators are fixed to the viewport instead and
    /// survive a missing container.
    pub fn in_container(self) -> bool {
        matches!(self, Self::Vehicle | Self::Glyph | Self::TrafficLight)
    }
}

//=== Geometry & Animation ================================================

/// Position as percentages of the parent's size (top-left anchored).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub top_pct: f32,
    pub left_pct: f32,
}

impl Placement {
    pub fn new(top_pct: f32, left_pct: f32) -> Self {
        Self { top_pct, left_pct }
    }
}

/// How many times an animation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Infinite,
}

/// Keyframe animation reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: &'static str,
    pub duration: Duration,
    pub delay: Duration,
    pub repeat: Repeat,
}

impl Animation {
    pub fn once(name: &'static str, duration: Duration) -> Self {
        Self { name, duration, delay: Duration::ZERO, repeat: Repeat::Once }
    }

    pub fn looping(name: &'static str, duration: Duration) -> Self {
        Self { name, duration, delay: Duration::ZERO, repeat: Repeat::Infinite }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

//=== Weather =============================================================

/// Kind of weather shower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherKind {
    Rain,
    Snow,
}

impl WeatherKind {
    /// Particle size in pixels (width, height).
    pub fn particle_size(self) -> (f32, f32) {
        match self {
            Self::Rain => (2.0, 10.0),
            Self::Snow => (4.0, 4.0),
        }
    }

    /// Fall keyframe name and its base cycle length.
    pub fn fall_animation(self) -> (&'static str, Duration) {
        match self {
            Self::Rain => ("rainFall", Duration::from_secs(2)),
            Self::Snow => ("snowFall", Duration::from_secs(3)),
        }
    }

    /// Particle fill: a blue streak for rain, a white round flake for snow.
    pub fn fill(self) -> &'static str {
        match self {
            Self::Rain => "linear-gradient(to bottom, transparent, #4FC3F7)",
            Self::Snow => "white",
        }
    }

    pub fn is_round(self) -> bool {
        matches!(self, Self::Snow)
    }
}

/// One falling particle inside a weather layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub left_pct: f32,
    pub animation: Animation,
}

//=== Traffic Light =======================================================

/// Phase of the traffic light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightPhase {
    Red,
    Yellow,
    Green,
}

impl LightPhase {
    /// All phases in cycle order.
    pub const ALL: [LightPhase; 3] = [LightPhase::Red, LightPhase::Yellow, LightPhase::Green];

    /// Position in the cycle (red = 0).
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Yellow => 1,
            Self::Green => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Lamp color when lit.
    pub fn color(self) -> &'static str {
        match self {
            Self::Red => "#ff4444",
            Self::Yellow => "#ffff44",
            Self::Green => "#44ff44",
        }
    }
}

//=== Sound Cues ==========================================================

/// Visual stand-in for a sound effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Honk,
    Chime,
}

impl SoundCue {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Honk => "🔊",
            Self::Chime => "🎵",
        }
    }
}

//=== Appearance ==========================================================

/// What a node looks like. The variant determines its [`NodeKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Appearance {
    Vehicle {
        sprite: &'static str,
        tooltip: String,
    },
    Glyph {
        glyph: &'static str,
        font_px: f32,
    },
    Weather {
        kind: WeatherKind,
        particles: Vec<Particle>,
    },
    TrafficLight {
        active: LightPhase,
    },
    SoundIndicator {
        cue: SoundCue,
    },
}

//=== DecorativeNode ======================================================

/// A transient visual element attached to the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorativeNode {
    pub id: NodeId,
    pub appearance: Appearance,
    pub placement: Placement,
    pub animation: Option<Animation>,
}

impl DecorativeNode {
    pub fn kind(&self) -> NodeKind {
        match self.appearance {
            Appearance::Vehicle { .. } => NodeKind::Vehicle,
            Appearance::Glyph { .. } => NodeKind::Glyph,
            Appearance::Weather { .. } => NodeKind::Weather,
            Appearance::TrafficLight { .. } => NodeKind::TrafficLight,
            Appearance::SoundIndicator { .. } => NodeKind::SoundIndicator,
        }
    }

    /// Hover text, if the node carries one (traffic cars do).
    pub fn tooltip(&self) -> Option<&str> {
        match &self.appearance {
            Appearance::Vehicle { tooltip, .. } => Some(tooltip),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn light_phase_cycles_red_yellow_green() {
        assert_eq!(LightPhase::Red.next(), LightPhase::Yellow);
        assert_eq!(LightPhase::Yellow.next(), LightPhase::Green);
        assert_eq!(LightPhase::Green.next(), LightPhase::Red);
    }

    #[test]
    fn only_scene_nodes_live_in_container() {
        assert!(NodeKind::Vehicle.in_container());
        assert!(NodeKind::Glyph.in_container());
        assert!(NodeKind::TrafficLight.in_container());
        assert!(!NodeKind::Weather.in_container());
        assert!(!NodeKind::SoundIndicator.in_container());
    }

    #[test]
    fn kind_follows_appearance() {
        let node = DecorativeNode {
            id: NodeId(1),
            appearance: Appearance::Glyph { glyph: "✨", font_px: 20.0 },
            placement: Placement::default(),
            animation: None,
        };
        assert_eq!(node.kind(), NodeKind::Glyph);
        assert_eq!(node.tooltip(), None);
    }

    #[test]
    fn pick_returns_member_of_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let glyph = pick(&mut rng, &AMBIENT_GLYPHS);
            assert!(AMBIENT_GLYPHS.contains(&glyph));
        }
    }

    #[test]
    fn weather_kinds_differ_in_shape() {
        assert_eq!(WeatherKind::Rain.particle_size(), (2.0, 10.0));
        assert!(WeatherKind::Snow.is_round());
        assert!(!WeatherKind::Rain.is_round());
    }
}
