//=========================================================================
// Landmarks
//=========================================================================
//
// Static interactive elements of the city: buildings, parked vehicles,
// plants and the control buttons. Landmarks are created with the surface
// and never removed; only their highlight and scale change.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::CityAction;

//=== Geometry ============================================================

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centered in a `w`×`h` area.
    pub fn centered(w: f32, h: f32, width: f32, height: f32) -> Self {
        Self::new((w - width) / 2.0, (h - height) / 2.0, width, height)
    }

    /// Half-open containment test (right and bottom edges excluded).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Same rectangle moved by (dx, dy).
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

//=== LandmarkId ==========================================================

/// Index-stable identifier of a landmark on its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LandmarkId(pub(crate) u32);

impl LandmarkId {
    pub fn get(self) -> u32 {
        self.0
    }
}

//=== LandmarkKind ========================================================

/// What a landmark is. Every kind is interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkKind {
    Building,
    Vehicle,
    Plant,

    /// Control button bound to an action; fixed to the viewport.
    Control(CityAction),
}

impl LandmarkKind {
    /// Controls do not move with the scene offset.
    pub fn pans_with_scene(self) -> bool {
        !matches!(self, Self::Control(_))
    }
}

//=== Landmark ============================================================

/// A static element with optional hover and click texts.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub id: LandmarkId,
    pub kind: LandmarkKind,
    pub bounds: Rect,
    pub tooltip: Option<String>,
    pub info: Option<String>,
    pub highlighted: bool,
    pub scale: f32,
}

impl Landmark {
    pub(crate) fn new(id: LandmarkId, kind: LandmarkKind, bounds: Rect) -> Self {
        Self {
            id,
            kind,
            bounds,
            tooltip: None,
            info: None,
            highlighted: false,
            scale: 1.0,
        }
    }

    pub(crate) fn with_texts(mut self, tooltip: Option<&str>, info: Option<&str>) -> Self {
        self.tooltip = tooltip.map(str::to_owned);
        self.info = info.map(str::to_owned);
        self
    }

    /// Panel title when clicked: the hover text, or `"Information"`.
    pub fn panel_title(&self) -> &str {
        self.tooltip.as_deref().unwrap_or("Information")
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
