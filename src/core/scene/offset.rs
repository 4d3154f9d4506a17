//=========================================================================
// Scene Offset & Drag State
//=========================================================================
//
// Click-and-drag panning of the scene container.
//
// The anchor recorded at drag start is `pointer - offset`, so a new drag
// continues from wherever the scene already sits. Every move recomputes
// `pointer - anchor` and clamps each axis to [-limit, limit].
//
//=========================================================================

//=== SceneOffset =========================================================

/// Pan translation applied to the whole scene, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SceneOffset {
    pub x: i32,
    pub y: i32,
}

impl SceneOffset {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// CSS-style transform string, e.g. `translate(150px, 0px)`.
    pub fn to_transform(self) -> String {
        format!("translate({}px, {}px)", self.x, self.y)
    }
}

//=== DragState ===========================================================

/// Exclusive drag-in-progress state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    anchor: Option<(f32, f32)>,
}

impl DragState {
    /// Starts a drag at the pointer, anchored against the current offset.
    ///
    /// Starting while already dragging re-anchors; there is never more
    /// than one drag in progress.
    pub fn begin(&mut self, pointer: (f32, f32), current: SceneOffset) {
        self.anchor = Some((pointer.0 - current.x as f32, pointer.1 - current.y as f32));
    }

    /// New clamped offset for the pointer, or `None` if no drag is active.
    pub fn offset_for(&self, pointer: (f32, f32), limit: i32) -> Option<SceneOffset> {
        let (ax, ay) = self.anchor?;
        Some(SceneOffset {
            x: clamp_axis(pointer.0 - ax, limit),
            y: clamp_axis(pointer.1 - ay, limit),
        })
    }

    /// Ends any drag. Always succeeds.
    pub fn end(&mut self) {
        self.anchor = None;
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
}

fn clamp_axis(value: f32, limit: i32) -> i32 {
    let limit = limit as f32;
    value.clamp(-limit, limit).round() as i32
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn offset_follows_pointer_from_anchor() {
        let mut drag = DragState::default();
        drag.begin((100.0, 100.0), SceneOffset::ORIGIN);

        assert_eq!(drag.offset_for((250.0, 100.0), 200), Some(SceneOffset::new(150, 0)));
    }

    #[test]
    fn offset_clamps_each_axis() {
        let mut drag = DragState::default();
        drag.begin((100.0, 100.0), SceneOffset::ORIGIN);

        assert_eq!(drag.offset_for((500.0, 100.0), 200), Some(SceneOffset::new(200, 0)));
        assert_eq!(drag.offset_for((-900.0, 900.0), 200), Some(SceneOffset::new(-200, 200)));
    }

    #[test]
    fn second_drag_continues_from_current_offset() {
        let mut drag = DragState::default();
        drag.begin((0.0, 0.0), SceneOffset::new(120, -40));

        assert_eq!(drag.offset_for((10.0, 10.0), 200), Some(SceneOffset::new(130, -30)));
    }

    #[test]
    fn inactive_drag_yields_nothing() {
        let mut drag = DragState::default();
        assert_eq!(drag.offset_for((10.0, 10.0), 200), None);

        drag.begin((0.0, 0.0), SceneOffset::ORIGIN);
        drag.end();
        assert!(!drag.is_active());
        assert_eq!(drag.offset_for((10.0, 10.0), 200), None);
    }

    #[test]
    fn end_without_begin_is_harmless() {
        let mut drag = DragState::default();
        drag.end();
        assert!(!drag.is_active());
    }

    #[test]
    fn transform_string() {
        assert_eq!(SceneOffset::new(150, -3).to_transform(), "translate(150px, -3px)");
    }

    #[test]
    fn random_pointer_paths_stay_in_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(0x2545_F491);
        let mut next = || rng.gen_range(-512.0_f32..512.0);

        let mut drag = DragState::default();
        let mut offset = SceneOffset::ORIGIN;
        for step in 0..2_000 {
            if step % 50 == 0 {
                drag.end();
                drag.begin((next(), next()), offset);
            }
            if let Some(o) = drag.offset_for((next(), next()), 200) {
                offset = o;
            }
            assert!((-200..=200).contains(&offset.x), "x out of range: {}", offset.x);
            assert!((-200..=200).contains(&offset.y), "y out of range: {}", offset.y);
        }
    }
}
