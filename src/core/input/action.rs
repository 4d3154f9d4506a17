//=========================================================================
// City Actions
//=========================================================================
//
// High-level commands produced by key bindings.
//
// Actions are what a key press *means* for the scene. The action mapper
// resolves keys to actions, the input system dispatches them to the
// scene controller.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::scene::WeatherKind;

//=== CityAction ==========================================================

/// Scene command triggered by a key binding.
///
/// The default bindings cover the four shortcuts every scene ships with
/// (`n`, `t`, `r`, `Escape`). Weather has no default key and is bound at
/// init time by applications that want it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CityAction {
    /// Flip between day and night.
    ToggleDayNight,

    /// Add one looping traffic car.
    AddTraffic,

    /// Remove dynamic elements and restore the initial view.
    ResetScene,

    /// Close the info panel if it is open.
    ClosePanel,

    /// Start a rain or snow shower.
    Weather(WeatherKind),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn weather_actions_are_distinct_per_kind() {
        let mut set = HashSet::new();
        set.insert(CityAction::Weather(WeatherKind::Rain));
        set.insert(CityAction::Weather(WeatherKind::Snow));
        set.insert(CityAction::Weather(WeatherKind::Rain));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn actions_are_copy() {
        let a = CityAction::AddTraffic;
        let b = a;
        assert_eq!(a, b);
    }
}
