//=========================================================================
// Action Mapper
//=========================================================================
//
// Maps key presses to city actions.
//
// Architecture:
//   (key, modifiers) → HashMap → CityAction
//
// Shortcuts are case-insensitive: binding a character registers both the
// plain and the Shift variant of its physical key. A chord with no binding
// of its own falls back to the plain key, so Ctrl+N still toggles night.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{
    action::CityAction,
    event::{InputEvent, KeyCode, Modifiers},
};

//=== ActionMapper ========================================================

/// Maps key events to actions via exact (key, modifiers) lookups.
pub(crate) struct ActionMapper {
    key_bindings: HashMap<(KeyCode, Modifiers), CityAction>,
}

impl ActionMapper {
    /// Creates a mapper with no bindings.
    pub(crate) fn new() -> Self {
        Self {
            key_bindings: HashMap::new(),
        }
    }

    /// Creates a mapper with the standard scene shortcuts.
    ///
    /// | Key      | Action           |
    /// |----------|------------------|
    /// | `n`      | toggle day/night |
    /// | `t`      | add traffic      |
    /// | `r`      | reset scene      |
    /// | `Escape` | close panel      |
    pub(crate) fn with_default_bindings() -> Self {
        let mut mapper = Self::new();
        mapper.bind_char('n', CityAction::ToggleDayNight);
        mapper.bind_char('t', CityAction::AddTraffic);
        mapper.bind_char('r', CityAction::ResetScene);
        mapper.bind_key(KeyCode::Escape, CityAction::ClosePanel);
        mapper.bind_key_with_mods(KeyCode::Escape, Modifiers::SHIFT, CityAction::ClosePanel);
        mapper
    }

    //--- Binding API ------------------------------------------------------

    /// Binds a key to an action (no modifiers).
    pub(crate) fn bind_key(&mut self, key: KeyCode, action: CityAction) {
        self.bind_key_with_mods(key, Modifiers::NONE, action);
    }

    /// Binds a key with modifiers to an action (exact match required).
    pub(crate) fn bind_key_with_mods(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        action: CityAction,
    ) {
        if let Some(previous) = self.key_bindings.insert((key, modifiers), action) {
            debug!("Rebound {:?}+{:?}: {:?} → {:?}", modifiers, key, previous, action);
        }
    }

    /// Binds a character case-insensitively (plain and Shift variants).
    ///
    /// Returns `false` if the character has no physical key.
    pub(crate) fn bind_char(&mut self, c: char, action: CityAction) -> bool {
        let Some(key) = KeyCode::from_char(c) else {
            return false;
        };
        self.bind_key(key, action);
        self.bind_key_with_mods(key, Modifiers::SHIFT, action);
        true
    }

    /// Removes every binding for a key (all modifier combinations).
    pub(crate) fn unbind_key(&mut self, key: KeyCode) {
        self.key_bindings.retain(|&(k, _), _| k != key);
    }

    /// Number of registered (key, modifiers) pairs.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.key_bindings.len()
    }

    //--- Event Mapping ----------------------------------------------------

    /// Maps an input event to an action. Only key presses resolve.
    pub(crate) fn map_event(&self, event: &InputEvent) -> Option<CityAction> {
        match event {
            InputEvent::KeyDown { key, modifiers } => self.map_key(*key, *modifiers),
            _ => None,
        }
    }

    /// Exact (key, modifiers) binding first, then the key's plain binding.
    fn map_key(&self, key: KeyCode, modifiers: Modifiers) -> Option<CityAction> {
        self.key_bindings
            .get(&(key, modifiers))
            .or_else(|| self.key_bindings.get(&(key, Modifiers::NONE)))
            .copied()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::WeatherKind;

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    fn key_down_with_mods(key: KeyCode, modifiers: Modifiers) -> InputEvent {
        InputEvent::KeyDown { key, modifiers }
    }

    //=====================================================================
    // Default Bindings
    //=====================================================================

    #[test]
    fn default_bindings_cover_scene_shortcuts() {
        let mapper = ActionMapper::with_default_bindings();

        assert_eq!(mapper.map_event(&key_down(KeyCode::KeyN)), Some(CityAction::ToggleDayNight));
        assert_eq!(mapper.map_event(&key_down(KeyCode::KeyT)), Some(CityAction::AddTraffic));
        assert_eq!(mapper.map_event(&key_down(KeyCode::KeyR)), Some(CityAction::ResetScene));
        assert_eq!(mapper.map_event(&key_down(KeyCode::Escape)), Some(CityAction::ClosePanel));
    }

    #[test]
    fn default_bindings_are_case_insensitive() {
        let mapper = ActionMapper::with_default_bindings();

        let shifted = key_down_with_mods(KeyCode::KeyT, Modifiers::SHIFT);
        assert_eq!(mapper.map_event(&shifted), Some(CityAction::AddTraffic));
    }

    #[test]
    fn modified_keys_fall_back_to_plain_binding() {
        let mapper = ActionMapper::with_default_bindings();

        let ctrl_n = key_down_with_mods(KeyCode::KeyN, Modifiers::CTRL);
        let alt_t = key_down_with_mods(KeyCode::KeyT, Modifiers::ALT);
        assert_eq!(mapper.map_event(&ctrl_n), Some(CityAction::ToggleDayNight));
        assert_eq!(mapper.map_event(&alt_t), Some(CityAction::AddTraffic));
    }

    #[test]
    fn exact_chord_binding_wins_over_plain_key() {
        let mut mapper = ActionMapper::with_default_bindings();
        mapper.bind_key_with_mods(KeyCode::KeyR, Modifiers::CTRL, CityAction::ClosePanel);

        let ctrl_r = key_down_with_mods(KeyCode::KeyR, Modifiers::CTRL);
        assert_eq!(mapper.map_event(&ctrl_r), Some(CityAction::ClosePanel));
        assert_eq!(mapper.map_event(&key_down(KeyCode::KeyR)), Some(CityAction::ResetScene));
    }

    #[test]
    fn unbound_key_maps_to_none() {
        let mapper = ActionMapper::with_default_bindings();
        assert_eq!(mapper.map_event(&key_down(KeyCode::KeyQ)), None);
    }

    #[test]
    fn key_up_never_maps() {
        let mapper = ActionMapper::with_default_bindings();
        let up = InputEvent::KeyUp { key: KeyCode::KeyN, modifiers: Modifiers::NONE };
        assert_eq!(mapper.map_event(&up), None);
    }

    //=====================================================================
    // Custom Bindings
    //=====================================================================

    #[test]
    fn bind_char_registers_two_variants() {
        let mut mapper = ActionMapper::new();
        assert!(mapper.bind_char('w', CityAction::Weather(WeatherKind::Rain)));
        assert_eq!(mapper.len(), 2);
    }

    #[test]
    fn bind_char_rejects_unmapped_characters() {
        let mut mapper = ActionMapper::new();
        assert!(!mapper.bind_char('#', CityAction::AddTraffic));
        assert_eq!(mapper.len(), 0);
    }

    #[test]
    fn rebinding_replaces_action() {
        let mut mapper = ActionMapper::new();
        mapper.bind_key(KeyCode::KeyS, CityAction::AddTraffic);
        mapper.bind_key(KeyCode::KeyS, CityAction::Weather(WeatherKind::Snow));

        assert_eq!(
            mapper.map_event(&key_down(KeyCode::KeyS)),
            Some(CityAction::Weather(WeatherKind::Snow))
        );
    }

    #[test]
    fn unbind_key_removes_all_variants() {
        let mut mapper = ActionMapper::with_default_bindings();
        mapper.unbind_key(KeyCode::KeyN);

        assert_eq!(mapper.map_event(&key_down(KeyCode::KeyN)), None);
        assert_eq!(
            mapper.map_event(&key_down_with_mods(KeyCode::KeyN, Modifiers::SHIFT)),
            None
        );
    }
}
