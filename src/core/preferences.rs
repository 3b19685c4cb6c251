// Notification preference store with partial-update semantics.

use super::model::{NotificationPreferences, PreferencesPatch};

/// Session-scoped preference state. The escalation engine applies the
/// coupled timer side effect after every update, so the store itself stays
/// a plain value holder (hot-reload friendly, like the alert config).
#[derive(Debug, Default)]
pub struct PreferenceStore {
    current: NotificationPreferences,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> NotificationPreferences {
        self.current
    }

    /// Apply a partial update: `enabled` shallow-merges, tier keys merge
    /// one by one so omitted keys keep their prior value. Returns the
    /// resulting preferences.
    pub fn apply(&mut self, patch: &PreferencesPatch) -> NotificationPreferences {
        if let Some(enabled) = patch.enabled {
            self.current.enabled = enabled;
        }
        if let Some(visual) = patch.tiers.visual {
            self.current.tiers.visual = visual;
        }
        if let Some(tab) = patch.tiers.tab {
            self.current.tiers.tab = tab;
        }
        if let Some(push) = patch.tiers.push {
            self.current.tiers.push = push;
        }
        if let Some(sound) = patch.tiers.sound {
            self.current.tiers.sound = sound;
        }
        self.current
    }
}
