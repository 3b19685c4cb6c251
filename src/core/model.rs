use serde::{Deserialize, Serialize};

pub type ItemId = String;

/// Lifecycle state that makes an item eligible for urgency evaluation.
pub const STATUS_PENDING: &str = "pending";
/// Priority value that triggers urgency regardless of amount.
pub const PRIORITY_HIGH: &str = "high";

/// A work item as delivered by the queue collaborator. Read-only to the
/// engine; unknown fields from the collaborator are ignored on deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: ItemId,
    pub status: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub amount: Option<f64>,
    /// ISO-like currency code, meaningful whenever `amount` is set.
    #[serde(default)]
    pub currency: String,
}

impl WorkItem {
    /// Eligible for urgency evaluation: pending and not deleted.
    pub fn is_eligible(&self) -> bool {
        self.status == STATUS_PENDING && !self.deleted
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == PRIORITY_HIGH
    }
}

/// Per-tier alert toggles. Advisory only while `enabled` is true on the
/// enclosing preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierToggles {
    pub visual: bool,
    pub tab: bool,
    pub push: bool,
    pub sound: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    /// Master switch; no tier fires while false.
    pub enabled: bool,
    pub tiers: TierToggles,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        // Push and sound stay off until the matching permission is granted.
        Self {
            enabled: true,
            tiers: TierToggles {
                visual: true,
                tab: true,
                push: false,
                sound: false,
            },
        }
    }
}

/// Partial preference update: `None` keeps the prior value, tier keys merge
/// individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesPatch {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub tiers: TierPatch,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TierPatch {
    #[serde(default)]
    pub visual: Option<bool>,
    #[serde(default)]
    pub tab: Option<bool>,
    #[serde(default)]
    pub push: Option<bool>,
    #[serde(default)]
    pub sound: Option<bool>,
}

impl TierPatch {
    pub fn push_on() -> Self {
        Self {
            push: Some(true),
            ..Self::default()
        }
    }

    pub fn sound_on() -> Self {
        Self {
            sound: Some(true),
            ..Self::default()
        }
    }
}

/// Platform notification permission, mirroring the three states the host
/// reports ("default" until the user answers the prompt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushPermission {
    Default,
    Granted,
    Denied,
}

/// Classifier output for one pass over the item collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrgencyReport {
    pub urgent_items: Vec<WorkItem>,
    /// The continuous visual tier: true while any urgent item exists.
    pub requires_attention: bool,
    /// Items urgent because `priority == "high"`. Not mutually exclusive
    /// with `large_amount_count`.
    pub high_priority_count: usize,
    /// Items urgent because the normalized amount exceeds the threshold.
    pub large_amount_count: usize,
}

/// Observable engine state for the rendering collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub push_permission: PushPermission,
    pub audio_permission: bool,
    pub acknowledged_items: Vec<ItemId>,
    pub preferences: NotificationPreferences,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_item(id: &str) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            status: STATUS_PENDING.to_string(),
            deleted: false,
            priority: "low".to_string(),
            amount: None,
            currency: String::new(),
        }
    }

    #[test]
    fn test_eligibility_requires_pending_and_not_deleted() {
        let item = pending_item("a");
        assert!(item.is_eligible());

        let mut resolved = pending_item("b");
        resolved.status = "resolved".to_string();
        assert!(!resolved.is_eligible());

        let mut deleted = pending_item("c");
        deleted.deleted = true;
        assert!(!deleted.is_eligible());
    }

    #[test]
    fn test_work_item_deserialize_defaults() {
        let item: WorkItem =
            serde_json::from_str(r#"{"id": "x", "status": "pending"}"#).unwrap();
        assert!(item.is_eligible());
        assert!(!item.is_high_priority());
        assert_eq!(item.amount, None);
        assert_eq!(item.currency, "");
    }

    #[test]
    fn test_default_preferences_gate_permissioned_tiers() {
        let prefs = NotificationPreferences::default();
        assert!(prefs.enabled);
        assert!(prefs.tiers.visual && prefs.tiers.tab);
        assert!(!prefs.tiers.push && !prefs.tiers.sound);
    }

    #[test]
    fn test_push_permission_serializes_as_platform_strings() {
        assert_eq!(
            serde_json::to_string(&PushPermission::Default).unwrap(),
            "\"default\""
        );
        assert_eq!(
            serde_json::to_string(&PushPermission::Granted).unwrap(),
            "\"granted\""
        );
    }
}
