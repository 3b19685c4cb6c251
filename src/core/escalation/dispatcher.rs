// Escalation dispatcher - fires the tab, push, and sound tiers.

use std::sync::Arc;
use std::time::Duration;

use crate::core::model::{NotificationPreferences, PushPermission, WorkItem};
use crate::core::permissions::PermissionGateway;
use crate::core::platform::{
    AlertSounder, PushNote, PushNotifier, ACTION_ACKNOWLEDGE, ACTION_VIEW,
};

use super::tab_alert::TabAlertTimer;

/// Notification heading shown by the push tier.
pub const PUSH_TITLE: &str = "TriageWatcher";

/// Window after which a shown notification is dismissed, where the platform
/// lets us control that.
pub const PUSH_AUTO_DISMISS: Duration = Duration::from_secs(30);

/// Human-readable urgency summary, singular/plural aware.
pub fn count_message(count: usize) -> String {
    if count == 1 {
        "1 urgent item requires attention".to_string()
    } else {
        format!("{count} urgent items require attention")
    }
}

/// Dispatches one escalation cycle across the tiers that preferences and
/// permissions allow. The visual tier is not dispatched here: it is the
/// continuous `requires_attention` flag the UI reads from the classifier.
pub struct EscalationDispatcher {
    timer: TabAlertTimer,
    notifier: Arc<dyn PushNotifier>,
    sounder: Arc<dyn AlertSounder>,
}

impl EscalationDispatcher {
    pub fn new(
        timer: TabAlertTimer,
        notifier: Arc<dyn PushNotifier>,
        sounder: Arc<dyn AlertSounder>,
    ) -> Self {
        Self {
            timer,
            notifier,
            sounder,
        }
    }

    pub fn timer(&self) -> &TabAlertTimer {
        &self.timer
    }

    /// Fire one escalation cycle for the given urgent set. Each tier is
    /// gated independently and a failing tier never blocks the others; a
    /// failed attempt is simply retried by whatever triggers the next cycle.
    pub fn trigger(
        &self,
        urgent_items: &[WorkItem],
        prefs: &NotificationPreferences,
        permissions: &PermissionGateway,
    ) {
        if !prefs.enabled || urgent_items.is_empty() {
            return;
        }

        let message = count_message(urgent_items.len());

        if prefs.tiers.tab {
            self.timer.start(&message);
        }

        if prefs.tiers.push
            && permissions.push() == PushPermission::Granted
            && self.notifier.is_available()
        {
            let note = PushNote {
                title: PUSH_TITLE.to_string(),
                body: message.clone(),
                actions: vec![ACTION_VIEW, ACTION_ACKNOWLEDGE],
                auto_dismiss: PUSH_AUTO_DISMISS,
            };
            if let Err(e) = self.notifier.show(&note) {
                log::warn!("push notification failed: {e}");
            }
        }

        if prefs.tiers.sound && permissions.audio() {
            if let Err(e) = self.sounder.replay() {
                log::warn!("alert sound failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{PreferencesPatch, TierPatch, STATUS_PENDING};
    use crate::core::preferences::PreferenceStore;
    use crate::core::test_support::{CountingSounder, FakeTitleSurface, RecordingNotifier};

    fn urgent(id: &str) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            status: STATUS_PENDING.to_string(),
            deleted: false,
            priority: "high".to_string(),
            amount: None,
            currency: String::new(),
        }
    }

    struct Fixture {
        surface: Arc<FakeTitleSurface>,
        notifier: Arc<RecordingNotifier>,
        sounder: Arc<CountingSounder>,
        dispatcher: EscalationDispatcher,
    }

    fn make_fixture(notifier: RecordingNotifier, sounder: CountingSounder) -> Fixture {
        let surface = Arc::new(FakeTitleSurface::new("Work Queue"));
        let notifier = Arc::new(notifier);
        let sounder = Arc::new(sounder);
        let dispatcher = EscalationDispatcher::new(
            TabAlertTimer::new(surface.clone()),
            notifier.clone(),
            sounder.clone(),
        );
        Fixture {
            surface,
            notifier,
            sounder,
            dispatcher,
        }
    }

    fn all_tiers_on(permissions: &mut PermissionGateway) -> NotificationPreferences {
        permissions.record_push(PushPermission::Granted);
        permissions.grant_audio();
        let mut store = PreferenceStore::new();
        store.apply(&PreferencesPatch {
            enabled: None,
            tiers: TierPatch {
                push: Some(true),
                sound: Some(true),
                ..TierPatch::default()
            },
        })
    }

    #[test]
    fn test_message_is_singular_plural_aware() {
        assert_eq!(count_message(1), "1 urgent item requires attention");
        assert_eq!(count_message(3), "3 urgent items require attention");
    }

    #[tokio::test(start_paused = true)]
    async fn test_master_switch_off_means_no_side_effects() {
        let fixture = make_fixture(
            RecordingNotifier::new(PushPermission::Granted),
            CountingSounder::new(),
        );
        let mut permissions = PermissionGateway::new();
        let mut prefs = all_tiers_on(&mut permissions);
        prefs.enabled = false;

        fixture
            .dispatcher
            .trigger(&[urgent("a")], &prefs, &permissions);

        assert!(!fixture.dispatcher.timer().is_blinking());
        assert_eq!(fixture.notifier.shown_count(), 0);
        assert_eq!(fixture.sounder.replay_count(), 0);
        assert_eq!(fixture.surface.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_urgent_set_is_a_noop() {
        let fixture = make_fixture(
            RecordingNotifier::new(PushPermission::Granted),
            CountingSounder::new(),
        );
        let mut permissions = PermissionGateway::new();
        let prefs = all_tiers_on(&mut permissions);

        fixture.dispatcher.trigger(&[], &prefs, &permissions);

        assert!(!fixture.dispatcher.timer().is_blinking());
        assert_eq!(fixture.notifier.shown_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_tiers_fire_when_allowed() {
        let fixture = make_fixture(
            RecordingNotifier::new(PushPermission::Granted),
            CountingSounder::new(),
        );
        let mut permissions = PermissionGateway::new();
        let prefs = all_tiers_on(&mut permissions);

        fixture
            .dispatcher
            .trigger(&[urgent("a"), urgent("b")], &prefs, &permissions);

        assert!(fixture.dispatcher.timer().is_blinking());
        assert_eq!(
            fixture.surface.title(),
            "\u{26a0} 2 urgent items require attention"
        );
        assert_eq!(fixture.sounder.replay_count(), 1);

        let shown = fixture.notifier.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].body, "2 urgent items require attention");
        assert_eq!(shown[0].actions, vec![ACTION_VIEW, ACTION_ACKNOWLEDGE]);
        assert_eq!(shown[0].auto_dismiss, PUSH_AUTO_DISMISS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_requires_granted_permission() {
        let fixture = make_fixture(
            RecordingNotifier::new(PushPermission::Default),
            CountingSounder::new(),
        );
        let mut permissions = PermissionGateway::new();
        let mut store = PreferenceStore::new();
        let prefs = store.apply(&PreferencesPatch {
            enabled: None,
            tiers: TierPatch::push_on(),
        });
        // Tier is on but the platform never granted permission.
        permissions.grant_audio();

        fixture
            .dispatcher
            .trigger(&[urgent("a")], &prefs, &permissions);

        assert_eq!(fixture.notifier.shown_count(), 0);
        // The tab tier still fired.
        assert!(fixture.dispatcher.timer().is_blinking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_absent_platform_capability_short_circuits() {
        let fixture = make_fixture(RecordingNotifier::unavailable(), CountingSounder::new());
        let mut permissions = PermissionGateway::new();
        let prefs = all_tiers_on(&mut permissions);

        fixture
            .dispatcher
            .trigger(&[urgent("a")], &prefs, &permissions);

        assert_eq!(fixture.notifier.shown_count(), 0);
        assert_eq!(fixture.sounder.replay_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_tier_failure_never_blocks_the_others() {
        let mut notifier = RecordingNotifier::new(PushPermission::Granted);
        notifier.fail_show = true;
        let fixture = make_fixture(notifier, CountingSounder::new());
        let mut permissions = PermissionGateway::new();
        let prefs = all_tiers_on(&mut permissions);

        fixture
            .dispatcher
            .trigger(&[urgent("a")], &prefs, &permissions);

        assert!(fixture.dispatcher.timer().is_blinking());
        assert_eq!(fixture.sounder.replay_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_trigger_replays_the_sound() {
        let fixture = make_fixture(
            RecordingNotifier::new(PushPermission::Granted),
            CountingSounder::new(),
        );
        let mut permissions = PermissionGateway::new();
        let prefs = all_tiers_on(&mut permissions);

        fixture
            .dispatcher
            .trigger(&[urgent("a")], &prefs, &permissions);
        fixture
            .dispatcher
            .trigger(&[urgent("a")], &prefs, &permissions);

        assert_eq!(fixture.sounder.replay_count(), 2);
    }
}
