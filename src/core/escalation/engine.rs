// Escalation engine - owns the session state and ties the components
// together so every mutation leaves state consistent before returning.

use std::sync::Arc;

use crate::core::classifier::{self, URGENT_AMOUNT_THRESHOLD_USD};
use crate::core::ledger::AcknowledgmentLedger;
use crate::core::model::{
    EngineSnapshot, ItemId, NotificationPreferences, PreferencesPatch, PushPermission, TierPatch,
    UrgencyReport, WorkItem,
};
use crate::core::permissions::PermissionGateway;
use crate::core::platform::{AlertSounder, PushNotifier, TitleSurface};
use crate::core::preferences::PreferenceStore;

use super::dispatcher::EscalationDispatcher;
use super::tab_alert::TabAlertTimer;

/// Session-scoped escalation engine. Created at app start, discarded at
/// teardown; nothing here survives the process.
pub struct EscalationEngine {
    ledger: AcknowledgmentLedger,
    prefs: PreferenceStore,
    permissions: PermissionGateway,
    dispatcher: EscalationDispatcher,
    notifier: Arc<dyn PushNotifier>,
    sounder: Arc<dyn AlertSounder>,
}

impl EscalationEngine {
    pub fn new(
        surface: Arc<dyn TitleSurface>,
        notifier: Arc<dyn PushNotifier>,
        sounder: Arc<dyn AlertSounder>,
    ) -> Self {
        let timer = TabAlertTimer::new(surface);
        Self {
            ledger: AcknowledgmentLedger::new(),
            prefs: PreferenceStore::new(),
            permissions: PermissionGateway::new(),
            dispatcher: EscalationDispatcher::new(timer, notifier.clone(), sounder.clone()),
            notifier,
            sounder,
        }
    }

    /// Observable state for the rendering collaborator. Re-reads the
    /// platform permission state rather than trusting a past grant.
    pub fn snapshot(&mut self) -> EngineSnapshot {
        if self.notifier.is_available() {
            match self.notifier.permission_state() {
                Ok(state) => self.permissions.record_push(state),
                Err(e) => log::warn!("could not read notification permission: {e}"),
            }
        }
        EngineSnapshot {
            push_permission: self.permissions.push(),
            audio_permission: self.permissions.audio(),
            acknowledged_items: self.ledger.ids(),
            preferences: self.prefs.get(),
        }
    }

    pub fn preferences(&self) -> NotificationPreferences {
        self.prefs.get()
    }

    /// Classify the current item collection against the fixed threshold.
    pub fn check_for_urgent_items(&self, items: &[WorkItem]) -> UrgencyReport {
        classifier::classify(items, URGENT_AMOUNT_THRESHOLD_USD, &self.ledger)
    }

    /// Fire one escalation cycle for an urgent set the caller obtained from
    /// `check_for_urgent_items`.
    pub fn trigger_urgent_notifications(&self, urgent_items: &[WorkItem]) {
        self.dispatcher
            .trigger(urgent_items, &self.prefs.get(), &self.permissions);
    }

    pub fn acknowledge_item(&mut self, id: impl Into<ItemId>) {
        self.ledger.acknowledge(id);
    }

    /// Bulk acknowledgment is the "user has seen everything" action: it also
    /// silences an ongoing tab alert.
    pub fn acknowledge_all<I>(&mut self, ids: I)
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        self.ledger.acknowledge_all(ids);
        self.dispatcher.timer().stop();
    }

    pub fn reset_acknowledged_items(&mut self) {
        self.ledger.reset();
    }

    /// Apply a preference patch. Disabling the master switch or the tab tier
    /// stops a running tab alert within the same call, so preferences and
    /// the timer never disagree.
    pub fn update_preferences(&mut self, patch: &PreferencesPatch) -> NotificationPreferences {
        let prefs = self.prefs.apply(patch);
        if !prefs.enabled || !prefs.tiers.tab {
            self.dispatcher.timer().stop();
        }
        prefs
    }

    /// Show the platform permission prompt. A grant implies intent to use
    /// the tier, so it also switches the push tier on; any failure leaves
    /// preferences untouched and reports false.
    pub fn request_push_permission(&mut self) -> bool {
        if !self.notifier.is_available() {
            return false;
        }
        match self.notifier.request_permission() {
            Ok(state) => {
                self.permissions.record_push(state);
                if state == PushPermission::Granted {
                    self.prefs.apply(&PreferencesPatch {
                        enabled: None,
                        tiers: TierPatch::push_on(),
                    });
                    true
                } else {
                    false
                }
            }
            Err(e) => {
                log::warn!("notification permission request failed: {e}");
                false
            }
        }
    }

    /// Acquire the audio output after a user gesture and switch the sound
    /// tier on. Reports false (leaving state untouched) if the output
    /// cannot be opened.
    pub fn enable_audio_notifications(&mut self) -> bool {
        match self.sounder.prepare() {
            Ok(()) => {
                self.permissions.grant_audio();
                self.prefs.apply(&PreferencesPatch {
                    enabled: None,
                    tiers: TierPatch::sound_on(),
                });
                true
            }
            Err(e) => {
                log::warn!("audio output unavailable: {e}");
                false
            }
        }
    }

    /// Session teardown: stop the blink timer so neither a ticker nor an
    /// altered title outlives the engine.
    pub fn shutdown(&self) {
        self.dispatcher.timer().stop();
    }

    #[cfg(test)]
    pub(crate) fn timer(&self) -> &TabAlertTimer {
        self.dispatcher.timer()
    }
}
