// Permission gateway - tracks what the platform and the user have allowed.

use super::model::PushPermission;

/// Session permission state. Both flags start at the most restrictive value
/// and only move through explicit user-driven operations; there is no revoke
/// path here because revocation happens at the platform level and is picked
/// up the next time the platform state is read.
#[derive(Debug)]
pub struct PermissionGateway {
    push: PushPermission,
    audio: bool,
}

impl Default for PermissionGateway {
    fn default() -> Self {
        Self {
            push: PushPermission::Default,
            audio: false,
        }
    }
}

impl PermissionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self) -> PushPermission {
        self.push
    }

    pub fn audio(&self) -> bool {
        self.audio
    }

    /// Record what the platform reported. The platform is authoritative, so
    /// this accepts any state, including a downgrade after an OS-level
    /// revocation.
    pub fn record_push(&mut self, state: PushPermission) {
        self.push = state;
    }

    /// Mark audio playback as permitted after a user gesture initialized
    /// the output.
    pub fn grant_audio(&mut self) {
        self.audio = true;
    }
}
