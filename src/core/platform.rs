// Injected handles for the host's global resources.
//
// The window title, the notification surface, and the audio output are
// process-wide singletons owned by the host. The engine only ever talks to
// them through these traits, which keeps the core testable with doubles.

use std::io;
use std::time::Duration;

use super::model::PushPermission;

/// The mutable "current window title" resource.
pub trait TitleSurface: Send + Sync {
    fn current_title(&self) -> String;
    /// Best-effort write; implementations log failures instead of raising.
    fn set_title(&self, title: &str);
}

/// A user action attached to a push notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushAction {
    pub id: &'static str,
    pub label: &'static str,
}

pub const ACTION_VIEW: PushAction = PushAction {
    id: "view",
    label: "View",
};

pub const ACTION_ACKNOWLEDGE: PushAction = PushAction {
    id: "acknowledge",
    label: "Acknowledge",
};

/// One notification to display: title, body, user actions, and the window
/// after which it should be dismissed if the platform supports that.
#[derive(Debug, Clone)]
pub struct PushNote {
    pub title: String,
    pub body: String,
    pub actions: Vec<PushAction>,
    pub auto_dismiss: Duration,
}

/// Platform push-notification capability.
pub trait PushNotifier: Send + Sync {
    /// False when the host has no notification capability at all; every
    /// gated operation short-circuits on it.
    fn is_available(&self) -> bool;
    /// Read the current platform permission state without prompting.
    fn permission_state(&self) -> io::Result<PushPermission>;
    /// Show the platform prompt and report the user's answer. Blocks until
    /// the user responds; callers run it off the event loop.
    fn request_permission(&self) -> io::Result<PushPermission>;
    fn show(&self, note: &PushNote) -> io::Result<()>;
}

/// Audio playback primitive with rewind-and-play semantics.
pub trait AlertSounder: Send + Sync {
    /// Acquire the output device. Called from the user-gesture path that
    /// grants audio permission.
    fn prepare(&self) -> io::Result<()>;
    /// Restart the alert sound from position zero, even if it is already
    /// playing.
    fn replay(&self) -> io::Result<()>;
}
