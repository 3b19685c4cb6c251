// Shared test doubles for the platform seams.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::model::PushPermission;
use super::platform::{AlertSounder, PushNote, PushNotifier, TitleSurface};

/// In-memory window title with a write counter.
pub struct FakeTitleSurface {
    title: Mutex<String>,
    writes: AtomicUsize,
}

impl FakeTitleSurface {
    pub fn new(initial: &str) -> Self {
        Self {
            title: Mutex::new(initial.to_string()),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn title(&self) -> String {
        self.title.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl TitleSurface for FakeTitleSurface {
    fn current_title(&self) -> String {
        self.title()
    }

    fn set_title(&self, title: &str) {
        *self.title.lock().unwrap() = title.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Notifier double that records what it is asked to show.
pub struct RecordingNotifier {
    pub available: bool,
    pub permission: Mutex<PushPermission>,
    pub fail_show: bool,
    pub shown: Mutex<Vec<PushNote>>,
    pub permission_requests: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new(permission: PushPermission) -> Self {
        Self {
            available: true,
            permission: Mutex::new(permission),
            fail_show: false,
            shown: Mutex::new(Vec::new()),
            permission_requests: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(PushPermission::Default)
        }
    }

    pub fn shown_count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

impl PushNotifier for RecordingNotifier {
    fn is_available(&self) -> bool {
        self.available
    }

    fn permission_state(&self) -> io::Result<PushPermission> {
        Ok(*self.permission.lock().unwrap())
    }

    fn request_permission(&self) -> io::Result<PushPermission> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(*self.permission.lock().unwrap())
    }

    fn show(&self, note: &PushNote) -> io::Result<()> {
        if self.fail_show {
            return Err(io::Error::other("notification display rejected"));
        }
        self.shown.lock().unwrap().push(note.clone());
        Ok(())
    }
}

/// Sounder double counting replays.
#[derive(Default)]
pub struct CountingSounder {
    pub fail_prepare: bool,
    pub fail_replay: bool,
    pub prepares: AtomicUsize,
    pub replays: AtomicUsize,
}

impl CountingSounder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replay_count(&self) -> usize {
        self.replays.load(Ordering::SeqCst)
    }
}

impl AlertSounder for CountingSounder {
    fn prepare(&self) -> io::Result<()> {
        if self.fail_prepare {
            return Err(io::Error::other("no audio output device"));
        }
        self.prepares.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn replay(&self) -> io::Result<()> {
        if self.fail_replay {
            return Err(io::Error::other("playback rejected"));
        }
        self.replays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
