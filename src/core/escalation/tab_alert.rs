// Tab alert timer - blinks the window title until stopped.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::platform::TitleSurface;

/// Tick interval for the title flip.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    Alert,
    Original,
}

#[derive(Debug)]
enum BlinkState {
    Idle,
    Blinking {
        generation: u64,
        phase: BlinkPhase,
        message: String,
    },
}

#[derive(Debug)]
struct TimerShared {
    state: BlinkState,
    /// Title captured before the first start of the session; every restore
    /// goes back to this exact value.
    original_title: Option<String>,
    next_generation: u64,
}

/// Cancellable periodic title blinker. At most one ticker is ever active:
/// each `start` bumps a generation counter, and a ticker that wakes up with
/// a stale generation exits instead of racing the new one on the title.
#[derive(Clone)]
pub struct TabAlertTimer {
    surface: Arc<dyn TitleSurface>,
    shared: Arc<Mutex<TimerShared>>,
}

fn alert_title(message: &str) -> String {
    format!("\u{26a0} {message}")
}

impl TabAlertTimer {
    pub fn new(surface: Arc<dyn TitleSurface>) -> Self {
        Self {
            surface,
            shared: Arc::new(Mutex::new(TimerShared {
                state: BlinkState::Idle,
                original_title: None,
                next_generation: 0,
            })),
        }
    }

    /// Begin (or restart) blinking with the given message. A running cycle
    /// is replaced, starting again from the alert phase.
    pub fn start(&self, message: &str) {
        let generation = {
            let mut shared = self.shared.lock().unwrap();
            let generation = shared.next_generation;
            shared.next_generation += 1;
            if shared.original_title.is_none() {
                shared.original_title = Some(self.surface.current_title());
            }
            shared.state = BlinkState::Blinking {
                generation,
                phase: BlinkPhase::Alert,
                message: message.to_string(),
            };
            generation
        };

        self.surface.set_title(&alert_title(message));

        let surface = Arc::clone(&self.surface);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(BLINK_INTERVAL).await;

                let next_title = {
                    let mut guard = shared.lock().unwrap();
                    let original = guard.original_title.clone().unwrap_or_default();
                    match &mut guard.state {
                        BlinkState::Blinking {
                            generation: active,
                            phase,
                            message,
                        } if *active == generation => {
                            *phase = match phase {
                                BlinkPhase::Alert => BlinkPhase::Original,
                                BlinkPhase::Original => BlinkPhase::Alert,
                            };
                            match phase {
                                BlinkPhase::Alert => alert_title(message),
                                BlinkPhase::Original => original,
                            }
                        }
                        // Stopped or superseded by a newer start.
                        _ => break,
                    }
                };

                surface.set_title(&next_title);
            }
        });
    }

    /// Cancel the tick and restore the pre-first-start title. Calling stop
    /// while idle is a no-op.
    pub fn stop(&self) {
        let restore = {
            let mut shared = self.shared.lock().unwrap();
            if matches!(shared.state, BlinkState::Idle) {
                return;
            }
            shared.state = BlinkState::Idle;
            shared.original_title.clone()
        };

        if let Some(title) = restore {
            self.surface.set_title(&title);
        }
    }

    pub fn is_blinking(&self) -> bool {
        matches!(
            self.shared.lock().unwrap().state,
            BlinkState::Blinking { .. }
        )
    }
}
