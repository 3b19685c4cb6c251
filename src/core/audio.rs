// Rodio-backed alert sound with rewind-and-replay semantics.
//
// The output stream is not Send, so a dedicated thread owns it and the sink;
// the rest of the app talks to it over a command channel. The thread exits
// when the sender side is dropped.

use std::fs;
use std::io::{self, Cursor};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStreamBuilder, Sink};

use super::platform::AlertSounder;

enum AudioCommand {
    Replay,
    SetSource(Option<Vec<u8>>),
}

/// Alert sound player. `prepare` is deferred to the user gesture that
/// grants audio permission; until then every `replay` reports an error the
/// dispatcher downgrades to a log line.
pub struct RodioSounder {
    source_file: Mutex<Option<PathBuf>>,
    commands: Mutex<Option<Sender<AudioCommand>>>,
}

impl RodioSounder {
    pub fn new(source_file: Option<PathBuf>) -> Self {
        Self {
            source_file: Mutex::new(source_file),
            commands: Mutex::new(None),
        }
    }

    /// Swap the alert sound. Reads the file eagerly so a bad pick surfaces
    /// to the caller; `None` goes back to the built-in chime.
    pub fn set_source(&self, path: Option<PathBuf>) -> io::Result<()> {
        let bytes = match &path {
            Some(path) => Some(fs::read(path)?),
            None => None,
        };
        *self.source_file.lock().unwrap() = path;
        if let Some(commands) = self.commands.lock().unwrap().as_ref() {
            let _ = commands.send(AudioCommand::SetSource(bytes));
        }
        Ok(())
    }
}

impl AlertSounder for RodioSounder {
    fn prepare(&self) -> io::Result<()> {
        let mut slot = self.commands.lock().unwrap();
        if slot.is_some() {
            return Ok(());
        }

        let bytes = match self.source_file.lock().unwrap().as_ref() {
            Some(path) => Some(fs::read(path)?),
            None => None,
        };

        let (commands, inbox) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();
        thread::Builder::new()
            .name("alert-audio".to_string())
            .spawn(move || audio_thread(&inbox, &ready_tx, bytes))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *slot = Some(commands);
                Ok(())
            }
            Ok(Err(message)) => Err(io::Error::other(message)),
            Err(_) => Err(io::Error::other("audio thread exited during startup")),
        }
    }

    fn replay(&self) -> io::Result<()> {
        match self.commands.lock().unwrap().as_ref() {
            Some(commands) => commands
                .send(AudioCommand::Replay)
                .map_err(|_| io::Error::other("audio thread stopped")),
            None => Err(io::Error::other("audio output not initialized")),
        }
    }
}

fn audio_thread(
    inbox: &Receiver<AudioCommand>,
    ready: &Sender<Result<(), String>>,
    mut bytes: Option<Vec<u8>>,
) {
    let stream = match OutputStreamBuilder::open_default_stream() {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };
    let sink = Sink::connect_new(&stream.mixer());
    let _ = ready.send(Ok(()));

    while let Ok(command) = inbox.recv() {
        match command {
            AudioCommand::SetSource(new_bytes) => bytes = new_bytes,
            AudioCommand::Replay => {
                // Stopping clears the queue, so the appended source always
                // plays from position zero.
                sink.stop();
                match &bytes {
                    Some(bytes) => match Decoder::new(Cursor::new(bytes.clone())) {
                        Ok(source) => sink.append(source),
                        Err(e) => {
                            log::warn!("failed to decode alert sound: {e}");
                            continue;
                        }
                    },
                    None => append_chime(&sink),
                }
                sink.play();
            }
        }
    }
}

/// Built-in two-tone chime, used when no custom sound file is configured.
fn append_chime(sink: &Sink) {
    sink.append(
        SineWave::new(880.0)
            .take_duration(Duration::from_millis(150))
            .amplify(0.25),
    );
    sink.append(
        SineWave::new(1318.5)
            .take_duration(Duration::from_millis(250))
            .amplify(0.25),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // Device-dependent behavior is covered by the CountingSounder double;
    // these only exercise the paths that never touch an output device.

    #[test]
    fn test_replay_before_prepare_reports_uninitialized() {
        let sounder = RodioSounder::new(None);
        let err = sounder.replay().unwrap_err();
        assert!(err.to_string().contains("not initialized"));
    }

    #[test]
    fn test_set_source_rejects_missing_file() {
        let sounder = RodioSounder::new(None);
        let missing = PathBuf::from("/definitely/not/here.wav");
        assert!(sounder.set_source(Some(missing)).is_err());
        // The previous source is untouched on failure.
        assert!(sounder.source_file.lock().unwrap().is_none());
    }

    #[test]
    fn test_set_source_accepts_clearing_to_builtin_chime() {
        let sounder = RodioSounder::new(Some(PathBuf::from("/tmp/old.wav")));
        sounder.set_source(None).unwrap();
        assert!(sounder.source_file.lock().unwrap().is_none());
    }
}
