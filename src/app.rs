use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tauri::{Emitter, Manager, State};
use tauri_plugin_dialog::DialogExt;
use tauri_plugin_notification::NotificationExt;

use crate::core::{
    audio::RodioSounder,
    config::{ConfigManager, Settings},
    escalation::engine::EscalationEngine,
    model::{EngineSnapshot, NotificationPreferences, PreferencesPatch, PushPermission, UrgencyReport, WorkItem},
    platform::{AlertSounder, PushNote, PushNotifier, TitleSurface},
};

/// Window-title resource backed by the main webview window.
struct TauriTitleSurface {
    window: tauri::WebviewWindow,
}

impl TitleSurface for TauriTitleSurface {
    fn current_title(&self) -> String {
        self.window.title().unwrap_or_default()
    }

    fn set_title(&self, title: &str) {
        if let Err(e) = self.window.set_title(title) {
            log::warn!("failed to set window title: {e}");
        }
    }
}

/// Push notifications through the notification plugin.
struct TauriNotifier {
    app: tauri::AppHandle,
}

fn into_push_permission(state: tauri_plugin_notification::PermissionState) -> PushPermission {
    match state {
        tauri_plugin_notification::PermissionState::Granted => PushPermission::Granted,
        tauri_plugin_notification::PermissionState::Denied => PushPermission::Denied,
        _ => PushPermission::Default,
    }
}

impl PushNotifier for TauriNotifier {
    fn is_available(&self) -> bool {
        true
    }

    fn permission_state(&self) -> io::Result<PushPermission> {
        self.app
            .notification()
            .permission_state()
            .map(into_push_permission)
            .map_err(io::Error::other)
    }

    fn request_permission(&self) -> io::Result<PushPermission> {
        self.app
            .notification()
            .request_permission()
            .map(into_push_permission)
            .map_err(io::Error::other)
    }

    fn show(&self, note: &PushNote) -> io::Result<()> {
        // Desktop notifications: action buttons and the auto-dismiss window
        // are advisory here, the OS owns dismissal.
        self.app
            .notification()
            .builder()
            .title(note.title.clone())
            .body(note.body.clone())
            .show()
            .map_err(io::Error::other)
    }
}

struct AppState {
    engine: Arc<Mutex<EscalationEngine>>,
    /// Last item collection supplied by the queue collaborator.
    work_items: Mutex<Vec<WorkItem>>,
    settings: Mutex<Settings>,
    config_manager: ConfigManager,
    sounder: Arc<RodioSounder>,
}

#[tauri::command]
fn get_engine_state(state: State<'_, AppState>) -> EngineSnapshot {
    state.engine.lock().unwrap().snapshot()
}

#[tauri::command]
async fn request_notification_permission(state: State<'_, AppState>) -> Result<bool, String> {
    let engine = state.engine.clone();
    // The platform prompt blocks until the user answers; keep it off the
    // event loop like the blocking file dialogs.
    tauri::async_runtime::spawn_blocking(move || engine.lock().unwrap().request_push_permission())
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn enable_audio_notifications(state: State<'_, AppState>) -> bool {
    state.engine.lock().unwrap().enable_audio_notifications()
}

#[tauri::command]
fn check_for_urgent_items(items: Vec<WorkItem>, state: State<'_, AppState>) -> UrgencyReport {
    let report = state.engine.lock().unwrap().check_for_urgent_items(&items);
    // Keep the collection for the background re-scan loop.
    *state.work_items.lock().unwrap() = items;
    report
}

#[tauri::command]
fn trigger_urgent_notifications(urgent_items: Vec<WorkItem>, state: State<'_, AppState>) {
    state
        .engine
        .lock()
        .unwrap()
        .trigger_urgent_notifications(&urgent_items);
}

#[tauri::command]
fn acknowledge_item(id: String, state: State<'_, AppState>) {
    state.engine.lock().unwrap().acknowledge_item(id);
}

#[tauri::command]
fn acknowledge_all(items: Vec<WorkItem>, state: State<'_, AppState>) {
    let ids = items.into_iter().map(|item| item.id);
    state.engine.lock().unwrap().acknowledge_all(ids);
}

#[tauri::command]
fn reset_acknowledged_items(state: State<'_, AppState>) {
    state.engine.lock().unwrap().reset_acknowledged_items();
}

#[tauri::command]
fn update_preferences(
    patch: PreferencesPatch,
    state: State<'_, AppState>,
) -> NotificationPreferences {
    state.engine.lock().unwrap().update_preferences(&patch)
}

#[tauri::command]
fn get_settings(state: State<'_, AppState>) -> Settings {
    state.settings.lock().unwrap().clone()
}

#[tauri::command]
fn save_settings(settings: Settings, state: State<'_, AppState>) -> Result<(), String> {
    state
        .sounder
        .set_source(settings.sound_file.clone())
        .map_err(|e| e.to_string())?;
    let mut current = state.settings.lock().unwrap();
    *current = settings.clone();
    state.config_manager.save(&settings).map_err(|e| e.to_string())
}

#[tauri::command]
async fn pick_sound_file(app: tauri::AppHandle) -> Result<Option<PathBuf>, String> {
    // Run blocking dialog on a separate thread to avoid freezing the UI
    let result = tauri::async_runtime::spawn_blocking(move || {
        app.dialog()
            .file()
            .add_filter("Audio", &["wav", "mp3", "ogg", "flac"])
            .blocking_pick_file()
    })
    .await
    .map_err(|e| e.to_string())?;

    match result {
        Some(file_path) => file_path.into_path().map(Some).map_err(|e| e.to_string()),
        None => Ok(None),
    }
}

pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_window_state::Builder::default().build())
        .setup(|app| {
            // Initialize Config
            let config_dir = app.path().app_config_dir().unwrap_or(PathBuf::from("."));
            let config_manager = ConfigManager::new(config_dir);
            let settings = config_manager.load();

            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            app.handle().plugin(tauri_plugin_dialog::init())?;
            app.handle().plugin(tauri_plugin_notification::init())?;

            let window = app
                .get_webview_window("main")
                .ok_or("main window missing at setup")?;

            let sounder = Arc::new(RodioSounder::new(settings.sound_file.clone()));
            let surface: Arc<dyn TitleSurface> = Arc::new(TauriTitleSurface { window });
            let notifier: Arc<dyn PushNotifier> = Arc::new(TauriNotifier {
                app: app.handle().clone(),
            });
            let engine = EscalationEngine::new(
                surface,
                notifier,
                sounder.clone() as Arc<dyn AlertSounder>,
            );

            app.manage(AppState {
                engine: Arc::new(Mutex::new(engine)),
                work_items: Mutex::new(Vec::new()),
                settings: Mutex::new(settings),
                config_manager,
                sounder,
            });

            // Background urgency scanner: re-evaluate the last-known item
            // collection and escalate only when the urgent set changes.
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let mut last_urgent_ids: HashSet<String> = HashSet::new();
                println!("Background urgency scanner started.");

                loop {
                    let (report, interval) = {
                        let app_state = handle.state::<AppState>();
                        let items = app_state.work_items.lock().unwrap().clone();
                        let interval = app_state.settings.lock().unwrap().scan_interval_seconds;
                        let report = app_state
                            .engine
                            .lock()
                            .unwrap()
                            .check_for_urgent_items(&items);
                        (report, interval)
                    };

                    let _ = handle.emit("urgency-update", &report);

                    let urgent_ids: HashSet<String> = report
                        .urgent_items
                        .iter()
                        .map(|item| item.id.clone())
                        .collect();
                    if report.requires_attention && urgent_ids != last_urgent_ids {
                        let app_state = handle.state::<AppState>();
                        app_state
                            .engine
                            .lock()
                            .unwrap()
                            .trigger_urgent_notifications(&report.urgent_items);
                    }
                    last_urgent_ids = urgent_ids;

                    tokio::time::sleep(Duration::from_secs(interval.max(1))).await;
                }
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_engine_state,
            request_notification_permission,
            enable_audio_notifications,
            check_for_urgent_items,
            trigger_urgent_notifications,
            acknowledge_item,
            acknowledge_all,
            reset_acknowledged_items,
            update_preferences,
            get_settings,
            save_settings,
            pick_sound_file
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| {
            if let tauri::RunEvent::Exit = event {
                // Stop the blink timer so no ticker or altered title
                // outlives the session.
                let state = app_handle.state::<AppState>();
                state.engine.lock().unwrap().shutdown();
            }
        });
}
