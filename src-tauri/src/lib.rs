// Mobile builds link the shell through this wrapper crate; the desktop
// binary lives in the root crate.

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    triage_watcher::run();
}
