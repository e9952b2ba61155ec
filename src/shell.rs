// Tauri host shell: the webview renders frames, Rust owns window state.

use std::collections::HashMap;
use std::sync::Mutex;
use tauri::{AppHandle, Emitter, Manager, State};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::input_handler::InputEvent;
use crate::state::geometry::Size;
use crate::state::window::{WindowEvent, WindowId, WindowSnapshot};
use crate::state::StateManager;

/// Viewport assumed until the webview reports its own
const DEFAULT_VIEWPORT: Size = Size {
    width: 1280.0,
    height: 720.0,
};

fn emit_frames(app: &AppHandle, snapshots: &[WindowSnapshot]) -> Result<(), String> {
    for snapshot in snapshots {
        app.emit("window-frame-changed", snapshot)
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

// ===== Window Management Commands =====

/// `attributes` are the element attributes, e.g. `{"title": "Notes",
/// "minimize-origin": "640 720"}`
#[tauri::command]
fn create_window(
    attributes: HashMap<String, String>,
    app: AppHandle,
    state: State<Mutex<StateManager>>,
) -> Result<WindowSnapshot, String> {
    debug!("create_window called: {:?}", attributes);
    let mut manager = state.lock().map_err(|e| e.to_string())?;

    let window = manager
        .spawn_from_attributes(attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .map_err(|e| e.to_string())?;
    app.emit("window-created", window.clone())
        .map_err(|e| e.to_string())?;

    // Siblings were blurred by the new window taking focus
    let others: Vec<_> = manager
        .get_all_windows()
        .into_iter()
        .filter(|w| w.id != window.id)
        .collect();
    emit_frames(&app, &others)?;

    Ok(window)
}

#[tauri::command]
async fn minimize_window(
    id: String,
    app: AppHandle,
    state: State<'_, Mutex<StateManager>>,
) -> Result<(), String> {
    let snapshot = {
        let mut manager = state.lock().map_err(|e| e.to_string())?;
        manager
            .minimize_window(&WindowId::from(id))
            .map_err(|e| e.to_string())?
    };
    emit_frames(&app, &[snapshot])
}

#[tauri::command]
async fn maximize_window(
    id: String,
    app: AppHandle,
    state: State<'_, Mutex<StateManager>>,
) -> Result<(), String> {
    let snapshot = {
        let mut manager = state.lock().map_err(|e| e.to_string())?;
        manager
            .maximize_window(&WindowId::from(id))
            .map_err(|e| e.to_string())?
    };
    emit_frames(&app, &[snapshot])
}

// Async so it runs on the tokio runtime the removal timer is spawned on
#[tauri::command]
async fn close_window(
    id: String,
    app: AppHandle,
    state: State<'_, Mutex<StateManager>>,
) -> Result<(), String> {
    info!("close_window called: {}", id);
    let snapshot = {
        let mut manager = state.lock().map_err(|e| e.to_string())?;
        manager
            .close_window(&WindowId::from(id))
            .map_err(|e| e.to_string())?
    };
    emit_frames(&app, &[snapshot])
}

/// Raw pointer / button / resize input from a window's frame
#[tauri::command]
async fn window_input(
    id: String,
    event: InputEvent,
    app: AppHandle,
    state: State<'_, Mutex<StateManager>>,
) -> Result<(), String> {
    let changed = {
        let mut manager = state.lock().map_err(|e| e.to_string())?;
        manager
            .dispatch(&WindowId::from(id), event)
            .map_err(|e| e.to_string())?
    };
    emit_frames(&app, &changed)
}

#[tauri::command]
fn set_viewport(
    width: f64,
    height: f64,
    app: AppHandle,
    state: State<Mutex<StateManager>>,
) -> Result<(), String> {
    let snapshots = {
        let mut manager = state.lock().map_err(|e| e.to_string())?;
        manager.set_viewport(Size::new(width, height))
    };
    emit_frames(&app, &snapshots)
}

#[tauri::command]
fn get_all_windows(state: State<Mutex<StateManager>>) -> Result<Vec<WindowSnapshot>, String> {
    let manager = state.lock().map_err(|e| e.to_string())?;
    Ok(manager.get_all_windows())
}

/// Forward window notifications to the webview; drop removed windows
fn handle_window_event(app: &AppHandle, event: WindowEvent) -> Result<(), String> {
    match event {
        WindowEvent::Close { id } => {
            app.emit("window-close", id).map_err(|e| e.to_string())?;
        }
        WindowEvent::Removed { id } => {
            let state = app.state::<Mutex<StateManager>>();
            let mut manager = state.lock().map_err(|e| e.to_string())?;
            manager.remove_window(&id);
            let refocused = manager.restore_focus();
            drop(manager);

            app.emit("window-removed", id).map_err(|e| e.to_string())?;
            if let Some(snapshot) = refocused {
                emit_frames(app, &[snapshot])?;
            }
        }
    }
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let (manager, mut window_events) = StateManager::new(DEFAULT_VIEWPORT);

    tauri::Builder::default()
        .manage(Mutex::new(manager))
        .setup(move |app| {
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                while let Some(event) = window_events.recv().await {
                    if let Err(e) = handle_window_event(&handle, event) {
                        warn!("failed to forward window event: {}", e);
                    }
                }
            });

            info!("window shell initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            create_window,
            minimize_window,
            maximize_window,
            close_window,
            window_input,
            set_viewport,
            get_all_windows,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
