//! One-shot subcommand handlers.

use crate::acquire::{list_cameras as query_cameras, ImagePicker};
use crate::analysis::Analyzer;
use crate::config::{self, Config};
use crate::session::{self, AppState};

use super::args::ConfigAction;
use std::path::Path;

/// Pick an image with `picker` and describe it.
///
/// Returns the description, or the notice text the app would have shown.
pub async fn describe_with<P: ImagePicker>(
    picker: &P,
    analyzer: &Analyzer,
) -> Result<String, String> {
    let state = session::pick(AppState::new(), picker).await;
    if let Some(notice) = state.notice() {
        return Err(notice.message.clone());
    }
    if state.image().is_none() {
        return Err("No image selected".to_string());
    }

    let state = session::analyze(state, analyzer).await;
    match state.notice() {
        Some(notice) => Err(notice.message.clone()),
        None => Ok(state.result().to_string()),
    }
}

/// Print available cameras.
pub fn list_cameras() -> Result<(), String> {
    let cameras = query_cameras().map_err(|e| e.to_string())?;

    println!("Cameras:");
    if cameras.is_empty() {
        println!("  (none found)");
    }
    for (position, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", position, camera.name);
    }
    Ok(())
}

/// Handle config subcommands.
pub fn handle_config_action(action: ConfigAction, config_path: Option<&Path>) -> Result<(), String> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(config_path).map_err(|e| e.to_string())?;
            println!("# {}", path.display());
            print!("{}", config.to_toml().map_err(|e| e.to_string())?);
        }
        ConfigAction::Init => {
            Config::write_default(&path).map_err(|e| e.to_string())?;
            println!("Created config file: {}", path.display());
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
