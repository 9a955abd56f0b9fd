//! Support for library configuration options

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use url::Url;

use crate::assistant::Coordinates;

/// Base URL of the Generative Language API.
/// Feel free to override it when initing this library (e.g. to go through a proxy).
pub static API_BASE_URL: Lazy<Arc<Mutex<Url>>> = Lazy::new(|| Arc::new(Mutex::new(
    Url::parse("https://generativelanguage.googleapis.com/v1beta/").expect("hard-coded URL is valid")
)));

/// The model that answers location lookups and plan requests.
/// Feel free to override it when initing this library.
pub static MODEL_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("gemini-2.5-flash".to_string())));

/// How long a request to the assistant may take before being considered failed
pub static REQUEST_TIMEOUT: Lazy<Arc<Mutex<Duration>>> = Lazy::new(|| Arc::new(Mutex::new(Duration::from_secs(30))));

/// Where the task collection is stored when nothing else is specified
pub const DEFAULT_STORAGE_FILE: &str = "smart-agenda-tasks.json";

/// Environment variables read by [`api_key_from_env`], by order of preference
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
pub const STORAGE_FILE_VAR: &str = "SMART_AGENDA_FILE";
pub const LATITUDE_VAR: &str = "SMART_AGENDA_LAT";
pub const LONGITUDE_VAR: &str = "SMART_AGENDA_LNG";

/// The API key of the assistant, if any is set in the environment
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS.iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|key| key.trim().is_empty() == false)
}

/// The file that holds the task collection
pub fn storage_file_from_env() -> PathBuf {
    match std::env::var(STORAGE_FILE_VAR) {
        Ok(path) if path.trim().is_empty() == false => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_STORAGE_FILE),
    }
}

/// The current position, if it is set in the environment.
///
/// This is a best effort: missing or invalid values simply mean "unknown position".
pub fn position_from_env() -> Option<Coordinates> {
    let lat = std::env::var(LATITUDE_VAR).ok()?;
    let lng = std::env::var(LONGITUDE_VAR).ok()?;
    match (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) {
        (Ok(latitude), Ok(longitude)) => Some(Coordinates::new(latitude, longitude)),
        _ => {
            log::warn!("Ignoring invalid position {:?}, {:?}", lat, lng);
            None
        }
    }
}
