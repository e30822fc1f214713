//! Network interface check. Only used to choose which error copy to show,
//! never to gate or retry a request.

use std::fs;
use std::path::{Path, PathBuf};

pub const OFFLINE_MESSAGE: &str =
    "No network connection. Check your connection and search again.";

pub trait NetworkProbe {
    fn is_online(&self) -> bool;
}

/// Reads interface state from sysfs.
pub struct InterfaceProbe {
    root: PathBuf,
}

impl InterfaceProbe {
    pub fn new() -> Self {
        Self::with_root("/sys/class/net")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for InterfaceProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkProbe for InterfaceProbe {
    fn is_online(&self) -> bool {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            // No sysfs on this platform: assume online and show the raw error.
            Err(_) => return true,
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name() != "lo")
            .any(|entry| interface_is_up(&entry.path()))
    }
}

fn interface_is_up(path: &Path) -> bool {
    fs::read_to_string(path.join("operstate"))
        .map(|state| state.trim() == "up")
        .unwrap_or(false)
}

/// Text for the error dialog: the offline notice when no interface is up,
/// the raw failure otherwise.
pub fn error_message(raw: &str, probe: &dyn NetworkProbe) -> String {
    if probe.is_online() {
        raw.to_string()
    } else {
        OFFLINE_MESSAGE.to_string()
    }
}
