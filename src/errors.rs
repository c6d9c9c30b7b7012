//! Crate error type
//!
//! Nothing on the hook path is allowed to bubble these up into the os callback .. every site that can fail
//! logs and degrades to pass-through instead. The variants mostly exist so that callers and tests can tell the
//! failure classes apart.

use std::path::PathBuf;
use thiserror::Error;


#[derive(Debug, Error)]
pub enum CapstanError {
    /// registering the low-level kbd or mouse hook with the os failed
    #[error("failed to install {hook} hook (os error {code})")]
    HookInstall { hook: &'static str, code: u32 },

    /// the os accepted fewer synthetic events than we asked it to inject
    #[error("injection accepted {sent} of {requested} events")]
    Injection { sent: u32, requested: u32 },

    /// foreground-window / focused-control introspection failed
    #[error("foreground probe failed: {0}")]
    ForegroundProbe(String),

    /// the os refused to activate the requested input layout
    #[error("failed to activate layout {handle:#010X}")]
    LayoutActivation { handle: i64 },

    #[error("settings io error at {path}: {source}")]
    SettingsIo { path: PathBuf, #[source] source: std::io::Error },

    #[error("settings parse error at {path}: {source}")]
    SettingsParse { path: PathBuf, #[source] source: toml::de::Error },

    #[error("settings encode error: {0}")]
    SettingsEncode (#[from] toml::ser::Error),
}

pub type CapstanResult<T> = Result<T, CapstanError>;
