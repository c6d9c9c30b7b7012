
use std::{fs, io, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::*;


/// Everything we persist between runs .. missing keys in the file just fall back to these defaults
# [ derive (Debug, Clone, PartialEq, Eq, Serialize, Deserialize) ]
#[serde(default)]
pub struct Settings {
    pub hook_enabled        : bool,
    pub accent_hold_enabled : bool,
    pub overlay_enabled     : bool,
    pub cycle_all_layouts   : bool,
    pub layout_1            : LayoutHandle,
    pub layout_2            : LayoutHandle,
    /// virtual-key code of the layout switch trigger (CapsLock by default)
    pub trigger_key         : u32,
    // tables have to come after the plain values for toml
    pub context_policy      : ContextPolicy,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            hook_enabled        : true,
            accent_hold_enabled : true,
            overlay_enabled     : true,
            cycle_all_layouts   : false,
            layout_1            : LayoutHandle::default(),
            layout_2            : LayoutHandle::default(),
            trigger_key         : KbdKey::CapsLock.vk(),
            context_policy      : ContextPolicy::default(),
        }
    }
}

impl Settings {
    pub fn trigger (&self) -> KbdKey { KbdKey::from (self.trigger_key) }
    pub fn favorites (&self) -> (LayoutHandle, LayoutHandle) { (self.layout_1, self.layout_2) }
}



/// Best-effort persistence .. load never fails (defaults instead), save failures only get logged
pub trait SettingsStore {
    fn load (&self) -> Settings;
    fn save (&self, settings:&Settings);
}


/// Settings as a toml file, by default in the user config dir
# [ derive (Debug, Clone) ]
pub struct TomlSettingsStore {
    path : PathBuf,
}

impl TomlSettingsStore {

    pub fn new (path:PathBuf) -> TomlSettingsStore { TomlSettingsStore { path } }

    /// `<config dir>/capstan/settings.toml`, or None where the platform has no config dir
    pub fn default_location () -> Option<TomlSettingsStore> {
        dirs::config_dir() .map (|d| TomlSettingsStore::new (d.join("capstan").join("settings.toml")))
    }

    pub fn path (&self) -> &Path { &self.path }

    pub fn try_load (&self) -> CapstanResult<Settings> {
        let content = match fs::read_to_string (&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok (Settings::default()),
            Err(e) => return Err (CapstanError::SettingsIo { path: self.path.clone(), source: e }),
        };
        toml::from_str (&content) .map_err (|e| CapstanError::SettingsParse { path: self.path.clone(), source: e })
    }

    pub fn try_save (&self, settings:&Settings) -> CapstanResult<()> {
        let io_err = |e| CapstanError::SettingsIo { path: self.path.clone(), source: e };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all (dir) .map_err (io_err)?;
        }
        let content = toml::to_string_pretty (settings)?;
        // write-then-rename so a crash mid-write never leaves a torn file behind
        let temp_path = self.path.with_extension ("toml.tmp");
        fs::write (&temp_path, content) .map_err (io_err)?;
        fs::rename (&temp_path, &self.path) .map_err (io_err)
    }
}

impl SettingsStore for TomlSettingsStore {

    fn load (&self) -> Settings {
        match self.try_load() {
            Ok(s) => { info! (path = %self.path.display(), "settings loaded"); s }
            Err(e) => { warn! (error = %e, "settings load failed, using defaults"); Settings::default() }
        }
    }

    fn save (&self, settings:&Settings) {
        if let Err(e) = self.try_save (settings) {
            warn! (error = %e, "settings save failed");
        }
    }
}
