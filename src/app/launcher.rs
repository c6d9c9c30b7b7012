
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{error, info};

use crate::*;
use crate::app::system_tray::{run_system_tray, TrayContext};
use crate::utils::{OsForegroundProbe, OsKeyResolver, OsKeyState, OsLayoutRegistry, keyboard_repeat_delay_units};


/// Builds the hook-thread driver fresh each time it is called (startup, and every resume after a suspend)
pub fn driver_factory (settings:&Settings, layouts:Vec<LayoutEntry>, flags:AppFlags) -> DriverFactory {
    let (trigger, favorites, policy) = (settings.trigger(), settings.favorites(), settings.context_policy.clone());
    Arc::new ( move |wake:AF| {
        // re-read per build so a changed os repeat-delay is picked up on resume
        let delay = long_press_delay (keyboard_repeat_delay_units());
        let accent = AccentMachine::new (
            Box::new (OsKeyResolver),
            TextContextClassifier::new (policy.clone(), Box::new (OsForegroundProbe)),
            LongPressTimer::new (delay),
            wake,
            flags.accent_enabled.clone(),
        );
        let layout = LayoutSwitch::new (trigger, favorites, layouts.clone(), flags.clone());
        let host = DriverHost {
            timers    : Box::new (OsTimers),
            injector  : Box::new (SendInputInjector),
            key_state : Box::new (OsKeyState),
            overlay   : Box::new (HeadlessOverlay::default()),
            flash     : Box::new (LogFlash),
        };
        Driver::new (HookDispatch::new (accent, layout), host)
    } )
}


/// Loads settings, enumerates layouts, installs the hooks and runs the tray until Quit.
/// A failed hook install is logged and the tray still comes up (so the user can retry via Resume).
pub fn run () -> anyhow::Result<()> {

    utils::win_set_thread_dpi_aware();

    let store = TomlSettingsStore::default_location() .ok_or_else (|| anyhow!("no user config directory to keep settings in"))?;
    let mut settings = store.load();

    let layouts = OsLayoutRegistry.list_installed_layouts();
    let (layout_1, layout_2) = reconcile_favorites (settings.layout_1, settings.layout_2, &layouts);
    settings.layout_1 = layout_1;
    settings.layout_2 = layout_2;
    store.save (&settings);
    info! (
        layouts = layouts.len(),
        layout_1 = %display_name_for (&layouts, layout_1),
        layout_2 = %display_name_for (&layouts, layout_2),
        "starting capstan"
    );

    let flags = AppFlags::from_settings (&settings);
    let factory = driver_factory (&settings, layouts, flags.clone());

    let iproc = InputProcessor::instance();
    if flags.hook_enabled.is_set() {
        if let Err(e) = iproc.begin_input_processing (factory.clone()) {
            error! (error = %e, "could not install input hooks .. running without interception");
        }
    }

    let ctx = TrayContext { flags: flags.clone(), settings, store: Box::new (store.clone()), factory };
    let tray_result = run_system_tray (ctx);

    iproc.stop_input_processing();

    let mut settings = tray_result?;
    flags.write_into (&mut settings);
    store.save (&settings);
    info! ("capstan exiting");
    Ok(())
}
