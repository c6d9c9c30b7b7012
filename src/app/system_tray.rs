
use anyhow::Context;
use image::ImageFormat;
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tao::platform::run_return::EventLoopExtRunReturn;
use tracing::{error, info, warn};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};
use tray_icon::menu::{CheckMenuItem, Menu, MenuEvent, MenuItem};

use crate::*;


const ICON_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAACAAAAAgCAYAAABzenr0AAAAZUlEQVR42u2Wyw0AEBBEtaI2XWqOi7vs12Be4iovMma3FLKorY/MQ4F7BXaECUhxFdDiImDFJCC91P0FtAFzCaEl4SEC6T1AAQrACaR/w+NFBFHFx4cRxDiGWEggVjJuxe8LfMsEutf2GNyMFKYAAAAASUVORK5CYII=";

fn get_icon() -> anyhow::Result<Icon> {
    use base64::Engine;
    let icon_data = base64::engine::general_purpose::STANDARD.decode (ICON_PNG_B64)?;
    let icon = image::io::Reader::with_format (std::io::Cursor::new(icon_data), ImageFormat::Png) .decode()? .into_rgba8();
    let (w, h) = icon.dimensions();
    Ok ( Icon::from_rgba (icon.into_raw(), w, h)? )
}


/// What the tray needs to flip switches, re-hook, and persist
pub struct TrayContext {
    pub flags    : AppFlags,
    pub settings : Settings,
    pub store    : Box <dyn SettingsStore>,
    pub factory  : DriverFactory,
}

impl TrayContext {
    fn persist (&mut self) {
        self.flags.write_into (&mut self.settings);
        self.store.save (&self.settings);
    }
}


fn suspend_text (hooked:bool) -> &'static str { if hooked { "Suspend" } else { "Resume" } }


/// Runs the tray menu on the calling thread until Quit. Hands the (possibly updated) settings back on exit.
pub fn run_system_tray (mut ctx:TrayContext) -> anyhow::Result<Settings> {

    let mut event_loop = EventLoopBuilder::new().build();

    let iproc = InputProcessor::instance();

    let tray_menu = Menu::new();
    let suspend = MenuItem::new (suspend_text (iproc.are_hooks_set()), true, None);
    let accent  = CheckMenuItem::new ("Accent hold",       true, ctx.flags.accent_enabled.is_set(), None);
    let cycle   = CheckMenuItem::new ("Cycle all layouts", true, ctx.flags.cycle_all.is_set(),      None);
    let quit    = MenuItem::new ("Quit", true, None);
    tray_menu .append_items ( &[ &suspend, &accent, &cycle, &quit ] ) .context ("building tray menu")?;

    let icon = get_icon() .context ("decoding tray icon")?;
    let mut tray_icon: Option<TrayIcon> = None;
    let mut build_err: Option<anyhow::Error> = None;

    let menu_channel = MenuEvent::receiver();

    event_loop .run_return ( |event, _, control_flow| {

        *control_flow = ControlFlow::Wait;

        if let tao::event::Event::NewEvents(tao::event::StartCause::Init) = event {
            match TrayIconBuilder::new()
                .with_menu (Box::new (tray_menu.clone()))
                .with_tooltip ("Capstan")
                .with_icon (icon.clone())
                .build()
            {
                Ok(ti) => tray_icon = Some(ti),
                Err(e) => { build_err = Some (e.into()); *control_flow = ControlFlow::Exit; return }
            }
        }

        if let Ok(event) = menu_channel.try_recv() {
            if event.id == quit.id() {
                tray_icon.take();
                *control_flow = ControlFlow::Exit;
            }
            else if event.id == suspend.id() {
                if iproc.are_hooks_set() {
                    iproc.stop_input_processing();
                    ctx.flags.hook_enabled.clear();
                    info! ("input processing suspended");
                } else {
                    ctx.flags.hook_enabled.set();
                    if let Err(e) = iproc.begin_input_processing (ctx.factory.clone()) {
                        error! (error = %e, "re-hooking failed");
                    }
                }
                suspend.set_text (suspend_text (iproc.are_hooks_set()));
                ctx.persist();
            }
            else if event.id == accent.id() {
                ctx.flags.accent_enabled.store (accent.is_checked());
                info! (enabled = accent.is_checked(), "accent hold toggled");
                ctx.persist();
            }
            else if event.id == cycle.id() {
                ctx.flags.cycle_all.store (cycle.is_checked());
                info! (enabled = cycle.is_checked(), "cycle all layouts toggled");
                ctx.persist();
            }
            else {
                warn! (id = ?event.id, "unknown tray menu event");
            }
        }
    } );

    if let Some(e) = build_err { return Err (e.context ("creating tray icon")) }
    Ok (ctx.settings)
}
