
use std::{collections::VecDeque, time::Duration};

use tracing::warn;

use crate::*;


/// Wait between closing the popup and typing the replacement, so focus can settle back on the original target
pub const REPLACE_SETTLE_DELAY: Duration = Duration::from_millis(10);


/// The one-shot timers the driver needs from the host
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub enum TimerSlot {
    LongPress,
    Replace,
}

/// Host timers that deliver back on the hook thread. Starting an already running slot restarts it.
pub trait TimerHost {
    fn start_timer (&mut self, slot:TimerSlot, delay:Duration);
    fn stop_timer  (&mut self, slot:TimerSlot);
}


/// The host-facing collaborators the driver carries actions out against
pub struct DriverHost {
    pub timers    : Box <dyn TimerHost>,
    pub injector  : Box <dyn Injector>,
    pub key_state : Box <dyn KeyStateProbe>,
    pub overlay   : Box <dyn OverlayView>,
    pub flash     : Box <dyn LayoutFlash>,
}



/// Glue between the os hook callbacks and the controllers: routes each event into the dispatcher,
/// then executes the resulting actions against the host before handing back the propagation verdict
pub struct Driver {
    dispatch        : HookDispatch,
    host            : DriverHost,
    // captured replacement chars, oldest first (each gets its own settle delay)
    pending_replace : VecDeque<char>,
}

impl Driver {

    pub fn new (dispatch:HookDispatch, host:DriverHost) -> Driver {
        Driver { dispatch, host, pending_replace: VecDeque::new() }
    }

    pub fn dispatch (&self) -> &HookDispatch { &self.dispatch }


    pub fn on_key (&mut self, ev:&KbdEvent) -> EventPropagationDirective {
        let out = self.dispatch.on_key (ev);
        self.execute (out.actions);
        out.prop
    }

    pub fn on_mouse (&mut self, ev:&MouseEvent) -> EventPropagationDirective {
        // only ask the popup for its bounds when there is one (its the only cross-context read we do)
        let bounds = if ev.is_btn_down() && self.dispatch.accent().overlay_active() { self.host.overlay.screen_bounds() } else { None };
        let out = self.dispatch.on_mouse (ev, bounds);
        self.execute (out.actions);
        out.prop
    }

    pub fn on_timer (&mut self, slot:TimerSlot) {
        match slot {
            TimerSlot::LongPress => {
                let actions = self.dispatch.on_long_press_expired();
                self.execute (actions);
            }
            TimerSlot::Replace => {
                if let Some(c) = self.pending_replace.pop_front() {
                    // acts on the captured char only .. whatever state the machine is in by now doesnt matter
                    if let Err(e) = replace_previous_char (&mut *self.host.injector, c) {
                        warn! (error = %e, %c, "accent replacement injection failed");
                    }
                }
                if !self.pending_replace.is_empty() {
                    self.host.timers.start_timer (TimerSlot::Replace, REPLACE_SETTLE_DELAY);
                }
            }
        }
    }

    pub fn on_overlay_reply (&mut self) {
        let actions = self.dispatch.on_overlay_reply();
        self.execute (actions);
    }


    fn execute (&mut self, actions:Vec<HostAction>) {
        let host = &mut self.host;
        for action in actions {
            match action {
                HostAction::Accent (a) => match a {
                    AccentAction::ArmTimer (delay)   => host.timers.start_timer (TimerSlot::LongPress, delay),
                    AccentAction::DisarmTimer        => host.timers.stop_timer (TimerSlot::LongPress),
                    AccentAction::ShowOverlay { base, variants, selected, reply } => host.overlay.show (base, &variants, selected, reply),
                    AccentAction::Highlight (idx)    => host.overlay.highlight (idx),
                    AccentAction::Recase { variants, selected } => host.overlay.set_items (&variants, selected),
                    AccentAction::HideOverlay        => host.overlay.hide(),
                    AccentAction::ScheduleReplace(c) => {
                        self.pending_replace.push_back(c);
                        if self.pending_replace.len() == 1 {
                            host.timers.start_timer (TimerSlot::Replace, REPLACE_SETTLE_DELAY);
                        }
                    }
                },
                HostAction::Layout (a) => match a {
                    LayoutAction::ClearToggle (key) => {
                        if host.key_state.is_toggled (key) {
                            if let Err(e) = host.injector.press_release (key) {
                                warn! (error = %e, ?key, "clearing stuck toggle failed");
                            }
                        }
                    }
                    LayoutAction::Activate (handle) => {
                        if let Err(e) = host.injector.activate_layout (handle) {
                            warn! (error = %e, "layout activation failed");
                        }
                    }
                    LayoutAction::Flash (name) => host.flash.flash (&name),
                },
            }
        }
    }

}
