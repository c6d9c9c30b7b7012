
use tracing::trace;

use crate::{*, EventPropagationDirective::*};


/// Any side-effect either controller asked for
# [ derive (Debug) ]
pub enum HostAction {
    Accent (AccentAction),
    Layout (LayoutAction),
}

# [ derive (Debug) ]
pub struct HookOutcome {
    pub prop    : EventPropagationDirective,
    pub actions : Vec<HostAction>,
}



/// The single owner of both controllers and of the live shift state.
/// Every hook event, timer expiry and overlay reply is funneled through here, one at a time, on the hook thread.
pub struct HookDispatch {
    accent : AccentMachine,
    layout : LayoutSwitch,
    shift  : bool,
}

impl HookDispatch {

    pub fn new (accent:AccentMachine, layout:LayoutSwitch) -> HookDispatch {
        HookDispatch { accent, layout, shift: false }
    }

    pub fn accent (&self) -> &AccentMachine { &self.accent }
    pub fn shift_down (&self) -> bool { self.shift }


    pub fn on_key (&mut self, ev:&KbdEvent) -> HookOutcome {

        if classify_key (ev.key, self.shift) == KeyClass::ModifierChanged {
            // shift is only tracked, never consumed
            let was_down = std::mem::replace (&mut self.shift, ev.is_down());
            let actions = if was_down != self.shift { self.accent.on_shift_changed (self.shift) } else { vec![] };
            return HookOutcome { prop: EventProp_Continue, actions: actions .into_iter() .map (HostAction::Accent) .collect() }
        }

        // a key that closes the popup and passes still gets its layout-switch turn
        let acc = self.accent.on_key (ev, self.shift);
        let mut actions = acc.actions .into_iter() .map (HostAction::Accent) .collect::<Vec<_>>();
        if acc.prop.stops() {
            trace! (key = ?ev.key, prop = ?acc.prop, "key handled by accent selection");
            return HookOutcome { prop: acc.prop, actions }
        }

        let lay = self.layout.on_key (ev);
        actions .extend (lay.actions .into_iter() .map (HostAction::Layout));
        HookOutcome { prop: lay.prop, actions }
    }


    /// Left/right/middle button-down outside the popup cancels it .. the click itself always goes through
    pub fn on_mouse (&mut self, ev:&MouseEvent, overlay_bounds:Option<ScreenRect>) -> HookOutcome {
        use MouseButton::*;
        let mut actions = vec![];
        let cancels = matches! (ev.btn, LeftButton | RightButton | MiddleButton);
        if cancels && ev.is_btn_down() && self.accent.overlay_active() {
            let inside = overlay_bounds .map (|r| r.contains (ev.x_pos, ev.y_pos)) .unwrap_or (false);
            if !inside {
                actions = self.accent.on_click_outside() .into_iter() .map (HostAction::Accent) .collect();
            }
        }
        HookOutcome { prop: EventProp_Continue, actions }
    }

    pub fn on_long_press_expired (&mut self) -> Vec<HostAction> {
        self.accent.on_timer_expired (self.shift) .into_iter() .map (HostAction::Accent) .collect()
    }

    pub fn on_overlay_reply (&mut self) -> Vec<HostAction> {
        self.accent.on_overlay_reply() .into_iter() .map (HostAction::Accent) .collect()
    }
}
