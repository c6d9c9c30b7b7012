
use tracing::{debug, info};

use crate::{*, EventPropagationDirective::*};


/// Side-effects of a trigger press, for the host to carry out in order
# [ derive (Debug, Clone, Eq, PartialEq) ]
pub enum LayoutAction {
    /// turn the lock-key's toggle state off if the host reports it on
    ClearToggle (KbdKey),
    Activate (LayoutHandle),
    Flash (String),
}

# [ derive (Debug, Clone, Eq, PartialEq) ]
pub struct LayoutOutcome {
    pub prop    : EventPropagationDirective,
    pub actions : Vec<LayoutAction>,
}

impl LayoutOutcome {
    fn pass () -> LayoutOutcome { LayoutOutcome { prop: EventProp_Continue, actions: vec![] } }
    fn stop (actions:Vec<LayoutAction>) -> LayoutOutcome { LayoutOutcome { prop: EventProp_Stop, actions } }
}



/// The trigger-key layout switcher .. either flip-flops between the two favorites or cycles the full ordered list
pub struct LayoutSwitch {
    trigger        : KbdKey,
    favorites      : (LayoutHandle, LayoutHandle),
    layouts        : Vec<LayoutEntry>,
    // toggle mode state .. false means we're (nominally) on the first favorite
    on_second      : bool,
    // cycle mode state, index into layouts
    cycle_index    : usize,
    trigger_down   : bool,
    toggle_cleared : bool,
    flags          : AppFlags,
}

impl LayoutSwitch {

    pub fn new (trigger:KbdKey, favorites:(LayoutHandle, LayoutHandle), layouts:Vec<LayoutEntry>, flags:AppFlags) -> LayoutSwitch {
        LayoutSwitch {
            trigger, favorites, layouts, flags,
            on_second: false, cycle_index: 0, trigger_down: false, toggle_cleared: false,
        }
    }



    pub fn on_key (&mut self, ev:&KbdEvent) -> LayoutOutcome {

        if self.flags.hook_enabled.is_clear() {
            self.trigger_down = false;
            return LayoutOutcome::pass()
        }
        if ev.key != self.trigger { return LayoutOutcome::pass() }

        if ev.is_up() {
            self.trigger_down = false;
            return LayoutOutcome::stop (vec![])
        }
        if self.trigger_down {
            // os auto-repeat of the held trigger .. one switch per physical press
            return LayoutOutcome::stop (vec![])
        }
        self.trigger_down = true;

        let mut actions = vec![];
        if !self.toggle_cleared {
            self.toggle_cleared = true;
            if self.trigger == KbdKey::CapsLock { actions.push (LayoutAction::ClearToggle (self.trigger)) }
        }

        let target = if self.flags.cycle_all.is_set() { self.next_in_cycle() } else {
            self.on_second = !self.on_second;
            Some ( if self.on_second { self.favorites.1 } else { self.favorites.0 } )
        };

        match target {
            Some(handle) if !handle.is_unset() => {
                let name = display_name_for (&self.layouts, handle);
                info! (layout = %handle, %name, "switching layout");
                actions.push (LayoutAction::Activate (handle));
                if self.flags.overlay_enabled.is_set() { actions.push (LayoutAction::Flash (name)) }
            }
            _ => debug! ("trigger pressed with no layout to switch to"),
        }
        LayoutOutcome::stop (actions)
    }

    fn next_in_cycle (&mut self) -> Option<LayoutHandle> {
        if self.layouts.is_empty() { return None }
        self.cycle_index = (self.cycle_index + 1) % self.layouts.len();
        Some (self.layouts[self.cycle_index].handle)
    }

}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::entry;

    fn flags (cycle:bool) -> AppFlags {
        let f = AppFlags::from_settings (&Settings::default());
        f.cycle_all.store(cycle);
        f
    }

    fn activated (out:&LayoutOutcome) -> Option<LayoutHandle> {
        out.actions .iter() .find_map (|a| if let LayoutAction::Activate(h) = a { Some(*h) } else { None })
    }

    fn press (sw:&mut LayoutSwitch) -> LayoutOutcome {
        let out = sw.on_key (&KbdEvent::key_down(KbdKey::CapsLock));
        assert_eq! (sw.on_key (&KbdEvent::key_up(KbdKey::CapsLock)).prop, EventProp_Stop);
        out
    }

    #[test]
    fn first_press_clears_stuck_caps_then_goes_to_second_favorite() {
        let mut sw = LayoutSwitch::new (KbdKey::CapsLock, (LayoutHandle(1), LayoutHandle(2)), vec![entry(1,"A"), entry(2,"B")], flags(false));
        let out = press (&mut sw);
        assert_eq! (out.prop, EventProp_Stop);
        assert_eq! (out.actions, vec![
            LayoutAction::ClearToggle (KbdKey::CapsLock), LayoutAction::Activate (LayoutHandle(2)), LayoutAction::Flash ("B".into())
        ]);
        assert! (!press(&mut sw).actions.contains (&LayoutAction::ClearToggle (KbdKey::CapsLock)));
    }

    #[test]
    fn held_trigger_switches_once() {
        let mut sw = LayoutSwitch::new (KbdKey::CapsLock, (LayoutHandle(1), LayoutHandle(2)), vec![], flags(false));
        assert_eq! (activated (&sw.on_key (&KbdEvent::key_down(KbdKey::CapsLock))), Some(LayoutHandle(2)));
        let repeat = sw.on_key (&KbdEvent::key_down(KbdKey::CapsLock));
        assert_eq! (repeat.prop, EventProp_Stop);
        assert! (repeat.actions.is_empty());
    }

    #[test]
    fn other_keys_pass_and_unset_favorites_do_nothing() {
        let mut sw = LayoutSwitch::new (KbdKey::CapsLock, (LayoutHandle(0), LayoutHandle(0)), vec![], flags(false));
        assert_eq! (sw.on_key (&KbdEvent::key_down(KbdKey::A)).prop, EventProp_Continue);
        assert_eq! (activated (&press(&mut sw)), None);
    }

    #[test]
    fn disabled_hook_passes_trigger_through() {
        let f = flags(false);
        f.hook_enabled.clear();
        let mut sw = LayoutSwitch::new (KbdKey::CapsLock, (LayoutHandle(1), LayoutHandle(2)), vec![], f);
        assert_eq! (sw.on_key (&KbdEvent::key_down(KbdKey::CapsLock)), LayoutOutcome::pass());
    }

    #[test]
    fn flash_follows_overlay_flag_and_falls_back_to_hex() {
        let f = flags(false);
        let mut sw = LayoutSwitch::new (KbdKey::F12, (LayoutHandle(0x0409_0409), LayoutHandle(0x0419_0419)), vec![], f.clone());
        let out = sw.on_key (&KbdEvent::key_down(KbdKey::F12));
        assert_eq! (out.actions, vec![ LayoutAction::Activate (LayoutHandle(0x0419_0419)), LayoutAction::Flash ("04190419".into()) ]);
        f.overlay_enabled.clear();
        sw.on_key (&KbdEvent::key_up(KbdKey::F12));
        let out = sw.on_key (&KbdEvent::key_down(KbdKey::F12));
        assert_eq! (out.actions, vec![ LayoutAction::Activate (LayoutHandle(0x0409_0409)) ]);
    }

    #[test]
    fn empty_cycle_list_switches_nothing() {
        let mut sw = LayoutSwitch::new (KbdKey::CapsLock, (LayoutHandle(1), LayoutHandle(2)), vec![], flags(true));
        assert_eq! (activated (&press(&mut sw)), None);
    }
}
