
use std::time::Duration;

use tracing::{debug, trace};

use crate::{*, EventPropagationDirective::*};



/// Direction for overlay navigation
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub enum NavDir { Forward, Backward }

/// The classification every keyboard event goes through before any transition is picked
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub enum KeyClass {
    ModifierChanged,
    Navigate (NavDir),
    Confirm,
    Cancel,
    /// 1-based ordinal from the number row
    DigitSelect (usize),
    Other,
}

pub fn classify_key (key:KbdKey, shift:bool) -> KeyClass {
    use {KbdKey::*, KeyClass::*, NavDir::*};
    match key {
        k if k.is_shift()  => ModifierChanged,
        Tab | Right        => Navigate ( if shift { Backward } else { Forward } ),
        Left               => Navigate (Backward),
        Enter | Space      => Confirm,
        Escape             => Cancel,
        k => k.selection_digit() .map (DigitSelect) .unwrap_or (Other),
    }
}



/// The key currently being timed for a long-press
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub struct PendingKey {
    pub key   : KbdKey,
    pub ch    : char,
    /// cleared when the context got denied at expiry .. the key stays tracked (till key-up) but its repeats flow normally
    pub armed : bool,
}

# [ derive (Debug) ]
pub enum AccentState {
    Idle,
    Armed (PendingKey),
    OverlayActive (OverlaySession),
}


/// Side-effects the host must carry out for a transition, in order
# [ derive (Debug) ]
pub enum AccentAction {
    ArmTimer (Duration),
    DisarmTimer,
    ShowOverlay { base:char, variants:Vec<char>, selected:usize, reply:OverlayReplyHandle },
    Highlight (usize),
    Recase { variants:Vec<char>, selected:usize },
    HideOverlay,
    /// replace the base char just typed with this one, after the focus-settle delay
    ScheduleReplace (char),
}

# [ derive (Debug) ]
pub struct AccentOutcome {
    pub prop    : EventPropagationDirective,
    pub actions : Vec<AccentAction>,
}

impl AccentOutcome {
    fn pass () -> AccentOutcome { AccentOutcome { prop: EventProp_Continue, actions: vec![] } }
    fn stop (actions:Vec<AccentAction>) -> AccentOutcome { AccentOutcome { prop: EventProp_Stop, actions } }
    fn pass_with (actions:Vec<AccentAction>) -> AccentOutcome { AccentOutcome { prop: EventProp_Continue, actions } }
}



/// The long-press accent selection state machine. Owned by the hook thread, never shared.
pub struct AccentMachine {
    state      : AccentState,
    resolver   : Box <dyn KeyResolver>,
    classifier : TextContextClassifier,
    timer      : LongPressTimer,
    wake       : AF,
    enabled    : Flag,
    /// origin key of a session that closed while it was still down .. its repeats are swallowed until key-up
    held       : Option<KbdKey>,
}

impl AccentMachine {

    pub fn new (
        resolver: Box<dyn KeyResolver>, classifier: TextContextClassifier, timer: LongPressTimer, wake: AF, enabled: Flag
    ) -> AccentMachine {
        AccentMachine { state: AccentState::Idle, resolver, classifier, timer, wake, enabled, held: None }
    }

    pub fn state (&self) -> &AccentState { &self.state }

    pub fn is_idle (&self) -> bool { matches! (self.state, AccentState::Idle) }

    pub fn overlay_active (&self) -> bool { matches! (self.state, AccentState::OverlayActive(_)) }

    pub fn timer_armed (&self) -> bool { self.timer.is_armed() }

    pub fn held_key (&self) -> Option<KbdKey> { self.held }

    pub fn session (&self) -> Option<&OverlaySession> {
        if let AccentState::OverlayActive(s) = &self.state { Some(s) } else { None }
    }



    /// Keyboard event entry (shift keys never get here, the dispatcher tracks those)
    pub fn on_key (&mut self, ev:&KbdEvent, shift:bool) -> AccentOutcome {

        if self.enabled.is_clear() {
            // switched off while something was in flight .. tear it down and get out of the way
            let actions = self.cancel();
            self.held = None;
            return AccentOutcome::pass_with (actions)
        }

        if self.held == Some(ev.key) {
            // that press was consumed as a long-press, its key-up still goes through to balance the key-down the app saw
            if ev.is_up() { self.held = None; return AccentOutcome::pass() }
            return AccentOutcome::stop (vec![])
        }

        if ev.is_up() { return self.on_key_up (ev) }

        match &mut self.state {

            AccentState::Idle => self.idle_key_down (ev, shift),

            AccentState::Armed (pending) => {
                if pending.key == ev.key {
                    // os auto-repeat of the held key .. swallow it while the popup is still coming
                    if pending.armed { AccentOutcome::stop (vec![]) } else { AccentOutcome::pass() }
                } else {
                    let mut actions = self.cancel();
                    let mut next = self.idle_key_down (ev, shift);
                    actions.append (&mut next.actions);
                    AccentOutcome { prop: next.prop, actions }
                }
            }

            AccentState::OverlayActive (session) => {
                use {KeyClass::*, NavDir::*};
                match classify_key (ev.key, shift) {
                    Navigate (dir) => {
                        let idx = if dir == Forward { session.select_next() } else { session.select_previous() };
                        trace! (idx, "overlay navigate");
                        AccentOutcome::stop (vec![ AccentAction::Highlight(idx) ])
                    }
                    Confirm => {
                        let ch = session.selected_char();
                        AccentOutcome::stop (self.confirm(ch))
                    }
                    Cancel => AccentOutcome::stop (self.cancel()),
                    DigitSelect (n) => {
                        // a digit while the origin key is still down is most likely its own shifted symbol ('$' on 4)
                        if !session.is_released() { return AccentOutcome::stop (vec![]) }
                        match session.select_index (n - 1) {
                            Some(ch) => AccentOutcome::stop (self.confirm(ch)),
                            None     => AccentOutcome::stop (vec![]),
                        }
                    }
                    _ if session.origin_key() == Some(ev.key) => AccentOutcome::stop (vec![]),
                    _ => {
                        let mut actions = self.cancel();
                        let mut next = self.idle_key_down (ev, shift);
                        actions.append (&mut next.actions);
                        AccentOutcome::pass_with (actions)
                    }
                }
            }
        }
    }


    fn on_key_up (&mut self, ev:&KbdEvent) -> AccentOutcome {
        match &mut self.state {
            AccentState::Armed (pending) if pending.key == ev.key => {
                // released before the popup .. it was just a normal keypress
                self.timer.stop();
                self.state = AccentState::Idle;
                AccentOutcome::pass_with (vec![ AccentAction::DisarmTimer ])
            }
            AccentState::OverlayActive (session) if session.origin_key() == Some(ev.key) => {
                session.mark_released();
                AccentOutcome::stop (vec![])
            }
            _ => AccentOutcome::pass(),
        }
    }


    fn idle_key_down (&mut self, ev:&KbdEvent, shift:bool) -> AccentOutcome {
        let ch = match self.resolver.resolve_char (ev, shift) {
            Some(ch) if has_variants(ch) => ch,
            _ => return AccentOutcome::pass(),
        };
        if !self.classifier.classify_now().approved() {
            return AccentOutcome::pass()
        }
        debug! (key = ?ev.key, %ch, "arming long-press");
        self.state = AccentState::Armed ( PendingKey { key: ev.key, ch, armed: true } );
        // the base char itself still goes through to the app
        AccentOutcome::pass_with (vec![ AccentAction::ArmTimer (self.timer.restart()) ])
    }



    /// Long-press countdown elapsed (marshaled onto the hook thread by the host)
    pub fn on_timer_expired (&mut self, shift:bool) -> Vec<AccentAction> {
        if !self.timer.expire() { return vec![] }

        let pending = match &mut self.state {
            AccentState::Armed (p) if p.armed && has_variants(p.ch) => p,
            _ => return vec![],
        };
        if !self.classifier.classify_now().approved() {
            debug! (ch = %pending.ch, "long-press expired outside a text context, skipping overlay");
            pending.armed = false;
            return vec![]
        }
        let (base, key) = (pending.ch, pending.key);
        match OverlaySession::open (base, shift, key, self.wake.clone()) {
            Some ((session, reply)) => {
                debug! (%base, "opening accent overlay");
                let action = AccentAction::ShowOverlay {
                    base, variants: session.variants().to_vec(), selected: session.selected(), reply
                };
                self.state = AccentState::OverlayActive (session);
                vec![ action ]
            }
            None => { self.state = AccentState::Idle; vec![] }
        }
    }


    /// Live shift state changed .. re-case the open popup in place (selection is kept)
    pub fn on_shift_changed (&mut self, shift:bool) -> Vec<AccentAction> {
        match &mut self.state {
            AccentState::OverlayActive (s) => {
                if !s.set_case(shift) { return vec![] }
                vec![ AccentAction::Recase { variants: s.variants().to_vec(), selected: s.selected() } ]
            }
            _ => vec![],
        }
    }


    /// The popup resolved its reply channel (an item was clicked, or it closed itself)
    pub fn on_overlay_reply (&mut self) -> Vec<AccentAction> {
        let reply = match &mut self.state {
            AccentState::OverlayActive (s) => s.poll_reply(),
            _ => None,
        };
        match reply {
            Some (OverlayReply::Selected(idx)) => {
                let ch = match &mut self.state {
                    AccentState::OverlayActive (s) => s.select_index(idx),
                    _ => None,
                };
                match ch {
                    Some(ch) => self.confirm(ch),
                    None     => self.cancel(),
                }
            }
            Some (OverlayReply::Cancelled) => self.cancel(),
            None => vec![],
        }
    }


    /// Mouse-down landed outside the popup
    pub fn on_click_outside (&mut self) -> Vec<AccentAction> {
        if self.overlay_active() { self.cancel() } else { vec![] }
    }


    /// Full synchronous teardown back to Idle
    pub fn cancel (&mut self) -> Vec<AccentAction> {
        self.timer.stop();
        self.track_unreleased_origin();
        let actions = match &self.state {
            AccentState::Idle             => vec![],
            AccentState::Armed(_)         => vec![ AccentAction::DisarmTimer ],
            AccentState::OverlayActive(_) => vec![ AccentAction::HideOverlay ],
        };
        self.state = AccentState::Idle;
        actions
    }

    fn confirm (&mut self, ch:char) -> Vec<AccentAction> {
        debug! (%ch, "accent confirmed");
        self.timer.stop();
        self.track_unreleased_origin();
        self.state = AccentState::Idle;
        vec![ AccentAction::HideOverlay, AccentAction::ScheduleReplace(ch) ]
    }

    fn track_unreleased_origin (&mut self) {
        if let AccentState::OverlayActive (s) = &self.state {
            if !s.is_released() { self.held = s.origin_key() }
        }
    }

}
