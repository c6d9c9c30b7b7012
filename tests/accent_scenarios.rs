//! End-to-end runs through the driver: key events in, injected input and layout switches out.

use std::{cell::RefCell, rc::Rc, time::Duration};

use capstan::*;
use capstan::EventPropagationDirective::*;


struct UsKeys;

impl KeyResolver for UsKeys {
    fn resolve_char (&self, ev:&KbdEvent, shift:bool) -> Option<char> {
        let vk = ev.key.vk();
        match vk {
            0x41 ..= 0x5A => {
                let c = char::from_u32(vk)?;
                Some ( if shift { c } else { c.to_ascii_lowercase() } )
            }
            0x30 ..= 0x39 => {
                let d = (vk - 0x30) as usize;
                if shift { ")!@#$%^&*(" .chars() .nth(d) } else { char::from_u32(vk) }
            }
            _ => None,
        }
    }
}

struct Editor;

impl ForegroundProbe for Editor {
    fn foreground_info (&self) -> CapstanResult<ForegroundInfo> {
        Ok ( ForegroundInfo { process_name: Some("notepad".into()), focused_class: Some("Edit".into()) } )
    }
}


# [ derive (Debug, Clone, PartialEq, Eq) ]
enum Out { Tap(KbdKey), Combo(KbdKey, KbdKey), Char(char), Layout(LayoutHandle) }

# [ derive (Clone, Default) ]
struct Log (Rc<RefCell<Vec<Out>>>);

impl Log {
    fn take (&self) -> Vec<Out> { self.0.borrow_mut().drain(..).collect() }
}

impl Injector for Log {
    fn press_release (&mut self, key:KbdKey) -> CapstanResult<()> { self.0.borrow_mut().push (Out::Tap(key)); Ok(()) }
    fn combo (&mut self, m:KbdKey, k:KbdKey) -> CapstanResult<()> { self.0.borrow_mut().push (Out::Combo(m, k)); Ok(()) }
    fn send_char (&mut self, c:char) -> CapstanResult<()> { self.0.borrow_mut().push (Out::Char(c)); Ok(()) }
    fn activate_layout (&mut self, h:LayoutHandle) -> CapstanResult<()> { self.0.borrow_mut().push (Out::Layout(h)); Ok(()) }
}

struct NoTimers;

impl TimerHost for NoTimers {
    fn start_timer (&mut self, _:TimerSlot, _:Duration) { }
    fn stop_timer  (&mut self, _:TimerSlot) { }
}

struct CapsOff;

impl KeyStateProbe for CapsOff {
    fn is_toggled (&self, _:KbdKey) -> bool { false }
}

/// keeps the popup contents around so tests can look at them
# [ derive (Clone, Default) ]
struct Popup (Rc<RefCell<(Vec<char>, usize, Option<OverlayReplyHandle>)>>);

impl OverlayView for Popup {
    fn show (&mut self, _:char, variants:&[char], selected:usize, reply:OverlayReplyHandle) {
        *self.0.borrow_mut() = (variants.to_vec(), selected, Some(reply));
    }
    fn set_items (&mut self, variants:&[char], selected:usize) {
        let mut p = self.0.borrow_mut();
        p.0 = variants.to_vec();
        p.1 = selected;
    }
    fn highlight (&mut self, selected:usize) { self.0.borrow_mut().1 = selected }
    fn hide (&mut self) { *self.0.borrow_mut() = (vec![], 0, None) }
    fn screen_bounds (&self) -> Option<ScreenRect> { None }
}

struct Quiet;

impl LayoutFlash for Quiet {
    fn flash (&mut self, _:&str) { }
}


fn layout (h:i64, name:&str) -> LayoutEntry {
    LayoutEntry { handle: LayoutHandle(h), display_name: name.into(), region_code: String::new() }
}

struct Rig { driver: Driver, log: Log, popup: Popup, flags: AppFlags }

fn rig (settings:Settings, layouts:Vec<LayoutEntry>) -> Rig {
    let flags = AppFlags::from_settings (&settings);
    let accent = AccentMachine::new (
        Box::new (UsKeys),
        TextContextClassifier::new (ContextPolicy::default(), Box::new (Editor)),
        LongPressTimer::new (long_press_delay(1)),
        no_op_af(),
        flags.accent_enabled.clone(),
    );
    let layout = LayoutSwitch::new (settings.trigger(), settings.favorites(), layouts, flags.clone());
    let (log, popup) = (Log::default(), Popup::default());
    let host = DriverHost {
        timers: Box::new (NoTimers), injector: Box::new (log.clone()), key_state: Box::new (CapsOff),
        overlay: Box::new (popup.clone()), flash: Box::new (Quiet),
    };
    Rig { driver: Driver::new (HookDispatch::new (accent, layout), host), log, popup, flags }
}

fn default_rig () -> Rig { rig (Settings::default(), vec![]) }

impl Rig {
    fn down (&mut self, key:KbdKey) -> EventPropagationDirective { self.driver.on_key (&KbdEvent::key_down(key)) }
    fn up   (&mut self, key:KbdKey) -> EventPropagationDirective { self.driver.on_key (&KbdEvent::key_up(key)) }
    fn tap  (&mut self, key:KbdKey) { self.down(key); self.up(key); }
    fn hold_past_delay (&mut self, key:KbdKey) {
        assert_eq! (self.down(key), EventProp_Continue);
        self.driver.on_timer (TimerSlot::LongPress);
    }
    fn settle (&mut self) { self.driver.on_timer (TimerSlot::Replace) }
}



#[test]
fn tab_twice_then_enter_types_e_circumflex() {
    let mut r = default_rig();
    r.hold_past_delay (KbdKey::E);
    assert_eq! (r.popup.0.borrow().0, vec!['è','é','ê','ë','ē','ė','ę']);

    assert_eq! (r.down (KbdKey::Tab), EventProp_Stop);
    assert_eq! (r.down (KbdKey::Tab), EventProp_Stop);
    assert_eq! (r.popup.0.borrow().1, 2);

    assert_eq! (r.down (KbdKey::Enter), EventProp_Stop);
    r.settle();
    assert_eq! (r.log.take(), vec![ Out::Combo (KbdKey::Shift, KbdKey::Left), Out::Char('ê') ]);
    assert! (r.driver.dispatch().accent().is_idle());
}

#[test]
fn held_symbol_key_does_not_select_itself() {
    let mut r = default_rig();
    r.down (KbdKey::LShift);
    r.hold_past_delay (KbdKey::Numrow_4);
    let variants = r.popup.0.borrow().0.clone();
    assert_eq! (variants.len(), 9);
    assert! (!variants.contains(&'$'));

    // still the same physical press that made the '$'
    assert_eq! (r.down (KbdKey::Numrow_4), EventProp_Stop);
    r.settle();
    assert! (r.log.take().is_empty());
    assert! (r.driver.dispatch().accent().overlay_active());

    // once released, the digit picks the fourth variant
    assert_eq! (r.up (KbdKey::Numrow_4), EventProp_Stop);
    r.up (KbdKey::LShift);
    assert_eq! (r.down (KbdKey::Numrow_4), EventProp_Stop);
    r.settle();
    assert_eq! (r.log.take(), vec![ Out::Combo (KbdKey::Shift, KbdKey::Left), Out::Char (variants[3]) ]);
}

#[test]
fn digit_past_the_list_is_swallowed_without_confirming() {
    let mut r = default_rig();
    r.hold_past_delay (KbdKey::Y);
    r.up (KbdKey::Y);
    let count = r.popup.0.borrow().0.len();
    assert! (count < 9);
    assert_eq! (r.down (KbdKey::Numrow_9), EventProp_Stop);
    assert! (r.driver.dispatch().accent().overlay_active());
}

#[test]
fn navigation_wraps_both_ways() {
    let mut r = default_rig();
    r.hold_past_delay (KbdKey::A);
    let n = r.popup.0.borrow().0.len();
    for _ in 0 .. n + 1 { r.down (KbdKey::Right); }
    assert_eq! (r.popup.0.borrow().1, 1);
    r.down (KbdKey::Left);
    r.down (KbdKey::Left);
    assert_eq! (r.popup.0.borrow().1, n - 1);
}

#[test]
fn escape_leaves_everything_idle() {
    let mut r = default_rig();
    r.hold_past_delay (KbdKey::O);
    assert_eq! (r.down (KbdKey::Escape), EventProp_Stop);
    let accent = r.driver.dispatch().accent();
    assert! (accent.is_idle() && !accent.timer_armed() && accent.session().is_none());
    assert! (r.popup.0.borrow().2.is_none());
    r.settle();
    assert! (r.log.take().is_empty());
}

#[test]
fn quick_release_never_opens_a_popup() {
    let mut r = default_rig();
    r.tap (KbdKey::E);
    r.driver.on_timer (TimerSlot::LongPress);
    assert! (r.popup.0.borrow().0.is_empty());
    assert! (r.driver.dispatch().accent().is_idle());
}

#[test]
fn popup_reply_resolves_once() {
    let mut r = default_rig();
    r.hold_past_delay (KbdKey::U);
    let Some(reply) = r.popup.0.borrow_mut().2.take() else { panic!("popup got no reply handle") };
    assert! (reply.resolve (OverlayReply::Selected(0)));
    r.driver.on_overlay_reply();
    r.driver.on_overlay_reply();
    r.settle();
    r.settle();
    assert_eq! (r.log.take(), vec![ Out::Combo (KbdKey::Shift, KbdKey::Left), Out::Char('ù') ]);
}

#[test]
fn toggle_mode_alternates_through_other_typing() {
    let (a, b) = (LayoutHandle(0x0409_0409), LayoutHandle(0x0408_0408));
    let mut s = Settings::default();
    s.layout_1 = a;
    s.layout_2 = b;
    let mut r = rig (s, vec![ layout(a.0, "English"), layout(b.0, "Ελληνικά") ]);

    let mut seen = vec![];
    for i in 0..4 {
        for _ in 0..i { r.tap (KbdKey::F5); r.tap (KbdKey::Backspace); }
        r.tap (KbdKey::CapsLock);
        seen.extend (r.log.take());
    }
    assert_eq! (seen, vec![ Out::Layout(b), Out::Layout(a), Out::Layout(b), Out::Layout(a) ]);
}

#[test]
fn cycle_mode_walks_all_layouts_and_wraps() {
    let mut s = Settings::default();
    s.cycle_all_layouts = true;
    let mut r = rig (s, vec![ layout(1, "X"), layout(2, "Y"), layout(3, "Z") ]);
    for _ in 0..4 { r.tap (KbdKey::CapsLock); }
    assert_eq! (r.log.take(), [2, 3, 1, 2].map (|h| Out::Layout (LayoutHandle(h))).to_vec());
}

#[test]
fn accent_hold_switched_off_passes_everything() {
    let mut r = default_rig();
    r.flags.accent_enabled.clear();
    assert_eq! (r.down (KbdKey::E), EventProp_Continue);
    r.driver.on_timer (TimerSlot::LongPress);
    assert! (r.popup.0.borrow().0.is_empty());
}

#[test]
fn still_held_key_after_enter_does_not_retype_or_rearm() {
    let mut r = default_rig();
    r.hold_past_delay (KbdKey::E);
    assert_eq! (r.down (KbdKey::Enter), EventProp_Stop);
    r.settle();
    assert_eq! (r.down (KbdKey::E), EventProp_Stop);
    assert_eq! (r.down (KbdKey::E), EventProp_Stop);
    assert! (r.driver.dispatch().accent().is_idle());
    assert_eq! (r.log.take(), vec![ Out::Combo (KbdKey::Shift, KbdKey::Left), Out::Char('è') ]);

    assert_eq! (r.up (KbdKey::E), EventProp_Continue);
    r.hold_past_delay (KbdKey::E);
    assert! (r.driver.dispatch().accent().overlay_active());
}

#[test]
fn caps_lock_during_popup_closes_it_and_switches_layout() {
    let (a, b) = (LayoutHandle(0x0409_0409), LayoutHandle(0x0408_0408));
    let mut s = Settings::default();
    s.layout_1 = a;
    s.layout_2 = b;
    let mut r = rig (s, vec![ layout(a.0, "English"), layout(b.0, "Ελληνικά") ]);

    r.hold_past_delay (KbdKey::E);
    r.up (KbdKey::E);
    assert_eq! (r.down (KbdKey::CapsLock), EventProp_Stop);
    assert_eq! (r.up (KbdKey::CapsLock), EventProp_Stop);
    assert! (r.driver.dispatch().accent().is_idle());
    assert! (r.popup.0.borrow().2.is_none());
    r.settle();
    assert_eq! (r.log.take(), vec![ Out::Layout(b) ]);
}
