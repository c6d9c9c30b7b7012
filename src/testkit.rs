
//! Fake hosts for the unit tests .. they record whatever the controllers ask of them

use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::*;


/// Resolves letters to their (shift-cased) char, and the number row to digits / US shifted symbols
pub struct LetterResolver;

impl KeyResolver for LetterResolver {
    fn resolve_char (&self, ev:&KbdEvent, shift:bool) -> Option<char> {
        let vk = ev.key.vk();
        match vk {
            0x41 ..= 0x5A => {
                let c = char::from_u32(vk)?;
                Some ( if shift { c } else { c.to_ascii_lowercase() } )
            }
            0x30 ..= 0x39 => {
                let d = (vk - 0x30) as usize;
                if shift { Some (")!@#$%^&*(" .chars() .nth(d)?) } else { char::from_u32(vk) }
            }
            _ => None,
        }
    }
}


pub struct FixedProbe (pub ForegroundInfo);

impl ForegroundProbe for FixedProbe {
    fn foreground_info (&self) -> CapstanResult<ForegroundInfo> { Ok (self.0.clone()) }
}

/// classifier over the default policy, probing either a text app or a game
pub fn fixed_classifier (approve:bool) -> TextContextClassifier {
    let process = if approve { "notepad" } else { "valorant" };
    TextContextClassifier::new (
        ContextPolicy::default(),
        Box::new ( FixedProbe ( ForegroundInfo { process_name: Some(process.into()), focused_class: None } ) ),
    )
}



# [ derive (Debug, Clone, PartialEq, Eq) ]
pub enum Injected {
    PressRelease (KbdKey),
    Combo (KbdKey, KbdKey),
    Char (char),
    Layout (LayoutHandle),
}

/// Injector that logs into a shared vec (so tests can keep a handle after moving the injector into a driver)
# [ derive (Clone, Default) ]
pub struct RecordingInjector (pub Rc<RefCell<Vec<Injected>>>);

impl RecordingInjector {
    pub fn taken (&self) -> Vec<Injected> { self.0.borrow_mut().drain(..).collect() }
}

impl Injector for RecordingInjector {
    fn press_release (&mut self, key:KbdKey) -> CapstanResult<()> { self.0.borrow_mut().push (Injected::PressRelease(key)); Ok(()) }
    fn combo (&mut self, m:KbdKey, k:KbdKey) -> CapstanResult<()> { self.0.borrow_mut().push (Injected::Combo(m, k)); Ok(()) }
    fn send_char (&mut self, c:char) -> CapstanResult<()> { self.0.borrow_mut().push (Injected::Char(c)); Ok(()) }
    fn activate_layout (&mut self, h:LayoutHandle) -> CapstanResult<()> { self.0.borrow_mut().push (Injected::Layout(h)); Ok(()) }
}

/// Logs every attempt like [`RecordingInjector`], then reports that the os accepted none of it
# [ derive (Clone, Default) ]
pub struct RejectingInjector (pub RecordingInjector);

impl RejectingInjector {
    fn refuse (requested:u32) -> CapstanResult<()> { Err (CapstanError::Injection { sent: 0, requested }) }
}

impl Injector for RejectingInjector {
    fn press_release (&mut self, key:KbdKey) -> CapstanResult<()> { self.0.press_release(key)?; Self::refuse(2) }
    fn combo (&mut self, m:KbdKey, k:KbdKey) -> CapstanResult<()> { self.0.combo(m, k)?; Self::refuse(4) }
    fn send_char (&mut self, c:char) -> CapstanResult<()> { self.0.send_char(c)?; Self::refuse(2) }
    fn activate_layout (&mut self, h:LayoutHandle) -> CapstanResult<()> {
        self.0.activate_layout(h)?;
        Err (CapstanError::LayoutActivation { handle: h.0 })
    }
}



# [ derive (Debug, Clone, PartialEq, Eq) ]
pub enum TimerCall { Start (TimerSlot, Duration), Stop (TimerSlot) }

# [ derive (Clone, Default) ]
pub struct RecordingTimers (pub Rc<RefCell<Vec<TimerCall>>>);

impl RecordingTimers {
    pub fn taken (&self) -> Vec<TimerCall> { self.0.borrow_mut().drain(..).collect() }
}

impl TimerHost for RecordingTimers {
    fn start_timer (&mut self, slot:TimerSlot, delay:Duration) { self.0.borrow_mut().push (TimerCall::Start(slot, delay)) }
    fn stop_timer  (&mut self, slot:TimerSlot) { self.0.borrow_mut().push (TimerCall::Stop(slot)) }
}



/// Overlay that keeps the last shown state plus the reply handle, with fixed bounds while visible
# [ derive (Default) ]
pub struct OverlayState {
    pub visible  : bool,
    pub items    : Vec<char>,
    pub selected : usize,
    pub reply    : Option<OverlayReplyHandle>,
    pub shows    : usize,
}

# [ derive (Clone, Default) ]
pub struct RecordingOverlay (pub Rc<RefCell<OverlayState>>);

pub const OVERLAY_RECT: ScreenRect = ScreenRect { left: 100, top: 100, right: 400, bottom: 200 };

impl OverlayView for RecordingOverlay {
    fn show (&mut self, _base:char, variants:&[char], selected:usize, reply:OverlayReplyHandle) {
        let mut st = self.0.borrow_mut();
        st.visible = true; st.items = variants.to_vec(); st.selected = selected; st.reply = Some(reply); st.shows += 1;
    }
    fn set_items (&mut self, variants:&[char], selected:usize) {
        let mut st = self.0.borrow_mut();
        st.items = variants.to_vec(); st.selected = selected;
    }
    fn highlight (&mut self, selected:usize) { self.0.borrow_mut().selected = selected }
    fn hide (&mut self) {
        let mut st = self.0.borrow_mut();
        st.visible = false; st.reply = None;
    }
    fn screen_bounds (&self) -> Option<ScreenRect> {
        if self.0.borrow().visible { Some(OVERLAY_RECT) } else { None }
    }
}



# [ derive (Clone, Default) ]
pub struct RecordingFlash (pub Rc<RefCell<Vec<String>>>);

impl LayoutFlash for RecordingFlash {
    fn flash (&mut self, name:&str) { self.0.borrow_mut().push (name.to_string()) }
}


/// Lock-key probe with a settable caps state
# [ derive (Clone, Default) ]
pub struct FakeKeyState (pub Rc<RefCell<bool>>);

impl KeyStateProbe for FakeKeyState {
    fn is_toggled (&self, key:KbdKey) -> bool { key == KbdKey::CapsLock && *self.0.borrow() }
}



pub fn entry (handle:i64, name:&str) -> LayoutEntry {
    LayoutEntry { handle: LayoutHandle(handle), display_name: name.to_string(), region_code: String::new() }
}
