

/// Enum representation of the Keyboard Keys
// we've put actual KbdKey def in kbd_codes just because its such a long enum, but we'll re-export it from here!
pub use super::kbd_codes::KbdKey;



/// The keyboard event type is the OS provided down/up or sys-down/up (which fires when Alt is held down etc)
# [ allow (non_camel_case_types) ]
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub enum KbdEvent_T {
    KbdEvent_KeyDown,
    KbdEvent_SysKeyDown,
    KbdEvent_KeyUp,
    KbdEvent_SysKeyUp,
}

impl KbdEvent_T {
    pub fn is_down (self) -> bool {
        use KbdEvent_T::*;
        matches! (self, KbdEvent_KeyDown | KbdEvent_SysKeyDown)
    }
    pub fn is_up (self) -> bool { !self.is_down() }
}



/// The KbdEvent includes the OS provided scan-code and virtual-key-code as well as the KbdKey representation and KbdEvent_T
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub struct KbdEvent {
    pub ev_t     : KbdEvent_T,
    pub key      : KbdKey,
    pub vk_code  : u32,
    pub sc_code  : u32,
    pub stamp    : u32,
    pub injected : bool,
}

impl KbdEvent {

    /// builds an event for a key with its own vk-code (what the hook sees for almost all real events)
    pub fn new (ev_t:KbdEvent_T, key:KbdKey) -> KbdEvent {
        KbdEvent { ev_t, key, vk_code: key.vk(), sc_code: 0, stamp: 0, injected: false }
    }
    pub fn key_down (key:KbdKey) -> KbdEvent { KbdEvent::new (KbdEvent_T::KbdEvent_KeyDown, key) }
    pub fn key_up   (key:KbdKey) -> KbdEvent { KbdEvent::new (KbdEvent_T::KbdEvent_KeyUp,   key) }

    pub fn is_down (&self) -> bool { self.ev_t.is_down() }
    pub fn is_up   (&self) -> bool { self.ev_t.is_up() }
}



/// The hook callback verdict for any event .. either let it continue down the hook chain or consume it here
# [ allow (non_camel_case_types) ]
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub enum EventPropagationDirective {
    EventProp_Continue,
    EventProp_Stop,
}

impl EventPropagationDirective {
    pub fn stops (self) -> bool { self == EventPropagationDirective::EventProp_Stop }
}



/// Resolves a key event (plus the shift state we track) into the printable char it would produce under the active layout
pub trait KeyResolver {
    fn resolve_char (&self, ev:&KbdEvent, shift:bool) -> Option<char>;
}

/// Reads the toggle state of lock-keys (CapsLock etc) from the host
pub trait KeyStateProbe {
    fn is_toggled (&self, key:KbdKey) -> bool;
}
