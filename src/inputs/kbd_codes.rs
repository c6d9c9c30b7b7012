
// allow non camel-case names for this entire file
#![allow(non_camel_case_types)]

use strum_macros::EnumIter;


// the enum and both directions of the vk-code mapping are generated from the one table below,
//.. so a key can never map out to a different code than it maps in from
macro_rules! kbd_keys {
    ( $( $key:ident = $vk:literal ),* $(,)? ) => {

        /// Enum representation of the Keyboard Keys we care about (anything else comes through as OtherKey)
        # [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone, EnumIter) ]
        pub enum KbdKey {
            $( $key, )*

            #[strum(disabled)]
            OtherKey(u32),
        }

        impl From<u32> for KbdKey {
            fn from (vk:u32) -> KbdKey {
                match vk {
                    $( $vk => KbdKey::$key, )*
                    _ => KbdKey::OtherKey(vk),
        }   }   }

        impl From<KbdKey> for u32 {
            fn from (key:KbdKey) -> u32 {
                match key {
                    $( KbdKey::$key => $vk, )*
                    KbdKey::OtherKey(vk) => vk,
        }   }   }
    }
}


kbd_keys! {
    Backspace = 0x08,  Tab = 0x09,  Enter = 0x0D,
    Shift = 0x10,  Ctrl = 0x11,  Alt = 0x12,  Pause = 0x13,  CapsLock = 0x14,
    Escape = 0x1B,  Space = 0x20,
    PageUp = 0x21,  PageDown = 0x22,  End = 0x23,  Home = 0x24,
    Left = 0x25,  Up = 0x26,  Right = 0x27,  Down = 0x28,
    Insert = 0x2D,  Delete = 0x2E,

    Numrow_0 = 0x30,  Numrow_1 = 0x31,  Numrow_2 = 0x32,  Numrow_3 = 0x33,  Numrow_4 = 0x34,
    Numrow_5 = 0x35,  Numrow_6 = 0x36,  Numrow_7 = 0x37,  Numrow_8 = 0x38,  Numrow_9 = 0x39,

    A = 0x41,  B = 0x42,  C = 0x43,  D = 0x44,  E = 0x45,  F = 0x46,  G = 0x47,  H = 0x48,  I = 0x49,
    J = 0x4A,  K = 0x4B,  L = 0x4C,  M = 0x4D,  N = 0x4E,  O = 0x4F,  P = 0x50,  Q = 0x51,  R = 0x52,
    S = 0x53,  T = 0x54,  U = 0x55,  V = 0x56,  W = 0x57,  X = 0x58,  Y = 0x59,  Z = 0x5A,

    LWin = 0x5B,  RWin = 0x5C,  Apps = 0x5D,

    Numpad_0 = 0x60,  Numpad_1 = 0x61,  Numpad_2 = 0x62,  Numpad_3 = 0x63,  Numpad_4 = 0x64,
    Numpad_5 = 0x65,  Numpad_6 = 0x66,  Numpad_7 = 0x67,  Numpad_8 = 0x68,  Numpad_9 = 0x69,

    F1 = 0x70,  F2 = 0x71,  F3 = 0x72,  F4 = 0x73,  F5 = 0x74,  F6 = 0x75,
    F7 = 0x76,  F8 = 0x77,  F9 = 0x78,  F10 = 0x79,  F11 = 0x7A,  F12 = 0x7B,

    LShift = 0xA0,  RShift = 0xA1,  LCtrl = 0xA2,  RCtrl = 0xA3,  LAlt = 0xA4,  RAlt = 0xA5,

    Semicolon = 0xBA,  Equal = 0xBB,  Comma = 0xBC,  Minus = 0xBD,  Period = 0xBE,  Slash = 0xBF,
    Backquote = 0xC0,  LBracket = 0xDB,  Backslash = 0xDC,  RBracket = 0xDD,  Quote = 0xDE,
}



impl KbdKey {

    /// the os virtual-key code for this key
    pub fn vk (self) -> u32 { u32::from(self) }

    /// Returns true for any of the generic/left/right shift keys
    pub fn is_shift (self) -> bool {
        use KbdKey::*;
        matches! (self, Shift | LShift | RShift)
    }

    /// the 1-9 ordinal for the number-row digit keys (0 and numpad keys are not selection digits)
    pub fn selection_digit (self) -> Option<usize> {
        let vk = self.vk();
        if (0x31 ..= 0x39).contains(&vk) { Some ((vk - 0x30) as usize) } else { None }
    }

}
