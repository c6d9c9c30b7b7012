
// allow non camel-case names for this entire file
#![allow(non_camel_case_types)]

use strum_macros::EnumIter;


/// Representation for left/right/middle and X1/X2 mouse buttons .. others are not fully supported
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone, EnumIter) ]
pub enum MouseButton {
    LeftButton,
    MiddleButton,
    RightButton,
    X1Button,
    X2Button,

    #[strum(disabled)]
    OtherButton(u32),
}


/// For the mouse-btn, event types can be btn-down or btn-up
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub enum MouseBtnEvent_T {
    BtnDown,
    BtnUp,
}


/// Mouse button event along with the screen point it happened at
//  (we dont care about wheel or pointer-move events at all, so the hook lets those through without building events)
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub struct MouseEvent {
    pub btn      : MouseButton,
    pub ev_t     : MouseBtnEvent_T,
    pub x_pos    : i32,
    pub y_pos    : i32,
    pub stamp    : u32,
    pub injected : bool,
}

impl MouseEvent {
    pub fn btn_down (btn:MouseButton, x_pos:i32, y_pos:i32) -> MouseEvent {
        MouseEvent { btn, ev_t: MouseBtnEvent_T::BtnDown, x_pos, y_pos, stamp: 0, injected: false }
    }
    pub fn btn_up (btn:MouseButton, x_pos:i32, y_pos:i32) -> MouseEvent {
        MouseEvent { btn, ev_t: MouseBtnEvent_T::BtnUp, x_pos, y_pos, stamp: 0, injected: false }
    }
    pub fn is_btn_down (&self) -> bool { self.ev_t == MouseBtnEvent_T::BtnDown }
}
