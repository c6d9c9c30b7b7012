
use std::cell::RefCell;
use std::os::raw::c_int;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{Ordering, AtomicU32, AtomicIsize};
use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;

use derive_deref::Deref;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use tracing::{debug, error, info, warn};

use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM, BOOL, GetLastError};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::{*, MouseButton::*, MouseBtnEvent_T::*, KbdEvent_T::*, EventPropagationDirective::*};


pub const MSG_LOOP_KILL_MSG : u32 = WM_USER + 1;
pub const MSG_OVERLAY_REPLY : u32 = WM_USER + 2;


/// Builds the driver on the hook thread. Given the waker that pokes that thread when an overlay reply lands.
/// (kept as a reusable fn since every re-hook after a suspend starts over with a fresh driver)
pub type DriverFactory = Arc <dyn Fn(AF) -> Driver + Send + Sync>;


thread_local! {
    // the driver lives only on the hook thread .. hook callbacks, timers and replies all run there, one at a time
    static DRIVER : RefCell <Option <Driver>> = RefCell::new (None);
    // live thread-timer ids per slot (and back)
    static TIMERS : RefCell <FxHashMap <TimerSlot, usize>> = RefCell::new (FxHashMap::default());
}



/// Thread timers on the hook thread, delivered as WM_TIMER into its message loop
# [ derive (Debug, Default, Copy, Clone) ]
pub struct OsTimers;

impl TimerHost for OsTimers {
    fn start_timer (&mut self, slot:TimerSlot, delay:Duration) {
        self.stop_timer (slot);
        let id = unsafe { SetTimer (HWND(0), 0, delay.as_millis() as u32, None) };
        if id == 0 {
            warn! (?slot, "setting thread timer failed .. error code : {:?}", unsafe { GetLastError() });
            return
        }
        TIMERS.with ( |t| t.borrow_mut() .insert (slot, id) );
    }
    fn stop_timer (&mut self, slot:TimerSlot) {
        if let Some(id) = TIMERS.with ( |t| t.borrow_mut() .remove (&slot) ) {
            unsafe { KillTimer (HWND(0), id) };
        }
    }
}

/// Timers are one-shot for us, so a firing id gets killed and its slot released right away
fn take_fired_slot (id:usize) -> Option<TimerSlot> {
    let slot = TIMERS.with ( |t| {
        let mut t = t.borrow_mut();
        let slot = t .iter() .find (|(_, v)| **v == id) .map (|(k, _)| *k);
        if let Some(s) = slot { t.remove(&s); }
        slot
    } );
    unsafe { KillTimer (HWND(0), id) };
    slot
}


/// Runs a closure against the thread's driver. Re-entrant or pre-init calls (and panics) fall back to the default.
fn with_driver <R> (default:R, f: impl FnOnce(&mut Driver) -> R) -> R {
    DRIVER.with ( |d| {
        let Ok(mut guard) = d.try_borrow_mut() else { return default };
        let Some(driver) = guard.as_mut() else { return default };
        match panic::catch_unwind (AssertUnwindSafe (|| f(driver))) {
            Ok(r) => r,
            Err(_) => { error! ("panic inside hook handling .. letting the event through"); default }
        }
    } )
}



pub struct _InputProcessor {
    // we hold handles returned by OS to the lower level kbd/mouse hooks we set (needed to unhook them later)
    kbd_hook     : AtomicIsize,
    mouse_hook   : AtomicIsize,
    iproc_thread : AtomicU32,
}

# [ derive (Clone, Deref) ]
pub struct InputProcessor ( Arc <_InputProcessor> );


impl InputProcessor {

    /// Creates or returns the singleton InputProcessor.
    pub fn instance() -> InputProcessor {
        static INSTANCE: OnceCell <InputProcessor> = OnceCell::new();
        INSTANCE .get_or_init ( || {
            InputProcessor ( Arc::new ( _InputProcessor {
                kbd_hook     : AtomicIsize::default(),
                mouse_hook   : AtomicIsize::default(),
                iproc_thread : AtomicU32::default(),
            } ) )
        } ) .clone()
    }


    fn set_hook (
        hook_id: WINDOWS_HOOK_ID,
        hook: &'static str,
        hhook: &AtomicIsize,
        hook_proc: unsafe extern "system" fn (c_int, WPARAM, LPARAM) -> LRESULT,
    ) -> CapstanResult<HHOOK> { unsafe {
        let hh = SetWindowsHookExW (hook_id, Some(hook_proc), HINSTANCE(0), 0)
            .map_err (|e| CapstanError::HookInstall { hook, code: e.code().0 as u32 })?;
        hhook.store (hh.0, Ordering::SeqCst);
        info! (hook, "hooking attempt .. succeeded!");
        Ok(hh)
    } }
    fn set_kbd_hook   (&self) -> CapstanResult<HHOOK> { InputProcessor::set_hook (WH_KEYBOARD_LL, "keyboard", &self.kbd_hook,   kbd_proc) }
    fn set_mouse_hook (&self) -> CapstanResult<HHOOK> { InputProcessor::set_hook (WH_MOUSE_LL,    "mouse",    &self.mouse_hook, mouse_proc) }


    /// Unhooks our own handle .. the shared slot only gets cleared if a newer thread hasnt already replaced it
    fn unset_hook (hhook: &AtomicIsize, own: HHOOK) -> bool {
        if own == HHOOK::default() { return false }
        let _ = hhook.compare_exchange (own.0, HHOOK::default().0, Ordering::SeqCst, Ordering::SeqCst);
        if true == unsafe { UnhookWindowsHookEx (own) } {
            debug! ("unhooking attempt .. succeeded!");
            return true
        }
        warn! ("unhooking attempt .. failed .. error code : {:?} !!", unsafe { GetLastError() });
        false
    }

    pub fn are_hooks_set (&self) -> bool {
        HHOOK (self.kbd_hook.load(Ordering::Relaxed)) != HHOOK::default()
            || HHOOK (self.mouse_hook.load(Ordering::Relaxed)) != HHOOK::default()
    }


    pub fn stop_input_processing (&self) { unsafe {
        // hooks have to come off from the thread that set them, so the kill-msg does the unhooking over there
        let tid = self.iproc_thread.swap (0, Ordering::SeqCst);
        if tid != 0 {
            PostThreadMessageW (tid, MSG_LOOP_KILL_MSG, WPARAM::default(), LPARAM::default());
        }
    } }


    /// Spawns the hook thread: builds the driver there, sets both hooks, then pumps messages until told to stop.
    /// Returns once the hooks are in (or with the install error, after cleaning up).
    pub fn begin_input_processing (&self, factory:DriverFactory) -> CapstanResult<()> {

        if self.are_hooks_set() { self.stop_input_processing() }

        let iproc = self.clone();
        let (tx, rx) = channel::<CapstanResult<()>>();

        thread::spawn ( move || unsafe {

            utils::win_set_thread_dpi_aware();

            let tid = GetCurrentThreadId();
            let wake : AF = Arc::new ( move || {
                PostThreadMessageW (tid, MSG_OVERLAY_REPLY, WPARAM::default(), LPARAM::default());
            } );
            DRIVER.with ( |d| *d.borrow_mut() = Some (factory(wake)) );

            // the thread needs a message queue before anyone can post to it .. PeekMessage forces one
            let mut msg: MSG = MSG::default();
            PeekMessageW (&mut msg, HWND(0), WM_USER, WM_USER, PM_NOREMOVE);

            let kbd_hh = match iproc.set_kbd_hook() {
                Ok(hh) => hh,
                Err(e) => { let _ = tx.send (Err(e)); return }
            };
            let mouse_hh = match iproc.set_mouse_hook() {
                Ok(hh) => hh,
                Err(e) => { InputProcessor::unset_hook (&iproc.kbd_hook, kbd_hh); let _ = tx.send (Err(e)); return }
            };
            iproc.iproc_thread.store (tid, Ordering::SeqCst);
            let _ = tx.send (Ok(()));

            // we dont create any windows, so this loop only ever sees our own thread msgs and timers ..
            //.. the hook callbacks get called from inside GetMessage while its waiting
            while BOOL(0) != GetMessageW (&mut msg, HWND(0), 0, 0) {
                match msg.message {
                    MSG_LOOP_KILL_MSG => {
                        info! ("received kill-msg in input-processing thread .. terminating thread ..");
                        break
                    }
                    MSG_OVERLAY_REPLY => with_driver ((), |d| d.on_overlay_reply()),
                    WM_TIMER => {
                        if let Some(slot) = take_fired_slot (msg.wParam.0) {
                            with_driver ((), |d| d.on_timer (slot));
                        }
                    }
                    _ => { }
                }
            }

            InputProcessor::unset_hook (&iproc.kbd_hook, kbd_hh);
            InputProcessor::unset_hook (&iproc.mouse_hook, mouse_hh);
            let slots = TIMERS.with ( |t| t.borrow().keys().copied().collect::<Vec<_>>() );
            slots .into_iter() .for_each (|s| OsTimers.stop_timer(s));
            DRIVER.with ( |d| d.borrow_mut().take() );
        } );

        rx.recv() .unwrap_or_else ( |_| Err (CapstanError::HookInstall { hook: "keyboard", code: 0 }) )
    }

}




/// Keyboard lower-level-hook processor
pub unsafe extern "system"
fn kbd_proc (code: c_int, w_param: WPARAM, l_param: LPARAM) -> LRESULT {

    let return_call = || { CallNextHookEx(HHOOK(0), code, w_param, l_param) };

    if code < 0 { return return_call() }      // ms-docs says we MUST do this

    let kb_struct = *(l_param.0 as *const KBDLLHOOKSTRUCT);

    // if we injected this event ourselves, we should just bail
    if kb_struct.dwExtraInfo == CAPSTAN_INJECTED_IDENTIFIER_EXTRA_INFO { return return_call() }

    let Some(ev_t) = ( match w_param.0 as u32 {
        WM_KEYDOWN      => Some (KbdEvent_KeyDown),
        WM_SYSKEYDOWN   => Some (KbdEvent_SysKeyDown),
        WM_KEYUP        => Some (KbdEvent_KeyUp),
        WM_SYSKEYUP     => Some (KbdEvent_SysKeyUp),
        _               => None,
    } ) else { return return_call() };

    let event = KbdEvent {
        ev_t,
        key      : KbdKey::from (kb_struct.vkCode),
        vk_code  : kb_struct.vkCode,
        sc_code  : kb_struct.scanCode,
        stamp    : kb_struct.time,
        injected : kb_struct.flags & LLKHF_INJECTED == LLKHF_INJECTED,
    };

    if with_driver (EventProp_Continue, |d| d.on_key (&event)) == EventProp_Stop {
        return LRESULT(1);  // returning with non-zero code signals OS to block further processing on the input event
    }
    return_call()
}



#[allow(non_snake_case)]
fn hi_word (l: u32) -> u16 { ((l >> 16) & 0xffff) as u16 }

/// mouse lower-level-hook processor .. only button transitions matter to us
pub unsafe extern "system"
fn mouse_proc (code: c_int, w_param: WPARAM, l_param: LPARAM) -> LRESULT {

    let return_call = || { CallNextHookEx(HHOOK(0), code, w_param, l_param) };

    if code < 0 { return return_call() }

    let mh_struct = &*(l_param.0 as *const MSLLHOOKSTRUCT);

    if mh_struct.dwExtraInfo == CAPSTAN_INJECTED_IDENTIFIER_EXTRA_INFO { return return_call() }

    let x_btn = || match hi_word (mh_struct.mouseData) {
        XBUTTON1 => X1Button,
        XBUTTON2 => X2Button,
        other    => OtherButton (other as u32),
    };
    let Some((btn, ev_t)) = ( match w_param.0 as u32 {
        WM_LBUTTONDOWN => Some ((LeftButton,   BtnDown)),
        WM_RBUTTONDOWN => Some ((RightButton,  BtnDown)),
        WM_MBUTTONDOWN => Some ((MiddleButton, BtnDown)),
        WM_XBUTTONDOWN => Some ((x_btn(),      BtnDown)),
        WM_LBUTTONUP   => Some ((LeftButton,   BtnUp)),
        WM_RBUTTONUP   => Some ((RightButton,  BtnUp)),
        WM_MBUTTONUP   => Some ((MiddleButton, BtnUp)),
        WM_XBUTTONUP   => Some ((x_btn(),      BtnUp)),
        _ => None,
    } ) else { return return_call() };

    let event = MouseEvent {
        btn, ev_t,
        x_pos    : mh_struct.pt.x,
        y_pos    : mh_struct.pt.y,
        stamp    : mh_struct.time,
        injected : mh_struct.flags & LLMHF_INJECTED == LLMHF_INJECTED,
    };

    if with_driver (EventProp_Continue, |d| d.on_mouse (&event)) == EventProp_Stop {
        return LRESULT(1);
    }
    return_call()
}
