
use crate::*;


// this is used for identifying the fake keypresses we insert, so we don't process them in an infinite loop
// note that 0xFFC3D44F is from ahk, though ahk uses further complex variations on it to signal more things
pub const CAPSTAN_INJECTED_IDENTIFIER_EXTRA_INFO : usize = 0xFFC3D44F;



/// The synthetic input primitives the controllers drive .. everything we ever put into the input stream goes through here
pub trait Injector {

    /// inject a single down+up pair for the key
    fn press_release (&mut self, key:KbdKey) -> CapstanResult<()>;

    /// press modifier, press key, release key, release modifier
    fn combo (&mut self, modifier:KbdKey, key:KbdKey) -> CapstanResult<()>;

    /// inject a literal unicode char (down+up with no vk mapping)
    fn send_char (&mut self, c:char) -> CapstanResult<()>;

    /// activate the layout process-wide and notify the foreground window of the change
    fn activate_layout (&mut self, handle:LayoutHandle) -> CapstanResult<()>;
}


/// Replaces the one char left of the caret with the given char
/// (Shift+Left selects the base char just typed, and the literal char then overwrites the selection)
pub fn replace_previous_char (inj: &mut dyn Injector, c:char) -> CapstanResult<()> {
    inj.combo (KbdKey::Shift, KbdKey::Left)?;
    inj.send_char (c)
}




#[cfg(windows)]
pub use self::win_injector::*;

#[cfg(windows)]
mod win_injector {

    use std::{mem::size_of, os::raw::c_int};

    use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
    use windows::Win32::UI::Input::KeyboardAndMouse::*;
    use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, PostMessageW, WM_INPUTLANGCHANGEREQUEST};
    use windows::Win32::UI::TextServices::HKL;

    use crate::*;


    /// Injector that writes into the os input stream via SendInput, tagging everything with our marker
    # [ derive (Debug, Default, Copy, Clone) ]
    pub struct SendInputInjector;


    fn kbd_input (w_vk:u16, w_sc:u16, flags:KEYBD_EVENT_FLAGS) -> INPUT {
        INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(w_vk),
                    wScan: w_sc,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: CAPSTAN_INJECTED_IDENTIFIER_EXTRA_INFO,
            } }
        }
    }
    fn vk_down (key:KbdKey) -> INPUT { kbd_input (key.vk() as u16, 0, KEYBD_EVENT_FLAGS(0)) }
    fn vk_up   (key:KbdKey) -> INPUT { kbd_input (key.vk() as u16, 0, KEYEVENTF_KEYUP) }

    /// Sends simulated keyboard events to OS for injection into events-stream
    fn send_inputs (inputs: &mut [INPUT]) -> CapstanResult<()> {
        let requested = inputs.len() as u32;
        let sent = unsafe { SendInput (inputs, size_of::<INPUT>() as c_int) };
        if sent == requested { Ok(()) } else {
            Err (CapstanError::Injection { sent, requested })
        }
    }


    impl Injector for SendInputInjector {

        fn press_release (&mut self, key:KbdKey) -> CapstanResult<()> {
            send_inputs (&mut [ vk_down(key), vk_up(key) ])
        }

        fn combo (&mut self, modifier:KbdKey, key:KbdKey) -> CapstanResult<()> {
            send_inputs (&mut [ vk_down(modifier), vk_down(key), vk_up(key), vk_up(modifier) ])
        }

        fn send_char (&mut self, c:char) -> CapstanResult<()> {
            // chars outside the BMP go out as a surrogate pair, each unit getting its own down/up
            let mut buf = [0u16; 2];
            let mut inputs = c .encode_utf16 (&mut buf) .iter() .flat_map ( |u| [
                kbd_input (0, *u, KEYEVENTF_UNICODE),
                kbd_input (0, *u, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP),
            ] ) .collect::<Vec<INPUT>>();
            send_inputs (&mut inputs)
        }

        fn activate_layout (&mut self, handle:LayoutHandle) -> CapstanResult<()> { unsafe {
            let prior = ActivateKeyboardLayout (HKL(handle.0 as isize), KLF_SETFORPROCESS);
            if prior.is_err() {
                return Err (CapstanError::LayoutActivation { handle: handle.0 })
            }
            // the process-wide activation doesnt reach the foreground app by itself, so we ask it to switch too
            let hwnd = GetForegroundWindow();
            if hwnd != HWND(0) {
                let _ = PostMessageW (hwnd, WM_INPUTLANGCHANGEREQUEST, WPARAM(0), LPARAM(handle.0 as isize));
            }
            Ok(())
        } }
    }

}
