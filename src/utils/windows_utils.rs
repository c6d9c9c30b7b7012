
use std::ffi::c_void;
use std::mem;
use std::path::Path;

use windows::{
    core::PWSTR,
    Win32::Foundation::{HWND, BOOL, CloseHandle},
    Win32::System::Threading::{
        OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION
    },
    Win32::UI::HiDpi::{DPI_AWARENESS_CONTEXT_SYSTEM_AWARE, SetThreadDpiAwarenessContext},
    Win32::UI::Input::KeyboardAndMouse::{GetKeyboardLayout, GetKeyboardState, GetKeyState, ToUnicodeEx},
    Win32::UI::WindowsAndMessaging::{
        GetForegroundWindow, GetClassNameW, GetGUIThreadInfo, GetWindowThreadProcessId, GUITHREADINFO,
        SPI_GETKEYBOARDDELAY, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS, SystemParametersInfoW,
    },
};

use crate::*;


pub fn win_set_thread_dpi_aware() { unsafe {
    SetThreadDpiAwarenessContext (DPI_AWARENESS_CONTEXT_SYSTEM_AWARE);
} }


/// The host keyboard repeat-delay setting, in its 0..=3 units (1 if the query fails, which is the os default)
pub fn keyboard_repeat_delay_units () -> u32 { unsafe {
    let mut units = 1u32;
    let ok = SystemParametersInfoW (
        SPI_GETKEYBOARDDELAY, 0, Some (&mut units as *mut u32 as *mut c_void), SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS::default()
    );
    if ok.as_bool() { units.min(3) } else { 1 }
} }


fn win_get_class_name (hwnd:HWND) -> Option<String> { unsafe {
    let mut lpstr: [u16; 256] = [0; 256];
    let len = GetClassNameW (hwnd, &mut lpstr);
    if len <= 0 { return None }
    Some (String::from_utf16_lossy (&lpstr[..(len as _)]))
} }


/// Process image name (lowercased, no extension) for the given pid
pub fn get_process_name (pid:u32) -> CapstanResult<String> { unsafe {
    let handle = OpenProcess (PROCESS_QUERY_LIMITED_INFORMATION, BOOL::from(false), pid)
        .map_err (|e| CapstanError::ForegroundProbe (format! ("open process {pid}: {e}")))?;
    let mut lpstr: [u16; 512] = [0; 512];
    let mut lpdwsize = lpstr.len() as u32;
    let ok = QueryFullProcessImageNameW ( handle, PROCESS_NAME_WIN32, PWSTR::from_raw(lpstr.as_mut_ptr()), &mut lpdwsize );
    CloseHandle (handle);
    if !ok.as_bool() {
        return Err (CapstanError::ForegroundProbe (format! ("query image name for {pid} failed")))
    }
    let path = String::from_utf16_lossy (&lpstr[..(lpdwsize as usize)]);
    Ok ( Path::new(&path) .file_stem() .map (|s| s.to_string_lossy().to_lowercase()) .unwrap_or_default() )
} }



/// Foreground introspection: the owning process of the foreground window, and the class of its focused control
# [ derive (Debug, Default, Copy, Clone) ]
pub struct OsForegroundProbe;

impl ForegroundProbe for OsForegroundProbe {
    fn foreground_info (&self) -> CapstanResult<ForegroundInfo> { unsafe {
        let hwnd = GetForegroundWindow();
        if hwnd == HWND(0) { return Err (CapstanError::ForegroundProbe ("no foreground window".into())) }

        let mut pid = 0u32;
        let thread_id = GetWindowThreadProcessId (hwnd, Some(&mut pid));

        // an elevated or protected target can refuse us its name .. the class check can still approve it
        let process_name = get_process_name(pid) .ok();

        let mut gui = GUITHREADINFO { cbSize: mem::size_of::<GUITHREADINFO>() as u32, ..Default::default() };
        let focused_class = if GetGUIThreadInfo (thread_id, &mut gui).as_bool() && gui.hwndFocus != HWND(0) {
            win_get_class_name (gui.hwndFocus)
        } else { None };

        Ok ( ForegroundInfo { process_name, focused_class } )
    } }
}



/// Resolves keys via ToUnicodeEx against the foreground thread's layout
# [ derive (Debug, Default, Copy, Clone) ]
pub struct OsKeyResolver;

// leave the kernel-mode keyboard (dead-key) state untouched while translating (win10 1607+)
const TO_UNICODE_NO_STATE_CHANGE: u32 = 0x4;

impl KeyResolver for OsKeyResolver {
    fn resolve_char (&self, ev:&KbdEvent, shift:bool) -> Option<char> { unsafe {
        let mut state = [0u8; 256];
        if !GetKeyboardState (&mut state).as_bool() { return None }
        if shift {
            state [KbdKey::Shift.vk() as usize]  = 0x80;
            state [KbdKey::LShift.vk() as usize] = 0x80;
        }
        let fg_thread = GetWindowThreadProcessId (GetForegroundWindow(), None);
        let hkl = GetKeyboardLayout (fg_thread);

        let mut buf = [0u16; 8];
        let n = ToUnicodeEx (ev.vk_code, ev.sc_code, &state, &mut buf, TO_UNICODE_NO_STATE_CHANGE, hkl);
        if n < 1 { return None }
        char::decode_utf16 (buf[..(n as usize)].iter().copied()) .next() .and_then (|r| r.ok()) .filter (|c| *c != '\0')
    } }
}



/// Lock-key toggle state straight from the os
# [ derive (Debug, Default, Copy, Clone) ]
pub struct OsKeyState;

impl KeyStateProbe for OsKeyState {
    fn is_toggled (&self, key:KbdKey) -> bool {
        unsafe { GetKeyState (key.vk() as i32) & 0x0001 != 0 }
    }
}
