
use std::ffi::c_void;

use tracing::debug;

use windows::{
    core::{PCWSTR, PWSTR},
    Win32::Foundation::ERROR_SUCCESS,
    Win32::Globalization::{
        GetLocaleInfoEx, LCIDToLocaleName, LOCALE_SISO3166CTRYNAME, LOCALE_SISO639LANGNAME, LOCALE_SNATIVEDISPLAYNAME,
    },
    Win32::System::Registry::{
        HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, RRF_RT_REG_SZ, RegCloseKey, RegEnumKeyExW, RegGetValueW, RegOpenKeyExW,
    },
    Win32::UI::Input::KeyboardAndMouse::GetKeyboardLayoutList,
    Win32::UI::TextServices::HKL,
};

use crate::*;


const PRELOAD_KEY     : &str = r"Keyboard Layout\Preload";
const KBD_LAYOUTS_KEY : &str = r"SYSTEM\CurrentControlSet\Control\Keyboard Layouts";


fn wide (s:&str) -> Vec<u16> {
    s.encode_utf16() .chain (std::iter::once(0)) .collect()
}

fn from_wide (buf:&[u16]) -> String {
    let end = buf.iter() .position (|c| *c == 0) .unwrap_or (buf.len());
    String::from_utf16_lossy (&buf[..end])
}


/// Reads a REG_SZ value, None if the key or value is missing (or empty)
fn reg_get_string (hkey:HKEY, subkey:&str, value:&str) -> Option<String> { unsafe {
    let (subkey, value) = (wide(subkey), wide(value));
    let mut buf = [0u16; 512];
    let mut size = (buf.len() * 2) as u32;
    let rc = RegGetValueW (
        hkey, PCWSTR::from_raw(subkey.as_ptr()), PCWSTR::from_raw(value.as_ptr()), RRF_RT_REG_SZ,
        None, Some (buf.as_mut_ptr() as *mut c_void), Some (&mut size)
    );
    if rc != ERROR_SUCCESS { return None }
    Some (from_wide (&buf)) .filter (|s| !s.is_empty())
} }


/// The user's Preload list as (index, klid) .. the values are named "1", "2", .. with no gaps
fn read_preload () -> Vec<(u32, String)> {
    (1..) .map_while ( |idx:u32| reg_get_string (HKEY_CURRENT_USER, PRELOAD_KEY, &idx.to_string()) .map (|klid| (idx, klid)) )
        .collect()
}


/// Scans every installed layout key for one whose "Layout Id" matches, and returns its "Layout Text"
fn layout_text_by_id (layout_id:u16) -> Option<String> { unsafe {
    let mut hkey = HKEY::default();
    let root = wide (KBD_LAYOUTS_KEY);
    if RegOpenKeyExW (HKEY_LOCAL_MACHINE, PCWSTR::from_raw(root.as_ptr()), 0, KEY_READ, &mut hkey) != ERROR_SUCCESS { return None }

    let mut found = None;
    for idx in 0.. {
        let mut name = [0u16; 64];
        let mut len = name.len() as u32;
        if RegEnumKeyExW (hkey, idx, PWSTR::from_raw(name.as_mut_ptr()), &mut len, None, PWSTR::null(), None, None) != ERROR_SUCCESS {
            break
        }
        let sub = format! ("{}\\{}", KBD_LAYOUTS_KEY, String::from_utf16_lossy (&name[..(len as usize)]));
        // stored as e.g. "0020" or "20"
        let id = reg_get_string (HKEY_LOCAL_MACHINE, &sub, "Layout Id") .and_then (|s| u16::from_str_radix (s.trim(), 16).ok());
        if id == Some(layout_id) {
            found = reg_get_string (HKEY_LOCAL_MACHINE, &sub, "Layout Text");
            if found.is_some() { break }
        }
    }
    RegCloseKey (hkey);
    found
} }


fn layout_name (handle:LayoutHandle) -> String {
    layout_text_keys (handle) .into_iter()
        .find_map ( |k| match k {
            LayoutTextKey::Klid (klid)  => reg_get_string (HKEY_LOCAL_MACHINE, &format! ("{}\\{}", KBD_LAYOUTS_KEY, klid), "Layout Text"),
            LayoutTextKey::LayoutId(id) => layout_text_by_id (id),
        } )
        .unwrap_or_else (|| "Unknown".into())
}


fn locale_name (lang_id:u16) -> Option<Vec<u16>> { unsafe {
    let mut buf = [0u16; 85];
    let n = LCIDToLocaleName (lang_id as u32, Some(&mut buf), 0);
    if n <= 1 { return None }
    Some (buf[..(n as usize)].to_vec())
} }

fn locale_info (locale:&[u16], lctype:u32) -> Option<String> { unsafe {
    let mut buf = [0u16; 128];
    let n = GetLocaleInfoEx (PCWSTR::from_raw(locale.as_ptr()), lctype, Some(&mut buf));
    if n <= 1 { return None }
    Some (from_wide (&buf)) .filter (|s| !s.is_empty())
} }


fn language_and_region (lang_id:u16) -> (String, String) {
    let Some(locale) = locale_name (lang_id) else {
        return (format! ("{:04X}", lang_id), String::new())
    };
    let language = locale_info (&locale, LOCALE_SNATIVEDISPLAYNAME) .unwrap_or_else (|| from_wide (&locale));
    let region = locale_info (&locale, LOCALE_SISO3166CTRYNAME)
        .map (|r| r.to_lowercase())
        .or_else ( || locale_info (&locale, LOCALE_SISO639LANGNAME)
            .and_then (|l| fallback_region_for_language (&l.to_lowercase())) .map (String::from) )
        .unwrap_or_default();
    (language, region)
}



/// Installed layouts straight from the os: the loaded HKL list, named from the registry, ordered by the user's Preload list
# [ derive (Debug, Default, Copy, Clone) ]
pub struct OsLayoutRegistry;

impl LayoutRegistry for OsLayoutRegistry {
    fn list_installed_layouts (&self) -> Vec<LayoutEntry> {
        let count = unsafe { GetKeyboardLayoutList (None) };
        if count <= 0 { return vec![] }
        let mut hkls = vec! [HKL::default(); count as usize];
        let count = unsafe { GetKeyboardLayoutList (Some(&mut hkls)) } .max(0) as usize;
        hkls.truncate (count);

        let preload = read_preload();
        let raw = hkls .iter() .map ( |hkl| {
            let handle = LayoutHandle (hkl.0 as i64);
            let (language_name, region_code) = language_and_region (handle.lang_id());
            RawLayout {
                handle,
                preload_index : preload_index_for (handle, &preload),
                language_name,
                layout_name   : layout_name (handle),
                region_code,
            }
        } ) .collect::<Vec<_>>();

        let layouts = order_layouts (raw);
        debug! (count = layouts.len(), "enumerated installed layouts");
        layouts
    }
}
