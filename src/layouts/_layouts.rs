
use std::fmt;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};


/// An os input-layout handle (HKL) .. low word is the language id, high word the device/layout id
# [ derive (Debug, Default, Eq, PartialEq, Hash, Copy, Clone, Serialize, Deserialize) ]
#[serde(transparent)]
pub struct LayoutHandle (pub i64);

impl LayoutHandle {
    pub fn lang_id   (&self) -> u16 { (self.0 & 0xFFFF) as u16 }
    pub fn high_word (&self) -> u16 { ((self.0 >> 16) & 0xFFFF) as u16 }
    /// zero is what an unset favorite looks like
    pub fn is_unset  (&self) -> bool { self.0 == 0 }
}

impl fmt::Display for LayoutHandle {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write! (f, "{:08X}", self.0 as u32)
    }
}



/// An installed layout as presented to the user (ordering of these is the cycle order)
# [ derive (Debug, Clone, Eq, PartialEq) ]
pub struct LayoutEntry {
    pub handle       : LayoutHandle,
    pub display_name : String,
    pub region_code  : String,
}

/// What the host enumerator gathers per layout, before ordering and naming
# [ derive (Debug, Clone, Eq, PartialEq) ]
pub struct RawLayout {
    pub handle        : LayoutHandle,
    pub preload_index : u32,
    pub language_name : String,
    pub layout_name   : String,
    pub region_code   : String,
}


/// The host side that enumerates installed layouts, already ordered and named
pub trait LayoutRegistry {
    fn list_installed_layouts (&self) -> Vec<LayoutEntry>;
}

/// Fire-and-forget display of a layout name after a switch
pub trait LayoutFlash {
    fn flash (&mut self, display_name:&str);
}



/// Orders layouts by their language's first preload slot, then by their own slot, and names them.
/// The layout name is only appended for languages that have more than one layout installed.
pub fn order_layouts (raw: Vec<RawLayout>) -> Vec<LayoutEntry> {

    let mut lang_first : FxHashMap<u16, u32>   = FxHashMap::default();
    let mut lang_count : FxHashMap<u16, usize> = FxHashMap::default();
    raw .iter() .for_each ( |l| {
        let first = lang_first .entry (l.handle.lang_id()) .or_insert (u32::MAX);
        *first = (*first).min (l.preload_index);
        *lang_count .entry (l.handle.lang_id()) .or_insert (0) += 1;
    } );

    raw .into_iter()
        .sorted_by_key ( |l| (lang_first[&l.handle.lang_id()], l.preload_index) )
        .map ( |l| {
            let display_name = if lang_count[&l.handle.lang_id()] > 1 {
                format! ("{} - {}", l.language_name, l.layout_name)
            } else { l.language_name };
            LayoutEntry { handle: l.handle, display_name, region_code: l.region_code }
        } )
        .collect()
}


/// Finds the preload slot for a layout from the (slot, klid-string) preload entries .. u32::MAX when absent.
/// Substitute entries look like "d0010409" (sub-index 001 for lang 0409), plain ones like "00000409".
pub fn preload_index_for (handle:LayoutHandle, preload: &[(u32, String)]) -> u32 {
    let (lang, hi) = (handle.lang_id(), handle.high_word());
    let lang_hex = format! ("{:04X}", lang);

    preload .iter() .sorted_by_key (|(idx, _)| *idx) .find ( |(_, value)| {
        let value = value.to_uppercase();
        // klids are plain hex .. anything else would also make the byte slicing below unsound
        if value.len() != 8 || !value.is_ascii() { return false }
        if value.starts_with('D') {
            value.ends_with (&lang_hex)
                && u16::from_str_radix (&value[1..4], 16) .map (|sub| sub == hi & 0x0FFF) .unwrap_or(false)
        } else {
            u16::from_str_radix (&value[4..8], 16) .map (|l| l == lang && hi == lang) .unwrap_or(false)
        }
    } )
    .map (|(idx, _)| *idx)
    .unwrap_or (u32::MAX)
}


/// Where the human name of a layout lives in the host's layout registry
# [ derive (Debug, Clone, Eq, PartialEq) ]
pub enum LayoutTextKey {
    /// a "Keyboard Layouts\<klid>" key, read its "Layout Text"
    Klid (String),
    /// scan the layout keys for this "Layout Id" (variant layouts with an F-prefixed high word)
    LayoutId (u16),
}

/// The lookups to try, in order, for naming a layout
pub fn layout_text_keys (handle:LayoutHandle) -> Vec<LayoutTextKey> {
    let (lang, hi) = (handle.lang_id(), handle.high_word());
    if hi == lang || hi == 0 {
        return vec![ LayoutTextKey::Klid (format! ("{:08X}", lang)) ]
    }
    if hi & 0xF000 != 0xF000 {
        // high word is another language's default layout (e.g. a UK keyboard on en-US)
        return vec![ LayoutTextKey::Klid (format! ("{:08X}", hi)), LayoutTextKey::LayoutId (hi & 0x0FFF) ]
    }
    vec![ LayoutTextKey::LayoutId (hi & 0x0FFF) ]
}


/// Country code for neutral languages where the locale itself carries no region
pub fn fallback_region_for_language (lang:&str) -> Option<&'static str> {
    Some ( match lang {
        "en" => "us",  "es" => "es",  "fr" => "fr",  "de" => "de",  "it" => "it",  "pt" => "pt",  "ru" => "ru",
        "zh" => "cn",  "ja" => "jp",  "ko" => "kr",  "ar" => "sa",  "he" => "il",  "hi" => "in",  "th" => "th",
        "vi" => "vn",  "el" => "gr",  "tr" => "tr",  "pl" => "pl",  "nl" => "nl",  "sv" => "se",  "da" => "dk",
        "no" => "no",  "fi" => "fi",  "cs" => "cz",  "sk" => "sk",  "hu" => "hu",  "ro" => "ro",  "bg" => "bg",
        "uk" => "ua",  "hr" => "hr",  "sr" => "rs",  "sl" => "si",  "et" => "ee",  "lv" => "lv",  "lt" => "lt",
        "tl" => "ph",  "fil" => "ph", "ms" => "my",  "id" => "id",  "bn" => "bd",  "ta" => "in",  "te" => "in",
        "mr" => "in",  "gu" => "in",  "kn" => "in",  "ml" => "in",  "pa" => "in",  "ur" => "pk",  "fa" => "ir",
        "sw" => "ke",  "am" => "et",  "ne" => "np",  "si" => "lk",  "km" => "kh",  "lo" => "la",  "my" => "mm",
        "ka" => "ge",  "hy" => "am",  "az" => "az",  "kk" => "kz",  "uz" => "uz",  "mn" => "mn",  "is" => "is",
        "ga" => "ie",  "cy" => "gb",  "mt" => "mt",  "eu" => "es",  "ca" => "es",  "gl" => "es",  "af" => "za",
        "sq" => "al",  "mk" => "mk",  "bs" => "ba",  "lb" => "lu",  "fo" => "fo",  "be" => "by",
        _ => return None,
    } )
}


/// Display name for a handle, falling back to its hex form for anything not installed
pub fn display_name_for (layouts:&[LayoutEntry], handle:LayoutHandle) -> String {
    layouts .iter() .find (|l| l.handle == handle) .map (|l| l.display_name.clone()) .unwrap_or_else (|| handle.to_string())
}


/// Makes sure both favorites point at installed layouts (and at two different ones where possible)
pub fn reconcile_favorites (fav_1:LayoutHandle, fav_2:LayoutHandle, layouts:&[LayoutEntry]) -> (LayoutHandle, LayoutHandle) {
    let Some(first) = layouts.first() else { return (fav_1, fav_2) };
    let installed = |h:LayoutHandle| layouts .iter() .any (|l| l.handle == h);

    let fav_1 = if installed(fav_1) { fav_1 } else { first.handle };
    let fav_2 = if installed(fav_2) && fav_2 != fav_1 { fav_2 } else {
        layouts .iter() .map (|l| l.handle) .find (|h| *h != fav_1) .unwrap_or (fav_1)
    };
    (fav_1, fav_2)
}
