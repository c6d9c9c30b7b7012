
use tracing::info;

use crate::*;


/// Overlay stand-in for running without any popup renderer .. logs what would be shown.
/// It has no screen presence, so any click counts as outside, and selection happens by keyboard only.
# [ derive (Debug, Default) ]
pub struct HeadlessOverlay {
    items    : Vec<char>,
    selected : usize,
    // held so the session stays open until we're told to hide
    reply    : Option<OverlayReplyHandle>,
}

impl HeadlessOverlay {
    fn render (&self) -> String {
        self.items .iter() .enumerate()
            .map ( |(i, c)| if i == self.selected { format!("[{}]", c) } else { c.to_string() } )
            .collect::<Vec<_>>() .join (" ")
    }
}

impl OverlayView for HeadlessOverlay {

    fn show (&mut self, base:char, variants:&[char], selected:usize, reply:OverlayReplyHandle) {
        self.items = variants.to_vec();
        self.selected = selected;
        self.reply = Some(reply);
        info! (%base, items = %self.render(), "accent overlay shown");
    }

    fn set_items (&mut self, variants:&[char], selected:usize) {
        self.items = variants.to_vec();
        self.selected = selected;
        info! (items = %self.render(), "accent overlay re-cased");
    }

    fn highlight (&mut self, selected:usize) {
        self.selected = selected;
        info! (items = %self.render(), "accent overlay selection");
    }

    fn hide (&mut self) {
        self.items.clear();
        self.reply = None;
    }

    fn screen_bounds (&self) -> Option<ScreenRect> { None }
}



/// Layout flash that just logs the name
# [ derive (Debug, Default, Copy, Clone) ]
pub struct LogFlash;

impl LayoutFlash for LogFlash {
    fn flash (&mut self, display_name:&str) {
        info! (layout = display_name, "layout switched");
    }
}
