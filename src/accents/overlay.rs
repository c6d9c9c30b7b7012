
use derivative::Derivative;
use futures::channel::oneshot;

use crate::*;


/// Screen-space rect of the visible popup (inclusive edges, as hit-testing treats border clicks as inside)
# [ derive (Debug, Default, Eq, PartialEq, Copy, Clone) ]
pub struct ScreenRect {
    pub left   : i32,
    pub top    : i32,
    pub right  : i32,
    pub bottom : i32,
}

impl ScreenRect {
    pub fn contains (&self, x:i32, y:i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}



/// What the popup reports back for a session .. a clicked item, or a dismissal from its own side
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub enum OverlayReply {
    Selected (usize),
    Cancelled,
}


/// The popup's side of the one-shot reply channel. Resolving consumes it, so a session can never be answered twice.
# [ derive (Derivative) ]
#[derivative(Debug)]
pub struct OverlayReplyHandle {
    tx   : oneshot::Sender<OverlayReply>,
    #[derivative(Debug="ignore")]
    wake : AF,
}

impl OverlayReplyHandle {
    /// Sends the reply and wakes the hook thread so it gets processed. Returns false if the session is already gone.
    pub fn resolve (self, reply:OverlayReply) -> bool {
        let delivered = self.tx.send(reply).is_ok();
        if delivered { (self.wake)() }
        delivered
    }
}

/// The presentation collaborator for variant selection. Rendering is external, we only push state into it.
/// All calls are made from the hook thread and must return quickly (the os drops hooks that stall).
pub trait OverlayView {
    fn show (&mut self, base:char, variants:&[char], selected:usize, reply:OverlayReplyHandle);
    fn set_items (&mut self, variants:&[char], selected:usize);
    fn highlight (&mut self, selected:usize);
    fn hide (&mut self);
    /// None when nothing is on screen (every click then counts as outside)
    fn screen_bounds (&self) -> Option<ScreenRect>;
}



/// Live state of an open selection popup
# [ derive (Debug) ]
pub struct OverlaySession {
    pub base       : char,
    base_variants  : &'static [char],
    variants       : Vec<char>,
    selected       : usize,
    upper          : bool,
    // the key whose long-press opened this, until it gets released
    origin_key     : Option<KbdKey>,
    released       : bool,
    reply_rx       : oneshot::Receiver<OverlayReply>,
}

impl OverlaySession {

    /// Opens a session for the base char (None when it has no variants), along with the reply handle for the popup
    pub fn open (base:char, upper:bool, origin_key:KbdKey, wake:AF) -> Option <(OverlaySession, OverlayReplyHandle)> {
        let base_variants = variants_of(base) .filter (|v| !v.is_empty())?;
        let (tx, reply_rx) = oneshot::channel();
        let session = OverlaySession {
            base, base_variants,
            variants   : apply_case (base_variants, upper),
            selected   : 0,
            upper,
            origin_key : Some(origin_key),
            released   : false,
            reply_rx,
        };
        Some ((session, OverlayReplyHandle { tx, wake }))
    }

    pub fn variants (&self) -> &[char] { &self.variants }
    pub fn selected (&self) -> usize { self.selected }
    pub fn is_upper (&self) -> bool { self.upper }
    pub fn is_released (&self) -> bool { self.released }
    pub fn origin_key (&self) -> Option<KbdKey> { self.origin_key }

    pub fn selected_char (&self) -> char { self.variants[self.selected] }

    pub fn select_next (&mut self) -> usize {
        self.selected = (self.selected + 1) % self.variants.len();
        self.selected
    }
    pub fn select_previous (&mut self) -> usize {
        let n = self.variants.len();
        self.selected = (self.selected + n - 1) % n;
        self.selected
    }

    /// 0-based direct selection, ignored when out of range
    pub fn select_index (&mut self, idx:usize) -> Option<char> {
        if idx >= self.variants.len() { return None }
        self.selected = idx;
        Some (self.selected_char())
    }

    /// re-cases the variants in place .. returns false if nothing changed
    pub fn set_case (&mut self, upper:bool) -> bool {
        if upper == self.upper { return false }
        self.upper = upper;
        self.variants = apply_case (self.base_variants, upper);
        true
    }

    pub fn mark_released (&mut self) {
        self.origin_key = None;
        self.released = true;
    }

    /// Non-blocking check for the popup's reply. A dropped handle reads as a cancel.
    pub fn poll_reply (&mut self) -> Option<OverlayReply> {
        match self.reply_rx.try_recv() {
            Ok(reply) => reply,
            Err(_canceled) => Some (OverlayReply::Cancelled),
        }
    }
}
