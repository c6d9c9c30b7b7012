
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

use crate::*;



// we'll define some easier type aliases to pass around wake-ups and such between threads
/// Arc/Action-Function Fn() representation that can be passed around between threads
pub type AF = Arc <dyn Fn() + Send + Sync + 'static> ;

/// an AF that does nothing (for hosts that dont need waking, like tests)
pub fn no_op_af () -> AF { Arc::new (|| {}) }



# [ derive (Debug, Default, Clone) ]
/// representation for our cross-thread toggles .. the tray thread flips these while the hook thread reads them
pub struct Flag (Arc<AtomicBool>);
// ^^ simple sugar that helps reduce clutter in code

impl Flag {
    pub fn new (state:bool) -> Flag { Flag ( Arc::new ( AtomicBool::new(state) ) ) }

    pub fn set   (&self) { self.0 .store (true,  Ordering::SeqCst) }
    pub fn clear (&self) { self.0 .store (false, Ordering::SeqCst) }
    pub fn store (&self, state:bool) { self.0 .store (state, Ordering::SeqCst) }

    pub fn is_set   (&self) -> bool { true  == self.0 .load (Ordering::SeqCst) }
    pub fn is_clear (&self) -> bool { false == self.0 .load (Ordering::SeqCst) }

    /// flips the flag and returns the new state
    pub fn toggle (&self) -> bool { !self.0 .fetch_xor (true, Ordering::SeqCst) }
}



/// The set of live switches shared between the hook thread (reader) and the tray/launcher (writers)
# [ derive (Debug, Default, Clone) ]
pub struct AppFlags {
    /// layout switching on the trigger key
    pub hook_enabled    : Flag,
    /// long-press accent selection
    pub accent_enabled  : Flag,
    /// flash the layout name on switch
    pub overlay_enabled : Flag,
    /// cycle through all layouts instead of toggling the two favorites
    pub cycle_all       : Flag,
}

impl AppFlags {

    pub fn from_settings (s:&Settings) -> AppFlags {
        AppFlags {
            hook_enabled    : Flag::new (s.hook_enabled),
            accent_enabled  : Flag::new (s.accent_hold_enabled),
            overlay_enabled : Flag::new (s.overlay_enabled),
            cycle_all       : Flag::new (s.cycle_all_layouts),
        }
    }

    /// writes the live flag states back into a settings snapshot (for persisting)
    pub fn write_into (&self, s:&mut Settings) {
        s.hook_enabled        = self.hook_enabled.is_set();
        s.accent_hold_enabled = self.accent_enabled.is_set();
        s.overlay_enabled     = self.overlay_enabled.is_set();
        s.cycle_all_layouts   = self.cycle_all.is_set();
    }
}
