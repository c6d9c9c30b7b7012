
// slightly unconventional organization here ..
//.. we wanted to keep the main module file inside the module dir, so we're just declaring all our modules as
//.. mostly empty wrappers here, that re-export the _module_name file inside the module folders
//.. (along with any other re-exports we want to do)

// in general, we'll re-export everything from the shadowed module file in the module dir
// then we could selectively re-export to module-top-level from other submodules under it ..
// and as before, we re-export everything toplevel in those sub-modules too
//.. (so we wont have to import any of our high-level mod constructs once we do 'use crate::*')
//.. (name-space contention is minimal, and where it occurs, avoidable via explicit path specification)



// first our single-file sub-modules
pub mod errors;



// then our sub-modules with folders (but no main module file) with shadowed module file in the folders (where useful)

/// inputs .. keyboard-keys, mouse-btns, the raw events, the synthetic injector, and the os hook processor
pub mod inputs {
    // sub-modules in module directory
    pub mod kbd_codes;
    pub mod kbd;
    pub mod mouse;
    pub mod injector;
    #[cfg(windows)]
    pub mod input_proc;

    // and our (selective or wholesale) sub-module re-exports
    pub use self::kbd_codes::*;
    pub use self::kbd::*;
    pub use self::mouse::*;
    pub use self::injector::*;
    #[cfg(windows)]
    pub use self::input_proc::*;
}


/// accents .. the variant table, long-press timing, text-context heuristic, overlay sessions, and the selection state machine
pub mod accents {
    // shadowed module file that we'll re-export from here
    mod _accents;
    pub use self::_accents::*;

    // other sub-modules in module directory
    pub mod long_press;
    pub mod text_context;
    pub mod overlay;
    pub mod accent_proc;

    // and our (selective or wholesale) sub-module re-exports
    pub use self::long_press::*;
    pub use self::text_context::*;
    pub use self::overlay::*;
    pub use self::accent_proc::*;
}


/// layouts .. installed layout entries, their ordering/naming, and the trigger-key layout switch controller
pub mod layouts {
    mod _layouts;
    pub use self::_layouts::*;

    pub mod layout_switch;
    pub use self::layout_switch::*;
}


/// app .. shared flags, settings, the hook dispatcher that owns both controllers, and the action driver
/// (the windows-only launcher and system-tray live here too)
pub mod app {
    mod _app;
    pub use self::_app::*;

    pub mod settings;
    pub mod hook_dispatch;
    pub mod driver;
    pub mod headless;
    #[cfg(windows)]
    pub mod system_tray;
    #[cfg(windows)]
    pub mod launcher;

    pub use self::settings::*;
    pub use self::hook_dispatch::*;
    pub use self::driver::*;
    pub use self::headless::*;
    #[cfg(windows)]
    pub use self::launcher::*;
}


/// bunch of windows utility helpers for foreground introspection, key resolution, layout enumeration etc
#[cfg(windows)]
pub mod utils {
    pub mod windows_utils;
    pub mod layout_utils;

    pub use self::windows_utils::*;
    pub use self::layout_utils::*;
}


#[cfg(test)]
pub(crate) mod testkit;


// and finally our crate level re-exports
//.. here again, instead of only re-exporting selective essential constructs, we'll re-export heavily first
pub use crate::errors::*;
pub use crate::inputs::*;
pub use crate::accents::*;
pub use crate::layouts::*;
pub use crate::app::*;
//pub use crate::utils::*;
// ^^ lets not do the internals of utils .. we can just use 'utils::' when needed
