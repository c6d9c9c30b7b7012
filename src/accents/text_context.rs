
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::*;


/// The externalised heuristic data for deciding if the foreground target is a text-entry surface.
/// All matching is case-insensitive substring matching, so "code" also catches "code - insiders" etc.
# [ derive (Debug, Clone, PartialEq, Eq, Serialize, Deserialize) ]
#[serde(default)]
pub struct ContextPolicy {
    /// process names we never pop up over
    pub game_processes       : Vec<String>,
    /// process names we always treat as text-friendly
    pub text_processes       : Vec<String>,
    /// focused-control class patterns that mark an edit field
    pub text_control_classes : Vec<String>,
}

impl Default for ContextPolicy {
    fn default() -> ContextPolicy {
        fn owned (v:&[&str]) -> Vec<String> { v .iter() .map (|s| s.to_string()) .collect() }
        ContextPolicy {
            game_processes : owned (&[
                "pubg", "tslgame", "csgo", "cs2", "valorant", "fortnite", "overwatch", "dota", "league", "minecraft",
                "gta", "rdr2", "destiny", "apex", "battlefield", "warzone", "rust", "tarkov", "dayz", "arma",
            ]),
            text_processes : owned (&[
                "searchhost", "searchui", "explorer", "notepad", "code", "devenv", "chrome", "firefox", "msedge", "opera",
                "brave", "slack", "discord", "teams", "outlook", "word", "excel", "powerpnt", "onenote",
                "windowsterminal", "powershell", "cmd",
            ]),
            text_control_classes : owned (&[
                "edit", "richedit", "scintilla", "textbox", "searchbox", "windows.ui",
            ]),
        }
    }
}

fn matches_any (subject:&str, patterns:&[String]) -> bool {
    let subject = subject.to_lowercase();
    patterns .iter() .any (|p| !p.is_empty() && subject.contains (&p.to_lowercase()))
}



/// What we could learn about the current foreground target .. either part can be missing (elevated processes etc)
# [ derive (Debug, Default, Clone, PartialEq, Eq) ]
pub struct ForegroundInfo {
    pub process_name  : Option<String>,
    pub focused_class : Option<String>,
}

/// Host introspection of the foreground window's process and its focused control
pub trait ForegroundProbe {
    fn foreground_info (&self) -> CapstanResult<ForegroundInfo>;
}


# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub enum ContextVerdict { Approve, Deny }

impl ContextVerdict {
    pub fn approved (self) -> bool { self == ContextVerdict::Approve }
}


impl ContextPolicy {

    /// The pure decision: game denylist, then text-app allowlist, then control class patterns, else deny
    pub fn classify (&self, info:&ContextInfoRef) -> ContextVerdict {
        use ContextVerdict::*;
        if let Some(proc_name) = info.process_name {
            if matches_any (proc_name, &self.game_processes) { return Deny }
            if matches_any (proc_name, &self.text_processes) { return Approve }
        }
        if let Some(cls) = info.focused_class {
            if matches_any (cls, &self.text_control_classes) { return Approve }
        }
        Deny
    }
}

/// borrowed view of a ForegroundInfo, so callers holding plain strs dont have to allocate
# [ derive (Debug, Default, Copy, Clone) ]
pub struct ContextInfoRef<'a> {
    pub process_name  : Option<&'a str>,
    pub focused_class : Option<&'a str>,
}

impl ForegroundInfo {
    pub fn view (&self) -> ContextInfoRef<'_> {
        ContextInfoRef { process_name: self.process_name.as_deref(), focused_class: self.focused_class.as_deref() }
    }
}



/// Classifier that probes the host live on every call (never cached, the foreground can change between keys)
pub struct TextContextClassifier {
    pub policy : ContextPolicy,
    probe      : Box <dyn ForegroundProbe>,
}

impl TextContextClassifier {

    pub fn new (policy:ContextPolicy, probe:Box<dyn ForegroundProbe>) -> TextContextClassifier {
        TextContextClassifier { policy, probe }
    }

    pub fn classify_now (&self) -> ContextVerdict {
        match self.probe.foreground_info() {
            Ok(info) => {
                let verdict = self.policy.classify (&info.view());
                debug! (?info, ?verdict, "text-context classified");
                verdict
            }
            Err(e) => {
                debug! (error = %e, "foreground probe failed, treating as non-text context");
                ContextVerdict::Deny
            }
        }
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    fn info<'a> (p:Option<&'a str>, c:Option<&'a str>) -> ContextInfoRef<'a> {
        ContextInfoRef { process_name: p, focused_class: c }
    }

    #[test]
    fn game_denylist_wins_over_text_control() {
        let pol = ContextPolicy::default();
        assert_eq! (pol.classify (&info (Some("VALORANT-Win64-Shipping"), Some("Edit"))), ContextVerdict::Deny);
    }

    #[test]
    fn allowlist_then_class_patterns_then_deny() {
        let pol = ContextPolicy::default();
        assert_eq! (pol.classify (&info (Some("notepad"), None)), ContextVerdict::Approve);
        assert_eq! (pol.classify (&info (Some("someapp"), Some("RichEdit20W"))), ContextVerdict::Approve);
        assert_eq! (pol.classify (&info (Some("someapp"), Some("Static"))), ContextVerdict::Deny);
        assert_eq! (pol.classify (&info (None, None)), ContextVerdict::Deny);
    }

    #[test]
    fn policy_is_plain_data() {
        let pol = ContextPolicy { game_processes: vec![], text_processes: vec!["mytool".into()], text_control_classes: vec![] };
        assert! (pol.classify (&info (Some("MyTool"), None)).approved());
        assert! (!pol.classify (&info (Some("rust-analyzer"), Some("Edit"))).approved());
    }

    struct FailingProbe;
    impl ForegroundProbe for FailingProbe {
        fn foreground_info (&self) -> CapstanResult<ForegroundInfo> {
            Err (CapstanError::ForegroundProbe ("access denied".into()))
        }
    }

    #[test]
    fn probe_failure_denies() {
        let c = TextContextClassifier::new (ContextPolicy::default(), Box::new(FailingProbe));
        assert_eq! (c.classify_now(), ContextVerdict::Deny);
    }
}
