//! Signal catalog for input dispatch.
//!
//! A fixed, ordered list of POSIX signal names paired with their `nix`
//! signal values. The order is stable so a picker UI can index into
//! `SIGNAL_NAMES` and deliver the matching entry of the catalog.

use nix::sys::signal::Signal;

/// Every signal the engine will deliver to a child process, in picker order.
pub const SIGNAL_CATALOG: &[(&str, Signal)] = &[
    ("SIGHUP", Signal::SIGHUP),
    ("SIGINT", Signal::SIGINT),
    ("SIGQUIT", Signal::SIGQUIT),
    ("SIGILL", Signal::SIGILL),
    ("SIGTRAP", Signal::SIGTRAP),
    ("SIGABRT", Signal::SIGABRT),
    ("SIGFPE", Signal::SIGFPE),
    ("SIGKILL", Signal::SIGKILL),
    ("SIGBUS", Signal::SIGBUS),
    ("SIGSEGV", Signal::SIGSEGV),
    ("SIGSYS", Signal::SIGSYS),
    ("SIGPIPE", Signal::SIGPIPE),
    ("SIGALRM", Signal::SIGALRM),
    ("SIGTERM", Signal::SIGTERM),
    ("SIGUSR1", Signal::SIGUSR1),
    ("SIGUSR2", Signal::SIGUSR2),
    ("SIGCHLD", Signal::SIGCHLD),
    ("SIGWINCH", Signal::SIGWINCH),
    ("SIGURG", Signal::SIGURG),
    ("SIGSTOP", Signal::SIGSTOP),
    ("SIGTSTP", Signal::SIGTSTP),
    ("SIGCONT", Signal::SIGCONT),
    ("SIGTTIN", Signal::SIGTTIN),
    ("SIGTTOU", Signal::SIGTTOU),
    ("SIGVTALRM", Signal::SIGVTALRM),
    ("SIGPROF", Signal::SIGPROF),
    ("SIGXCPU", Signal::SIGXCPU),
    ("SIGXFSZ", Signal::SIGXFSZ),
];

/// Get the ordered list of signal names for a selection UI.
pub fn signal_names() -> Vec<&'static str> {
    SIGNAL_CATALOG.iter().map(|(name, _)| *name).collect()
}

/// Look up a signal by name.
///
/// Returns `None` for names outside the catalog.
pub fn signal_by_name(name: &str) -> Option<Signal> {
    SIGNAL_CATALOG
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, signal)| *signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_list_stays_aligned_with_catalog() {
        let names = signal_names();
        assert_eq!(names.len(), SIGNAL_CATALOG.len());
        for (i, name) in names.iter().enumerate() {
            assert_eq!(SIGNAL_CATALOG[i].0, *name);
            assert_eq!(signal_by_name(name), Some(SIGNAL_CATALOG[i].1));
        }
    }

    #[test]
    fn lookup_resolves_common_signals() {
        assert_eq!(signal_by_name("SIGINT"), Some(Signal::SIGINT));
        assert_eq!(signal_by_name("SIGKILL"), Some(Signal::SIGKILL));
        assert_eq!(signal_by_name("SIGTERM"), Some(Signal::SIGTERM));
    }

    #[test]
    fn lookup_rejects_unknown_names() {
        assert_eq!(signal_by_name("SIGNOPE"), None);
        assert_eq!(signal_by_name("sigint"), None);
        assert_eq!(signal_by_name(""), None);
    }
}
