//! Platform identification and gated dispatch.
//!
//! The shell registers one reaction per operating system for some events
//! (badge rendering, close policy). Instead of scattering `cfg!` checks
//! through the controllers, handlers are wrapped in a gate that only fires
//! on its target platform, so all of them can be registered unconditionally.

/// The operating systems the shell distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for. Resolved once; the answer
    /// never changes at runtime.
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    /// Whether closing the last window quits the application on this
    /// platform. Everywhere else a close request hides the window instead.
    pub const fn close_is_terminal(self) -> bool {
        matches!(self, Platform::Windows)
    }
}

/// Wrap `handler` so it only runs when the current platform matches `target`.
///
/// The returned callable has the same shape as the handler; on other
/// platforms it is a no-op. Pure, stateless, synchronous.
pub fn gated<T, F>(target: Platform, handler: F) -> impl Fn(&T)
where
    F: Fn(&T),
{
    gated_on(Platform::current(), target, handler)
}

/// Like [`gated`], but with the running platform passed in explicitly.
/// This is the testable core; `gated` partially applies `Platform::current()`.
pub fn gated_on<T, F>(current: Platform, target: Platform, handler: F) -> impl Fn(&T)
where
    F: Fn(&T),
{
    move |arg| {
        if current == target {
            handler(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_gate_fires_on_matching_platform() {
        let hits = Cell::new(0u32);
        let handler = gated_on(Platform::Linux, Platform::Linux, |n: &u32| {
            hits.set(hits.get() + n);
        });
        handler(&2);
        handler(&3);
        assert_eq!(hits.get(), 5);
    }

    #[test]
    fn test_gate_is_noop_on_other_platforms() {
        let hits = Cell::new(0u32);
        let handler = gated_on(Platform::Windows, Platform::MacOs, |n: &u32| {
            hits.set(hits.get() + n);
        });
        handler(&7);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_at_most_one_gate_fires_per_event() {
        // One handler per platform, registered unconditionally; exactly one
        // may run for a given current platform.
        for current in [Platform::MacOs, Platform::Linux, Platform::Windows] {
            let hits = Cell::new(0u32);
            for target in [Platform::MacOs, Platform::Linux, Platform::Windows] {
                let handler = gated_on(current, target, |_: &()| {
                    hits.set(hits.get() + 1);
                });
                handler(&());
            }
            assert_eq!(hits.get(), 1);
        }
    }

    #[test]
    fn test_close_policy_per_platform() {
        assert!(Platform::Windows.close_is_terminal());
        assert!(!Platform::MacOs.close_is_terminal());
        assert!(!Platform::Linux.close_is_terminal());
        assert!(!Platform::Other.close_is_terminal());
    }
}
