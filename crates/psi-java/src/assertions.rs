//! Process-wide handling of contract violations.
//!
//! A violated tree contract (asking for a non-unique role through the unique
//! lookup, a construct missing a token it must have, ...) is a programming
//! error. Every violation is logged through `tracing::error!`; whether it then
//! panics is decided by the current [`AssertionMode`].

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionMode {
    /// Violations are ignored.
    Disabled,
    /// Violations are logged and execution continues.
    Log,
    /// Violations are logged, then panic.
    Panic,
}

impl AssertionMode {
    fn to_raw(self) -> u8 {
        match self {
            AssertionMode::Disabled => 0,
            AssertionMode::Log => 1,
            AssertionMode::Panic => 2,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => AssertionMode::Disabled,
            1 => AssertionMode::Log,
            _ => AssertionMode::Panic,
        }
    }
}

impl Default for AssertionMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            AssertionMode::Panic
        } else {
            AssertionMode::Log
        }
    }
}

const UNSET: u8 = u8::MAX;

static MODE: AtomicU8 = AtomicU8::new(UNSET);

pub fn mode() -> AssertionMode {
    match MODE.load(Ordering::Relaxed) {
        UNSET => AssertionMode::default(),
        raw => AssertionMode::from_raw(raw),
    }
}

/// Install `mode`, returning the mode that was active before.
pub fn set_mode(mode: AssertionMode) -> AssertionMode {
    let previous = MODE.swap(mode.to_raw(), Ordering::Relaxed);
    match previous {
        UNSET => AssertionMode::default(),
        raw => AssertionMode::from_raw(raw),
    }
}

/// Switch to `mode` until the returned guard is dropped.
pub fn scoped(mode: AssertionMode) -> ModeGuard {
    ModeGuard {
        previous: set_mode(mode),
    }
}

#[must_use = "the previous mode is restored when the guard is dropped"]
pub struct ModeGuard {
    previous: AssertionMode,
}

impl Drop for ModeGuard {
    fn drop(&mut self) {
        set_mode(self.previous);
    }
}

#[doc(hidden)]
pub fn report(message: std::fmt::Arguments<'_>, file: &'static str, line: u32) {
    match mode() {
        AssertionMode::Disabled => {}
        AssertionMode::Log => {
            tracing::error!(target: "psi_java::contract", %file, line, "contract violation: {message}");
        }
        AssertionMode::Panic => {
            tracing::error!(target: "psi_java::contract", %file, line, "contract violation: {message}");
            panic!("contract violation: {message}");
        }
    }
}

/// Check a tree contract. Evaluates to the condition's value so callers can
/// fall back when violations are not fatal.
#[macro_export]
macro_rules! psi_assert {
    ($cond:expr, $($arg:tt)+) => {{
        let ok: bool = $cond;
        if !ok {
            $crate::assertions::report(format_args!($($arg)+), file!(), line!());
        }
        ok
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test: the mode is process-wide and tests run in parallel.
    #[test]
    fn modes_and_guards() {
        let outer = scoped(AssertionMode::Log);
        {
            let _inner = scoped(AssertionMode::Disabled);
            assert_eq!(mode(), AssertionMode::Disabled);
            assert!(!psi_assert!(1 + 1 == 3, "ignored"));
        }
        assert_eq!(mode(), AssertionMode::Log);
        assert!(psi_assert!(true, "never reported"));

        let result = std::panic::catch_unwind(|| {
            let _guard = scoped(AssertionMode::Panic);
            psi_assert!(false, "boom {}", 1);
        });
        assert!(result.is_err());
        assert_eq!(mode(), AssertionMode::Log);
        drop(outer);
    }
}
