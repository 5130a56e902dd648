//! Runtime invariants with contract coverage
//!
//! Production code states its invariants with [`assert_invariant!`]; every
//! check is recorded per thread so contract tests can prove that a code path
//! actually exercised the invariants it promises.
//!
//! ```rust,ignore
//! use crabshot::invariant_ppt::contract_test;
//!
//! #[test]
//! fn contract_depth_sampling() {
//!     let map = crabshot::depth::DepthMap::filled(4, 4, 1.0);
//!     crabshot::depth::estimate_variability(Some(&map));
//!     contract_test("depth sampling", &["Resolved sample lies inside the depth map"]);
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::thread_local;

thread_local! {
    static CHECKED: RefCell<HashSet<&'static str>> = RefCell::new(HashSet::new());
}

/// Assert an invariant and record that it was checked.
///
/// # Panics
/// Panics with the invariant message and context when the condition is false.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $message:expr) => {
        $crate::invariant_ppt::__check_invariant($condition, $message, None)
    };
    ($condition:expr, $message:expr, $context:expr) => {
        $crate::invariant_ppt::__check_invariant($condition, $message, Some($context))
    };
}

#[doc(hidden)]
pub fn __check_invariant(condition: bool, message: &'static str, context: Option<&str>) {
    CHECKED.with(|checked| {
        checked.borrow_mut().insert(message);
    });

    if !condition {
        panic!(
            "INVARIANT VIOLATION [{}]: {}",
            context.unwrap_or("unknown"),
            message
        );
    }
}

/// Invariants checked on the current thread so far
pub fn checked_invariants() -> Vec<&'static str> {
    let mut checked: Vec<&'static str> =
        CHECKED.with(|checked| checked.borrow().iter().copied().collect());
    checked.sort_unstable();
    checked
}

/// Assert that every invariant in `required` was checked on this thread.
///
/// # Panics
/// Panics listing the invariants that were never exercised.
pub fn contract_test(name: &str, required: &[&str]) {
    let missing: Vec<&str> = CHECKED.with(|checked| {
        let checked = checked.borrow();
        required
            .iter()
            .copied()
            .filter(|invariant| !checked.contains(*invariant))
            .collect()
    });

    if !missing.is_empty() {
        panic!(
            "CONTRACT FAILURE [{}]: invariants never checked:\n  - {}",
            name,
            missing.join("\n  - ")
        );
    }
}

/// Forget every recorded check on the current thread
pub fn clear_invariant_log() {
    CHECKED.with(|checked| checked.borrow_mut().clear());
}
