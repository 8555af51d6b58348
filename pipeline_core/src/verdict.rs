//! Check results and the validation verdict.
//!
//! The verdict is the sole basis for downstream gating: the gate returns it
//! to the caller, the caller decides whether to halt the pipeline. Nothing
//! here prints or logs; presentation is the CLI's concern.

use serde::Serialize;

/// The outcome of a single validation check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Stable check name (e.g. `schema`, `numeric_range(price)`, `drift(...)`)
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Diagnostic message; on failure it identifies the offending columns,
    /// values, or counts well enough to diagnose the problem
    pub message: String,
}

impl CheckResult {
    /// Creates a passing result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
        }
    }

    /// Creates a failing result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
        }
    }
}

/// The result of running the validation gate.
///
/// Immutable once produced. The overall flag fails if and only if at least
/// one check failed; the per-check results keep their deterministic order
/// (schema, then domain rules in declaration order, then drift).
#[derive(Debug, Clone, Serialize)]
pub struct ValidationVerdict {
    passed: bool,
    checks: Vec<CheckResult>,
}

impl ValidationVerdict {
    /// Builds a verdict from an ordered list of check results.
    pub fn from_checks(checks: Vec<CheckResult>) -> Self {
        let passed = checks.iter().all(|check| check.passed);
        Self { passed, checks }
    }

    /// Whether every check passed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// All check results, in evaluation order.
    pub fn checks(&self) -> &[CheckResult] {
        &self.checks
    }

    /// The failing checks, in evaluation order.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|check| !check.passed)
    }
}
