// Staleness policy for resilient element handles
//
// Controls when a handle notices that its cached element reference went stale.
// Both policies give callers the same observable results; they differ in how
// many round-trips an operation costs.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variable consulted by [`StalenessPolicy::from_env`]
pub const STALENESS_POLICY_ENV: &str = "RESILIENT_ELEMENT_STALENESS_POLICY";

/// When a handle checks its cached reference for staleness.
///
/// # Example
///
/// ```ignore
/// use resilient_element::{ResilientElement, StalenessPolicy};
///
/// let handle = ResilientElement::builder()
///     .context(session)
///     .locator(Locator::id("main"))
///     .policy(StalenessPolicy::EagerProbe)
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StalenessPolicy {
    /// Use the cached reference until an operation against it fails as stale.
    ///
    /// Cheapest: a healthy cache costs no extra round-trip.
    #[default]
    LazyInvalidate,
    /// Probe the cached reference with `is_displayed` before every operation
    /// and re-resolve up front when the probe reports staleness.
    ///
    /// Costs one extra round-trip per operation.
    EagerProbe,
}

impl StalenessPolicy {
    /// Reads the policy from `RESILIENT_ELEMENT_STALENESS_POLICY`.
    ///
    /// An unset variable yields the default policy. A value that is not
    /// `lazy-invalidate` or `eager-probe` is an
    /// [`Error::InvalidArgument`].
    pub fn from_env() -> Result<Self> {
        match std::env::var(STALENESS_POLICY_ENV) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            StalenessPolicy::LazyInvalidate => "lazy-invalidate",
            StalenessPolicy::EagerProbe => "eager-probe",
        }
    }
}

impl fmt::Display for StalenessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StalenessPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy-invalidate" | "lazy" => Ok(StalenessPolicy::LazyInvalidate),
            "eager-probe" | "eager" => Ok(StalenessPolicy::EagerProbe),
            other => Err(Error::InvalidArgument(format!(
                "unknown staleness policy '{}', expected 'lazy-invalidate' or 'eager-probe'",
                other
            ))),
        }
    }
}
