//! Fan verification vocabulary and the signal resolver
//!
//! Two evidence sources feed fan verification: the document validation
//! verdict and the selfie/document face match. Each arrives at the system
//! boundary as a nullable string with two known literals; this module owns
//! the normalization into an explicit tri-state and the resolution of the
//! two signals into one overall outcome.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Tri-state verification result for one evidence source.
///
/// `Unknown` covers every representation that is not one of the two known
/// literals: absent field, null, empty string, or any other value an
/// upstream model decided to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationSignal {
    /// The evidence source confirmed the fan ("verified" literal).
    Verified,
    /// The evidence source rejected the fan ("rejected" literal).
    Rejected,
    /// Missing, null, or not yet evaluated.
    Unknown,
}

impl VerificationSignal {
    /// Normalize a raw status value into a signal.
    ///
    /// Only the exact literals `"verified"` and `"rejected"` are
    /// recognized; everything else (including `None`) is `Unknown`.
    pub fn from_status(raw: Option<&str>) -> Self {
        match raw {
            Some("verified") => VerificationSignal::Verified,
            Some("rejected") => VerificationSignal::Rejected,
            _ => VerificationSignal::Unknown,
        }
    }

    /// True only for the exact `Verified` state.
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationSignal::Verified)
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationSignal::Verified => "verified",
            VerificationSignal::Rejected => "rejected",
            VerificationSignal::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VerificationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VerificationSignal {
    /// Deserialization applies the same normalization as
    /// [`VerificationSignal::from_status`]: unrecognized strings become
    /// `Unknown` instead of failing the whole payload.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(VerificationSignal::from_status(Some(&raw)))
    }
}

/// Consolidated fan verification outcome.
///
/// The wire representation is the space-separated tier string consumed by
/// the profile backend ("verified success" / "verified partial" /
/// "verified fail").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FanVerificationOutcome {
    /// Both signals verified.
    #[serde(rename = "verified success")]
    Success,
    /// Exactly one signal verified.
    #[serde(rename = "verified partial")]
    Partial,
    /// Neither signal verified.
    #[serde(rename = "verified fail")]
    Fail,
}

impl FanVerificationOutcome {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FanVerificationOutcome::Success => "verified success",
            FanVerificationOutcome::Partial => "verified partial",
            FanVerificationOutcome::Fail => "verified fail",
        }
    }
}

impl fmt::Display for FanVerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the document and selfie signals into one outcome.
///
/// Pure and total: counts how many of the two signals are exactly
/// `Verified` (0 → fail, 1 → partial, 2 → success). `Rejected` and
/// `Unknown` are deliberately indistinguishable here; callers normalize
/// raw values with [`VerificationSignal::from_status`] before calling.
/// The two arguments are interchangeable.
pub fn resolve(
    document: VerificationSignal,
    selfie: VerificationSignal,
) -> FanVerificationOutcome {
    match (document.is_verified(), selfie.is_verified()) {
        (true, true) => FanVerificationOutcome::Success,
        (false, false) => FanVerificationOutcome::Fail,
        _ => FanVerificationOutcome::Partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VerificationSignal::{Rejected, Unknown, Verified};

    #[test]
    fn both_verified_resolves_success() {
        assert_eq!(resolve(Verified, Verified), FanVerificationOutcome::Success);
    }

    #[test]
    fn one_verified_resolves_partial() {
        assert_eq!(resolve(Verified, Rejected), FanVerificationOutcome::Partial);
        assert_eq!(resolve(Rejected, Verified), FanVerificationOutcome::Partial);
        assert_eq!(resolve(Unknown, Verified), FanVerificationOutcome::Partial);
        assert_eq!(resolve(Verified, Unknown), FanVerificationOutcome::Partial);
    }

    #[test]
    fn none_verified_resolves_fail() {
        assert_eq!(resolve(Rejected, Rejected), FanVerificationOutcome::Fail);
        assert_eq!(resolve(Unknown, Unknown), FanVerificationOutcome::Fail);
        assert_eq!(resolve(Rejected, Unknown), FanVerificationOutcome::Fail);
        assert_eq!(resolve(Unknown, Rejected), FanVerificationOutcome::Fail);
    }

    #[test]
    fn resolver_is_commutative() {
        let signals = [Verified, Rejected, Unknown];
        for a in signals {
            for b in signals {
                assert_eq!(resolve(a, b), resolve(b, a), "resolve({a}, {b})");
            }
        }
    }

    #[test]
    fn normalization_recognizes_known_literals() {
        assert_eq!(VerificationSignal::from_status(Some("verified")), Verified);
        assert_eq!(VerificationSignal::from_status(Some("rejected")), Rejected);
    }

    #[test]
    fn normalization_maps_everything_else_to_unknown() {
        assert_eq!(VerificationSignal::from_status(None), Unknown);
        assert_eq!(VerificationSignal::from_status(Some("")), Unknown);
        assert_eq!(VerificationSignal::from_status(Some("Verified")), Unknown);
        assert_eq!(VerificationSignal::from_status(Some("pending")), Unknown);
        assert_eq!(VerificationSignal::from_status(Some("null")), Unknown);
    }

    #[test]
    fn unknown_behaves_like_rejected_in_resolution() {
        let signals = [Verified, Rejected, Unknown];
        for other in signals {
            assert_eq!(resolve(Unknown, other), resolve(Rejected, other));
        }
    }

    #[test]
    fn outcome_wire_strings() {
        assert_eq!(FanVerificationOutcome::Success.as_str(), "verified success");
        assert_eq!(FanVerificationOutcome::Partial.as_str(), "verified partial");
        assert_eq!(FanVerificationOutcome::Fail.as_str(), "verified fail");
    }

    #[test]
    fn outcome_serializes_to_tier_string() {
        let json = serde_json::to_string(&FanVerificationOutcome::Partial).unwrap();
        assert_eq!(json, "\"verified partial\"");

        let parsed: FanVerificationOutcome =
            serde_json::from_str("\"verified fail\"").unwrap();
        assert_eq!(parsed, FanVerificationOutcome::Fail);
    }

    #[test]
    fn signal_deserialization_normalizes_junk() {
        let parsed: VerificationSignal = serde_json::from_str("\"verified\"").unwrap();
        assert_eq!(parsed, Verified);

        let parsed: VerificationSignal = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(parsed, Unknown);
    }
}
