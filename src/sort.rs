//! Ordering of the wallet credentials that can satisfy one requested
//! attribute.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Revocation status of a candidate credential.
pub trait RevocationStatus {
    /// `None` when the status is unknown.
    fn revoked(&self) -> Option<bool>;

    /// Unknown status counts as not revoked.
    fn is_revoked(&self) -> bool {
        self.revoked().unwrap_or(false)
    }
}

impl RevocationStatus for bool {
    fn revoked(&self) -> Option<bool> {
        Some(*self)
    }
}

impl RevocationStatus for Option<bool> {
    fn revoked(&self) -> Option<bool> {
        *self
    }
}

impl<T: ?Sized + RevocationStatus> RevocationStatus for &T {
    fn revoked(&self) -> Option<bool> {
        T::revoked(*self)
    }
}

/// Credential offered for a requested attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCandidate<T> {
    /// Opaque credential handle.
    #[serde(flatten)]
    pub credential: T,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked: Option<bool>,
}

impl<T> CredentialCandidate<T> {
    pub fn new(credential: T, revoked: Option<bool>) -> Self {
        Self {
            credential,
            revoked,
        }
    }
}

impl<T> RevocationStatus for CredentialCandidate<T> {
    fn revoked(&self) -> Option<bool> {
        self.revoked
    }
}

/// Compares candidates so that non-revoked ones come first.
///
/// Candidates with the same status are equal, so a stable sort keeps their
/// original order.
pub fn compare<C: ?Sized + RevocationStatus>(a: &C, b: &C) -> Ordering {
    a.is_revoked().cmp(&b.is_revoked())
}

/// Stable sort putting non-revoked candidates first.
pub fn sort_by_revocation<C: RevocationStatus>(candidates: &mut [C]) {
    candidates.sort_by(compare)
}
