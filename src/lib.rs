//! This library turns credential and proof-request records into the data a
//! wallet shows on a credential card: label/value pairs for attributes and
//! predicates, date formatting driven by overlay bundles, ordering of the
//! candidate credentials for a requested attribute, and normalization of
//! incoming invitation links.
//!
//! Overlay bundles are resolved elsewhere. This crate only reads their
//! resolved form (see [`OverlayBundle`]).
pub mod attribute;
pub mod bundle;
pub mod card;
pub mod date;
pub mod invitation;
mod options;
pub mod predicate;
pub mod sort;

pub use attribute::{
    parse, Attribute, AttributeLike, AttributeParser, AttributeValue, DisplayField, FormatLookup,
    FormatMap, Predicate, PredicateType,
};
pub use bundle::{InvalidBundle, OverlayBundle};
pub use card::CredentialError;
pub use date::format_if_date;
pub use invitation::{normalize as normalize_invitation_uri, InvitationReference};
pub use options::{DisplayOptions, InvalidDisplayOptions};
pub use sort::{
    compare as compare_by_revocation, sort_by_revocation, CredentialCandidate, RevocationStatus,
};
