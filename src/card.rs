//! Credential card display data.
//!
//! Everything a credential card shows that does not depend on how it is
//! drawn: which fields appear, how each field's status is reported, the
//! accessibility summary and the fallbacks used when branding is missing.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    bundle::MetaOverlay, predicate::PredicateText, AttributeLike, AttributeParser, FormatLookup,
    OverlayBundle,
};

/// Error state of a credential card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialError {
    /// The credential has been revoked.
    Revoked,

    /// The credential requested for a proof is not in the wallet.
    NotInWallet,

    /// The credential requested for a proof does not satisfy a predicate.
    PredicateError,
}

/// What to show for one attribute of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldStatus {
    /// Nothing, the credential is not in the wallet.
    Hidden,

    /// The attribute's credential is missing.
    Missing,

    /// The value does not satisfy the requested predicate.
    PredicateNotSatisfied,

    Value,
}

pub fn field_status(item: &AttributeLike, errors: &[CredentialError]) -> FieldStatus {
    if errors.contains(&CredentialError::NotInWallet) {
        FieldStatus::Hidden
    } else if item.has_error() {
        FieldStatus::Missing
    } else if item.satisfied() == Some(false) {
        FieldStatus::PredicateNotSatisfied
    } else {
        FieldStatus::Value
    }
}

/// Fields shown on the card: the displayed items, followed by the bundle's
/// primary and secondary presentation fields.
pub fn card_fields(display_items: &[AttributeLike], bundle: &OverlayBundle) -> Vec<AttributeLike> {
    let mut fields = display_items.to_vec();

    let branded = [bundle.primary_attribute(), bundle.secondary_attribute()];
    fields.extend(
        branded
            .into_iter()
            .flatten()
            .filter_map(|name| bundle.presentation_field(name))
            .cloned()
            .map(AttributeLike::Attribute),
    );

    fields
}

/// Checks whether every field of the card is flagged as personal
/// information.
///
/// Predicates are not personal information. Without a credential there is
/// nothing to hide and the result is `false`.
pub fn all_personal_information<F, P>(
    has_credential: bool,
    fields: &[AttributeLike],
    bundle: &OverlayBundle,
    parser: &AttributeParser<F, P>,
) -> bool
where
    F: FormatLookup,
    P: PredicateText,
{
    has_credential
        && fields.iter().all(|item| match item {
            AttributeLike::Attribute(_) => bundle.is_flagged(&parser.parse(item).label),
            AttributeLike::Predicate(_) => false,
        })
}

/// Whether a flagged attribute disclosed in a proof should carry a warning.
pub fn shows_personal_information_warning(
    item: &AttributeLike,
    bundle: &OverlayBundle,
    proof: bool,
) -> bool {
    proof && !item.is_predicate() && bundle.is_flagged(item.label())
}

/// Localized words of the accessibility summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryText<'a> {
    /// Introduces the issuer (`Issued by`).
    pub issued_by: &'a str,

    /// Ends the card title (`Credential`).
    pub credential: &'a str,
}

impl Default for SummaryText<'static> {
    fn default() -> Self {
        Self {
            issued_by: "Issued by",
            credential: "Credential",
        }
    }
}

/// Text read by screen readers for the whole card.
///
/// Starts with `{issued_by} {issuer}, {watermark} {name} {credential}.`,
/// where the issuer part is empty without an issuer, then lists
/// `" {label}, {value}"` for every field with a label and a value.
pub fn accessibility_summary<F, P>(
    meta: Option<&MetaOverlay>,
    text: &SummaryText,
    fields: &[AttributeLike],
    parser: &AttributeParser<F, P>,
) -> String
where
    F: FormatLookup,
    P: PredicateText,
{
    let issuer = meta.and_then(|m| m.issuer.as_deref());
    let watermark = meta.and_then(|m| m.watermark.as_deref()).unwrap_or_default();
    let name = meta.and_then(|m| m.name.as_deref()).unwrap_or_default();

    let mut result = match issuer {
        Some(issuer) => format!("{} {issuer}", text.issued_by),
        None => String::new(),
    };
    result.push_str(&format!(", {watermark} {name} {}.", text.credential));

    for item in fields {
        let field = parser.parse(item);
        if !field.label.is_empty() && !field.value.is_empty() {
            result.push_str(&format!(" {}, {}", field.label, field.value));
        }
    }

    result
}

/// Label shown for an attribute: the bundle's label if any, else the start
/// case of the attribute label.
pub fn attribute_label<'a>(bundle: &'a OverlayBundle, label: &'a str) -> Cow<'a, str> {
    match bundle.label_overlay.attribute_labels.get(label) {
        Some(l) => Cow::Borrowed(l),
        None => Cow::Owned(start_case(label)),
    }
}

/// Character shown in place of a missing logo.
pub fn logo_initial(bundle: &OverlayBundle) -> String {
    let meta = bundle.meta_overlay.as_ref();
    let text = meta
        .and_then(|m| m.name.as_deref())
        .or_else(|| meta.and_then(|m| m.issuer.as_deref()))
        .unwrap_or("C");

    text.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Credential support page for `language`, else the first one available.
pub fn help_url<'a>(bundle: &'a OverlayBundle, language: &str) -> Option<&'a str> {
    let urls = &bundle.metadata.credential_support_url;
    urls.get(language)
        .or_else(|| urls.values().next())
        .map(String::as_str)
}

/// Replaces the help link of matching credentials.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HelpActionOverride {
    pub cred_def_ids: Vec<String>,
    pub schema_ids: Vec<String>,
}

impl HelpActionOverride {
    pub fn matches(&self, cred_def_id: Option<&str>, schema_id: Option<&str>) -> bool {
        cred_def_id.is_some_and(|id| self.cred_def_ids.iter().any(|i| i == id))
            || schema_id.is_some_and(|id| self.schema_ids.iter().any(|i| i == id))
    }
}

pub fn find_help_override<'a>(
    overrides: &'a [HelpActionOverride],
    cred_def_id: Option<&str>,
    schema_id: Option<&str>,
) -> Option<&'a HelpActionOverride> {
    overrides.iter().find(|o| o.matches(cred_def_id, schema_id))
}

/// Splits `s` into words and capitalizes each of them
/// (`date_of_birth` becomes `Date Of Birth`, `givenName` becomes
/// `Given Name`).
pub fn start_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut word = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
            continue;
        }

        if let Some(prev) = word.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_alphabetic() != c.is_alphabetic())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(char::is_lowercase));

            if boundary {
                words.push(std::mem::take(&mut word));
            }
        }

        word.push(c);
    }

    if !word.is_empty() {
        words.push(word);
    }

    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
