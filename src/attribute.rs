//! Credential attributes and proof-request predicates, and their conversion
//! into display-ready label/value pairs.
use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    date::{format_date, DateEncoding},
    predicate::{PredicateDisplay, PredicateText},
    DisplayOptions,
};

/// Raw attribute value, as stored in a credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => i.fmt(f),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            Self::Float(x) => x.fmt(f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Disclosed credential attribute.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub value: Option<AttributeValue>,

    /// Date pattern attached to the attribute itself, used when the overlay
    /// bundle does not provide one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Capture base type (e.g. `Text`, `DateInt`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// The credential holding this attribute is missing from the wallet.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_error: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Predicate comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PredicateType {
    #[serde(rename = ">=")]
    GreaterThanOrEqual,

    #[serde(rename = ">")]
    GreaterThan,

    #[serde(rename = "<=")]
    LessThanOrEqual,

    #[serde(rename = "<")]
    LessThan,
}

impl PredicateType {
    pub const LIST: [Self; 4] = [
        Self::GreaterThanOrEqual,
        Self::GreaterThan,
        Self::LessThanOrEqual,
        Self::LessThan,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::GreaterThanOrEqual => ">=",
            Self::GreaterThan => ">",
            Self::LessThanOrEqual => "<=",
            Self::LessThan => "<",
        }
    }
}

impl fmt::Display for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown predicate type `{0}`")]
pub struct UnknownPredicateType(pub String);

impl FromStr for PredicateType {
    type Err = UnknownPredicateType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LIST
            .into_iter()
            .find(|p| p.symbol() == s)
            .ok_or_else(|| UnknownPredicateType(s.to_owned()))
    }
}

/// Proof-request predicate (e.g. `age >= 18`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub p_type: PredicateType,

    pub p_value: AttributeValue,

    /// Whether the wallet credential satisfies the predicate. `None` when
    /// unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfied: Option<bool>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_error: bool,
}

impl Predicate {
    pub fn new(
        name: impl Into<String>,
        p_type: PredicateType,
        p_value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            label: None,
            p_type,
            p_value: p_value.into(),
            satisfied: None,
            has_error: false,
        }
    }
}

/// Item displayed on a credential card.
///
/// Predicates are listed first so that deserialization only picks them when
/// both `pType` and `pValue` are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeLike {
    Predicate(Predicate),
    Attribute(Attribute),
}

impl AttributeLike {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Attribute(a) => a.name.as_deref(),
            Self::Predicate(p) => p.name.as_deref(),
        }
    }

    /// Display label: the explicit label, else the name, else empty.
    pub fn label(&self) -> &str {
        let (label, name) = match self {
            Self::Attribute(a) => (&a.label, &a.name),
            Self::Predicate(p) => (&p.label, &p.name),
        };

        label.as_deref().or(name.as_deref()).unwrap_or_default()
    }

    pub fn has_error(&self) -> bool {
        match self {
            Self::Attribute(a) => a.has_error,
            Self::Predicate(p) => p.has_error,
        }
    }

    pub fn is_predicate(&self) -> bool {
        matches!(self, Self::Predicate(_))
    }

    pub fn satisfied(&self) -> Option<bool> {
        match self {
            Self::Attribute(_) => None,
            Self::Predicate(p) => p.satisfied,
        }
    }
}

impl From<Attribute> for AttributeLike {
    fn from(value: Attribute) -> Self {
        Self::Attribute(value)
    }
}

impl From<Predicate> for AttributeLike {
    fn from(value: Predicate) -> Self {
        Self::Predicate(value)
    }
}

/// Display-ready label/value pair.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayField {
    pub label: String,
    pub value: String,
}

/// Attribute format lookup.
pub trait FormatLookup {
    fn format_for(&self, name: &str) -> Option<&str>;

    fn date_encoding(&self, _name: &str) -> DateEncoding {
        DateEncoding::Pattern
    }
}

impl FormatLookup for () {
    fn format_for(&self, _name: &str) -> Option<&str> {
        None
    }
}

impl<T: ?Sized + FormatLookup> FormatLookup for &T {
    fn format_for(&self, name: &str) -> Option<&str> {
        T::format_for(*self, name)
    }

    fn date_encoding(&self, name: &str) -> DateEncoding {
        T::date_encoding(*self, name)
    }
}

/// Mapping from attribute name to format pattern, as supplied by an overlay
/// bundle, along with the attributes stored as `DateInt`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormatMap {
    formats: HashMap<String, Option<String>>,
    date_ints: HashSet<String>,
}

impl FormatMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, format: Option<String>) {
        self.formats.insert(name.into(), format);
    }

    /// Marks `name` as a `DateInt` attribute.
    pub fn insert_date_int(&mut self, name: impl Into<String>) {
        self.date_ints.insert(name.into());
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl FormatLookup for FormatMap {
    fn format_for(&self, name: &str) -> Option<&str> {
        self.formats.get(name).and_then(Option::as_deref)
    }

    fn date_encoding(&self, name: &str) -> DateEncoding {
        if self.date_ints.contains(name) {
            DateEncoding::DateInt
        } else {
            DateEncoding::Pattern
        }
    }
}

impl<N: Into<String>> FromIterator<(N, Option<String>)> for FormatMap {
    fn from_iter<T: IntoIterator<Item = (N, Option<String>)>>(iter: T) -> Self {
        Self {
            formats: iter.into_iter().map(|(n, f)| (n.into(), f)).collect(),
            date_ints: HashSet::new(),
        }
    }
}

/// Converts attributes and predicates into [`DisplayField`]s.
///
/// Holds the format lookup and predicate conversion resolved for one render
/// pass.
pub struct AttributeParser<'a, F, P> {
    formats: F,
    predicate_text: P,
    options: &'a DisplayOptions,
}

impl<F: FormatLookup, P: PredicateText> AttributeParser<'static, F, P> {
    pub fn new(formats: F, predicate_text: P) -> Self {
        Self {
            formats,
            predicate_text,
            options: DisplayOptions::default_ref(),
        }
    }
}

impl<'a, F: FormatLookup, P: PredicateText> AttributeParser<'a, F, P> {
    pub fn with_options(formats: F, predicate_text: P, options: &'a DisplayOptions) -> Self {
        Self {
            formats,
            predicate_text,
            options,
        }
    }

    pub fn parse(&self, item: &AttributeLike) -> DisplayField {
        let label = item.label().to_owned();
        let name = item.name();
        let format = name.and_then(|name| self.formats.format_for(name));
        let bundle_encoding = name
            .map(|name| self.formats.date_encoding(name))
            .unwrap_or_default();

        let value = match item {
            AttributeLike::Attribute(attribute) => match &attribute.value {
                Some(value) => {
                    let encoding = match attribute.type_.as_deref() {
                        Some(type_) => DateEncoding::from_attribute_type(type_),
                        None => bundle_encoding,
                    };

                    // The attribute's own format applies when the bundle's
                    // does not yield a date.
                    format_date(format, value, encoding, self.options)
                        .or_else(|| {
                            format_date(attribute.format.as_deref(), value, encoding, self.options)
                        })
                        .unwrap_or_else(|| value.to_string())
                }
                None => String::new(),
            },
            AttributeLike::Predicate(predicate) => {
                let PredicateDisplay { p_type, value } = self.predicate_text.to_text(predicate);
                let value = format_date(format, &value, bundle_encoding, self.options)
                    .unwrap_or_else(|| value.to_string());
                format!("{p_type} {value}")
            }
        };

        DisplayField { label, value }
    }
}

/// Converts an attribute or predicate into a display-ready label/value pair.
pub fn parse(
    item: &AttributeLike,
    formats: impl FormatLookup,
    predicate_text: impl PredicateText,
) -> DisplayField {
    AttributeParser::new(formats, predicate_text).parse(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{LocalizedPredicateText, SymbolicPredicateText};

    fn formats() -> FormatMap {
        [
            ("birthdate", Some("YYYYMMDD".to_owned())),
            ("given_name", None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn predicate_value_has_operator_and_operand() {
        let item = Predicate::new("age", PredicateType::GreaterThanOrEqual, 18).into();
        let field = parse(&item, (), SymbolicPredicateText);
        assert_eq!(field.value, ">= 18");
        assert_eq!(field.label, "age");
    }

    #[test]
    fn predicate_operand_is_date_formatted() {
        let item = Predicate::new("birthdate", PredicateType::LessThanOrEqual, 20020523).into();
        let field = parse(&item, formats(), SymbolicPredicateText);
        assert_eq!(field.value, "<= May 23, 2002");
    }

    #[test]
    fn predicate_with_localized_operator() {
        let item = Predicate::new("age", PredicateType::GreaterThan, 17).into();
        let field = parse(&item, (), LocalizedPredicateText::new("en"));
        assert_eq!(field.value, "greater than 17");
    }

    #[test]
    fn attribute_date_is_formatted() {
        let item = Attribute::new("birthdate", "20020523").into();
        let field = parse(&item, formats(), SymbolicPredicateText);
        assert_eq!(field.value, "May 23, 2002");
    }

    #[test]
    fn attribute_own_format_is_fallback() {
        let mut attribute = Attribute::new("expiry", 20301231);
        attribute.format = Some("YYYYMMDD".to_owned());
        let field = parse(&attribute.into(), formats(), SymbolicPredicateText);
        assert_eq!(field.value, "December 31, 2030");
    }

    #[test]
    fn attribute_own_format_applies_when_bundle_format_does_not_match() {
        let mut formats = FormatMap::new();
        formats.insert("expiry", Some("YYYY-MM-DD".to_owned()));

        let mut attribute = Attribute::new("expiry", "20301231");
        attribute.format = Some("YYYYMMDD".to_owned());

        let field = parse(&attribute.into(), formats, SymbolicPredicateText);
        assert_eq!(field.value, "December 31, 2030");
    }

    #[test]
    fn date_int_attribute_is_shown_in_its_format() {
        let attribute = Attribute {
            name: Some("Test".to_owned()),
            value: Some("20000101".into()),
            format: Some("YY-MM-DD".to_owned()),
            type_: Some("DateInt".to_owned()),
            ..Default::default()
        };
        let field = parse(&attribute.into(), (), SymbolicPredicateText);
        assert_eq!(field.value, "00-01-01");

        let attribute = Attribute {
            name: Some("Test".to_owned()),
            value: Some("invalid date".into()),
            format: Some("YYYY-MM-DD".to_owned()),
            type_: Some("DateInt".to_owned()),
            ..Default::default()
        };
        let field = parse(&attribute.into(), (), SymbolicPredicateText);
        assert_eq!(field.value, "invalid date");
    }

    #[test]
    fn bundle_date_int_applies_to_predicates() {
        let mut formats = FormatMap::new();
        formats.insert("birthdate", Some("YYYY-MM-DD".to_owned()));
        formats.insert_date_int("birthdate");

        let item = Predicate::new("birthdate", PredicateType::LessThanOrEqual, 20060101).into();
        let field = parse(&item, formats, SymbolicPredicateText);
        assert_eq!(field.value, "<= 2006-01-01");
    }

    #[test]
    fn attribute_without_format_is_passthrough() {
        let item = Attribute::new("given_name", "Alice").into();
        let field = parse(&item, formats(), SymbolicPredicateText);
        assert_eq!(field.value, "Alice");
    }

    #[test]
    fn null_value_is_empty() {
        let item = Attribute {
            name: Some("given_name".to_owned()),
            ..Default::default()
        }
        .into();
        let field = parse(&item, formats(), SymbolicPredicateText);
        assert_eq!(field.value, "");
    }

    #[test]
    fn label_fallbacks() {
        let mut attribute = Attribute::new("given_name", "Alice");
        assert_eq!(AttributeLike::from(attribute.clone()).label(), "given_name");

        attribute.label = Some("Given name".to_owned());
        assert_eq!(AttributeLike::from(attribute.clone()).label(), "Given name");

        attribute.label = None;
        attribute.name = None;
        assert_eq!(AttributeLike::from(attribute).label(), "");
    }

    #[test]
    fn float_values_render_like_integers() {
        assert_eq!(AttributeValue::Float(18.0).to_string(), "18");
        assert_eq!(AttributeValue::Float(1.5).to_string(), "1.5");
    }

    #[test]
    fn predicate_type_round_trips_through_symbol() {
        for p in PredicateType::LIST {
            assert_eq!(p.symbol().parse::<PredicateType>().unwrap(), p)
        }

        assert!("==".parse::<PredicateType>().is_err())
    }
}
