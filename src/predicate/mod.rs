//! Predicate to text conversion.
use std::{collections::HashMap, io::Cursor};

use lazy_static::lazy_static;
use serde::Deserialize;

use crate::{AttributeValue, Predicate, PredicateType};

#[derive(Deserialize)]
struct PhraseRecord {
    language: String,
    operator: PredicateType,
    phrase: String,
}

lazy_static! {
    /// Operator phrases, by lowercase language tag.
    static ref PHRASES: HashMap<(String, PredicateType), String> = {
        let mut map = HashMap::new();

        let cursor = Cursor::new(include_str!("phrases.csv"));
        let mut reader = csv::Reader::from_reader(cursor);
        for record in reader.deserialize::<PhraseRecord>().flatten() {
            map.insert(
                (record.language.to_ascii_lowercase(), record.operator),
                record.phrase,
            );
        }

        map
    };
}

/// Predicate as it should be displayed: operator text and operand.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateDisplay {
    pub p_type: String,
    pub value: AttributeValue,
}

/// Converts a predicate into its displayed form.
///
/// Closures taking a [`Predicate`] and returning a [`PredicateDisplay`]
/// implement this trait.
pub trait PredicateText {
    fn to_text(&self, predicate: &Predicate) -> PredicateDisplay;
}

impl<F> PredicateText for F
where
    F: Fn(&Predicate) -> PredicateDisplay,
{
    fn to_text(&self, predicate: &Predicate) -> PredicateDisplay {
        self(predicate)
    }
}

/// Keeps the operator symbol (`>=`, `<`, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolicPredicateText;

impl PredicateText for SymbolicPredicateText {
    fn to_text(&self, predicate: &Predicate) -> PredicateDisplay {
        PredicateDisplay {
            p_type: predicate.p_type.symbol().to_owned(),
            value: predicate.p_value.clone(),
        }
    }
}

/// Replaces the operator symbol with a phrase in the given language.
///
/// Regional tags without their own phrases use the base language (`fr-CA`
/// uses `fr`). Languages without phrases keep the symbol.
#[derive(Debug, Clone)]
pub struct LocalizedPredicateText {
    language: String,
}

impl LocalizedPredicateText {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
        }
    }

    pub fn phrase(&self, p_type: PredicateType) -> Option<&'static str> {
        let phrases: &'static HashMap<(String, PredicateType), String> = &PHRASES;
        let lookup = |language: &str| phrases.get(&(language.to_owned(), p_type));

        lookup(&self.language)
            .or_else(|| {
                let (base, _) = self.language.split_once(['-', '_'])?;
                lookup(base)
            })
            .map(String::as_str)
    }
}

impl PredicateText for LocalizedPredicateText {
    fn to_text(&self, predicate: &Predicate) -> PredicateDisplay {
        let p_type = match self.phrase(predicate.p_type) {
            Some(phrase) => phrase.to_owned(),
            None => {
                tracing::debug!(
                    "no `{}` phrase for language `{}`",
                    predicate.p_type,
                    self.language
                );
                predicate.p_type.symbol().to_owned()
            }
        };

        PredicateDisplay {
            p_type,
            value: predicate.p_value.clone(),
        }
    }
}
