//! Date attributes.
//!
//! Overlay bundles attach a pattern such as `YYYYMMDD` to attributes that
//! encode a date. Values matching their pattern are shown as a long-form date,
//! anything else is shown as stored.
use std::{fmt::Write, str::FromStr};

use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;

use crate::{AttributeValue, DisplayOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Year4,
    Year2,
    Month,
    Day,
    Literal(char),
}

impl Token {
    fn len(&self) -> usize {
        match self {
            Self::Year4 => 4,
            Self::Year2 | Self::Month | Self::Day => 2,
            Self::Literal(_) => 1,
        }
    }
}

lazy_static! {
    /// Storage layout of `DateInt` attributes.
    static ref DATE_INT: DatePattern = DatePattern {
        tokens: vec![Token::Year4, Token::Month, Token::Day],
    };
}

#[derive(Debug, thiserror::Error)]
#[error("not a date pattern: `{0}`")]
pub struct InvalidDatePattern(pub String);

/// Date pattern made of `YYYY` or `YY`, `MM`, `DD` and literal characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    tokens: Vec<Token>,
}

impl DatePattern {
    /// Number of characters a value must have to match this pattern.
    pub fn len(&self) -> usize {
        self.tokens.iter().map(Token::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Reads a calendar date from `value`.
    ///
    /// Two-digit years are read as years of the 21st century.
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        if value.chars().count() != self.len() {
            return None;
        }

        let mut chars = value.chars();
        let (mut year, mut month, mut day) = (None, None, None);

        for token in &self.tokens {
            match token {
                Token::Literal(c) => {
                    if chars.next()? != *c {
                        return None;
                    }
                }
                Token::Year4 => year = Some(read_digits(&mut chars, 4)? as i32),
                Token::Year2 => year = Some(2000 + read_digits(&mut chars, 2)? as i32),
                Token::Month => month = Some(read_digits(&mut chars, 2)?),
                Token::Day => day = Some(read_digits(&mut chars, 2)?),
            }
        }

        NaiveDate::from_ymd_opt(year?, month?, day?)
    }

    /// Writes `date` following this pattern.
    pub fn render(&self, date: NaiveDate) -> String {
        let mut result = String::with_capacity(self.len());

        for token in &self.tokens {
            // Writing to a `String` cannot fail.
            let _ = match token {
                Token::Literal(c) => write!(result, "{c}"),
                Token::Year4 => write!(result, "{:04}", date.year()),
                Token::Year2 => write!(result, "{:02}", date.year().rem_euclid(100)),
                Token::Month => write!(result, "{:02}", date.month()),
                Token::Day => write!(result, "{:02}", date.day()),
            };
        }

        result
    }
}

fn read_digits(chars: &mut impl Iterator<Item = char>, n: usize) -> Option<u32> {
    let mut result = 0;
    for _ in 0..n {
        result = result * 10 + chars.next()?.to_digit(10)?;
    }

    Some(result)
}

impl FromStr for DatePattern {
    type Err = InvalidDatePattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = Vec::new();
        let mut rest = s;

        while !rest.is_empty() {
            let (token, tail) = if let Some(tail) = rest.strip_prefix("YYYY") {
                (Token::Year4, tail)
            } else if let Some(tail) = rest.strip_prefix("YY") {
                (Token::Year2, tail)
            } else if let Some(tail) = rest.strip_prefix("MM") {
                (Token::Month, tail)
            } else if let Some(tail) = rest.strip_prefix("DD") {
                (Token::Day, tail)
            } else {
                let mut chars = rest.chars();
                match chars.next() {
                    Some(c) => (Token::Literal(c), chars.as_str()),
                    None => break,
                }
            };

            tokens.push(token);
            rest = tail;
        }

        let count = |f: fn(&Token) -> bool| tokens.iter().filter(|t| f(t)).count();
        let years = count(|t| matches!(t, Token::Year4 | Token::Year2));
        let months = count(|t| matches!(t, Token::Month));
        let days = count(|t| matches!(t, Token::Day));

        if years == 1 && months == 1 && days == 1 {
            Ok(Self { tokens })
        } else {
            Err(InvalidDatePattern(s.to_owned()))
        }
    }
}

/// How a date attribute is stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateEncoding {
    /// Stored following its format pattern, shown in long form.
    #[default]
    Pattern,

    /// `DateInt` attribute: stored as a `YYYYMMDD` integer, the format pattern
    /// only describes how it is shown.
    DateInt,
}

impl DateEncoding {
    /// Encoding of attributes of the given capture base type.
    pub fn from_attribute_type(type_: &str) -> Self {
        if type_ == "DateInt" {
            Self::DateInt
        } else {
            Self::Pattern
        }
    }
}

/// Formats `value` as a long-form date if it matches `format`, using the
/// default display options.
///
/// Returns the value unchanged when there is no format or when the value does
/// not match it.
pub fn format_if_date(format: Option<&str>, value: &AttributeValue) -> String {
    format_if_date_with(format, value, DisplayOptions::default_ref())
}

/// Same as [`format_if_date`] with explicit display options.
pub fn format_if_date_with(
    format: Option<&str>,
    value: &AttributeValue,
    options: &DisplayOptions,
) -> String {
    format_date(format, value, DateEncoding::Pattern, options).unwrap_or_else(|| value.to_string())
}

/// Formats `value` as a date, or returns `None` if it is not one.
///
/// With [`DateEncoding::DateInt`] the value is read as `YYYYMMDD` and shown
/// following `format`, or in long form when `format` is `YYYYMMDD` or not a
/// date pattern.
pub fn format_date(
    format: Option<&str>,
    value: &AttributeValue,
    encoding: DateEncoding,
    options: &DisplayOptions,
) -> Option<String> {
    let format = format?;
    let raw = value.to_string();

    let pattern = format.parse::<DatePattern>();

    match encoding {
        DateEncoding::Pattern => {
            let pattern = pattern
                .map_err(|e| tracing::debug!("{e}, showing value as is"))
                .ok()?;
            match pattern.parse_date(&raw) {
                Some(date) => long_form(date, options),
                None => {
                    tracing::debug!("value `{raw}` does not match date pattern `{format}`");
                    None
                }
            }
        }
        DateEncoding::DateInt => {
            let Some(date) = DATE_INT.parse_date(&raw) else {
                tracing::debug!("value `{raw}` is not a date int");
                return None;
            };

            // A format equal to the storage layout only marks the value as a
            // date.
            match pattern {
                Ok(pattern) if pattern != *DATE_INT => Some(pattern.render(date)),
                _ => long_form(date, options),
            }
        }
    }
}

fn long_form(date: NaiveDate, options: &DisplayOptions) -> Option<String> {
    let datetime = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
    let mut result = String::new();

    // An invalid configured format fails here instead of panicking in
    // `to_string`.
    match write!(
        result,
        "{}",
        datetime.format_localized(&options.long_date_format, options.chrono_locale())
    ) {
        Ok(()) => Some(result),
        Err(_) => {
            tracing::debug!(
                "invalid long date format `{}`",
                options.long_date_format
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_format() {
        let value = AttributeValue::from("20020523");
        assert_eq!(format_if_date(None, &value), "20020523");
    }

    #[test]
    fn with_format_and_string_date() {
        let value = AttributeValue::from("20020523");
        assert_eq!(format_if_date(Some("YYYYMMDD"), &value), "May 23, 2002");
    }

    #[test]
    fn with_format_and_number_date() {
        let value = AttributeValue::Integer(20020523);
        assert_eq!(format_if_date(Some("YYYYMMDD"), &value), "May 23, 2002");
    }

    #[test]
    fn with_format_but_invalid_string_date() {
        let value = AttributeValue::from("203");
        assert_eq!(format_if_date(Some("YYYYMMDD"), &value), "203");
    }

    #[test]
    fn with_format_but_invalid_number_date() {
        let value = AttributeValue::Integer(203);
        assert_eq!(format_if_date(Some("YYYYMMDD"), &value), "203");
    }

    #[test]
    fn invalid_calendar_date() {
        let value = AttributeValue::from("20020230");
        assert_eq!(format_if_date(Some("YYYYMMDD"), &value), "20020230");
    }

    #[test]
    fn separated_patterns() {
        let value = AttributeValue::from("2000-01-01");
        assert_eq!(format_if_date(Some("YYYY-MM-DD"), &value), "January 1, 2000");

        let value = AttributeValue::from("invalid date");
        assert_eq!(format_if_date(Some("YYYY-MM-DD"), &value), "invalid date");

        let value = AttributeValue::from("00-01-01");
        assert_eq!(format_if_date(Some("YY-MM-DD"), &value), "January 1, 2000");
    }

    #[test]
    fn literal_mismatch() {
        let value = AttributeValue::from("2000/01/01");
        assert_eq!(format_if_date(Some("YYYY-MM-DD"), &value), "2000/01/01");
    }

    #[test]
    fn not_a_date_pattern() {
        assert!("HH:mm".parse::<DatePattern>().is_err());
        assert!("YYYYMM".parse::<DatePattern>().is_err());

        let value = AttributeValue::from("202001");
        assert_eq!(format_if_date(Some("YYYYMM"), &value), "202001");
    }

    #[test]
    fn pattern_length() {
        let pattern: DatePattern = "YYYY-MM-DD".parse().unwrap();
        assert_eq!(pattern.len(), 10);

        let pattern: DatePattern = "DD.MM.YY".parse().unwrap();
        assert_eq!(pattern.len(), 8);
        assert_eq!(
            pattern.parse_date("31.12.99"),
            NaiveDate::from_ymd_opt(2099, 12, 31)
        );
    }

    #[test]
    fn date_int_is_shown_in_its_format() {
        let options = DisplayOptions::default();
        let value = AttributeValue::from("20000101");

        assert_eq!(
            format_date(Some("YY-MM-DD"), &value, DateEncoding::DateInt, &options),
            Some("00-01-01".to_owned())
        );
        assert_eq!(
            format_date(Some("DD/MM/YYYY"), &20301231.into(), DateEncoding::DateInt, &options),
            Some("31/12/2030".to_owned())
        );
        // Stored value is not read against the display pattern.
        assert_eq!(
            format_date(Some("YY-MM-DD"), &value, DateEncoding::Pattern, &options),
            None
        );
    }

    #[test]
    fn date_int_in_storage_layout_uses_long_form() {
        let options = DisplayOptions::default();
        assert_eq!(
            format_date(Some("YYYYMMDD"), &20020523.into(), DateEncoding::DateInt, &options),
            Some("May 23, 2002".to_owned())
        );
    }

    #[test]
    fn invalid_date_int_is_not_a_date() {
        let options = DisplayOptions::default();
        let value = AttributeValue::from("invalid date");
        assert_eq!(
            format_date(Some("YYYY-MM-DD"), &value, DateEncoding::DateInt, &options),
            None
        );
    }

    #[test]
    fn date_int_without_date_pattern_uses_long_form() {
        let options = DisplayOptions::default();
        assert_eq!(
            format_date(Some("DateInt"), &20020523.into(), DateEncoding::DateInt, &options),
            Some("May 23, 2002".to_owned())
        );
        assert_eq!(
            format_date(None, &20020523.into(), DateEncoding::DateInt, &options),
            None
        );
    }

    #[test]
    fn localized_long_form() {
        let options = DisplayOptions {
            locale: "fr_FR".to_owned(),
            long_date_format: "%-d %B %Y".to_owned(),
            ..Default::default()
        };
        let value = AttributeValue::from("20020523");
        assert_eq!(
            format_if_date_with(Some("YYYYMMDD"), &value, &options),
            "23 mai 2002"
        );
    }

    #[test]
    fn broken_long_date_format_falls_back_to_raw() {
        let options = DisplayOptions {
            long_date_format: "%Q".to_owned(),
            ..Default::default()
        };
        let value = AttributeValue::from("20020523");
        assert_eq!(
            format_if_date_with(Some("YYYYMMDD"), &value, &options),
            "20020523"
        );
    }
}
