use chrono::Locale;
use json_syntax::Parse;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref DEFAULT_OPTIONS: DisplayOptions = DisplayOptions::default();
}

/// Display configuration shared by a render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayOptions {
    /// POSIX locale name used for month names (e.g. `en_US`, `fr_CA`).
    pub locale: String,

    /// Language tag used to look up predicate phrases (e.g. `en`, `pt-BR`).
    pub language: String,

    /// `strftime` pattern of the long date form.
    pub long_date_format: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            locale: "en_US".to_owned(),
            language: "en".to_owned(),
            long_date_format: "%B %-d, %Y".to_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidDisplayOptions {
    #[error("invalid JSON: {0}")]
    Syntax(String),

    #[error("invalid display options: {0}")]
    Deserialization(String),
}

impl DisplayOptions {
    pub(crate) fn default_ref() -> &'static Self {
        &DEFAULT_OPTIONS
    }

    pub fn from_json_str(json: &str) -> Result<Self, InvalidDisplayOptions> {
        let (value, _) = json_syntax::Value::parse_str(json)
            .map_err(|e| InvalidDisplayOptions::Syntax(e.to_string()))?;
        json_syntax::from_value(value)
            .map_err(|e| InvalidDisplayOptions::Deserialization(e.to_string()))
    }

    /// Locale used for month names. Unknown names fall back to `en_US`.
    pub fn chrono_locale(&self) -> Locale {
        Locale::try_from(self.locale.replace('-', "_").as_str()).unwrap_or_else(|_| {
            tracing::debug!("unknown locale `{}`, using en_US", self.locale);
            Locale::en_US
        })
    }
}
