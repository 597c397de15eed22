//! Resolved overlay bundle.
//!
//! The overlay bundle resolver is an external service. This module only
//! describes the shape of what it resolves to, so that the display logic can
//! read formats, labels and branding from it.
use std::collections::HashMap;

use indexmap::IndexMap;

use json_syntax::Parse;
use serde::{Deserialize, Serialize};

use crate::{date::DateEncoding, Attribute, FormatMap};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayBundle {
    pub capture_base: CaptureBase,

    /// Attribute definitions, with their optional format.
    pub attributes: Vec<BundleAttribute>,

    pub label_overlay: LabelOverlay,

    pub branding_overlay: Option<BrandingOverlay>,

    pub meta_overlay: Option<MetaOverlay>,

    /// Attributes considered personal information.
    pub flagged_attributes: Vec<FlaggedAttribute>,

    pub metadata: Metadata,

    /// Attributes the bundle resolved for presentation.
    pub presentation_fields: Vec<Attribute>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureBase {
    /// Attribute types (e.g. `Text`, `DateInt`), by attribute name.
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleAttribute {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelOverlay {
    pub attribute_labels: HashMap<String, String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingOverlay {
    pub primary_attribute: Option<String>,
    pub secondary_attribute: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetaOverlay {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub watermark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedAttribute {
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Metadata {
    /// Credential support page, by language, in document order.
    pub credential_support_url: IndexMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidBundle {
    #[error("invalid JSON: {0}")]
    Syntax(String),

    #[error("invalid overlay bundle: {0}")]
    Deserialization(String),
}

impl OverlayBundle {
    pub fn from_json_str(json: &str) -> Result<Self, InvalidBundle> {
        let (value, _) =
            json_syntax::Value::parse_str(json).map_err(|e| InvalidBundle::Syntax(e.to_string()))?;
        json_syntax::from_value(value).map_err(|e| InvalidBundle::Deserialization(e.to_string()))
    }

    /// Format of every attribute defined by the bundle, and which of them
    /// are stored as `DateInt`.
    pub fn format_map(&self) -> FormatMap {
        let mut formats = FormatMap::new();

        for a in &self.attributes {
            formats.insert(a.name.clone(), a.format.clone());
        }

        let names = self
            .attributes
            .iter()
            .map(|a| a.name.as_str())
            .chain(self.capture_base.attributes.keys().map(String::as_str));
        for name in names {
            if self.attribute_type(name).map(DateEncoding::from_attribute_type)
                == Some(DateEncoding::DateInt)
            {
                formats.insert_date_int(name);
            }
        }

        formats
    }

    /// Type of `name`, from the capture base or else from the attribute
    /// definition.
    pub fn attribute_type(&self, name: &str) -> Option<&str> {
        self.capture_base
            .attributes
            .get(name)
            .map(String::as_str)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|a| a.name == name)
                    .and_then(|a| a.type_.as_deref())
            })
    }

    pub fn is_flagged(&self, label: &str) -> bool {
        self.flagged_attributes.iter().any(|a| a.name == label)
    }

    pub fn primary_attribute(&self) -> Option<&str> {
        self.branding_overlay
            .as_ref()
            .and_then(|b| b.primary_attribute.as_deref())
    }

    pub fn secondary_attribute(&self) -> Option<&str> {
        self.branding_overlay
            .as_ref()
            .and_then(|b| b.secondary_attribute.as_deref())
    }

    pub fn presentation_field(&self, name: &str) -> Option<&Attribute> {
        self.presentation_fields
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
    }
}
