use std::{collections::HashMap, fs, path::Path};

use credential_card::{AttributeLike, CredentialCandidate, OverlayBundle};
use json_syntax::Parse;
use serde::{de::DeserializeOwned, Deserialize};

pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> T {
    let content = fs::read_to_string(path).unwrap();
    let json = json_syntax::Value::parse_str(&content).unwrap().0;
    json_syntax::from_value(json).unwrap()
}

pub fn load_bundle() -> OverlayBundle {
    OverlayBundle::from_json_str(&fs::read_to_string("tests/fixtures/bundle.json").unwrap())
        .unwrap()
}

pub fn load_display_items() -> Vec<AttributeLike> {
    load("tests/fixtures/display-items.json")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialInfo {
    pub referent: String,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedCredential {
    pub credential_id: String,
    pub credential_info: CredentialInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofCredentials {
    pub requested_attributes: HashMap<String, Vec<CredentialCandidate<RetrievedCredential>>>,
}

pub fn load_proof_credentials() -> ProofCredentials {
    load("tests/fixtures/proof-credential.json")
}
