use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::CodecError;
use crate::userdata::UserDataState;

/// How the root state is written into its storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// Plain JSON with the `lists`/`reviews`/`achievements`/`catalog`/`companyIndex`
    /// layout. Decoding merges over the empty default key by key.
    #[default]
    Json,
    /// bitcode, base64-wrapped to fit a text slot. Compact, but tied to the
    /// exact field layout: a blob written by a different layout fails to decode
    /// and the store starts empty.
    #[cfg(feature = "binary-codec")]
    Bitcode,
}

impl Codec {
    pub fn encode(&self, state: &UserDataState) -> Result<String, CodecError> {
        match self {
            Codec::Json => Ok(serde_json::to_string(state)?),
            #[cfg(feature = "binary-codec")]
            Codec::Bitcode => {
                use base64::Engine as _;
                let bytes =
                    bitcode::serialize(state).map_err(|e| CodecError::Binary(e.to_string()))?;
                Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        }
    }

    pub fn decode(&self, raw: &str) -> Result<UserDataState, CodecError> {
        match self {
            Codec::Json => decode_json(raw),
            #[cfg(feature = "binary-codec")]
            Codec::Bitcode => {
                use base64::Engine as _;
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(raw.trim())
                    .map_err(|e| CodecError::Base64(e.to_string()))?;
                bitcode::deserialize(&bytes).map_err(|e| CodecError::Binary(e.to_string()))
            }
        }
    }
}

/// Shallow merge of a persisted object over the default state.
///
/// Missing keys keep their defaults. A key whose value no longer parses is
/// dropped on its own instead of discarding the whole blob.
fn decode_json(raw: &str) -> Result<UserDataState, CodecError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(blob) = value else {
        return Err(CodecError::Json("persisted blob is not a JSON object".into()));
    };

    let mut state = UserDataState::default();
    merge_key(&blob, "lists", &mut state.lists);
    merge_key(&blob, "reviews", &mut state.reviews);
    merge_key(&blob, "achievements", &mut state.achievements);
    merge_key(&blob, "catalog", &mut state.catalog);
    merge_key(&blob, "companyIndex", &mut state.company_index);
    Ok(state)
}

fn merge_key<T: DeserializeOwned>(blob: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = blob.get(key) else {
        return;
    };
    match T::deserialize(value) {
        Ok(parsed) => *slot = parsed,
        Err(err) => log::warn!("discarding persisted {}: {}", key, err),
    }
}
