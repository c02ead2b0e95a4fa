//! Wire models for the forms API.
//!
//! These mirror the JSON shapes the server speaks. Identifiers are tolerated
//! as either JSON strings or numbers since the backend emits numeric ids for
//! server-created forms and string ids for client-generated fields.

use crate::state::Field;
use serde::{Deserialize, Deserializer, Serialize};

/// Server representation of one form.
///
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FormResource {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// Body of a save (PUT) request: only the durable parts of a form plus the
/// ids deleted since the last save. Never carries `value` or focus state.
///
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SaveFormBody {
    pub form: FormPayload,
    #[serde(rename = "deletedFields")]
    pub deleted_fields: Vec<String>,
}

/// The `form` half of a save request.
///
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FormPayload {
    pub name: String,
    pub fields: Vec<Field>,
}

/// Accept an id as either a JSON string or a number, normalized to `String`.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}
