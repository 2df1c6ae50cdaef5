use serde::{Deserialize, Deserializer, Serialize};

/// A user document in the users collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    /// Store-assigned document id
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    /// Natural key; unique across user records
    pub email: String,
    /// Saved movie ids in the order they were saved
    #[serde(default, deserialize_with = "null_as_empty")]
    pub saved: Vec<i64>,
}

impl UserRecord {
    pub fn has_saved(&self, movie_id: i64) -> bool {
        self.saved.contains(&movie_id)
    }
}

/// Payload for creating a user document
#[derive(Debug, Clone, Serialize)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub saved: Vec<i64>,
}

impl<'a> NewUser<'a> {
    pub fn new(name: &'a str, email: &'a str) -> Self {
        Self {
            name,
            email,
            saved: Vec::new(),
        }
    }
}

// Array attributes come back as `null` on documents written before the attribute existed.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<i64>>::deserialize(deserializer)?.unwrap_or_default())
}
