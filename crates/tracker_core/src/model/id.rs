//! Opaque record identifiers.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque identifier shared by every record kind.
///
/// Fresh ids are UUID v4 strings. Ids read back from storage are kept
/// verbatim, so documents written by other clients (for example with
/// timestamp-derived ids) load without rewriting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::RecordId;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<RecordId> = (0..256).map(|_| RecordId::generate()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::from("1718000000000");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, serde_json::json!("1718000000000"));
    }
}
