//! Common serde helpers for record ids
//!
//! Record links are stored and exchanged as `"table:id"` strings, but rows
//! read back from SurrealDB carry native `RecordId` values. The helpers below
//! accept both shapes on deserialization and always serialize as strings.

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Accepts both a string `"table:id"` and a native RecordId
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string 'table:id' or RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid RecordId: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// RecordId serialization as "table:id" string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        FlexibleRecordId::deserialize(d).map(|f| f.0)
    }
}

/// Option<RecordId> serialization
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<FlexibleRecordId>::deserialize(d).map(|opt| opt.map(|f| f.0))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use surrealdb::RecordId;

    #[derive(Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "super::record_id")]
        link: RecordId,
        #[serde(default, with = "super::option_record_id")]
        maybe: Option<RecordId>,
    }

    #[test]
    fn record_id_round_trips_as_string() {
        let row = Row {
            link: RecordId::from_table_key("users", "abc"),
            maybe: None,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains(r#""link":"users:abc""#));

        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back.link.to_string(), "users:abc");
        assert!(back.maybe.is_none());
    }

    #[test]
    fn option_record_id_accepts_string() {
        let back: Row =
            serde_json::from_str(r#"{"link":"users:a","maybe":"users:b"}"#).unwrap();
        assert_eq!(back.maybe.unwrap().to_string(), "users:b");
    }
}
