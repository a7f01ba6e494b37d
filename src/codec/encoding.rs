//! Field encodings that differ from plain serde output.

/// A list stored as one space-delimited text field, e.g. `"3 7 1"`.
pub mod space_list {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, T>(items: &Vec<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        let joined = items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let text = String::deserialize(deserializer)?;
        text.split_whitespace()
            .map(|item| {
                item.parse::<T>()
                    .map_err(|e| de::Error::custom(format!("invalid list item {item:?}: {e}")))
            })
            .collect()
    }
}

/// Match table keyed by match number.
///
/// Keys are written as canonical decimal text and must read back as the same
/// integer as the embedded `match_nb`.
pub mod match_table {
    use std::collections::BTreeMap;

    use serde::ser::SerializeMap;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::domain::Match;

    pub fn serialize<S>(matches: &BTreeMap<u32, Match>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(matches.len()))?;
        for (match_nb, pairing) in matches {
            map.serialize_entry(&match_nb.to_string(), pairing)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<u32, Match>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Match>::deserialize(deserializer)?;
        let mut matches = BTreeMap::new();
        for (key, pairing) in raw {
            let match_nb = parse_key(&key)
                .ok_or_else(|| de::Error::custom(format!("non-canonical match key {key:?}")))?;
            if match_nb != pairing.match_nb {
                return Err(de::Error::custom(format!(
                    "match key {key} holds match {}",
                    pairing.match_nb
                )));
            }
            matches.insert(match_nb, pairing);
        }
        Ok(matches)
    }

    pub(crate) fn parse_key(key: &str) -> Option<u32> {
        let digits_only = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
        let canonical = key == "0" || !key.starts_with('0');
        if digits_only && canonical {
            key.parse().ok()
        } else {
            None
        }
    }
}
