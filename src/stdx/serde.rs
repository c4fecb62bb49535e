use serde::{self, Deserializer};

/// Reads an optional count that may arrive as a number, a string holding a number,
/// or `null`.
///
/// Pair with `#[serde(default)]` so a missing field is `None` as well.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;

    impl serde::de::Visitor<'_> for Visitor {
        type Value = Option<u64>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a non-negative integer, a string containing one, or null")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Option<u64>, E>
        where
            E: serde::de::Error,
        {
            Ok(Some(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Option<u64>, E>
        where
            E: serde::de::Error,
        {
            u64::try_from(v).map(Some).map_err(E::custom)
        }

        fn visit_str<E>(self, v: &str) -> Result<Option<u64>, E>
        where
            E: serde::de::Error,
        {
            v.trim().parse::<u64>().map(Some).map_err(E::custom)
        }

        fn visit_unit<E>(self) -> Result<Option<u64>, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Option<u64>, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}
