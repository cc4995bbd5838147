use ::serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::SnowflakeId;

/// IDs serialize as their native non-negative integer.
impl Serialize for SnowflakeId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_raw().serialize(s)
    }
}

/// Rejects integers with the reserved high bit set.
impl<'de> Deserialize<'de> for SnowflakeId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        Self::try_from_raw(raw).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Unsigned(raw), &"a 63-bit snowflake id")
        })
    }
}

/// Serialize a Snowflake ID as a decimal string.
///
/// JavaScript numbers lose precision above 2^53, which a 41-bit timestamp
/// reaches within days of the epoch. Use with `#[serde(with = "...")]`:
///
/// ```
/// # #[cfg(feature = "serde")] {
/// use flakeid::{SnowflakeId, as_string};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "as_string")]
///     id: SnowflakeId,
/// }
/// # }
/// ```
pub mod as_string {
    use ::serde::{Deserialize, Deserializer, Serializer, de};
    use std::borrow::Cow;

    use crate::SnowflakeId;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// # Errors
    ///
    /// Returns an error if the string is not a decimal `u64` or has the
    /// reserved bit set.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Cow::<'de, str>::deserialize(d)?;
        let raw: u64 = s.parse().map_err(de::Error::custom)?;
        SnowflakeId::try_from_raw(raw).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Str(&s), &"a 63-bit snowflake id")
        })
    }
}
