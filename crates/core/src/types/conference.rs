//! Team conference label.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Conference`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConferenceError {
    /// The input is not exactly four characters long.
    #[error("conference must be exactly {expected} characters (got {actual})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },
}

/// A four-character conference label such as `East` or `West`.
///
/// ```
/// use courtside_core::Conference;
///
/// assert!(Conference::parse("West").is_ok());
/// assert!(Conference::parse("Western").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Conference(String);

impl Conference {
    /// Required length in characters.
    pub const LENGTH: usize = 4;

    /// Parse a conference label.
    ///
    /// # Errors
    ///
    /// Returns [`ConferenceError::WrongLength`] unless the input is exactly
    /// [`Conference::LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, ConferenceError> {
        let actual = s.chars().count();
        if actual != Self::LENGTH {
            return Err(ConferenceError::WrongLength {
                expected: Self::LENGTH,
                actual,
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Conference {
    type Error = ConferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Conference> for String {
    fn from(conference: Conference) -> Self {
        conference.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Conference {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Conference {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Conference {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_east_west() {
        assert_eq!(Conference::parse("East").map(|c| c.to_string()), Ok("East".to_string()));
        assert!(Conference::parse("West").is_ok());
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            Conference::parse("Eastern"),
            Err(ConferenceError::WrongLength {
                expected: 4,
                actual: 7
            })
        );
        assert!(Conference::parse("").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Conference>("\"West\"").is_ok());
        assert!(serde_json::from_str::<Conference>("\"W\"").is_err());
    }
}
