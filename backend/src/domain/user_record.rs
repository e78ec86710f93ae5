//! Normalised user record served by the `/users` endpoint.
//!
//! Records are immutable once built. The serde shape is shared by the HTTP
//! response body and the on-disk snapshot, so a record survives a save/load
//! cycle field for field.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Gender category reported by the upstream generator.
///
/// Only `"male"` and `"female"` are recognised; any other value is kept
/// verbatim in [`Gender::Other`] so it can be written back unchanged.
///
/// # Examples
/// ```
/// use roster::domain::Gender;
///
/// assert_eq!(Gender::from("female"), Gender::Female);
/// assert_eq!(Gender::from("Female"), Gender::Other("Female".to_owned()));
/// assert_eq!(Gender::Male.as_str(), "male");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    /// Upstream value `"male"`.
    Male,
    /// Upstream value `"female"`.
    Female,
    /// Any other value, including an empty string.
    Other(String),
}

impl Gender {
    /// Return the wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for Gender {
    fn from(raw: &str) -> Self {
        match raw {
            "male" => Self::Male,
            "female" => Self::Female,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for Gender {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Other(raw),
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter object used to build a [`UserRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecordFields {
    pub gender: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub city: String,
    pub country: String,
    pub uuid: String,
}

/// One synthetic user.
///
/// The `uuid` is an opaque identifier copied from the upstream login block;
/// it is not validated as a UUID.
///
/// # Examples
/// ```
/// use roster::domain::{Gender, UserRecord, UserRecordFields};
///
/// let record = UserRecord::new(UserRecordFields {
///     gender: "male".into(),
///     first_name: "Ada".into(),
///     uuid: "b7a1".into(),
///     ..UserRecordFields::default()
/// });
/// assert_eq!(record.gender(), &Gender::Male);
/// assert_eq!(record.uuid(), "b7a1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    #[schema(value_type = String, example = "female")]
    gender: Gender,
    #[schema(example = "Ada")]
    first_name: String,
    #[schema(example = "Lovelace")]
    last_name: String,
    #[schema(example = "ada.lovelace@example.com")]
    email: String,
    #[schema(example = "London")]
    city: String,
    #[schema(example = "United Kingdom")]
    country: String,
    #[schema(example = "3f1c6f4e-7c53-4d3e-9a55-5d7d3f5a1e20")]
    uuid: String,
}

impl UserRecord {
    /// Build a record from its raw fields.
    pub fn new(fields: UserRecordFields) -> Self {
        let UserRecordFields {
            gender,
            first_name,
            last_name,
            email,
            city,
            country,
            uuid,
        } = fields;
        Self {
            gender: Gender::from(gender),
            first_name,
            last_name,
            email,
            city,
            country,
            uuid,
        }
    }

    pub fn gender(&self) -> &Gender {
        &self.gender
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }
}

/// Records produced by a single upstream call.
pub type RecordBatch = Vec<UserRecord>;
