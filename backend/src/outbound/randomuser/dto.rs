//! DTOs for decoding random-user generator responses.
//!
//! The adapter decodes into these transport DTOs first, then flattens the
//! nested name, location, and login blocks into [`UserRecord`] in one pass.
//! Missing nested values decode as empty strings.

use serde::Deserialize;

use crate::domain::{RecordBatch, UserRecord, UserRecordFields};

#[derive(Debug, Deserialize)]
pub(super) struct RandomUserResponseDto {
    pub(super) results: Vec<RandomUserDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RandomUserDto {
    pub(super) gender: String,
    pub(super) name: NameDto,
    pub(super) email: String,
    pub(super) location: LocationDto,
    pub(super) login: LoginDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct NameDto {
    pub(super) first: String,
    pub(super) last: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LocationDto {
    pub(super) city: String,
    pub(super) country: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct LoginDto {
    pub(super) uuid: String,
}

impl RandomUserResponseDto {
    pub(super) fn into_batch(self) -> RecordBatch {
        self.results
            .into_iter()
            .map(RandomUserDto::into_record)
            .collect()
    }
}

impl RandomUserDto {
    fn into_record(self) -> UserRecord {
        UserRecord::new(UserRecordFields {
            gender: self.gender,
            first_name: self.name.first,
            last_name: self.name.last,
            email: self.email,
            city: self.location.city,
            country: self.location.country,
            uuid: self.login.uuid,
        })
    }
}
