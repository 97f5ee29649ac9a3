//! Fake record builders.
//!
//! All builders draw from a caller-provided RNG, so seeding the RNG makes a
//! whole run reproducible.

use fake::Fake;
use fake::faker::address::en::{
    BuildingNumber, CityName, CountryName, Latitude, Longitude, StateName, StreetName, ZipCode,
};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;

use crate::errors::GenerateError;
use crate::records::{FakeAddress, FakeUser, Gender};

/// Kinds of records the generator knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Address,
    User,
}

impl RecordKind {
    /// Case-insensitive name lookup, mirroring what the CLI accepts.
    pub fn parse(name: &str) -> Result<Self, GenerateError> {
        match name.to_lowercase().as_str() {
            "address" => Ok(RecordKind::Address),
            "user" => Ok(RecordKind::User),
            other => Err(GenerateError::UnknownKind(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Address => "address",
            RecordKind::User => "user",
        }
    }
}

/// Build one fake user. Ids are assigned by the caller.
pub fn fake_user(id: i64, rng: &mut impl Rng) -> FakeUser {
    let gender = if rng.random_bool(0.5) {
        Gender::Female
    } else {
        Gender::Male
    };
    let first_name: String = FirstName().fake_with_rng(rng);
    let last_name: String = LastName().fake_with_rng(rng);
    let user_name: String = Username().fake_with_rng(rng);
    let avatar = format!("https://i.pravatar.cc/128?u={user_name}");
    FakeUser {
        id,
        first_name,
        last_name,
        user_name,
        email: SafeEmail().fake_with_rng(rng),
        avatar,
        gender,
    }
}

/// Build one fake address. Ids are assigned by the caller.
pub fn fake_address(id: i64, rng: &mut impl Rng) -> FakeAddress {
    let building: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    FakeAddress {
        id,
        line1: format!("{building} {street}"),
        city: CityName().fake_with_rng(rng),
        state: StateName().fake_with_rng(rng),
        zip: ZipCode().fake_with_rng(rng),
        country: CountryName().fake_with_rng(rng),
        latitude: Latitude().fake_with_rng(rng),
        longitude: Longitude().fake_with_rng(rng),
    }
}

/// Generate `count` users with sequential ids starting at 1.
pub fn generate_users(count: u64, rng: &mut impl Rng) -> Vec<FakeUser> {
    (0..count).map(|index| fake_user(index as i64 + 1, rng)).collect()
}

/// Generate `count` addresses with sequential ids starting at 1.
pub fn generate_addresses(count: u64, rng: &mut impl Rng) -> Vec<FakeAddress> {
    (0..count).map(|index| fake_address(index as i64 + 1, rng)).collect()
}
