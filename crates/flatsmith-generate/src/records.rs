//! Record types and their declared field tables.

use serde::{Deserialize, Serialize};

/// Gender marker carried by fake users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

/// A generated user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub avatar: String,
    pub gender: Gender,
}

/// A generated postal address record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakeAddress {
    pub id: i64,
    pub line1: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One mutable field of a record: a name plus a copier that moves that
/// field's value from a donor into a target.
///
/// The set of fields the shuffle mutation may overwrite is declared here per
/// type, not discovered at runtime.
pub struct FieldSlot<T> {
    pub name: &'static str,
    pub copy: fn(&T, &mut T),
}

const USER_SLOTS: &[FieldSlot<FakeUser>] = &[
    FieldSlot {
        name: "first_name",
        copy: |src, dst| dst.first_name = src.first_name.clone(),
    },
    FieldSlot {
        name: "last_name",
        copy: |src, dst| dst.last_name = src.last_name.clone(),
    },
    FieldSlot {
        name: "user_name",
        copy: |src, dst| dst.user_name = src.user_name.clone(),
    },
    FieldSlot {
        name: "email",
        copy: |src, dst| dst.email = src.email.clone(),
    },
    FieldSlot {
        name: "avatar",
        copy: |src, dst| dst.avatar = src.avatar.clone(),
    },
    FieldSlot {
        name: "gender",
        copy: |src, dst| dst.gender = src.gender,
    },
];

const ADDRESS_SLOTS: &[FieldSlot<FakeAddress>] = &[
    FieldSlot {
        name: "line1",
        copy: |src, dst| dst.line1 = src.line1.clone(),
    },
    FieldSlot {
        name: "city",
        copy: |src, dst| dst.city = src.city.clone(),
    },
    FieldSlot {
        name: "state",
        copy: |src, dst| dst.state = src.state.clone(),
    },
    FieldSlot {
        name: "zip",
        copy: |src, dst| dst.zip = src.zip.clone(),
    },
    FieldSlot {
        name: "country",
        copy: |src, dst| dst.country = src.country.clone(),
    },
    FieldSlot {
        name: "latitude",
        copy: |src, dst| dst.latitude = src.latitude,
    },
    FieldSlot {
        name: "longitude",
        copy: |src, dst| dst.longitude = src.longitude,
    },
];

impl FakeUser {
    /// Fields the shuffle mutation may overwrite. `id` is excluded so record
    /// identity survives mutation.
    pub fn shuffle_slots() -> &'static [FieldSlot<FakeUser>] {
        USER_SLOTS
    }
}

impl FakeAddress {
    /// Fields the shuffle mutation may overwrite. `id` is excluded.
    pub fn shuffle_slots() -> &'static [FieldSlot<FakeAddress>] {
        ADDRESS_SLOTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_tables_exclude_id() {
        assert!(FakeUser::shuffle_slots().iter().all(|slot| slot.name != "id"));
        assert!(
            FakeAddress::shuffle_slots()
                .iter()
                .all(|slot| slot.name != "id")
        );
    }

    #[test]
    fn user_slots_cover_every_mutable_field() {
        let names: Vec<&str> = FakeUser::shuffle_slots().iter().map(|slot| slot.name).collect();
        assert_eq!(
            names,
            ["first_name", "last_name", "user_name", "email", "avatar", "gender"]
        );
    }
}
