//! Address book entries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of addresses a user may keep (home and work)
pub const MAX_ADDRESSES: usize = 2;

/// A postal address embedded in the user document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub house_name: String,
    pub street_name: String,
    pub city_name: String,
    pub pin_code: String,
}

/// Payload for a new address; all fields are required
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    #[serde(default)]
    pub house_name: String,
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub pin_code: String,
}

/// Partial address update; absent or empty fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressUpdate {
    pub house_name: Option<String>,
    pub street_name: Option<String>,
    pub city_name: Option<String>,
    pub pin_code: Option<String>,
}

impl AddressUpdate {
    pub fn is_empty(&self) -> bool {
        [
            &self.house_name,
            &self.street_name,
            &self.city_name,
            &self.pin_code,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(str::is_empty))
    }

    /// Apply the non-empty fields to `address`
    pub fn apply_to(&self, address: &mut Address) {
        let pairs = [
            (&self.house_name, &mut address.house_name),
            (&self.street_name, &mut address.street_name),
            (&self.city_name, &mut address.city_name),
            (&self.pin_code, &mut address.pin_code),
        ];
        for (update, current) in pairs {
            if let Some(value) = update.as_deref().filter(|v| !v.is_empty()) {
                *current = value.to_string();
            }
        }
    }
}

impl From<NewAddress> for Address {
    fn from(new: NewAddress) -> Self {
        Self {
            id: Uuid::new_v4(),
            house_name: new.house_name,
            street_name: new.street_name,
            city_name: new.city_name,
            pin_code: new.pin_code,
        }
    }
}
