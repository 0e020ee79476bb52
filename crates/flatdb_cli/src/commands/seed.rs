//! Seed command implementation.
//!
//! Populates a store with a handful of sample user records, handy for
//! exercising `get`/`list`/`delete` against a fresh directory.

use flatdb_core::Store;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A sample user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Contact phone number.
    pub contact: String,
    /// Employer name.
    pub company: String,
    /// Postal address.
    pub address: Address,
}

/// A sample postal address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    /// City name.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Country name.
    pub country: String,
    /// Postal code.
    pub pincode: String,
}

/// Returns the built-in sample data set.
fn sample_users() -> Vec<User> {
    let address = |city: &str, pincode: &str| Address {
        city: city.to_string(),
        state: "Karnataka".to_string(),
        country: "India".to_string(),
        pincode: pincode.to_string(),
    };

    vec![
        User {
            name: "John".to_string(),
            age: 27,
            contact: "23344333".to_string(),
            company: "Myrilla Inc".to_string(),
            address: address("Bangalore", "560102"),
        },
        User {
            name: "Paul".to_string(),
            age: 35,
            contact: "23344333".to_string(),
            company: "Dominate Inc".to_string(),
            address: address("Bangalore", "560102"),
        },
        User {
            name: "Robert".to_string(),
            age: 32,
            contact: "23344333".to_string(),
            company: "Joomla Tech".to_string(),
            address: address("Bangalore", "560102"),
        },
        User {
            name: "Vince".to_string(),
            age: 44,
            contact: "23344333".to_string(),
            company: "Dolor Inc".to_string(),
            address: address("Mysore", "570001"),
        },
        User {
            name: "Neo".to_string(),
            age: 29,
            contact: "23344333".to_string(),
            company: "Canonical Ltd".to_string(),
            address: address("Mysore", "570001"),
        },
    ]
}

/// Runs the seed command.
pub fn run(path: &Path, collection: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(path)?;

    let users = sample_users();
    for user in &users {
        let resource = user.name.to_lowercase();
        store.write(collection, &resource, user)?;
        tracing::debug!(collection, %resource, "seeded record");
    }

    println!("Seeded {} user(s) into {collection}", users.len());
    Ok(())
}
