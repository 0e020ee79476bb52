//! Basic flatdb example - sample users
//!
//! This example demonstrates core flatdb functionality:
//! - Opening a store
//! - Writing typed records into a collection
//! - Reading one record back, typed and untyped
//! - Listing a whole collection
//! - Deleting a record and then the collection
//!
//! Run with: cargo run -p sample_users

use flatdb_core::Store;
use serde::{Deserialize, Serialize};

/// A demo user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    name: String,
    age: u32,
    contact: String,
    company: String,
    address: Address,
}

/// A demo postal address.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Address {
    city: String,
    state: String,
    country: String,
    pincode: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    let store = Store::open("./db_demo")?;

    let bangalore = Address {
        city: "Bangalore".to_string(),
        state: "Karnataka".to_string(),
        country: "India".to_string(),
        pincode: "560102".to_string(),
    };

    let users = vec![
        User {
            name: "John".to_string(),
            age: 27,
            contact: "23344333".to_string(),
            company: "Myrilla Inc".to_string(),
            address: bangalore.clone(),
        },
        User {
            name: "Paul".to_string(),
            age: 35,
            contact: "23344333".to_string(),
            company: "Dominate Inc".to_string(),
            address: bangalore.clone(),
        },
        User {
            name: "Robert".to_string(),
            age: 32,
            contact: "23344333".to_string(),
            company: "Joomla Tech".to_string(),
            address: bangalore,
        },
    ];

    // Write each user under its lowercased name.
    for user in &users {
        store.write("users", &user.name.to_lowercase(), user)?;
    }
    println!("Wrote {} users", users.len());

    // Read one back with its concrete shape.
    let john: User = store.read("users", "john")?;
    println!("Read back: {} ({}) at {}", john.name, john.age, john.company);

    // Or shape-free, as raw JSON values.
    let everyone = store.read_all("users")?;
    println!("Collection holds {} records:", everyone.len());
    for record in &everyone {
        println!("  {}", serde_json::to_string(record)?);
    }

    // Delete one record, then the whole collection.
    store.delete("users", "paul")?;
    println!(
        "After deleting paul: {} records",
        store.read_all("users")?.len()
    );

    store.delete_collection("users")?;
    println!("Collection removed");

    Ok(())
}
