//! # Seed Data Generator
//!
//! Creates a demo inspector account and a handful of sample inspections for
//! local development.
//!
//! ## Usage
//! ```bash
//! # Default database and 10 inspections
//! cargo run -p inspect-db --bin seed
//!
//! # Custom amount / path
//! cargo run -p inspect-db --bin seed -- --count 25 --db ./data/inspect.db
//! ```
//!
//! ## Demo Account
//! - email: `demo@inspect.local`
//! - username: `demo`
//! - password: `inspect-demo`

use chrono::Utc;
use std::env;
use uuid::Uuid;

use inspect_core::{parse_product_code, InspectionPhotos, NewInspection, User};
use inspect_db::{hash_password, Database, DbConfig};

const DEMO_EMAIL: &str = "demo@inspect.local";
const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "inspect-demo";

/// Scan payloads the way the camera reports them.
const SAMPLE_SCANS: &[&str] = &[
    "[)>␞06␝VSBH4␝P91958CU810PD␝SHB81␝EJW124052␝T241017KKH1@OX15901W␝C020100007000000A2␝␞␄",
    "91958-PI010",
    "PY24672W",
    "91958-ABC010",
    "LOT 2024100155K7",
];

const INSPECTORS: &[&str] = &["Kim", "Lee", "Park"];

const NOTES: &[Option<&str>] = &[
    None,
    Some("Minor scratch on the back panel"),
    Some("Label slightly misaligned"),
    Some(""),
];

/// 1x1 white JPEG, enough for the photo pipeline to have something to mirror.
const TINY_JPEG: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQEASABIAAD/2wBDAP//////////////////////////////////////////////////////////////////////////////////////wgALCAABAAEBAREA/8QAFBABAAAAAAAAAAAAAAAAAAAAAP/aAAgBAQABPxA=";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 10;
    let mut db_path = String::from("./data/inspect.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Inspection Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of inspections to generate (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./data/inspect.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Inspection Seed Data Generator");
    println!("==============================");
    println!("Database:    {}", db_path);
    println!("Inspections: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let user = match db.users().get_by_email(DEMO_EMAIL).await? {
        Some(existing) => {
            println!("⚠ Demo account already exists, reusing it");
            existing
        }
        None => {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4().to_string(),
                email: DEMO_EMAIL.to_string(),
                username: DEMO_USERNAME.to_string(),
                password_hash: hash_password(DEMO_PASSWORD)?,
                name: Some("Demo Inspector".to_string()),
                created_at: now,
                updated_at: now,
            };
            db.users().insert(&user).await?;
            println!("✓ Created {} / {}", DEMO_EMAIL, DEMO_PASSWORD);
            user
        }
    };

    let existing = db.inspections().count_for_user(&user.id).await?;
    if existing > 0 {
        println!("⚠ Demo account already has {} inspections", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut generated = 0;
    for seed in 0..count {
        let raw = SAMPLE_SCANS[seed % SAMPLE_SCANS.len()];
        let Some(code) = parse_product_code(raw) else {
            eprintln!("Sample scan {:?} did not parse, skipping", raw);
            continue;
        };

        let photos = if seed % 2 == 0 {
            InspectionPhotos {
                front: Some(TINY_JPEG.to_string()),
                back: Some(TINY_JPEG.to_string()),
                ..Default::default()
            }
        } else {
            InspectionPhotos::default()
        };

        let new = NewInspection {
            product_name: code.into_string(),
            inspector: INSPECTORS[seed % INSPECTORS.len()].to_string(),
            notes: NOTES[seed % NOTES.len()].map(str::to_string),
            photos,
        };

        if let Err(e) = db.inspections().create(&user.id, &new).await {
            eprintln!("Failed to insert {}: {}", new.product_name, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!("✓ Generated {} inspections", generated);

    let history = db.inspections().list_for_user(&user.id).await?;
    if let Some(latest) = history.first() {
        println!("  Latest: {} by {}", latest.product_name, latest.inspector);
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}
