//! # Seed Data Loader
//!
//! Populates the database with a demo sponsor roster and a few kids.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by DATABASE_PATH (default ./zim.db)
//! cargo run -p zim-db --bin seed
//!
//! # Specify database path
//! cargo run -p zim-db --bin seed -- --db ./data/zim.db
//! ```
//!
//! ## Seeded Data
//! - Sponsors with fixed ids `"1"`, `"2"`, ... so re-imports line up
//! - One sponsor with an empty phone number (it happens in the real roster)
//! - Kids with generated ids, each linked to one or two sponsors
//!
//! Nothing is written when the sponsor table already has rows.

use chrono::NaiveDate;
use std::env;
use zim_core::{NewKid, NewSponsor};
use zim_db::{Database, DbConfig};

/// `(id, first name, last name, email, phone)`
const SPONSORS: &[(&str, &str, &str, &str, &str)] = &[
    ("1", "Alex", "Rivers", "alex.rivers@example.org", "303-555-0101"),
    ("2", "Sam", "Rivers", "sam.rivers@example.org", "303-555-0102"),
    ("3", "Jordan and Casey", "Meadows", "meadows.family@example.org", "303-555-0103"),
    ("4", "Taylor", "Brookfield", "taylor.b@example.org", "303-555-0104"),
    ("5", "Morgan", "Ashby", "morgan.ashby@example.org", "717-555-0105"),
    ("6", "Riley", "Okafor", "riley.okafor@example.org", ""),
    ("7", "Quinn", "Harlow", "quinn.harlow@example.org", "720-555-0107"),
];

/// `(name, birthday, gender, sponsor ids)`
const KIDS: &[(&str, (i32, u32, u32), &str, &[&str])] = &[
    ("Tatenda", (2014, 6, 1), "male", &["1", "2"]),
    ("Rufaro", (2016, 2, 14), "female", &["3"]),
    ("Farai", (2012, 11, 30), "male", &["4"]),
    ("Nyasha", (2015, 9, 9), "female", &["5", "7"]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let mut db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| String::from("./zim.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Zim Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $DATABASE_PATH or ./zim.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Zim Seed Data Loader");
    println!("=======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.sponsors().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} sponsors", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Seeding sponsors...");

    let mut seeded = 0;
    for (id, first_name, last_name, email, phone) in SPONSORS {
        let sponsor = NewSponsor::new(*first_name, *last_name, *phone, *email);
        match db.sponsors().insert_with_id(id, sponsor).await {
            Ok(_) => {
                println!("  ✓ {} {}", first_name, last_name);
                seeded += 1;
            }
            Err(e) => eprintln!("  ✗ {} {}: {}", first_name, last_name, e),
        }
    }

    println!();
    println!("Seeding kids...");

    for (name, (year, month, day), gender, sponsor_ids) in KIDS {
        let mut kid = NewKid::new(*name)
            .gender(*gender)
            .sponsor_ids(sponsor_ids.iter().map(|id| id.to_string()).collect());
        if let Some(birthday) = NaiveDate::from_ymd_opt(*year, *month, *day) {
            kid = kid.birthday(birthday);
        }

        match db.kids().create(kid).await {
            Ok(created) => println!("  ✓ {} ({} sponsors)", name, created.sponsors.len()),
            Err(e) => eprintln!("  ✗ {}: {}", name, e),
        }
    }

    println!();
    println!(
        "✓ Seeded {} sponsors, {} kids, {} links",
        seeded,
        db.kids().count().await?,
        db.links().count().await?
    );

    db.close().await;
    Ok(())
}
