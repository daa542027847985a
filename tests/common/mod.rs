#![allow(dead_code)]

mod mocks;

pub use mocks::*;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use csv_binder::item::csv::record::{ColumnBinding, CsvRecord};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price_cents: u32,
    pub available: bool,
}

impl CsvRecord for Product {}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reading(pub String, pub i32);

impl CsvRecord for Reading {
    const BINDING: ColumnBinding = ColumnBinding::ByPosition;
}

pub fn products() -> Vec<Product> {
    vec![
        Product {
            id: "P001".to_string(),
            name: "Wireless Headphones".to_string(),
            price_cents: 7999,
            available: true,
        },
        Product {
            id: "P002".to_string(),
            name: "USB-C Cable".to_string(),
            price_cents: 1299,
            available: false,
        },
        Product {
            id: "P003".to_string(),
            name: "Smart Watch".to_string(),
            price_cents: 14999,
            available: true,
        },
    ]
}

/// Number of entries left in a staging directory, zero if it was never created.
pub fn staged_file_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
