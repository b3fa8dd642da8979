//! # Seed Data Generator
//!
//! Populates an empty catalog with demo products.
//!
//! ## Generated Products
//! Deterministic data across a few wholesale categories:
//! - Hardware (fasteners, brackets, hinges)
//! - Office (paper, pens, folders)
//! - Electrical (cable, switches, sockets)
//! - Packaging (boxes, tape, wrap)
//!
//! Each product has:
//! - Unique SKU: `{CATEGORY}-{NAME3}-{INDEX}`
//! - Name with a pack size, e.g. `Wood Screws Box of 100`
//! - Price: 1.99 - 9.98 plus a pack-size addon
//! - Stock: 0 - 100

use serde::Serialize;
use tally_core::{CoreResult, Product};
use tally_db::Database;
use tracing::{info, warn};

const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "HW",
        &[
            "Wood Screws",
            "Machine Bolts",
            "Hex Nuts",
            "Flat Washers",
            "Wall Anchors",
            "Angle Brackets",
            "Butt Hinges",
            "Cabinet Handles",
            "Drawer Slides",
            "Padlock",
        ],
    ),
    (
        "OFF",
        &[
            "Copy Paper A4",
            "Ballpoint Pens",
            "Gel Pens",
            "Highlighters",
            "Lever Arch File",
            "Manila Folders",
            "Sticky Notes",
            "Stapler",
            "Staples",
            "Whiteboard Markers",
        ],
    ),
    (
        "ELC",
        &[
            "Copper Cable",
            "Light Switch",
            "Power Socket",
            "Extension Cord",
            "LED Bulb",
            "Cable Ties",
            "Junction Box",
            "Circuit Breaker",
            "Insulation Tape",
            "Plug Top",
        ],
    ),
    (
        "PKG",
        &[
            "Corrugated Box",
            "Packing Tape",
            "Bubble Wrap",
            "Stretch Film",
            "Poly Mailers",
            "Void Fill",
            "Shipping Labels",
            "Kraft Paper",
            "Strapping Band",
            "Edge Protectors",
        ],
    ),
];

/// Pack sizes and their price addon in cents.
const PACK_SIZES: &[(&str, i64)] = &[
    ("Single", 0),
    ("Pack of 5", 300),
    ("Pack of 10", 550),
    ("Box of 100", 2_500),
    ("Carton", 6_000),
];

/// What a seed run did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub existing: i64,
    pub inserted: usize,
    pub skipped: bool,
}

/// Inserts up to `count` demo products unless the catalog already has some.
pub async fn seed(db: &Database, count: usize) -> anyhow::Result<SeedReport> {
    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Catalog already has products, skipping seed");
        return Ok(SeedReport {
            existing,
            inserted: 0,
            skipped: true,
        });
    }

    let mut inserted = 0;
    for product in generate_products(count)? {
        if let Err(e) = db.products().insert(&product).await {
            warn!(sku = %product.sku, error = %e, "Failed to insert product");
            continue;
        }
        inserted += 1;
    }

    info!(inserted, "Seed complete");
    Ok(SeedReport {
        existing,
        inserted,
        skipped: false,
    })
}

/// Builds `count` products (capped at the number of distinct combinations).
pub fn generate_products(count: usize) -> CoreResult<Vec<Product>> {
    CATEGORIES
        .iter()
        .enumerate()
        .flat_map(|(category_idx, (code, names))| {
            names.iter().enumerate().flat_map(move |(name_idx, name)| {
                PACK_SIZES
                    .iter()
                    .enumerate()
                    .map(move |(size_idx, (size, addon))| {
                        let seed = category_idx * 1000 + name_idx * 20 + size_idx;
                        generate_product(code, name, size, *addon, seed)
                    })
            })
        })
        .take(count)
        .collect()
}

fn generate_product(
    category: &str,
    name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> CoreResult<Product> {
    let stem: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let sku = format!("{category}-{stem}-{seed:03}");

    let base_price = 199 + ((seed * 17) % 800) as i64;
    let stock = (seed % 101) as i64;

    Product::new(sku, format!("{name} {size}"), base_price + price_addon, stock)
}
