//! Demo catalog seeding.
//!
//! Loads a small clothing catalog through the repositories, so seeded data
//! goes through the same validation as the admin API. Safe to re-run: a
//! product whose name already exists in the store is skipped.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::SecretString;

use sugarloaf_commerce::db::{ProductRepository, VariantRepository};
use sugarloaf_commerce::models::{CreateProductInput, CreateVariantInput, ProductFilter};
use sugarloaf_commerce::store::{PgStore, create_pool};
use sugarloaf_core::ProductStatus;

use super::CliError;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    inventory_count: i64,
    track_variants: bool,
    colors: &'static [&'static str],
    sizes: &'static [&'static str],
}

fn catalog() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Linen Shirt",
            description: "Breathable linen, relaxed cut.",
            price: Decimal::new(3500, 2),
            inventory_count: 0,
            track_variants: true,
            colors: &["white", "navy", "olive"],
            sizes: &["S", "M", "L", "XL"],
        },
        SeedProduct {
            name: "Canvas Tote",
            description: "Heavy canvas, flat bottom.",
            price: Decimal::new(1999, 2),
            inventory_count: 40,
            track_variants: false,
            colors: &[],
            sizes: &[],
        },
        SeedProduct {
            name: "Wool Beanie",
            description: "Merino wool, one size.",
            price: Decimal::new(1200, 2),
            inventory_count: 25,
            track_variants: false,
            colors: &[],
            sizes: &[],
        },
    ]
}

/// Seed the demo catalog.
///
/// # Errors
///
/// Returns `CliError` if the connection fails or a write is rejected.
pub async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = std::env::var("DATABASE_URL")
        .map_err(|_| CliError::MissingEnvVar("DATABASE_URL"))?
        .into();

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let store = Arc::new(PgStore::new(pool));
    let products = ProductRepository::new(store.clone());
    let variants = VariantRepository::new(store);

    let existing = products
        .list(&ProductFilter {
            status: None,
            limit: Some(100),
            offset: None,
        })
        .await?;

    let mut created = 0;
    for seed in catalog() {
        if existing.iter().any(|product| product.name == seed.name) {
            tracing::info!(name = seed.name, "Already seeded, skipping");
            continue;
        }

        let product = products
            .create(CreateProductInput {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                price: seed.price,
                inventory_count: seed.inventory_count,
                track_variants: seed.track_variants,
                colors: seed.colors.iter().map(ToString::to_string).collect(),
                sizes: seed.sizes.iter().map(ToString::to_string).collect(),
                low_stock_threshold: 5,
                status: ProductStatus::Active,
            })
            .await?;
        created += 1;

        if seed.track_variants {
            for color in seed.colors {
                for size in seed.sizes {
                    variants
                        .create(
                            &product,
                            CreateVariantInput {
                                color: (*color).to_string(),
                                size: (*size).to_string(),
                                inventory_count: 10,
                                low_stock_threshold: 3,
                                is_active: true,
                            },
                        )
                        .await?;
                }
            }
        }
        tracing::info!(name = seed.name, product_id = %product.id, "Seeded product");
    }

    tracing::info!(created, "Seeding complete");
    Ok(())
}
