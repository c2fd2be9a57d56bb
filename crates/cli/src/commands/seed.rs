//! Seed the database with sample catalog data.
//!
//! # Usage
//!
//! ```bash
//! bn-cli seed
//! ```
//!
//! Inserts a starter set of services, add-ons and promo codes for local
//! development. Idempotent: services are keyed by name, promo codes by their
//! unique code, so re-running the command changes nothing.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use brightnest_core::DiscountType;

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Seed sample services and promo codes.
///
/// # Errors
///
/// Returns an error if the database URL is missing or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("BRIGHTNEST_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    seed_service(
        &pool,
        "Standard Clean",
        "Weekly or one-off cleaning of lived-in homes",
        Decimal::from(120),
        false,
    )
    .await?;
    seed_service(
        &pool,
        "Deep Clean",
        "Top-to-bottom clean including skirting boards and cupboards",
        Decimal::from(250),
        false,
    )
    .await?;
    seed_service(
        &pool,
        "Holiday Home Turnover",
        "Changeover clean between rental guests",
        Decimal::from(220),
        false,
    )
    .await?;
    seed_service(
        &pool,
        "Window Washing",
        "Inside and out, ground floor",
        Decimal::from(40),
        true,
    )
    .await?;
    seed_service(
        &pool,
        "Fridge & Oven",
        "Appliance degrease and descale",
        Decimal::from(60),
        true,
    )
    .await?;

    seed_promo(
        &pool,
        "WELCOME10",
        DiscountType::Percentage,
        Decimal::from(10),
        Some(Decimal::from(20)),
    )
    .await?;
    seed_promo(
        &pool,
        "SPRING50",
        DiscountType::Fixed,
        Decimal::from(50),
        None,
    )
    .await?;

    tracing::info!("Seed data in place");
    Ok(())
}

async fn seed_service(
    pool: &PgPool,
    name: &str,
    description: &str,
    base_price: Decimal,
    is_addon: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO booking.services (name, description, base_price, is_addon)
         SELECT $1, $2, $3, $4
         WHERE NOT EXISTS (SELECT 1 FROM booking.services WHERE name = $1)",
    )
    .bind(name)
    .bind(description)
    .bind(base_price)
    .bind(is_addon)
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_promo(
    pool: &PgPool,
    code: &str,
    discount_type: DiscountType,
    discount_value: Decimal,
    max_discount_amount: Option<Decimal>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO booking.promo_codes (code, discount_type, discount_value, max_discount_amount)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (code) DO NOTHING",
    )
    .bind(code)
    .bind(discount_type)
    .bind(discount_value)
    .bind(max_discount_amount)
    .execute(pool)
    .await?;

    Ok(())
}
