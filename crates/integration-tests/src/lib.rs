//! Integration tests for Brightnest.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and apply migrations
//! cargo run -p brightnest-cli -- migrate
//! cargo run -p brightnest-cli -- seed
//!
//! # Start the API
//! cargo run -p brightnest-api
//!
//! # Run the ignored end-to-end tests
//! cargo test -p brightnest-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - Base URL of the running API (default: `http://localhost:3000`)
//! - `BRIGHTNEST_DATABASE_URL` - Connection string for direct database
//!   assertions (falls back to `DATABASE_URL`)
