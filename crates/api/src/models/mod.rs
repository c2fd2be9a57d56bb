//! Row types and insert payloads for the booking schema.
//!
//! One file per entity. Row structs derive `sqlx::FromRow` and map 1:1 to
//! the tables created by `crates/api/migrations/`; the `New*` structs are
//! the insert payloads the store accepts.

pub mod booking;
pub mod customer;
pub mod enquiry;
pub mod promo_code;
pub mod service;

pub use booking::{Booking, NewBooking};
pub use customer::{Customer, NewCustomer};
pub use enquiry::{Enquiry, NewEnquiry};
pub use promo_code::PromoCode;
pub use service::Service;
