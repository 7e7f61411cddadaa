//! Primitive type aliases shared by every storefront crate.

/// Primary keys are PostgreSQL BIGSERIAL (the in-memory store mirrors this).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Tempo of a beat in beats per minute.
pub type Bpm = i32;

/// Listing price in major currency units (e.g. dollars).
pub type Price = f64;

/// Entity name used in not-found errors for track listings.
pub const ENTITY_BEAT: &str = "Beat";

/// Entity name used in not-found errors for accounts.
pub const ENTITY_ACCOUNT: &str = "Account";
