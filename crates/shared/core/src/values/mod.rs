use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
/// Venues quote in whole ticks (e.g. cents); midpoints are rounded to a tick
pub type Price = Decimal;

/// Quantity value - whole shares
///
/// Holdings and order sizes are integral, so the type enforces it.
pub type Quantity = i64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier for a tradeable instrument
pub type Symbol = String;
