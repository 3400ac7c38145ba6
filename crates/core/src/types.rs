/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Percentages and royalty values use exact decimal arithmetic.
pub type Percentage = rust_decimal::Decimal;
