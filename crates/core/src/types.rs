/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts (budgets) are arbitrary-precision decimals.
pub type Money = rust_decimal::Decimal;
