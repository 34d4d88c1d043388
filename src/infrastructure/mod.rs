// Exchange wire formats
pub mod binance;

// Metrics and JSON snapshots
pub mod observability;

// File-based candle and sentiment sources
pub mod persistence;
