// Candle and sentiment value types
pub mod market;

// Feature registry, feature rows and sequences
pub mod ml;

// Port interfaces
pub mod ports;

// Input integrity checks
pub mod validation;

// Domain-specific error types
pub mod errors;
