pub mod emi;
pub mod error;
pub mod presets;
pub mod time_value;
pub mod types;

#[cfg(feature = "format")]
pub mod format;

#[cfg(feature = "catalogue")]
pub mod catalogue;

pub use error::AutoFinanceError;
pub use types::*;

/// Standard result type for all auto-finance operations
pub type AutoFinanceResult<T> = Result<T, AutoFinanceError>;
