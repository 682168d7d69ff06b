pub mod format;
pub mod loan;
pub mod quote;
pub mod showroom;
