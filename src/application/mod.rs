// Application layer - the single-owner handle over one in-memory ledger
// plus the report shapes derived from it.

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
