mod category;
mod insights;
mod ledger;
mod money;
mod transaction;

pub use category::*;
pub use insights::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
