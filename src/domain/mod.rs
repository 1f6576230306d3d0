pub mod date;
mod form;
mod ledger;
mod money;
mod transaction;

pub use form::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
