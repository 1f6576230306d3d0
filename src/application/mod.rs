// Application layer - use cases and orchestration between the
// presentation layer (commands in, notifications and views out)
// and the persistence seam.

mod command;
pub mod error;
mod service;

pub use command::*;
pub use error::*;
pub use service::*;
