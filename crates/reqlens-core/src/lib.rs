pub mod cache;
pub mod error;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod resolve;
pub mod synth;

pub use error::{PayloadError, ResolveError};
pub use logging::{init, init_default, init_from_args};
pub use resolve::CancelFlag;
