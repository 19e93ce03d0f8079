mod attributes;
mod classifier;
mod routes;
mod scanner;

pub use attributes::*;
pub use classifier::*;
pub use routes::*;
pub use scanner::*;
