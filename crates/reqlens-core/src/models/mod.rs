pub mod document;
pub mod endpoint;
pub mod environment;
pub mod location;
pub mod parameter;
pub mod property;
pub mod request;

pub use document::*;
pub use endpoint::*;
pub use environment::*;
pub use location::*;
pub use parameter::*;
pub use property::*;
pub use request::*;
