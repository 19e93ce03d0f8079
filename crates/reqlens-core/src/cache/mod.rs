pub mod store;

pub use store::{CachedResolution, ResolutionCache};
