pub mod json;
pub mod markdown;

pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
