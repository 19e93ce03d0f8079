pub mod csharp;
pub mod types;
