pub mod assist;
pub mod synthesize;
pub mod values;

pub use assist::{apply_generated_payload, payload_context, PayloadContext, PayloadGenerator};
pub use synthesize::{RequestSynthesizer, FILE_SENTINEL};
