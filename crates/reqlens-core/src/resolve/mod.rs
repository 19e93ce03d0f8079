pub mod resolver;
pub mod workspace;

pub use resolver::TypeResolver;
pub use workspace::{FsWorkspace, SearchScope, WorkspaceFiles};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation handle for a resolution pass.
///
/// The editor-facing host flips it when the user moves on; the resolver
/// checks it between parameter resolutions and after every file read, so an
/// abandoned pass stops within one file's worth of work.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Re-arms the flag for the next pass
    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
