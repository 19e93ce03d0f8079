pub mod envs;
pub mod init;
pub mod request;
pub mod scan;

pub use envs::execute_envs;
pub use init::execute_init;
pub use request::execute_request;
pub use scan::execute_scan;
