pub mod config;
pub mod handlers;
pub mod router;
pub mod server;
pub mod types;

pub use router::build_router;
