pub mod config;
pub mod documents;
pub mod error;
pub mod intent;
pub mod math;
pub mod server;
pub mod session;
pub mod skills;
pub mod types;

pub use server::run;
