pub mod config;
pub mod states;
pub mod types;

pub use config::Config;
pub use states::*;
pub use types::*;
