mod types;

pub use types::LaunchConfig;
