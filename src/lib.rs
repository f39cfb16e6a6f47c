pub mod browser;
pub mod cli;
pub mod config;
pub mod docker;
pub mod launcher;
pub mod logging;
pub mod probe;
pub mod report;
pub mod signals;

pub use launcher::{LaunchError, Launcher, Outcome, Started};
