// Container engine access — version check, process listing, detached launch.

pub mod engine;
pub mod run;
pub mod types;

pub use engine::{ContainerEngine, DockerCli};
pub use run::{run_bounded, spawn_detached};
pub use types::{CancelToken, CommandOutput, LaunchPlan};
