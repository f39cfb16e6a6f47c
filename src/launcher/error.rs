use std::time::Duration;

use thiserror::Error;

pub const DOCKER_DOWNLOAD_URL: &str = "https://www.docker.com/products/docker-desktop";

/// Why a launch stopped early.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("`{tool}` is not installed or not on PATH ({reason})")]
    ToolMissing { tool: String, reason: String },

    #[error("failed to start container: {0}")]
    StartFailed(String),

    #[error("timed out after {waited:?} waiting for the app on port {port}")]
    ReadinessTimeout { port: u16, waited: Duration },

    #[error("cancelled by user")]
    Cancelled,
}

impl LaunchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LaunchError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = LaunchError::ToolMissing {
            tool: "docker".into(),
            reason: "No such file or directory".into(),
        };
        assert!(err.to_string().contains("`docker` is not installed"));

        let err = LaunchError::ReadinessTimeout {
            port: 3000,
            waited: Duration::from_secs(30),
        };
        assert!(err.to_string().contains("port 3000"));
    }

    #[test]
    fn only_cancellation_is_cancelled() {
        assert!(LaunchError::Cancelled.is_cancelled());
        assert!(!LaunchError::StartFailed("boom".into()).is_cancelled());
    }
}
