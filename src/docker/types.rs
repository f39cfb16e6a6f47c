use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Cooperative cancellation token backed by an `AtomicBool`.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// The underlying flag, for handing to a signal handler.
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.0.clone()
    }

    /// Sleep for `duration` in short slices, returning early with `false`
    /// once the token is cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}

/// How a container gets started when it is not already running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Bring up the services in a compose file: `<argv> up -d` inside `work_dir`.
    Compose {
        argv: Vec<String>,
        file: PathBuf,
        work_dir: PathBuf,
    },
    /// A single detached `docker run`. `args` excludes the docker binary.
    Run { args: Vec<String> },
}

impl LaunchPlan {
    pub fn is_compose(&self) -> bool {
        matches!(self, LaunchPlan::Compose { .. })
    }
}

/// Outcome of a short, bounded engine invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}
