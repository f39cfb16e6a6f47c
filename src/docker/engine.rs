use std::time::Duration;

use anyhow::{Result, bail};

use crate::config::LaunchConfig;

use super::run::{run_bounded, spawn_detached};
use super::types::LaunchPlan;

/// The operations the launcher needs from a container engine.
pub trait ContainerEngine {
    /// Version string of the engine CLI. Errors when the tool is missing
    /// or does not answer.
    fn version(&self) -> Result<String>;

    /// Whether a container whose name matches `name` is running.
    fn is_running(&self, name: &str) -> Result<bool>;

    /// Start the plan in the background without waiting for it.
    fn launch(&self, plan: &LaunchPlan) -> Result<()>;
}

/// [`ContainerEngine`] backed by the `docker` command line.
#[derive(Debug, Clone)]
pub struct DockerCli {
    bin: String,
    timeout: Duration,
}

impl DockerCli {
    pub fn new(bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &LaunchConfig) -> Self {
        Self::new(cfg.docker_bin.clone(), cfg.tool_timeout)
    }

    /// Arguments for `docker ps` restricted to IDs of containers named `name`.
    pub fn ps_args(name: &str) -> Vec<String> {
        vec![
            "ps".into(),
            "--filter".into(),
            format!("name={name}"),
            "--format".into(),
            "{{.ID}}".into(),
        ]
    }
}

impl ContainerEngine for DockerCli {
    fn version(&self) -> Result<String> {
        let out = run_bounded(&self.bin, &["--version".to_string()], self.timeout)?;
        if out.timed_out {
            bail!("`{} --version` did not answer within {:?}", self.bin, self.timeout);
        }
        if !out.success {
            bail!("`{} --version` exited with {:?}", self.bin, out.exit_code);
        }
        Ok(out.stdout.trim().to_string())
    }

    fn is_running(&self, name: &str) -> Result<bool> {
        let out = run_bounded(&self.bin, &Self::ps_args(name), self.timeout)?;
        if out.timed_out {
            bail!("`{} ps` did not answer within {:?}", self.bin, self.timeout);
        }
        if !out.success {
            bail!("`{} ps` failed: {}", self.bin, out.stderr.trim());
        }
        Ok(!out.stdout.trim().is_empty())
    }

    fn launch(&self, plan: &LaunchPlan) -> Result<()> {
        match plan {
            LaunchPlan::Compose { argv, work_dir, .. } => {
                let Some((program, rest)) = argv.split_first() else {
                    bail!("compose command cannot be blank");
                };
                let mut args = rest.to_vec();
                args.extend(["up".into(), "-d".into()]);
                spawn_detached(program, &args, Some(work_dir))
            }
            LaunchPlan::Run { args } => spawn_detached(&self.bin, args, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ps_args_filter_by_name_and_print_ids() {
        assert_eq!(
            DockerCli::ps_args("teleprompter-app"),
            vec!["ps", "--filter", "name=teleprompter-app", "--format", "{{.ID}}"]
        );
    }

    #[test]
    fn missing_binary_fails_version_check() {
        let cli = DockerCli::new("launchbox-definitely-not-docker", Duration::from_secs(1));
        assert!(cli.version().is_err());
        assert!(cli.is_running("anything").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn is_running_reads_ids_from_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake-docker");
        std::fs::write(&fake, "#!/bin/sh\necho 3f2a9c1b7d0e\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let cli = DockerCli::new(fake.to_string_lossy(), Duration::from_secs(5));
        assert!(cli.is_running("teleprompter-app").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn empty_ps_output_means_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake-docker");
        std::fs::write(&fake, "#!/bin/sh\nexit 0\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let cli = DockerCli::new(fake.to_string_lossy(), Duration::from_secs(5));
        assert!(!cli.is_running("teleprompter-app").unwrap());
    }
}
