use anyhow::Result;

use crate::docker::spawn_detached;

/// Hands a URL to whatever the desktop uses to open links.
pub trait BrowserOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    /// Program and arguments that open `url` on this platform.
    pub fn command_for(url: &str) -> (&'static str, Vec<String>) {
        if cfg!(target_os = "windows") {
            // The empty string is the window title `start` expects first.
            ("cmd", vec!["/C".into(), "start".into(), String::new(), url.into()])
        } else if cfg!(target_os = "macos") {
            ("open", vec![url.into()])
        } else {
            ("xdg-open", vec![url.into()])
        }
    }
}

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let (program, args) = Self::command_for(url);
        spawn_detached(program, &args, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ends_with_url() {
        let (_, args) = SystemBrowser::command_for("http://localhost:3000");
        assert_eq!(args.last().map(String::as_str), Some("http://localhost:3000"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_uses_xdg_open() {
        let (program, _) = SystemBrowser::command_for("http://localhost:3000");
        assert_eq!(program, "xdg-open");
    }
}
