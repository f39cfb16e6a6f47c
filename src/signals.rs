use anyhow::Result;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;

use crate::docker::CancelToken;

/// Route SIGINT and SIGTERM into `cancel`.
///
/// The first signal only sets the flag so polling loops can unwind and say
/// goodbye. A second one while the flag is still set exits with 130.
pub fn install(cancel: &CancelToken) -> Result<()> {
    for sig in [SIGINT, SIGTERM] {
        // Order matters: the conditional shutdown must see the flag before
        // the plain registration sets it.
        flag::register_conditional_shutdown(sig, 130, cancel.flag())?;
        flag::register(sig, cancel.flag())?;
    }
    Ok(())
}
