use std::ffi::OsStr;

use log::info;

use crate::{
    platform::Platform,
    process::{ProcessError, ProcessRunner},
};

/// Hand `target` (a path or URL) to the desktop's default application.
pub fn open_external(
    runner: &dyn ProcessRunner,
    platform: Platform,
    target: &str,
) -> Result<(), ProcessError> {
    let target_os = OsStr::new(target);

    match platform {
        Platform::Windows => runner.run(
            "cmd",
            &[OsStr::new("/C"), OsStr::new("start"), OsStr::new(""), target_os],
            &[],
        ),
        Platform::MacOs => runner.run("open", &[target_os], &[]),
        Platform::Linux | Platform::Bsd | Platform::Other => {
            runner.run("xdg-open", &[target_os], &[])
        }
    }?;

    info!("opened {target} externally");
    Ok(())
}

#[cfg(test)]
#[path = "opener_tests.rs"]
mod tests;
