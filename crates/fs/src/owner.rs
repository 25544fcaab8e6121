use std::{ffi::OsStr, path::Path, thread};

use log::debug;

use crate::{platform::Platform, process::ProcessRunner};

const TARGET_ENV: &str = "FILEPROPS_TARGET";

/// Resolve the owner of `path` for display.
///
/// Windows asks the ACL for the owning account and yields `None` when that
/// fails. POSIX systems query owner and group names in parallel and fall back
/// to the numeric `uid (gid)` pair; without ids nothing is looked up.
pub fn lookup_owner(
    runner: &dyn ProcessRunner,
    platform: Platform,
    path: &Path,
    ids: Option<(u32, u32)>,
) -> Option<String> {
    if platform.is_windows() {
        return acl_owner(runner, path);
    }

    let (uid, gid) = ids?;
    Some(posix_owner(runner, platform, path, uid, gid))
}

fn acl_owner(runner: &dyn ProcessRunner, path: &Path) -> Option<String> {
    // The path travels through the environment so it never needs quoting.
    let script = format!("(Get-Acl -LiteralPath $env:{TARGET_ENV}).Owner");
    let result = runner.run(
        "powershell",
        &[
            OsStr::new("-NoProfile"),
            OsStr::new("-NonInteractive"),
            OsStr::new("-Command"),
            OsStr::new(&script),
        ],
        &[(TARGET_ENV, path.as_os_str())],
    );

    match result {
        Ok(stdout) => non_empty(stdout),
        Err(e) => {
            debug!("ACL owner lookup for {} failed: {e}", path.display());
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NameKind {
    User,
    Group,
}

fn posix_owner(
    runner: &dyn ProcessRunner,
    platform: Platform,
    path: &Path,
    uid: u32,
    gid: u32,
) -> String {
    let (user, group) = thread::scope(|s| {
        let user = s.spawn(|| stat_name(runner, platform, path, NameKind::User));
        let group = s.spawn(|| stat_name(runner, platform, path, NameKind::Group));

        (
            user.join().ok().flatten(),
            group.join().ok().flatten(),
        )
    });

    match (user, group) {
        (Some(user), Some(group)) => format!("{user} ({group})"),
        _ => format!("{uid} ({gid})"),
    }
}

fn stat_args(platform: Platform, kind: NameKind) -> [&'static str; 2] {
    match (platform.uses_bsd_stat(), kind) {
        (true, NameKind::User) => ["-f", "%Su"],
        (true, NameKind::Group) => ["-f", "%Sg"],
        (false, NameKind::User) => ["-c", "%U"],
        (false, NameKind::Group) => ["-c", "%G"],
    }
}

fn stat_name(
    runner: &dyn ProcessRunner,
    platform: Platform,
    path: &Path,
    kind: NameKind,
) -> Option<String> {
    let [flag, format] = stat_args(platform, kind);
    let args = [OsStr::new(flag), OsStr::new(format), path.as_os_str()];

    match runner.run("stat", &args, &[("LC_ALL", OsStr::new("C"))]) {
        Ok(stdout) => non_empty(stdout),
        Err(e) => {
            debug!("stat {kind:?} lookup for {} failed: {e}", path.display());
            None
        }
    }
}

fn non_empty(stdout: String) -> Option<String> {
    let trimmed = stdout.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
