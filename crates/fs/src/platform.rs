/// Operating system family, as far as external tool invocations care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// FreeBSD, OpenBSD, NetBSD, DragonFly: BSD `stat` flags, `xdg-open`.
    Bsd,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(any(
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Platform::Bsd
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }

    /// Whether `stat` takes BSD style `-f` format flags rather than GNU `-c`.
    pub fn uses_bsd_stat(self) -> bool {
        matches!(self, Platform::MacOs | Platform::Bsd)
    }
}
