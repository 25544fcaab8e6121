use bitflags::bitflags;

bitflags! {
    /// The nine POSIX permission bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeBits: u32 {
        const USER_READ = 0o400;
        const USER_WRITE = 0o200;
        const USER_EXEC = 0o100;
        const GROUP_READ = 0o040;
        const GROUP_WRITE = 0o020;
        const GROUP_EXEC = 0o010;
        const OTHER_READ = 0o004;
        const OTHER_WRITE = 0o002;
        const OTHER_EXEC = 0o001;
    }
}

impl ModeBits {
    /// Bits the current platform can report.
    pub fn platform_supported() -> Self {
        if cfg!(unix) {
            ModeBits::all()
        } else {
            ModeBits::empty()
        }
    }
}

const LAYOUT: [(ModeBits, char); 9] = [
    (ModeBits::USER_READ, 'r'),
    (ModeBits::USER_WRITE, 'w'),
    (ModeBits::USER_EXEC, 'x'),
    (ModeBits::GROUP_READ, 'r'),
    (ModeBits::GROUP_WRITE, 'w'),
    (ModeBits::GROUP_EXEC, 'x'),
    (ModeBits::OTHER_READ, 'r'),
    (ModeBits::OTHER_WRITE, 'w'),
    (ModeBits::OTHER_EXEC, 'x'),
];

/// `rwxr-x---` style permissions. Bits the platform cannot report render as
/// `_`; with all nine supported the octal form is appended, e.g. `(750)`.
pub fn format_permissions(mode: u32, supported: ModeBits) -> String {
    let mut out: String = LAYOUT
        .iter()
        .map(|(bit, letter)| {
            if !supported.contains(*bit) {
                '_'
            } else if mode & bit.bits() != 0 {
                *letter
            } else {
                '-'
            }
        })
        .collect();

    if supported.is_all() {
        out.push_str(&format!(" ({:03o})", mode & 0o777));
    }

    out
}

#[cfg(test)]
#[path = "permissions_tests.rs"]
mod tests;
