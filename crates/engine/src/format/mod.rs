mod date;
mod permissions;
mod size;

pub use date::{DEFAULT_DATE_FORMAT, format_date, relative_phrase};
pub use permissions::{ModeBits, format_permissions};
pub use size::{format_bytes, format_size, group_digits};
