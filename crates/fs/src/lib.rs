mod locator;
mod opener;
mod owner;
mod platform;
mod process;
mod resolver;
mod virtual_fs;

pub use locator::{Locator, LocatorError};
pub use opener::open_external;
pub use owner::lookup_owner;
pub use platform::Platform;
pub use process::{ProcessError, ProcessRunner, SystemProcessRunner};
pub use resolver::{ResolveError, ResourceFacts, resolve};
pub use virtual_fs::{NoVirtualFs, StaticVirtualFs, VirtualFs, VirtualStat};
