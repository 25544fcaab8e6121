pub mod render;

use clap::Subcommand;
pub use render::RenderArgs;

/// Common error type for command handlers
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the properties report for one resource.
    ///
    /// Example:
    ///   fileprops render ./Cargo.toml
    ///   fileprops render --json --view static /etc/hosts
    Render(RenderArgs),
}
