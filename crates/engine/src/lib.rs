mod assets;
mod cells;
mod config;
mod env;
mod error;
mod factory;
mod format;
mod kind;
pub mod markup;
mod media_info;
mod mime;
mod pending;
mod row;
mod session;
mod view;

#[cfg(test)]
mod testing;

pub use assets::{Assets, Icons};
pub use config::{ConfigSnapshot, SizeMode, ZebraStripes};
pub use env::{Clock, RenderEnv, SystemClock};
pub use error::RenderError;
pub use factory::{RowDefinition, RowFactory};
pub use format::*;
pub use kind::RowKind;
pub use markup::{Markup, ToMarkup, escape};
pub use media_info::{media_info_rows, rows_from_tree};
pub use mime::media_type;
pub use pending::{ERROR_MARKER, PLACEHOLDER, PendingRowUpdate, PendingValue};
pub use row::{PropertyRow, Row};
pub use session::{RenderSession, SessionEvent, SessionState, Surface, Trigger};
pub use view::{
    NO_SUBJECT_MESSAGE, RENDER_FAILED_MESSAGE, RenderRequest, ViewContent, assemble,
    message_document, patch_row,
};
