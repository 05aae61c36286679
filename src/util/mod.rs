//! Shared utilities: terminal-safe text handling and URL validation.

mod text;
mod urls;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use urls::validate_forum_url;
