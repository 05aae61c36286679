//! lurk: a terminal forum browser.
//!
//! Browses a forum index (groups of forums, nested subforums, user-pinned
//! favorites) imported from a JSON file into SQLite. The core of the crate is
//! the [`model`] module: the flat row list for the forum screen, the
//! collapse-visibility resolver, and the differ that turns each wholesale
//! recomputation into a minimal set of row operations.

pub mod app;
pub mod config;
pub mod index;
pub mod keybindings;
pub mod model;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
