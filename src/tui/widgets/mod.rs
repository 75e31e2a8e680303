//! TUI widgets.

mod help;
mod tree;

pub use help::render_help;
pub use tree::render_tree;
