//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::snapshot::NodeColor;

/// Palette for the tree view.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_BG: Color = Color::Blue;
    pub const HEADER_FG: Color = Color::White;
    pub const WARN: Color = Color::Yellow;

    /// RED nodes.
    pub const NODE_RED: Color = Color::Red;
    /// BLACK nodes. Pure black would vanish on the default background, so
    /// they render dark gray.
    pub const NODE_BLACK: Color = Color::DarkGray;
    /// Fallback for unrecognized color tokens.
    pub const NODE_OTHER: Color = Color::Magenta;

    /// Edges transcribed from explicit pointers.
    pub const EDGE_EXACT: Color = Color::Gray;
    /// Edges imposed by the heap heuristic, dimmed to mark them as a
    /// visualization aid rather than transmitted structure.
    pub const EDGE_INFERRED: Color = Color::DarkGray;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    pub fn warning() -> Style {
        Style::default().fg(Theme::WARN)
    }

    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    /// Maps a wire color to the node label style.
    pub fn node(color: &NodeColor) -> Style {
        let fg = match color {
            NodeColor::Red => Theme::NODE_RED,
            NodeColor::Black => Theme::NODE_BLACK,
            NodeColor::Other(_) => Theme::NODE_OTHER,
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }
}
