//! Help overlay.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::style::Styles;

const KEYS: &[(&str, &str)] = &[
    ("space", "pause/resume consuming snapshots"),
    ("left/right", "step through retained scenes"),
    ("end, g", "jump to newest scene and follow"),
    ("h, ?", "this help"),
    ("q, ctrl-c", "quit"),
];

/// Renders the keybinding overlay centered in `area`.
pub fn render_help(frame: &mut Frame, area: Rect) {
    let width = 48.min(area.width);
    let height = (KEYS.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = KEYS
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!(" {:<12}", key), Styles::help_key()),
                Span::styled(*desc, Styles::dim()),
            ])
        })
        .collect();

    let block = Block::default().borders(Borders::ALL).title(" keys ");
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
