//! Frame composition: header, tree canvas, footer.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::topology::Provenance;
use crate::util::format_clock;

use super::state::AppState;
use super::style::Styles;
use super::widgets::{render_help, render_tree};

/// Renders one frame.
pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(header_line(state)).style(Styles::header()), chunks[0]);

    match state.current() {
        Some(entry) => render_tree(frame, chunks[1], entry),
        None => {
            let waiting = Paragraph::new(format!("waiting for snapshots in {} ...", state.dir_label))
                .style(Styles::dim())
                .alignment(Alignment::Center);
            frame.render_widget(waiting, chunks[1]);
        }
    }

    frame.render_widget(footer_line(), chunks[2]);

    if state.show_help {
        render_help(frame, frame.area());
    }
}

fn header_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::raw(" rbscope ")];

    if let Some(entry) = state.current() {
        let scene = &entry.scene;
        let (index, total) = state.cursor_info();
        spans.push(Span::raw(format!(
            "| {} | {} nodes | {} | {} | scene {}/{} ",
            scene.file_name,
            scene.node_count,
            provenance_label(entry),
            format_clock(scene.consumed_at),
            index,
            total,
        )));
        if scene.skipped_lines > 0 {
            spans.push(Span::styled(
                format!("| {} skipped ", scene.skipped_lines),
                Styles::warning(),
            ));
        }
        if scene.dangling > 0 {
            spans.push(Span::styled(
                format!("| {} dangling ", scene.dangling),
                Styles::warning(),
            ));
        }
    } else {
        spans.push(Span::raw(format!("| {} ", state.dir_label)));
    }

    spans.push(Span::raw(format!("| {} consumed ", state.processed_total)));
    if state.paused {
        spans.push(Span::styled("[paused] ", Styles::warning()));
    }

    Line::from(spans)
}

fn provenance_label(entry: &super::state::SceneEntry) -> &'static str {
    match entry.scene.graph.as_ref().map(|g| g.provenance) {
        Some(Provenance::Exact) => "layout: exact",
        // The heap rule is a heuristic; say so wherever the tree is shown.
        Some(Provenance::Inferred) => "layout: inferred (heap order)",
        None => "layout: -",
    }
}

fn footer_line() -> Paragraph<'static> {
    let spans = vec![
        Span::styled(" space ", Styles::help_key()),
        Span::styled("pause ", Styles::dim()),
        Span::styled(" \u{2190}/\u{2192} ", Styles::help_key()),
        Span::styled("history ", Styles::dim()),
        Span::styled(" g ", Styles::help_key()),
        Span::styled("latest ", Styles::dim()),
        Span::styled(" h ", Styles::help_key()),
        Span::styled("help ", Styles::dim()),
        Span::styled(" q ", Styles::help_key()),
        Span::styled("quit", Styles::dim()),
    ];
    Paragraph::new(Line::from(spans))
}
