//! Tree canvas widget.
//!
//! Draws the laid-out tree on a braille canvas: edges as lines between
//! grid slots, node labels as colored text at their slot. Grid columns map
//! to canvas x, grid rows grow downward from the top.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};

use crate::topology::Provenance;
use crate::tui::state::SceneEntry;
use crate::tui::style::{Styles, Theme};

/// Renders the scene's tree, or a placeholder when the snapshot had
/// nothing to render.
pub fn render_tree(frame: &mut Frame, area: Rect, entry: &SceneEntry) {
    let (Some(graph), Some(layout)) = (&entry.scene.graph, &entry.layout) else {
        let placeholder = Paragraph::new(format!(
            "{}: empty snapshot, nothing to render",
            entry.scene.file_name
        ))
        .style(Styles::dim())
        .alignment(Alignment::Center);
        frame.render_widget(placeholder, area);
        return;
    };

    let edge_color = match graph.provenance {
        Provenance::Exact => Theme::EDGE_EXACT,
        Provenance::Inferred => Theme::EDGE_INFERRED,
    };

    let cols = layout.cols.max(1) as f64;
    let rows = layout.rows.max(1) as f64;

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-0.5, cols - 0.5])
        .y_bounds([-(rows - 0.5), 0.5])
        .paint(|ctx| {
            for edge in &graph.edges {
                let (Some(from), Some(to)) = (layout.slot(edge.parent), layout.slot(edge.child))
                else {
                    continue;
                };
                ctx.draw(&CanvasLine {
                    x1: from.0 as f64,
                    y1: -(from.1 as f64),
                    x2: to.0 as f64,
                    y2: -(to.1 as f64),
                    color: edge_color,
                });
            }

            // Labels go on top of the edge layer.
            ctx.layer();
            for node in &graph.nodes {
                let Some((col, row)) = layout.slot(node.position) else {
                    continue;
                };
                ctx.print(
                    col as f64,
                    -(row as f64),
                    Line::styled(node.label.clone(), Styles::node(&node.color)),
                );
            }
        });

    frame.render_widget(canvas, area);
}
