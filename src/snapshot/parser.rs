//! Parser for the line-oriented snapshot dump format.
//!
//! The wire format evolved through three shapes with no version marker:
//!
//! ```text
//! <position> <delta> <color>
//! <position> <delta> <lazyShift> <color>
//! <position> <delta> <color> [L<childPos>] [R<childPos>]
//! ```
//!
//! A line is classified by token count and prefix alone, in one place
//! (`classify`), so the shape branching never leaks into callers. The lazy
//! column composes with child tokens because classification keys on whether
//! the third token is numeric, not on a fixed count.

use super::{NodeColor, NodeRecord, Snapshot};

/// A line the parser skipped, with the 1-based line number and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line: usize,
    pub message: String,
}

impl LineError {
    fn new(line: usize, msg: impl Into<String>) -> Self {
        Self {
            line,
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LineError {}

/// Parses one dump file's content into a [`Snapshot`].
///
/// Malformed lines (wrong token count, non-integer numerics, duplicate or
/// unparsable child tags) are skipped and recorded in `Snapshot::skipped`;
/// parsing always continues, so a partially-written file yields whatever
/// nodes were complete. Empty and whitespace-only lines are ignored.
pub fn parse_snapshot(content: &str) -> Snapshot {
    let mut snapshot = Snapshot::default();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line, line_no) {
            Ok(node) => snapshot.nodes.push(node),
            Err(e) => snapshot.skipped.push(e),
        }
    }

    snapshot
}

fn parse_line(line: &str, line_no: usize) -> Result<NodeRecord, LineError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(LineError::new(
            line_no,
            format!("expected at least 3 tokens, got {}", tokens.len()),
        ));
    }

    let position: i64 = tokens[0]
        .parse()
        .map_err(|_| LineError::new(line_no, format!("invalid position '{}'", tokens[0])))?;
    let delta: i64 = tokens[1]
        .parse()
        .map_err(|_| LineError::new(line_no, format!("invalid delta '{}'", tokens[1])))?;

    // The third token decides the shape: numeric means the lazy-shift
    // column is present and the color follows it.
    let (lazy_shift, color_idx) = match tokens[2].parse::<i64>() {
        Ok(shift) => (Some(shift), 3),
        Err(_) => (None, 2),
    };

    let color_token = tokens
        .get(color_idx)
        .ok_or_else(|| LineError::new(line_no, "missing color token"))?;
    let color = NodeColor::from_token(color_token);

    let mut left = None;
    let mut right = None;
    for token in &tokens[color_idx + 1..] {
        if let Some(pos_str) = token.strip_prefix('L') {
            if left.is_some() {
                return Err(LineError::new(line_no, "duplicate L child token"));
            }
            left = Some(pos_str.parse::<i64>().map_err(|_| {
                LineError::new(line_no, format!("invalid left child '{}'", token))
            })?);
        } else if let Some(pos_str) = token.strip_prefix('R') {
            if right.is_some() {
                return Err(LineError::new(line_no, "duplicate R child token"));
            }
            right = Some(pos_str.parse::<i64>().map_err(|_| {
                LineError::new(line_no, format!("invalid right child '{}'", token))
            })?);
        } else {
            return Err(LineError::new(
                line_no,
                format!("unexpected trailing token '{}'", token),
            ));
        }
    }

    Ok(NodeRecord {
        position,
        delta,
        lazy_shift,
        color,
        left,
        right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_token_lines() {
        let content = "\
10 5 RED
20 -2 BLACK
30 7 BLACK
";
        let snapshot = parse_snapshot(content);
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.skipped.is_empty());

        let first = &snapshot.nodes[0];
        assert_eq!(first.position, 10);
        assert_eq!(first.delta, 5);
        assert_eq!(first.color, NodeColor::Red);
        assert_eq!(first.lazy_shift, None);
        assert_eq!(first.left, None);
        assert_eq!(first.right, None);

        assert_eq!(snapshot.nodes[1].delta, -2);
        assert_eq!(snapshot.nodes[1].color, NodeColor::Black);
    }

    #[test]
    fn test_parse_lazy_shift_variant() {
        let content = "42 -3 17 RED\n7 0 -5 BLACK\n";
        let snapshot = parse_snapshot(content);
        assert_eq!(snapshot.len(), 2);

        assert_eq!(snapshot.nodes[0].position, 42);
        assert_eq!(snapshot.nodes[0].delta, -3);
        assert_eq!(snapshot.nodes[0].lazy_shift, Some(17));
        assert_eq!(snapshot.nodes[0].color, NodeColor::Red);

        assert_eq!(snapshot.nodes[1].lazy_shift, Some(-5));
    }

    #[test]
    fn test_parse_pointer_variant() {
        let content = "\
10 5 RED L20 R30
20 -2 BLACK
30 7 BLACK
";
        let snapshot = parse_snapshot(content);
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.has_pointers());

        assert_eq!(snapshot.nodes[0].left, Some(20));
        assert_eq!(snapshot.nodes[0].right, Some(30));
        assert_eq!(snapshot.nodes[1].left, None);
        assert_eq!(snapshot.nodes[1].right, None);
    }

    #[test]
    fn test_parse_pointer_tokens_in_either_order() {
        let snapshot = parse_snapshot("10 5 RED R30 L20\n");
        assert_eq!(snapshot.nodes[0].left, Some(20));
        assert_eq!(snapshot.nodes[0].right, Some(30));
    }

    #[test]
    fn test_parse_single_child() {
        let snapshot = parse_snapshot("10 5 BLACK R30\n");
        assert_eq!(snapshot.nodes[0].left, None);
        assert_eq!(snapshot.nodes[0].right, Some(30));
    }

    #[test]
    fn test_parse_lazy_and_pointers_compose() {
        // No historical producer emitted this shape, but classification is
        // by the third token so it parses naturally.
        let snapshot = parse_snapshot("10 5 2 RED L20\n");
        assert_eq!(snapshot.nodes[0].lazy_shift, Some(2));
        assert_eq!(snapshot.nodes[0].color, NodeColor::Red);
        assert_eq!(snapshot.nodes[0].left, Some(20));
    }

    #[test]
    fn test_negative_positions_and_deltas() {
        let snapshot = parse_snapshot("-4 -100 RED\n");
        assert_eq!(snapshot.nodes[0].position, -4);
        assert_eq!(snapshot.nodes[0].delta, -100);
    }

    #[test]
    fn test_malformed_line_is_skipped_not_fatal() {
        let content = "\
10 5 RED
20 oops BLACK
30 7 BLACK
";
        let snapshot = parse_snapshot(content);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.skipped.len(), 1);
        assert_eq!(snapshot.skipped[0].line, 2);
        assert!(snapshot.skipped[0].message.contains("delta"));
    }

    #[test]
    fn test_too_few_tokens_skipped() {
        let snapshot = parse_snapshot("10 5\n");
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.skipped.len(), 1);
    }

    #[test]
    fn test_duplicate_child_tag_skipped() {
        let snapshot = parse_snapshot("10 5 RED L20 L30\n");
        assert!(snapshot.is_empty());
        assert!(snapshot.skipped[0].message.contains("duplicate L"));
    }

    #[test]
    fn test_unparsable_child_suffix_skipped() {
        let snapshot = parse_snapshot("10 5 RED Labc\n");
        assert!(snapshot.is_empty());
        assert!(snapshot.skipped[0].message.contains("left child"));
    }

    #[test]
    fn test_unrecognized_color_is_carried_through() {
        // Recoverable per the error taxonomy: rendered with a fallback
        // style, never skipped.
        let snapshot = parse_snapshot("10 5 GREEN\n");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(
            snapshot.nodes[0].color,
            NodeColor::Other("GREEN".to_string())
        );
    }

    #[test]
    fn test_color_matching_is_case_sensitive() {
        let snapshot = parse_snapshot("10 5 red\n");
        assert_eq!(snapshot.nodes[0].color, NodeColor::Other("red".to_string()));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let snapshot = parse_snapshot("\n10 5 RED\n   \n20 1 BLACK\n\n");
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.skipped.is_empty());
    }

    #[test]
    fn test_empty_content_yields_empty_snapshot() {
        let snapshot = parse_snapshot("");
        assert!(snapshot.is_empty());
        assert!(snapshot.skipped.is_empty());
    }
}
