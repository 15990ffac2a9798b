//! Plain-text rendering of the tab outline.

use crate::tab::{TabRow, TabTree};
use std::fmt::Write;

/// Render one outline row.
///
/// ```text
///   ▾ New Tab: 0
///     • New Tab: 1   (selected rows are marked with `*`)
/// ```
pub fn render_row(row: &TabRow) -> String {
    let marker = match (row.has_children, row.expanded) {
        (false, _) => '•',
        (true, true) => '▾',
        (true, false) => '▸',
    };
    let selected = if row.selected { '*' } else { ' ' };
    format!(
        "{}{}{} {}",
        selected,
        "  ".repeat(row.depth),
        marker,
        row.label
    )
}

/// Render the whole tree, followed by any tabs that cannot be mounted.
pub fn render(tree: &TabTree) -> String {
    let mut out = String::new();
    let rows = tree.visible_rows();
    if rows.is_empty() {
        out.push_str("(no tabs)\n");
    }
    for row in &rows {
        let _ = writeln!(out, "{}", render_row(row));
    }

    let detached = tree.detached();
    if !detached.is_empty() {
        let _ = writeln!(out, "detached (missing parent): {:?}", detached);
    }
    let unreachable = tree.unreachable();
    if !unreachable.is_empty() {
        let _ = writeln!(out, "unreachable (cyclic parents): {:?}", unreachable);
    }
    out
}
