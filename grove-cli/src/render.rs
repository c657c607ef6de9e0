//! Plain-text rendering of linearized rows.

use grove::prelude::*;

/// Render rows as an indented outline with connecting lines.
pub fn outline(rows: &[LinearItem], items: &StaticItems) -> String {
    let mut out = String::new();
    // For each open ancestor level: whether it was the last of its siblings.
    let mut guides: Vec<bool> = Vec::new();
    let base = usize::from(rows.first().is_some_and(|r| r.parent.is_none()));

    for row in rows {
        let label = items
            .get(&row.item)
            .and_then(|i| i.data.as_deref())
            .unwrap_or(row.item.as_str());
        let marker = match (row.is_branch, row.is_expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            _ => "",
        };

        if row.parent.is_none() {
            out.push_str(&format!("{}{}\n", marker, label));
            continue;
        }

        let depth = row.depth.saturating_sub(base);
        guides.truncate(depth);
        for last in &guides {
            out.push_str(if *last { "   " } else { "│  " });
        }
        out.push_str(if row.is_last_child { "└─ " } else { "├─ " });
        out.push_str(&format!("{}{}\n", marker, label));
        guides.push(row.is_last_child);
    }
    out
}
