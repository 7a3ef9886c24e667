//! Plain aligned tables for `--format table`.

const MIN_COLUMN_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render an aligned table; cells wider than their column are truncated
/// with `…`.
#[must_use]
pub fn render_entity_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = column_widths(headers, rows);
    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let cells = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let text = truncate(row.get(index).map_or("-", String::as_str), *width);
                let numeric = is_numeric(&text);
                let padded = pad(&text, *width, numeric);
                if options.color {
                    colorize(&text, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>();
        lines.push(cells.join(SEPARATOR));
    }
    lines.join("\n")
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain([header.len(), MIN_COLUMN_WIDTH])
                .max()
                .unwrap_or(MIN_COLUMN_WIDTH)
        })
        .collect()
}

/// Narrow the widest shrinkable column one character at a time.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].len().max(MIN_COLUMN_WIDTH))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '.'))
}

/// Color status-like cells; `padded` keeps its alignment.
fn colorize(text: &str, padded: String) -> String {
    let code = match text.to_ascii_lowercase().as_str() {
        "completed" | "mechanism" => "32",
        "active" | "context" | "vague" | "observable" | "reproduction" | "metric" => "33",
        "expired" | "unknown" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn long_cells_are_truncated_to_fit() {
        let rows = vec![vec!["rca-1".into(), "x".repeat(80)]];
        let table = render_entity_table(
            &["id", "problem"],
            &rows,
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        let last = table.lines().last().unwrap();
        assert!(last.chars().count() <= 40);
        assert!(last.ends_with('…'));
    }

    #[test]
    fn numbers_align_right() {
        let rows = vec![vec!["3".into()], vec!["12".into()]];
        let table = render_entity_table(&["step"], &rows, PLAIN);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "     3");
        assert_eq!(lines[3], "    12");
    }

    #[test]
    fn status_cells_are_colored_when_enabled() {
        let rows = vec![vec!["completed".into()]];
        let table = render_entity_table(
            &["status"],
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(table.contains("\u{1b}[32mcompleted"));
    }
}
