//! Source excerpts around a location, in the layout of Babel's code frames.
//!
//! ```text
//!   1 | import { graphql } from "gatsby"
//!   2 |
//! > 3 | export const query = graphql`${x}`
//!     |                              ^^^^
//! ```

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::data::Position;

const LINES_ABOVE: usize = 2;
const LINES_BELOW: usize = 3;

/// Marked part of one line: 1-based start column and character count.
type Marker = (usize, usize);

/// Lines to mark, keyed by 1-based line number.
fn marker_lines(lines: &[&str], start: Position, end: Position) -> Vec<(usize, Marker)> {
    let line_len = |line: usize| lines.get(line - 1).map_or(0, |l| l.chars().count());

    if start.line == end.line {
        let count = end.column.saturating_sub(start.column);
        return vec![(start.line, (start.column, count))];
    }

    (start.line..=end.line)
        .map(|line| {
            let marker = if line == start.line {
                (start.column, (line_len(line) + 1).saturating_sub(start.column))
            } else if line == end.line {
                (1, end.column.saturating_sub(1))
            } else {
                (1, line_len(line))
            };
            (line, marker)
        })
        .collect()
}

/// Render the lines around `start..end` of `text`.
///
/// `end` defaults to `start`. The optional `message` follows the carets of the
/// last marked line. With `highlight` the gutter marker and carets are colored.
pub fn code_frame(
    text: &str,
    start: Position,
    end: Option<Position>,
    message: Option<&str>,
    highlight: bool,
) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let end = end.filter(|end| end >= &start).unwrap_or(start);
    let markers = marker_lines(&lines, start, end);
    let marker_for = |line: usize| markers.iter().find(|(l, _)| *l == line).map(|(_, m)| *m);

    let first = start.line.saturating_sub(LINES_ABOVE + 1);
    let last = (end.line + LINES_BELOW).min(lines.len());
    let number_width = last.to_string().len();
    let last_marked = markers.last().map_or(0, |(line, _)| *line);

    let paint = |s: &str| -> String {
        if highlight {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    };

    let mut frame = Vec::new();
    for (index, line) in lines.iter().enumerate().take(last).skip(first) {
        let number = index + 1;
        let gutter = format!(" {number:>number_width$} |");
        let source = if line.is_empty() {
            String::new()
        } else {
            format!(" {line}")
        };

        let Some((column, count)) = marker_for(number) else {
            frame.push(format!(" {gutter}{source}"));
            continue;
        };
        frame.push(format!("{}{gutter}{source}", paint(">")));

        // Tabs are kept so the carets line up with the source line.
        let prefix: String = line
            .chars()
            .take(column.saturating_sub(1))
            .map(|c| match c {
                '\t' => "\t".to_string(),
                c => " ".repeat(UnicodeWidthStr::width(c.encode_utf8(&mut [0; 4]) as &str)),
            })
            .collect();
        let marked: String = line.chars().skip(column.saturating_sub(1)).take(count).collect();
        let carets = UnicodeWidthStr::width(marked.as_str()).max(count).max(1);

        let mut marker_row = format!(
            " {} | {}{}",
            " ".repeat(number_width + 1),
            prefix,
            paint(&"^".repeat(carets))
        );
        if number == last_marked
            && let Some(message) = message
        {
            marker_row.push(' ');
            marker_row.push_str(&paint(message));
        }
        frame.push(marker_row);
    }

    frame.join("\n")
}
