//! Table layout: column widths and the aligned output lines.

use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::error::{TableError, TableResult};

/// A column header and its display width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub width: usize,
}

/// A fully laid out table.
///
/// Widths are fixed at construction from the headers and every row, so all
/// lines produced by [`Table::lines`] agree on cell widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Lay out a table from header names and rendered rows.
    ///
    /// Fails if a row does not have exactly one cell per header.
    pub fn build(headers: Vec<String>, rows: Vec<Vec<String>>) -> TableResult<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(TableError::CellCount {
                row: index,
                expected: headers.len(),
                found: row.len(),
            });
        }
        Ok(Self::measure(headers, rows))
    }

    /// Compute widths for rows already known to have one cell per header.
    ///
    /// Control characters are escaped so every row stays on one line.
    pub(crate) fn measure(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| {
                let name = escape_controls(name);
                Column {
                    width: name.width(),
                    name,
                }
            })
            .collect();
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(escape_controls).collect())
            .collect();

        for row in &rows {
            for (column, cell) in columns.iter_mut().zip(row) {
                column.width = column.width.max(cell.width());
            }
        }

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header, separator, then one line per row. An empty table has no lines.
    pub fn lines(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return Vec::new();
        }

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        let headers: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        lines.push(self.format_row(&headers));
        lines.push(self.format_separator());
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.format_row(&cells));
        }
        lines
    }

    fn format_row(&self, cells: &[&str]) -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&self.columns)
            .map(|(cell, column)| pad_right(cell, column.width))
            .collect();
        format!("| {} |", padded.join(" | "))
    }

    fn format_separator(&self) -> String {
        let bars: Vec<String> = self.columns.iter().map(|c| "-".repeat(c.width)).collect();
        format!("|-{}-|", bars.join("-|-"))
    }
}

impl fmt::Display for Table {
    /// Every line terminated by `\n`; nothing at all for an empty table.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// `"a\nb"` -> `"a\\nb"`; text without control characters is returned as is.
fn escape_controls(cell: String) -> String {
    if !cell.chars().any(char::is_control) {
        return cell;
    }
    cell.chars()
        .flat_map(|c| {
            let escaped: Vec<char> = if c.is_control() {
                c.escape_debug().collect()
            } else {
                vec![c]
            };
            escaped
        })
        .collect()
}

/// Pad by display width; `format!("{:<w$}")` counts chars, not columns.
fn pad_right(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.width());
    let mut out = String::with_capacity(cell.len() + fill);
    out.push_str(cell);
    out.extend(std::iter::repeat_n(' ', fill));
    out
}

/// Recover the column names from a rendered header line.
pub fn parse_header(line: &str) -> Vec<String> {
    let inner = line
        .strip_prefix("| ")
        .and_then(|l| l.strip_suffix(" |"))
        .unwrap_or(line);
    inner
        .split(" | ")
        .map(|cell| cell.trim_end().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_widths_cover_header_and_cells() {
        let table = Table::build(
            strings(&["Id", "Name", "Price"]),
            vec![strings(&["1", "A", "9.99"]), strings(&["2", "Bob", "19.5"])],
        )
        .unwrap();

        let widths: Vec<usize> = table.columns().iter().map(|c| c.width).collect();
        assert_eq!(widths, vec![2, 4, 5]);
    }

    #[test]
    fn test_lines_layout() {
        let table = Table::build(
            strings(&["Id", "Name", "Price"]),
            vec![strings(&["1", "A", "9.99"]), strings(&["2", "Bob", "19.5"])],
        )
        .unwrap();

        assert_eq!(
            table.lines(),
            strings(&[
                "| Id | Name | Price |",
                "|----|------|-------|",
                "| 1  | A    | 9.99  |",
                "| 2  | Bob  | 19.5  |",
            ])
        );
    }

    #[test]
    fn test_empty_table_has_no_lines() {
        let table = Table::build(strings(&["Id"]), Vec::new()).unwrap();
        assert!(table.lines().is_empty());
        assert_eq!(table.to_string(), "");
    }

    #[test]
    fn test_cell_count_mismatch() {
        let err = Table::build(strings(&["Id", "Name"]), vec![strings(&["1"])]).unwrap_err();
        assert_eq!(
            err,
            TableError::CellCount {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_value_wider_than_header() {
        let table = Table::build(strings(&["N"]), vec![strings(&["long value"])]).unwrap();
        assert_eq!(table.lines()[0], "| N          |");
        assert_eq!(table.lines()[1], "|------------|");
    }

    #[test]
    fn test_wide_characters_pad_by_display_width() {
        let table = Table::build(strings(&["Name"]), vec![strings(&["日本"]), strings(&["a"])])
            .unwrap();
        assert_eq!(table.columns()[0].width, 4);
        assert_eq!(table.lines()[2], "| 日本 |");
        assert_eq!(table.lines()[3], "| a    |");
    }

    #[test]
    fn test_control_characters_stay_on_one_line() {
        let table = Table::build(
            strings(&["Name"]),
            vec![strings(&["a\nb"]), strings(&["tab\there \"q\""])],
        )
        .unwrap();

        assert_eq!(table.rows()[0][0], "a\\nb");
        assert_eq!(table.rows()[1][0], "tab\\there \"q\"");
        assert_eq!(table.to_string().lines().count(), 4);
        assert_eq!(table.lines()[2], "| a\\nb          |");
    }

    #[test]
    fn test_display_terminates_each_line() {
        let table = Table::build(strings(&["Id"]), vec![strings(&["7"])]).unwrap();
        assert_eq!(table.to_string(), "| Id |\n|----|\n| 7  |\n");
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("| Id | Name | Price |"),
            strings(&["Id", "Name", "Price"])
        );
        assert_eq!(parse_header("| A  | Bb |"), strings(&["A", "Bb"]));
    }
}
