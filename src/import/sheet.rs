use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;

use crate::error::AppError;

static EMPTY_CELL: Cell = Cell::Empty;

/// A spreadsheet cell reduced to the shapes the importers care about.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    /// The cell as trimmed text; `None` when blank. Whole numbers print
    /// without a fractional part so `1999.0` reads back as `1999`.
    pub fn text(&self) -> Option<String> {
        let text = match self {
            Cell::Empty => return None,
            Cell::Text(text) => text.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(date) => date.format("%Y-%m-%d").to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(text) => Cell::Text(text.clone()),
            Data::Int(n) => Cell::Number(*n as f64),
            Data::Float(n) => Cell::Number(*n),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => Cell::Date(datetime.date()),
                None => Cell::Number(dt.as_f64()),
            },
            Data::DateTimeIso(text) => text
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .map(Cell::Date)
                .unwrap_or_else(|| Cell::Text(text.clone())),
            Data::DurationIso(text) => Cell::Text(text.clone()),
        }
    }
}

/// The first worksheet of a workbook: a header row plus data rows.
#[derive(Clone, Debug, Default)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn read(path: &Path) -> Result<Sheet, AppError> {
        let mut workbook = open_workbook_auto(path)?;
        let name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| AppError::BadRequest(format!("{} has no worksheets", path.display())))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::BadRequest(format!("{} has no worksheets", path.display())))??;

        let mut rows = range.rows();
        let headers = rows
            .next()
            .map(|row| {
                row.iter()
                    .map(|cell| Cell::from(cell).text().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();
        Ok(Sheet {
            name,
            headers,
            rows,
        })
    }

    pub fn from_rows(headers: &[&str], rows: Vec<Vec<Cell>>) -> Sheet {
        Sheet {
            name: "Sheet1".to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// Data rows, capped at `limit` when given.
    pub fn records(&self, limit: Option<usize>) -> impl Iterator<Item = Record<'_>> {
        self.rows
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .enumerate()
            .map(move |(index, cells)| Record {
                headers: &self.headers,
                cells,
                line: index + 2,
            })
    }

    pub fn data_rows(&self, limit: Option<usize>) -> usize {
        limit.map_or(self.rows.len(), |limit| limit.min(self.rows.len()))
    }
}

/// One data row, addressed by header name.
pub struct Record<'a> {
    headers: &'a [String],
    cells: &'a [Cell],
    /// 1-based line in the worksheet, counting the header.
    pub line: usize,
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> &'a Cell {
        self.headers
            .iter()
            .position(|header| header == column)
            .and_then(|index| self.cells.get(index))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).text()
    }

    pub fn first(&self) -> &'a Cell {
        self.cells.first().unwrap_or(&EMPTY_CELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_read_back_without_fraction() {
        assert_eq!(Cell::Number(1999.0).text(), Some("1999".to_string()));
        assert_eq!(Cell::Number(12.5).text(), Some("12.5".to_string()));
        assert_eq!(Cell::Text("  ".to_string()).text(), None);
    }

    #[test]
    fn records_look_up_columns_by_header() {
        let sheet = Sheet::from_rows(
            &["titolo_album", "artista_appartenenza"],
            vec![
                vec![Cell::Text(" Abbey Road ".to_string()), Cell::Text("The Beatles".to_string())],
                vec![Cell::Text("Help!".to_string())],
            ],
        );
        let records: Vec<_> = sheet.records(None).collect();
        assert_eq!(records[0].text("titolo_album"), Some("Abbey Road".to_string()));
        assert_eq!(records[1].text("artista_appartenenza"), None);
        assert_eq!(records[1].text("missing"), None);
        assert_eq!(records[1].line, 3);
        assert_eq!(sheet.records(Some(1)).count(), 1);
        assert_eq!(sheet.data_rows(Some(10)), 2);
    }
}
