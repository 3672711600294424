use chrono::NaiveDate;

use super::sheet::Cell;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];
const STYLE_DELIMITERS: [char; 4] = ['/', ',', ';', '|'];
const TRUE_WORDS: [&str; 6] = ["1", "true", "si", "sì", "y", "yes"];

/// Cuts `text` to at most `max` characters.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Trimmed, non-empty text of the cell cut to the column limit.
pub fn limited(cell: &Cell, max: usize) -> Option<String> {
    cell.text().map(|text| truncate(&text, max))
}

pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Number(n) if *n > 999.0 => NaiveDate::from_ymd_opt(*n as i32, 1, 1),
        Cell::Text(text) => parse_date_text(text),
        _ => None,
    }
}

/// A bare 4-digit year becomes January 1st of that year; otherwise the
/// day formats are tried in order.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.len() == 4 && text.chars().all(|c| c.is_ascii_digit()) {
        return text
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

pub fn parse_float(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(n) => *n,
        Cell::Text(text) => text.trim().replace(',', ".").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn parse_bool(cell: &Cell) -> bool {
    match cell {
        Cell::Bool(b) => *b,
        Cell::Number(n) => n.trunc() != 0.0,
        Cell::Text(text) => TRUE_WORDS.contains(&text.trim().to_lowercase().as_str()),
        _ => false,
    }
}

/// Splits on the first delimiter present, checked in the order `/ , ; |`.
pub fn parse_styles(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    match STYLE_DELIMITERS.iter().find(|d| text.contains(**d)) {
        Some(delimiter) => text
            .split(*delimiter)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        None => vec![text.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    #[test]
    fn dates_fall_back_to_year_only() {
        let date = NaiveDate::from_ymd_opt(1973, 3, 1).unwrap();
        assert_eq!(parse_date(&Cell::Date(date)), Some(date));
        assert_eq!(parse_date(&Cell::Number(1969.0)), NaiveDate::from_ymd_opt(1969, 1, 1));
        assert_eq!(parse_date(&Cell::Number(12.0)), None);
        assert_eq!(parse_date(&text("1969")), NaiveDate::from_ymd_opt(1969, 1, 1));
        assert_eq!(parse_date(&text("1973-03-01")), Some(date));
        assert_eq!(parse_date(&text("01/03/1973")), Some(date));
        assert_eq!(parse_date(&text("12/31/1973")), NaiveDate::from_ymd_opt(1973, 12, 31));
        assert_eq!(parse_date(&text("spring 73")), None);
        assert_eq!(parse_date(&Cell::Empty), None);
    }

    #[test]
    fn styles_split_on_the_first_delimiter_found() {
        assert_eq!(parse_styles("Rock / Pop, Soul"), vec!["Rock", "Pop, Soul"]);
        assert_eq!(parse_styles("Jazz; Fusion"), vec!["Jazz", "Fusion"]);
        assert_eq!(parse_styles("Blues|Soul|"), vec!["Blues", "Soul"]);
        assert_eq!(parse_styles(" Ambient "), vec!["Ambient"]);
        assert!(parse_styles("  ").is_empty());
    }

    #[test]
    fn closed_flag_accepts_words_numbers_and_booleans() {
        for value in ["1", "true", "Si", "sì", "y", "YES"] {
            assert!(parse_bool(&text(value)), "{value}");
        }
        assert!(!parse_bool(&text("no")));
        assert!(parse_bool(&Cell::Bool(true)));
        assert!(parse_bool(&Cell::Number(2.0)));
        assert!(!parse_bool(&Cell::Number(0.0)));
        assert!(!parse_bool(&Cell::Empty));
    }

    #[test]
    fn cost_defaults_to_zero() {
        assert_eq!(parse_float(&Cell::Number(12.5)), 12.5);
        assert_eq!(parse_float(&text("9,90")), 9.9);
        assert_eq!(parse_float(&text("n/a")), 0.0);
        assert_eq!(parse_float(&Cell::Empty), 0.0);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate("Città", 4), "Citt");
        assert_eq!(limited(&text("  Harvest  "), 3), Some("Har".to_string()));
    }
}
