use serde::{Deserialize, Serialize};

/// A single spreadsheet cell as delivered by the record source.
///
/// Manually-entered sheets mix numeric cells with locale-formatted text
/// (`"R$ 1.234,56"`), and empty cells arrive as `""` or null. The untagged
/// representation lets a raw `get_all_records`-style JSON row deserialize
/// without any up-front cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Number(_) => false,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Empty => true,
        }
    }

    /// Renders the cell as plain text. Integral numbers print without a
    /// fractional part so `2024` round-trips as `"2024"`.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Converts a monetary cell into a canonical amount. Total by contract:
/// any ambiguity resolves to `default`, never an error, so one malformed
/// cell cannot reject a whole report.
///
/// Text goes through BR-locale disambiguation: with both `.` and `,`
/// present the dot is a thousands separator (`"1.234,56"` -> 1234.56),
/// a lone `,` is the decimal point (`"45,90"` -> 45.90). A leading `R$`
/// marker and any stray non-numeric characters are stripped.
pub fn normalize_amount(value: &CellValue, default: f64) -> f64 {
    let raw = match value {
        CellValue::Empty => return default,
        CellValue::Number(n) => return *n,
        CellValue::Text(s) => s,
    };

    let mut s = raw.trim();
    if s.is_empty() {
        return default;
    }

    if s.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("r$")) {
        s = s[2..].trim_start();
    }

    let canonical = if s.contains(',') && s.contains('.') {
        s.replace('.', "").replace(',', ".")
    } else if s.contains(',') {
        s.replace(',', ".")
    } else {
        s.to_string()
    };

    let cleaned: String = canonical
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
        .collect();

    if cleaned.is_empty() || cleaned == "-" || cleaned == "+" {
        return default;
    }

    cleaned.parse::<f64>().unwrap_or(default)
}
