use crate::value::{normalize_amount, CellValue};
use std::collections::BTreeMap;

/// One row as handed over by the record source: column name to cell value.
/// Column naming is unreliable across producers (casing, stray whitespace),
/// so keys are only ever read through [`Transaction::from_raw`].
pub type RawRecord = BTreeMap<String, CellValue>;

/// A transaction row after ingestion.
///
/// Key normalization (lower-case, trimmed) happens exactly once here;
/// everything downstream reads typed fields. Unknown columns are dropped,
/// missing ones default to empty/zero. `tipo` is case-folded because every
/// consumer compares it case-insensitively; `unidade`, `categoria` and
/// `descricao` keep their original spelling since they double as grouping
/// keys in the dashboard output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub unidade: String,
    pub data: String,
    pub tipo: String,
    pub categoria: String,
    pub descricao: String,
    pub valor: f64,
    pub qtd_atendimentos: f64,
}

impl Transaction {
    pub fn from_raw(raw: &RawRecord) -> Self {
        let mut fields: BTreeMap<String, &CellValue> = BTreeMap::new();
        for (key, value) in raw {
            fields.insert(key.trim().to_lowercase(), value);
        }

        let text = |name: &str| {
            fields
                .get(name)
                .map(|cell| cell.to_text())
                .unwrap_or_default()
        };

        // The sheet header for the attendance count appears both with an
        // underscore and with a plain space.
        let qtd_cell = fields
            .get("qtd_atendimentos")
            .or_else(|| fields.get("qtd atendimentos"));

        Transaction {
            unidade: text("unidade"),
            data: text("data"),
            tipo: text("tipo").to_lowercase(),
            categoria: text("categoria"),
            descricao: text("descricao"),
            valor: fields
                .get("valor")
                .map(|cell| normalize_amount(cell, 0.0))
                .unwrap_or(0.0),
            qtd_atendimentos: qtd_cell
                .map(|cell| normalize_amount(cell, 0.0))
                .unwrap_or(0.0),
        }
    }
}
