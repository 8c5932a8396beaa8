//! # Clinic Ledger
//!
//! Aggregation and reporting engine for a small multi-location clinic
//! ledger whose storage lives in an external spreadsheet. The crate turns
//! an ordered collection of raw, loosely-typed transaction rows into the
//! dashboard metrics the front end charts: revenue/expense KPIs, expense
//! totals per category, signed net per location, and a top-5 ranking of
//! the clinic's professionals.
//!
//! ## Core Concepts
//!
//! - **Raw records**: string-keyed maps straight from the sheet, with
//!   unreliable column casing and BR-locale currency text
//! - **Ingestion**: one case-insensitive key-normalization step producing
//!   typed [`Transaction`] rows
//! - **Normalization**: [`normalize_amount`] never fails; a malformed cell
//!   becomes the default instead of rejecting the report
//! - **Aggregation**: [`aggregate`] is a pure, request-scoped pass with no
//!   shared state, so concurrent requests need no coordination
//!
//! ## Example
//!
//! ```rust,ignore
//! use clinic_ledger::*;
//!
//! let records: Vec<RawRecord> = serde_json::from_str(sheet_json)?;
//! let filter = DashboardFilter {
//!     data_inicio: Some("2024-01-01".to_string()),
//!     data_fim: Some("2024-01-31".to_string()),
//!     unidade: Some("Matriz".to_string()),
//! };
//!
//! let dashboard = build_dashboard(&records, &filter);
//! let body = serde_json::to_string(&dashboard)?;
//! ```

pub mod dashboard;
pub mod error;
pub mod record;
pub mod sheet;
pub mod value;

pub use dashboard::{
    aggregate, Dashboard, DashboardFilter, Kpis, RevenueVsExpense, TopProfissional, ALL_LOCATIONS,
    PROFESSIONAL_CATEGORY,
};
pub use error::{LedgerError, Result};
pub use record::{RawRecord, Transaction};
pub use sheet::*;
pub use value::{normalize_amount, CellValue};

use log::{debug, info};

/// Ingests raw sheet records and aggregates them into a [`Dashboard`].
///
/// Convenience over [`Transaction::from_raw`] + [`aggregate`] for callers
/// holding the rows exactly as the record source delivered them.
pub fn build_dashboard(records: &[RawRecord], filter: &DashboardFilter) -> Dashboard {
    info!("Building dashboard from {} raw records", records.len());

    let transactions: Vec<Transaction> = records.iter().map(Transaction::from_raw).collect();
    debug!(
        "Ingested {} transactions (data_inicio={:?}, data_fim={:?}, unidade={:?})",
        transactions.len(),
        filter.data_inicio,
        filter.data_fim,
        filter.unidade
    );

    aggregate(&transactions, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_build_dashboard_end_to_end() {
        let records = vec![
            raw_row(&[
                ("Unidade", "Matriz"),
                ("Data", "2024-01-10"),
                ("Tipo", "Receita"),
                ("Categoria", "Consultas"),
                ("Descricao", "Atendimento particular"),
                ("Valor", "R$ 1.500,00"),
            ]),
            raw_row(&[
                ("Unidade", "Matriz"),
                ("Data", "2024-01-12"),
                ("Tipo", "Despesa"),
                ("Categoria", "Profissionais da Clínica"),
                ("Descricao", "Dra. Ana"),
                ("Valor", "R$ 120,00"),
                ("Qtd_Atendimentos", "3"),
            ]),
        ];

        let dash = build_dashboard(&records, &DashboardFilter::default());
        assert_eq!(dash.kpis.receita, 1500.0);
        assert_eq!(dash.kpis.despesa, 120.0);
        assert_eq!(dash.kpis.saldo, 1380.0);
        assert_eq!(dash.performance_unidades.get("Matriz"), Some(&1380.0));

        let ana = &dash.top_profissionais[0];
        assert_eq!(ana.nome, "Dra. Ana");
        assert_eq!(ana.atendimentos, 3);
        assert_eq!(ana.valor_por_atendimento, 40.0);
        assert_eq!(ana.valor_total, 120.0);
    }

    #[test]
    fn test_build_dashboard_empty_source() {
        let dash = build_dashboard(&[], &DashboardFilter::default());
        assert_eq!(dash, Dashboard::default());
    }
}
