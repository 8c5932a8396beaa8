use crate::record::Transaction;
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Sentinel location value that disables the location filter.
pub const ALL_LOCATIONS: &str = "todas";

/// Expense category whose rows feed the top-professional ranking.
pub const PROFESSIONAL_CATEGORY: &str = "profissionais da clínica";

const TIPO_RECEITA: &str = "receita";
const TIPO_DESPESA: &str = "despesa";
const TOP_PROFESSIONALS: usize = 5;

/// Optional request-side narrowing of the transaction set.
///
/// Date bounds are inclusive and compared lexicographically against the raw
/// `data` strings; callers are expected to supply ISO `YYYY-MM-DD` values,
/// anything else yields implementation-defined ordering. The location
/// filter is case-insensitive and ignored when set to [`ALL_LOCATIONS`].
#[derive(Debug, Clone, Default)]
pub struct DashboardFilter {
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
    pub unidade: Option<String>,
}

impl DashboardFilter {
    /// The effective location key, folded for comparison. `None` when no
    /// filtering applies.
    fn location(&self) -> Option<String> {
        self.unidade
            .as_deref()
            .map(str::to_lowercase)
            .filter(|u| u != ALL_LOCATIONS)
    }

    fn matches(&self, tx: &Transaction, location: Option<&str>) -> bool {
        if let Some(from) = &self.data_inicio {
            if tx.data.as_str() < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &self.data_fim {
            if tx.data.as_str() > to.as_str() {
                return false;
            }
        }
        if let Some(wanted) = location {
            if tx.unidade.to_lowercase() != wanted {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub receita: f64,
    pub despesa: f64,
    pub saldo: f64,
}

/// Fixed two-label series shaped for direct charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueVsExpense {
    pub labels: [&'static str; 2],
    pub receitas: Vec<f64>,
    pub despesas: Vec<f64>,
}

impl RevenueVsExpense {
    fn new(receita: f64, despesa: f64) -> Self {
        Self {
            labels: ["Receita", "Despesa"],
            receitas: vec![receita],
            despesas: vec![despesa],
        }
    }
}

impl Default for RevenueVsExpense {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProfissional {
    pub nome: String,
    pub atendimentos: i64,
    pub valor_por_atendimento: f64,
    pub valor_total: f64,
}

/// The complete reporting result. Every monetary figure is rounded to two
/// decimal places; serializing this struct yields the dashboard JSON shape
/// consumed by the front end.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub despesas_por_categoria: BTreeMap<String, f64>,
    pub receita_vs_despesa: RevenueVsExpense,
    pub performance_unidades: BTreeMap<String, f64>,
    pub top_profissionais: Vec<TopProfissional>,
}

/// Per-professional running state. The unit value is locked in from the
/// first row seen for that name; later rows only add attendances.
struct ProfessionalTotals {
    nome: String,
    atendimentos: i64,
    valor_por_atendimento: f64,
}

/// Request-scoped accumulator, allocated fresh per [`aggregate`] call and
/// discarded once the result is built.
#[derive(Default)]
struct Accumulator {
    receita: f64,
    despesa: f64,
    por_categoria: BTreeMap<String, f64>,
    por_unidade: BTreeMap<String, f64>,
    profissionais: Vec<ProfessionalTotals>,
    prof_index: HashMap<String, usize>,
}

impl Accumulator {
    fn apply(&mut self, tx: &Transaction) {
        let is_receita = tx.tipo == TIPO_RECEITA;
        let is_despesa = tx.tipo == TIPO_DESPESA;

        if is_receita {
            self.receita += tx.valor;
        } else if is_despesa {
            self.despesa += tx.valor;
        }

        // Location nets treat every non-revenue row as a cost, including
        // rows whose tipo matched neither KPI bucket. Known quirk, kept
        // intact.
        let net = self.por_unidade.entry(tx.unidade.clone()).or_insert(0.0);
        if is_receita {
            *net += tx.valor;
        } else {
            *net -= tx.valor;
        }

        if is_despesa {
            // Category keys are not case-folded: "Aluguel" and "aluguel"
            // accumulate separately.
            *self
                .por_categoria
                .entry(tx.categoria.clone())
                .or_insert(0.0) += tx.valor;

            if tx.categoria.to_lowercase() == PROFESSIONAL_CATEGORY {
                self.record_professional(tx);
            }
        }
    }

    fn record_professional(&mut self, tx: &Transaction) {
        // Names are ranking keys exactly as written, no trim or case fold.
        let idx = match self.prof_index.get(&tx.descricao) {
            Some(&idx) => idx,
            None => {
                let unit_value = tx.valor / tx.qtd_atendimentos.max(1.0);
                self.profissionais.push(ProfessionalTotals {
                    nome: tx.descricao.clone(),
                    atendimentos: 0,
                    valor_por_atendimento: unit_value,
                });
                let idx = self.profissionais.len() - 1;
                self.prof_index.insert(tx.descricao.clone(), idx);
                idx
            }
        };

        let entry = &mut self.profissionais[idx];
        if tx.qtd_atendimentos > 0.0 {
            entry.atendimentos += tx.qtd_atendimentos as i64;
        } else {
            // A missing or zero count still means the row happened once.
            entry.atendimentos += 1;
        }
    }

    fn finish(self) -> Dashboard {
        let receita = round2(self.receita);
        let despesa = round2(self.despesa);
        let saldo = round2(receita - despesa);

        let mut ranking: Vec<TopProfissional> = self
            .profissionais
            .into_iter()
            .map(|p| TopProfissional {
                valor_total: round2(p.atendimentos as f64 * p.valor_por_atendimento),
                valor_por_atendimento: round2(p.valor_por_atendimento),
                atendimentos: p.atendimentos,
                nome: p.nome,
            })
            .collect();
        // Stable sort with no secondary key: ties keep first-seen order.
        ranking.sort_by(|a, b| {
            b.valor_total
                .partial_cmp(&a.valor_total)
                .unwrap_or(Ordering::Equal)
        });
        ranking.truncate(TOP_PROFESSIONALS);

        Dashboard {
            kpis: Kpis {
                receita,
                despesa,
                saldo,
            },
            despesas_por_categoria: round_values(self.por_categoria),
            receita_vs_despesa: RevenueVsExpense::new(receita, despesa),
            performance_unidades: round_values(self.por_unidade),
            top_profissionais: ranking,
        }
    }
}

/// Aggregates one in-memory transaction collection into the dashboard
/// result. Pure function over its inputs: the record collection is never
/// mutated and all state is call-local, so independent requests can run it
/// concurrently without sharing anything.
pub fn aggregate(records: &[Transaction], filter: &DashboardFilter) -> Dashboard {
    if records.is_empty() {
        return Dashboard::default();
    }

    let location = filter.location();
    let mut acc = Accumulator::default();
    let mut kept = 0usize;

    for tx in records {
        if !filter.matches(tx, location.as_deref()) {
            continue;
        }
        kept += 1;
        acc.apply(tx);
    }

    debug!(
        "Aggregated {} of {} records (data_inicio={:?}, data_fim={:?}, unidade={:?})",
        kept, records.len(), filter.data_inicio, filter.data_fim, filter.unidade
    );

    acc.finish()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round_values(map: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    map.into_iter().map(|(k, v)| (k, round2(v))).collect()
}
