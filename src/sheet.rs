//! Write-path support for the external spreadsheet collaborator.
//!
//! Appending a row means matching the sheet's live header row against a
//! validated payload: recognized headers pull from fixed business fields,
//! anything unrecognized receives an empty string so the row stays aligned
//! no matter how the sheet is rearranged.

use crate::error::{LedgerError, Result};
use serde::Deserialize;

pub const TRANSACTIONS_SHEET: &str = "Transacoes";
pub const PROFESSIONALS_SHEET: &str = "Profissionais";

const DEFAULT_VALOR: &str = "0.00";
const DEFAULT_FORMA_PAGAMENTO: &str = "Dinheiro";

/// Recognized column headers across both sheets. Matching is done on the
/// lower-cased, trimmed header text; spellings that appear in the wild with
/// spaces instead of underscores are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetColumn {
    Unidade,
    Data,
    Tipo,
    Categoria,
    Descricao,
    Valor,
    FormaPagamento,
    QtdAtendimentos,
    Nome,
    Especialidade,
    ValorAtendimento,
}

impl SheetColumn {
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_lowercase().as_str() {
            "unidade" => Some(Self::Unidade),
            "data" => Some(Self::Data),
            "tipo" => Some(Self::Tipo),
            "categoria" => Some(Self::Categoria),
            "descricao" => Some(Self::Descricao),
            "valor" => Some(Self::Valor),
            "forma_pagamento" | "forma de pagamento" => Some(Self::FormaPagamento),
            "qtd_atendimentos" | "qtd atendimentos" => Some(Self::QtdAtendimentos),
            "nome" => Some(Self::Nome),
            "especialidade" => Some(Self::Especialidade),
            "valor_atendimento" => Some(Self::ValorAtendimento),
            _ => None,
        }
    }
}

/// Incoming transaction payload for the `Transacoes` sheet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionInput {
    #[serde(default)]
    pub unidade: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub valor: String,
    #[serde(default)]
    pub forma_pagamento: String,
    #[serde(default)]
    pub qtd_atendimentos: String,
}

impl TransactionInput {
    /// Mandatory-field check, performed before any row is built. This is
    /// the write path's responsibility; the read path never validates.
    pub fn validate(&self) -> Result<()> {
        let mandatory: [(&'static str, &str); 6] = [
            ("unidade", &self.unidade),
            ("data", &self.data),
            ("tipo", &self.tipo),
            ("categoria", &self.categoria),
            ("descricao", &self.descricao),
            ("valor", &self.valor),
        ];
        for (name, value) in mandatory {
            if value.trim().is_empty() {
                return Err(LedgerError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Incoming professional payload for the `Profissionais` sheet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessionalInput {
    #[serde(default)]
    pub unidade: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub especialidade: String,
    #[serde(default)]
    pub valor_atendimento: String,
}

impl ProfessionalInput {
    pub fn validate(&self) -> Result<()> {
        if self.nome.trim().is_empty() {
            return Err(LedgerError::MissingField("nome"));
        }
        if self.unidade.trim().is_empty() {
            return Err(LedgerError::MissingField("unidade"));
        }
        Ok(())
    }
}

/// Builds a column-aligned row for the transactions sheet from a validated
/// payload. Value fields default to `"0.00"` and the payment method to
/// `"Dinheiro"` when left empty.
pub fn align_transaction_row(headers: &[String], input: &TransactionInput) -> Result<Vec<String>> {
    input.validate()?;
    let row = headers
        .iter()
        .map(|header| match SheetColumn::from_header(header) {
            Some(SheetColumn::Unidade) => input.unidade.clone(),
            Some(SheetColumn::Data) => input.data.clone(),
            Some(SheetColumn::Tipo) => input.tipo.clone(),
            Some(SheetColumn::Categoria) => input.categoria.clone(),
            Some(SheetColumn::Descricao) => input.descricao.clone(),
            Some(SheetColumn::Valor) => or_default(&input.valor, DEFAULT_VALOR),
            Some(SheetColumn::FormaPagamento) => {
                or_default(&input.forma_pagamento, DEFAULT_FORMA_PAGAMENTO)
            }
            Some(SheetColumn::QtdAtendimentos) => input.qtd_atendimentos.clone(),
            _ => String::new(),
        })
        .collect();
    Ok(row)
}

/// Builds a column-aligned row for the professionals sheet. `nome` and
/// `unidade` are stored trimmed, matching how the registry is written.
pub fn align_professional_row(headers: &[String], input: &ProfessionalInput) -> Result<Vec<String>> {
    input.validate()?;
    let row = headers
        .iter()
        .map(|header| match SheetColumn::from_header(header) {
            Some(SheetColumn::Unidade) => input.unidade.trim().to_string(),
            Some(SheetColumn::Nome) => input.nome.trim().to_string(),
            Some(SheetColumn::Especialidade) => input.especialidade.clone(),
            Some(SheetColumn::ValorAtendimento) => {
                or_default(&input.valor_atendimento, DEFAULT_VALOR)
            }
            _ => String::new(),
        })
        .collect();
    Ok(row)
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn transaction() -> TransactionInput {
        TransactionInput {
            unidade: "Matriz".to_string(),
            data: "2024-03-15".to_string(),
            tipo: "despesa".to_string(),
            categoria: "Aluguel".to_string(),
            descricao: "Aluguel de março".to_string(),
            valor: "1.200,00".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_transaction_row_follows_header_order() {
        let headers = headers(&["Data", "Unidade", "Valor", "Tipo"]);
        let row = align_transaction_row(&headers, &transaction()).unwrap();
        assert_eq!(row, vec!["2024-03-15", "Matriz", "1.200,00", "despesa"]);
    }

    #[test]
    fn test_unrecognized_header_gets_empty_cell() {
        let headers = headers(&["Unidade", "Coluna Nova", "Valor"]);
        let row = align_transaction_row(&headers, &transaction()).unwrap();
        assert_eq!(row[1], "");
    }

    #[test]
    fn test_header_aliases() {
        let headers = headers(&["Forma de Pagamento", "Qtd Atendimentos"]);
        let mut input = transaction();
        input.forma_pagamento = "Pix".to_string();
        input.qtd_atendimentos = "3".to_string();
        let row = align_transaction_row(&headers, &input).unwrap();
        assert_eq!(row, vec!["Pix", "3"]);
    }

    #[test]
    fn test_payment_method_defaults_to_cash() {
        let headers = headers(&["forma_pagamento"]);
        let row = align_transaction_row(&headers, &transaction()).unwrap();
        assert_eq!(row, vec!["Dinheiro"]);
    }

    #[test]
    fn test_transaction_mandatory_fields() {
        let mut input = transaction();
        input.categoria = "  ".to_string();
        let err = input.validate().unwrap_err();
        assert!(matches!(err, LedgerError::MissingField("categoria")));
    }

    #[test]
    fn test_professional_row_and_defaults() {
        let sheet = headers(&["Unidade", "Nome", "Especialidade", "valor_atendimento"]);
        let input = ProfessionalInput {
            unidade: " Matriz ".to_string(),
            nome: " Dra. Ana ".to_string(),
            ..Default::default()
        };
        let row = align_professional_row(&sheet, &input).unwrap();
        assert_eq!(row, vec!["Matriz", "Dra. Ana", "", "0.00"]);
    }

    #[test]
    fn test_professional_requires_nome_and_unidade() {
        let input = ProfessionalInput {
            unidade: "Matriz".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            input.validate().unwrap_err(),
            LedgerError::MissingField("nome")
        ));
    }

    #[test]
    fn test_payload_deserializes_with_missing_keys() {
        let input: TransactionInput =
            serde_json::from_str(r#"{"unidade": "Matriz", "valor": "10,00"}"#).unwrap();
        assert_eq!(input.unidade, "Matriz");
        assert_eq!(input.forma_pagamento, "");
        assert!(input.validate().is_err());
    }
}
