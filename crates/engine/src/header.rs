//! Canonical output header and filename-keyed header corrections.
//!
//! Downstream BI consumers expect one fixed column set regardless of which
//! export variant produced the file, so the output header is hard-coded. The
//! source file's own header line is still read: known export variants ship
//! typos in it, and the run summary reports which corrections fired.

use regex::Regex;

use crate::columns;

/// Fixed output header for cleaned exports. One column name contains a comma
/// and is therefore quoted.
pub const CANONICAL_HEADER: &str = concat!(
    "Área/Processo envolvido,Responsável SAC,Código da Ocorrência,Assunto,Tipo,Status,",
    "Proprietário do SAC Name,Hora de Criação,Hora da modificação,Encerrado em,",
    "Solução de Ensino,Tipo de Venda,Código SGE,Escola Nome,CNPJ,Razão Social,",
    "Rua de Entrega,Cidade de Entrega,Estado de Entrega,CEP de Entrega,",
    "Contato atualizado,Telefone,Solicitação,Filial de origem,RMA DEV. VENDA,RMA 2,",
    "NF para aplicação de crédito (Financeiro),Nome da transportadora.,",
    "Cliente irá contratar o frete?,\"Cliente vai contratar frete, info a transportadora\",",
    "Nº do pedido SGE,NF Remessa LNE,Nº da nota de origem,",
    "Qual a flexibilidade de data/horário sugeridas?,Análise Realizada - Logística,",
    "Parecer da Logística,NF DEV.COLETA,NF Faturamento,Material Conforme?,",
    "Motivo Não Conformidade,Observações Logística,NF DEV.VENDA FATURAMENTO.,",
    "NF DEV.LOJA FATURAMENTO,NF DEV. SIMP.FAT,Número contato,",
    "Horário disponível para coleta,Responsável pela entrega,Tem restrição de acesso?"
);

/// One filename-keyed textual correction to a source header.
#[derive(Debug, Clone, Copy)]
pub struct HeaderFix {
    /// Case-insensitive pattern matched against the upload's filename.
    pub filename_pattern: &'static str,
    pub broken: &'static str,
    pub fixed: &'static str,
}

/// Exact-text corrections observed in known export variants.
pub const HEADER_FIXES: &[HeaderFix] = &[
    HeaderFix {
        filename_pattern: r"(?i)sql_SAC_LogDevolucao_CQT",
        broken: "Análise Realizada - Logística.",
        fixed: "Análise Realizada - Logística",
    },
    HeaderFix {
        filename_pattern: r"(?i)sql_SAC__LogDevolucao_SPE",
        broken: "Responsável pela entrega .",
        fixed: "Responsável pela entrega",
    },
];

/// Columns of [`CANONICAL_HEADER`], in order.
pub fn canonical_columns() -> Vec<String> {
    columns::split_record(CANONICAL_HEADER)
}

/// Number of columns in the canonical header.
pub fn canonical_width() -> usize {
    canonical_columns().len()
}

/// Apply every correction whose filename pattern matches.
///
/// Returns the corrected header text and a description of each substitution
/// that actually changed something. The corrected text is informational; the
/// output header is always [`CANONICAL_HEADER`].
pub fn normalize_header(source_header: &str, filename: &str) -> (String, Vec<String>) {
    let mut header = source_header.to_string();
    let mut applied = Vec::new();
    for fix in HEADER_FIXES {
        if !Regex::new(fix.filename_pattern).unwrap().is_match(filename) {
            continue;
        }
        if header.contains(fix.broken) {
            header = header.replace(fix.broken, fix.fixed);
            applied.push(format!("'{}' -> '{}'", fix.broken, fix.fixed));
        }
    }
    (header, applied)
}
