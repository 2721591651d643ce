//! Code lookup for NCM, CFOP, CST and CSOSN.
//!
//! The compatibility engine does not depend on a catalog; this is the
//! boundary used by code pickers in the host application.

use serde::{Deserialize, Serialize};

/// Which code list to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeKind {
    Ncm,
    Cfop,
    Cst,
    Csosn,
}

/// A code with its official description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub kind: CodeKind,
    pub code: String,
    pub description: String,
}

/// Source of candidate codes for a search query.
pub trait FiscalCodeCatalog {
    /// Candidates of `kind` matching `query`, ordered by code.
    fn search(&self, kind: CodeKind, query: &str) -> Vec<CatalogEntry>;
}

/// In-memory catalog, seeded with commonly used codes by default.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        let tables: [(CodeKind, &[(&str, &str)]); 4] = [
            (CodeKind::Ncm, NCM_CODES),
            (CodeKind::Cfop, CFOP_CODES),
            (CodeKind::Cst, CST_ICMS_CODES),
            (CodeKind::Csosn, CSOSN_CODES),
        ];
        let entries = tables
            .iter()
            .flat_map(|(kind, codes)| {
                codes.iter().map(move |(code, description)| CatalogEntry {
                    kind: *kind,
                    code: (*code).into(),
                    description: (*description).into(),
                })
            })
            .collect();
        Self::new(entries)
    }
}

impl FiscalCodeCatalog for StaticCatalog {
    /// A query made of digits and separators matches code prefixes;
    /// anything else matches descriptions, case-insensitively.
    /// An empty query returns every code of the kind.
    fn search(&self, kind: CodeKind, query: &str) -> Vec<CatalogEntry> {
        let query = query.trim();
        let code_query: Option<String> = query
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
            .then(|| query.chars().filter(char::is_ascii_digit).collect());
        let text_query = query.to_lowercase();

        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .filter(|e| match &code_query {
                Some(prefix) => e.code.starts_with(prefix.as_str()),
                None => e.description.to_lowercase().contains(&text_query),
            })
            .cloned()
            .collect()
    }
}

static NCM_CODES: &[(&str, &str)] = &[
    ("22021000", "Águas, incluindo as águas minerais e as gaseificadas, adicionadas de açúcar"),
    ("22030000", "Cervejas de malte"),
    ("30049099", "Outros medicamentos em doses"),
    ("61091000", "Camisetas de malha, de algodão"),
    ("84713012", "Máquinas portáteis para processamento de dados, peso inferior a 3,5 kg"),
    ("85171300", "Smartphones"),
    ("94036000", "Outros móveis de madeira"),
];

static CFOP_CODES: &[(&str, &str)] = &[
    ("1102", "Compra para comercialização"),
    ("1202", "Devolução de venda de mercadoria adquirida ou recebida de terceiros"),
    ("2102", "Compra para comercialização (interestadual)"),
    ("3102", "Compra para comercialização (importação)"),
    ("5101", "Venda de produção do estabelecimento"),
    ("5102", "Venda de mercadoria adquirida ou recebida de terceiros"),
    ("5405", "Venda de mercadoria com ICMS retido por substituição tributária"),
    ("5949", "Outra saída de mercadoria não especificada"),
    ("6102", "Venda de mercadoria adquirida ou recebida de terceiros (interestadual)"),
    ("6108", "Venda a não contribuinte (interestadual)"),
    ("7102", "Venda de mercadoria adquirida ou recebida de terceiros (exportação)"),
];

static CST_ICMS_CODES: &[(&str, &str)] = &[
    ("00", "Tributada integralmente"),
    ("10", "Tributada e com cobrança do ICMS por substituição tributária"),
    ("20", "Com redução de base de cálculo"),
    ("30", "Isenta ou não tributada e com cobrança do ICMS por substituição tributária"),
    ("40", "Isenta"),
    ("41", "Não tributada"),
    ("50", "Suspensão"),
    ("51", "Diferimento"),
    ("60", "ICMS cobrado anteriormente por substituição tributária"),
    ("70", "Com redução de base de cálculo e cobrança do ICMS por substituição tributária"),
    ("90", "Outras"),
];

static CSOSN_CODES: &[(&str, &str)] = &[
    ("101", "Tributada pelo Simples Nacional com permissão de crédito"),
    ("102", "Tributada pelo Simples Nacional sem permissão de crédito"),
    ("103", "Isenção do ICMS no Simples Nacional para faixa de receita bruta"),
    ("201", "Tributada com permissão de crédito e com cobrança do ICMS por ST"),
    ("202", "Tributada sem permissão de crédito e com cobrança do ICMS por ST"),
    ("203", "Isenção para faixa de receita bruta e com cobrança do ICMS por ST"),
    ("300", "Imune"),
    ("400", "Não tributada pelo Simples Nacional"),
    ("500", "ICMS cobrado anteriormente por ST ou por antecipação"),
    ("900", "Outros"),
];
