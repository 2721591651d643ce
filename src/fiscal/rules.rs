//! Configurable CFOP×CST and CST×NCM compatibility rules.
//!
//! Only the CST "00" rules are built in. Every other CST needs rules
//! supplied by whoever maintains the fiscal setup; a CST without any rule
//! yields [`Verdict::NoRule`] rather than a guess.

use serde::{Deserialize, Serialize};

use super::codes::{Cfop, Ncm, SituationCode};

/// Which codes a rule covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePattern {
    /// Every code.
    Any,
    /// Codes starting with one of the given digit prefixes.
    Prefixes(Vec<String>),
}

impl CodePattern {
    pub fn matches(&self, code: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Prefixes(prefixes) => prefixes.iter().any(|p| code.starts_with(p.as_str())),
        }
    }
}

/// CST `cst` is compatible with exit CFOPs matching `cfop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfopCstRule {
    pub cst: String,
    pub cfop: CodePattern,
}

/// CST `cst` is compatible with NCMs matching `ncm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CstNcmRule {
    pub cst: String,
    pub ncm: CodePattern,
}

/// Result of looking up a code pair in a [`CompatibilityTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Compatible,
    Incompatible,
    /// The table has no rule for this CST.
    NoRule,
}

/// Rule table consulted by the compatibility engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityTable {
    pub cfop_cst: Vec<CfopCstRule>,
    pub cst_ncm: Vec<CstNcmRule>,
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        Self {
            cfop_cst: vec![CfopCstRule {
                cst: "00".into(),
                cfop: CodePattern::Any,
            }],
            cst_ncm: vec![CstNcmRule {
                cst: "00".into(),
                ncm: CodePattern::Any,
            }],
        }
    }
}

impl CompatibilityTable {
    /// A table without any rules, not even the built-in CST "00" ones.
    pub fn empty() -> Self {
        Self {
            cfop_cst: Vec::new(),
            cst_ncm: Vec::new(),
        }
    }

    pub fn with_cfop_rule(mut self, cst: impl Into<String>, cfop: CodePattern) -> Self {
        self.cfop_cst.push(CfopCstRule {
            cst: cst.into(),
            cfop,
        });
        self
    }

    pub fn with_ncm_rule(mut self, cst: impl Into<String>, ncm: CodePattern) -> Self {
        self.cst_ncm.push(CstNcmRule {
            cst: cst.into(),
            ncm,
        });
        self
    }

    /// CFOP rules only ever admit exit CFOPs.
    pub fn cfop_cst(&self, cfop: &Cfop, cst: &SituationCode) -> Verdict {
        let mut rules = self
            .cfop_cst
            .iter()
            .filter(|r| r.cst == cst.as_str())
            .peekable();
        if rules.peek().is_none() {
            return Verdict::NoRule;
        }
        if cfop.is_exit() && rules.any(|r| r.cfop.matches(cfop.as_str())) {
            Verdict::Compatible
        } else {
            Verdict::Incompatible
        }
    }

    pub fn cst_ncm(&self, cst: &SituationCode, ncm: &Ncm) -> Verdict {
        let mut rules = self
            .cst_ncm
            .iter()
            .filter(|r| r.cst == cst.as_str())
            .peekable();
        if rules.peek().is_none() {
            return Verdict::NoRule;
        }
        if rules.any(|r| r.ncm.matches(ncm.as_str())) {
            Verdict::Compatible
        } else {
            Verdict::Incompatible
        }
    }
}
