//! NCM, CFOP and CST/CSOSN code types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::CodeFormatError;

/// Drop the separators used in printed codes ("8471.30.12", "5.102").
/// Returns `None` if anything other than digits and separators remains.
fn strip_separators(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        match c {
            '0'..='9' => out.push(c),
            '.' | '-' | ' ' => {}
            _ => return None,
        }
    }
    Some(out)
}

/// NCM — 8-digit merchandise classification (Nomenclatura Comum do Mercosul).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ncm(String);

impl Ncm {
    pub fn parse(raw: &str) -> Result<Self, CodeFormatError> {
        match strip_separators(raw) {
            Some(digits) if digits.len() == 8 => Ok(Self(digits)),
            _ => Err(CodeFormatError::Ncm(raw.trim().into())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 2-digit chapter.
    pub fn chapter(&self) -> &str {
        &self.0[..2]
    }
}

impl fmt::Display for Ncm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction of the operation a CFOP describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CfopDirection {
    Entry,
    Exit,
}

/// Geographic scope of the operation a CFOP describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CfopScope {
    /// Same state (leading 1 or 5).
    Intrastate,
    /// Another state (leading 2 or 6).
    Interstate,
    /// Import or export (leading 3 or 7).
    Foreign,
}

/// CFOP — 4-digit code for the nature of an operation (Código Fiscal de Operações e Prestações).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cfop(String);

impl Cfop {
    pub fn parse(raw: &str) -> Result<Self, CodeFormatError> {
        match strip_separators(raw) {
            Some(digits) if digits.len() == 4 => Ok(Self(digits)),
            _ => Err(CodeFormatError::Cfop(raw.trim().into())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn leading(&self) -> u8 {
        self.0.as_bytes()[0]
    }

    /// Entry for leading 1/2/3, exit for 5/6/7, `None` otherwise.
    pub fn direction(&self) -> Option<CfopDirection> {
        match self.leading() {
            b'1' | b'2' | b'3' => Some(CfopDirection::Entry),
            b'5' | b'6' | b'7' => Some(CfopDirection::Exit),
            _ => None,
        }
    }

    pub fn scope(&self) -> Option<CfopScope> {
        match self.leading() {
            b'1' | b'5' => Some(CfopScope::Intrastate),
            b'2' | b'6' => Some(CfopScope::Interstate),
            b'3' | b'7' => Some(CfopScope::Foreign),
            _ => None,
        }
    }

    pub fn is_exit(&self) -> bool {
        self.direction() == Some(CfopDirection::Exit)
    }

    pub fn is_entry(&self) -> bool {
        self.direction() == Some(CfopDirection::Entry)
    }
}

impl fmt::Display for Cfop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tax a situation code applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxType {
    Icms,
    Ipi,
    Pis,
    Cofins,
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Icms => "ICMS",
            Self::Ipi => "IPI",
            Self::Pis => "PIS",
            Self::Cofins => "COFINS",
        })
    }
}

/// Tax regime implied by the code length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxRegime {
    /// Regular regime, 2-digit CST.
    Normal,
    /// Simples Nacional, 3-digit CSOSN.
    SimplesNacional,
}

/// CST (2 digits) or CSOSN (3 digits) for one tax type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SituationCode {
    tax: TaxType,
    code: String,
}

impl SituationCode {
    pub fn parse(tax: TaxType, raw: &str) -> Result<Self, CodeFormatError> {
        let code = raw.trim();
        if (2..=3).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self {
                tax,
                code: code.into(),
            })
        } else {
            Err(CodeFormatError::SituationCode(code.into()))
        }
    }

    pub fn tax(&self) -> TaxType {
        self.tax
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    pub fn regime(&self) -> TaxRegime {
        if self.code.len() == 3 {
            TaxRegime::SimplesNacional
        } else {
            TaxRegime::Normal
        }
    }
}

impl fmt::Display for SituationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
