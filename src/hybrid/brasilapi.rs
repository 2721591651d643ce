//! HTTP registry client for the BrasilAPI CNPJ endpoint.
//!
//! Also accepts the ReceitaWS field names (`nome`, `fantasia`, `situacao`,
//! `abertura`), so either provider can sit behind the same base URL setting.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::debug;

use super::client::{RegistryClient, RegistryError, RegistryLookup, RegistryRecord};
use super::config::ValidatorConfig;

/// Registration status code for an active company.
const ACTIVE_STATUS_CODE: i64 = 2;

/// Upstream company payload. Both providers' field names are accepted.
#[derive(Debug, Deserialize)]
struct ApiCompany {
    #[serde(alias = "nome")]
    razao_social: Option<String>,
    #[serde(alias = "fantasia")]
    nome_fantasia: Option<String>,
    situacao_cadastral: Option<serde_json::Value>,
    #[serde(alias = "situacao")]
    descricao_situacao_cadastral: Option<String>,
    logradouro: Option<String>,
    numero: Option<String>,
    complemento: Option<String>,
    bairro: Option<String>,
    municipio: Option<String>,
    uf: Option<String>,
    cep: Option<serde_json::Value>,
    #[serde(alias = "abertura")]
    data_inicio_atividade: Option<String>,
    /// ReceitaWS reports failures in a 200 body with `"status": "ERROR"`.
    status: Option<String>,
    message: Option<String>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn value_text(v: Option<serde_json::Value>) -> Option<String> {
    match v? {
        serde_json::Value::String(s) => non_empty(Some(s)),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl ApiCompany {
    fn is_active(&self) -> bool {
        let by_text = self
            .descricao_situacao_cadastral
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("ATIVA"));
        let by_code = match &self.situacao_cadastral {
            Some(serde_json::Value::Number(n)) => n.as_i64() == Some(ACTIVE_STATUS_CODE),
            Some(serde_json::Value::String(s)) => {
                s.trim() == ACTIVE_STATUS_CODE.to_string() || s.trim().eq_ignore_ascii_case("ATIVA")
            }
            _ => false,
        };
        by_text || by_code
    }

    /// Checks the API-level error fields before trusting the payload.
    fn into_lookup(self) -> Result<RegistryLookup, RegistryError> {
        if self
            .status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("ERROR"))
        {
            let message = non_empty(self.message).unwrap_or_else(|| "unknown error".into());
            if is_rejection_message(&message) {
                return Ok(RegistryLookup::not_found());
            }
            return Err(RegistryError::Api(message));
        }
        if self.razao_social.is_none()
            && self.situacao_cadastral.is_none()
            && self.descricao_situacao_cadastral.is_none()
        {
            return Err(RegistryError::Parse("response has no company fields".into()));
        }

        let active = self.is_active();
        let status = non_empty(self.descricao_situacao_cadastral)
            .or_else(|| value_text(self.situacao_cadastral));
        let record = RegistryRecord {
            legal_name: non_empty(self.razao_social),
            trade_name: non_empty(self.nome_fantasia),
            status,
            street: non_empty(self.logradouro),
            number: non_empty(self.numero),
            complement: non_empty(self.complemento),
            district: non_empty(self.bairro),
            city: non_empty(self.municipio),
            state: non_empty(self.uf),
            postal_code: value_text(self.cep),
            opened_on: non_empty(self.data_inicio_atividade),
        };
        Ok(RegistryLookup::found(active, record))
    }
}

/// Error messages that mean the authority does not know the CNPJ.
fn is_rejection_message(message: &str) -> bool {
    let message = message.to_lowercase();
    ["inválid", "invalid", "não encontrad", "nao encontrad", "not found"]
        .iter()
        .any(|needle| message.contains(needle))
}

fn map_send_error(e: reqwest::Error) -> RegistryError {
    if e.is_timeout() {
        RegistryError::DeadlineExceeded
    } else {
        RegistryError::Network(e.to_string())
    }
}

/// [`RegistryClient`] backed by an HTTP CNPJ lookup service.
#[derive(Debug, Clone)]
pub struct BrasilApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl BrasilApiClient {
    /// Client for the default BrasilAPI endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Network` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, RegistryError> {
        Self::from_config(&ValidatorConfig::default())
    }

    /// Client for `config.registry_url`. A trailing slash is dropped.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Network` if the HTTP client cannot be built.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.registry_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL the CNPJ is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RegistryClient for BrasilApiClient {
    async fn lookup(&self, cnpj: &str, deadline: Instant) -> Result<RegistryLookup, RegistryError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(RegistryError::DeadlineExceeded);
        }

        let resp = self
            .http
            .get(format!("{}/{cnpj}", self.base_url))
            .timeout(remaining)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(map_send_error)?;
        debug!(%status, "registry responded");

        // The service answers 404 for unknown CNPJs and 400 for ones it
        // considers invalid; both are authoritative rejections.
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Ok(RegistryLookup::not_found());
        }
        if !status.is_success() {
            return Err(RegistryError::Api(format!("HTTP {status}: {body}")));
        }

        let company: ApiCompany = serde_json::from_str(&body)
            .map_err(|e: serde_json::Error| RegistryError::Parse(e.to_string()))?;
        company.into_lookup()
    }
}
