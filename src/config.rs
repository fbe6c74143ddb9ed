//! Configuração do jobpoll carregada a partir de `jobpoll.toml`.
//!
//! Todas as chaves são opcionais e usam defaults quando ausentes.
//! A variável de ambiente `JOBPOLL_URL` tem precedência sobre `base_url` do
//! arquivo, e as flags da CLI têm precedência sobre ambos. A validação das
//! configurações de retry acontece só depois que as flags foram aplicadas.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::JobpollError;
use crate::poller::RetryConfig;

/// Nome padrão do arquivo de configuração, procurado no diretório atual pela CLI.
pub const CONFIG_FILE: &str = "jobpoll.toml";

/// Variável de ambiente que sobrescreve a URL do endpoint de status.
pub const URL_ENV_VAR: &str = "JOBPOLL_URL";

/// Configuração de nível superior carregada de `jobpoll.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobpollConfig {
    /// URL base do endpoint de status.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Limite total de espera em segundos. Sem limite quando ausente.
    #[serde(default)]
    pub timeout_secs: Option<f64>,

    /// Parâmetros de backoff da tabela `[retry]`.
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Tabela `[retry]`, com durações em segundos.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: f64,

    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

// Valor padrão para a URL base: o simulador local na porta 5000.
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

// Valor padrão para o atraso inicial: 1s.
fn default_initial_delay_secs() -> f64 {
    1.0
}

// Valor padrão para o atraso máximo: 30s.
fn default_max_delay_secs() -> f64 {
    30.0
}

// Valor padrão para retentativas máximas: 10.
fn default_max_retries() -> u32 {
    10
}

// Valor padrão para o fator de backoff: 1.5.
fn default_backoff_factor() -> f64 {
    1.5
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl Default for JobpollConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            retry: RetrySettings::default(),
        }
    }
}

/// Converte um número não negativo de segundos em [`Duration`].
pub fn secs_to_duration(name: &str, secs: f64) -> Result<Duration, JobpollError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        JobpollError::Config(format!(
            "{name} must be a non-negative number of seconds, got {secs}"
        ))
    })
}

impl RetrySettings {
    /// Converte para um [`RetryConfig`] já validado.
    pub fn to_retry_config(&self) -> Result<RetryConfig, JobpollError> {
        let config = RetryConfig {
            initial_delay: secs_to_duration("initial_delay_secs", self.initial_delay_secs)?,
            max_delay: secs_to_duration("max_delay_secs", self.max_delay_secs)?,
            max_retries: self.max_retries,
            backoff_factor: self.backoff_factor,
        };
        config.validate()?;
        Ok(config)
    }
}

impl JobpollConfig {
    /// Carrega a configuração de `path`, usando defaults se o arquivo não existir.
    ///
    /// Só faz o parse e aplica `JOBPOLL_URL`; os valores de `[retry]` e
    /// `timeout_secs` são validados por [`RetrySettings::to_retry_config`] e
    /// [`JobpollConfig::timeout`] depois das flags da CLI.
    pub fn load_from(path: &Path) -> Result<Self, JobpollError> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<JobpollConfig>(&contents)?
        } else {
            Self::default()
        };

        Ok(config.with_url_override(std::env::var(URL_ENV_VAR).ok()))
    }

    fn with_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url
            && !url.is_empty()
        {
            self.base_url = url;
        }
        self
    }

    /// Limite de espera validado, `None` quando não configurado.
    pub fn timeout(&self) -> Result<Option<Duration>, JobpollError> {
        self.timeout_secs
            .map(|secs| secs_to_duration("timeout_secs", secs))
            .transpose()
    }
}
