//! Interface de linha de comando do jobpoll baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (status, wait, serve,
//! trigger-error) e flags globais (--url, --config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobpoll::config::{CONFIG_FILE, JobpollConfig};
use jobpoll::simulator::DEFAULT_COMPLETION_AFTER;

/// jobpoll: aguarda um job assíncrono chegar a um estado terminal.
#[derive(Debug, Parser)]
#[command(name = "jobpoll", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// URL base do endpoint de status (sobrescreve o arquivo e JOBPOLL_URL).
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Caminho para o arquivo de configuração.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Habilita logs de depuração (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Subcomandos aceitos pela CLI.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Consulta o status do job uma única vez.
    Status,

    /// Consulta repetidamente até o job concluir ou reportar erro.
    Wait {
        /// Desiste após este número de segundos.
        #[arg(long)]
        timeout: Option<f64>,

        /// Atraso após a primeira resposta pendente, em segundos.
        #[arg(long)]
        initial_delay: Option<f64>,

        /// Limite superior de um único atraso, em segundos.
        #[arg(long)]
        max_delay: Option<f64>,

        /// Respostas pendentes toleradas antes de desistir.
        #[arg(long)]
        max_retries: Option<u32>,

        /// Fator de crescimento aplicado ao atraso após cada resposta pendente.
        #[arg(long)]
        backoff_factor: Option<f64>,
    },

    /// Executa o simulador de job.
    Serve {
        /// Endereço em que o simulador escuta.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Porta em que o simulador escuta.
        #[arg(long, default_value_t = 5000)]
        port: u16,

        /// Segundos até o job simulado concluir.
        #[arg(long, default_value_t = DEFAULT_COMPLETION_AFTER.as_secs_f64())]
        completion_secs: f64,
    },

    /// Força o job simulado em --url para o estado de erro.
    TriggerError,
}

impl Command {
    /// Aplica as flags de `wait` sobre a configuração carregada do arquivo.
    ///
    /// Deve rodar antes de qualquer validação, para que as flags possam
    /// corrigir valores inválidos do arquivo.
    pub fn apply_overrides(&self, config: &mut JobpollConfig) {
        if let Command::Wait {
            timeout,
            initial_delay,
            max_delay,
            max_retries,
            backoff_factor,
        } = self
        {
            if timeout.is_some() {
                config.timeout_secs = *timeout;
            }
            if let Some(v) = initial_delay {
                config.retry.initial_delay_secs = *v;
            }
            if let Some(v) = max_delay {
                config.retry.max_delay_secs = *v;
            }
            if let Some(v) = max_retries {
                config.retry.max_retries = *v;
            }
            if let Some(v) = backoff_factor {
                config.retry.backoff_factor = *v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn cli_parses_wait_subcommand() {
        let cli = Cli::parse_from([
            "jobpoll",
            "wait",
            "--timeout",
            "10",
            "--initial-delay",
            "0.5",
            "--max-retries",
            "20",
        ]);
        match cli.command {
            Command::Wait {
                timeout,
                initial_delay,
                max_delay,
                max_retries,
                backoff_factor,
            } => {
                assert_eq!(timeout, Some(10.0));
                assert_eq!(initial_delay, Some(0.5));
                assert_eq!(max_retries, Some(20));
                assert!(max_delay.is_none());
                assert!(backoff_factor.is_none());
            }
            _ => panic!("expected Wait command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "jobpoll",
            "--url",
            "http://127.0.0.1:8080",
            "--verbose",
            "status",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.url.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(cli.config, PathBuf::from("jobpoll.toml"));
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn cli_serve_defaults() {
        let cli = Cli::parse_from(["jobpoll", "serve"]);
        match cli.command {
            Command::Serve {
                host,
                port,
                completion_secs,
            } => {
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 5000);
                assert_eq!(completion_secs, 5.0);
            }
            _ => panic!("expected Serve command"),
        }
    }

    #[test]
    fn wait_flags_repair_invalid_file_settings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retry]\ninitial_delay_secs = 10\nmax_delay_secs = 1").unwrap();
        let mut config = JobpollConfig::load_from(file.path()).unwrap();

        let cli = Cli::parse_from(["jobpoll", "wait", "--max-delay", "20", "--timeout", "60"]);
        cli.command.apply_overrides(&mut config);

        let retry = config.retry.to_retry_config().unwrap();
        assert_eq!(retry.initial_delay, Duration::from_secs(10));
        assert_eq!(retry.max_delay, Duration::from_secs(20));
        assert_eq!(config.timeout().unwrap(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn status_ignores_wait_flags() {
        let mut config = JobpollConfig::default();
        config.retry.max_delay_secs = 0.1;

        let cli = Cli::parse_from(["jobpoll", "status"]);
        cli.command.apply_overrides(&mut config);
        assert_eq!(config.retry.max_delay_secs, 0.1);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
