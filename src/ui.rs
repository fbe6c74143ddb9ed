//! Interface de terminal do jobpoll: spinner durante o polling e saída colorida.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`PollProgress`] acompanha visualmente uma
//! chamada a `wait_for_completion` no terminal.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::poller::StatusObserver;
use crate::status::{JobStatus, StatusError, StatusResponse};

/// Indicador visual de progresso para o polling de um job.
///
/// Registrado como observer do poller: cada consulta atualiza a mensagem do
/// spinner com o último status e o número de consultas. Por ser a única
/// saída por consulta, os logs do loop ficam em nível `debug`.
pub struct PollProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Número de consultas observadas até agora.
    queries: AtomicU32,
    // Estilo verde para conclusão.
    green: Style,
    // Estilo vermelho para erro do job ou falha do polling.
    red: Style,
}

impl PollProgress {
    /// Inicia o spinner para o endpoint em `url`.
    pub fn start(url: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Self::with_bar(pb, url)
    }

    /// Indicador que não desenha nada no terminal.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden(), "")
    }

    fn with_bar(pb: ProgressBar, url: &str) -> Self {
        pb.set_message(format!("waiting for {url}"));
        Self {
            pb,
            queries: AtomicU32::new(0),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    /// Número de consultas observadas.
    pub fn queries(&self) -> u32 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Finaliza o spinner e exibe o status terminal do job.
    ///
    /// Conclusão é mostrada em verde com checkmark; erro do job em vermelho com X.
    pub fn finish(&self, response: &StatusResponse) {
        self.pb.finish_and_clear();
        let queries = self.queries();
        match response.status() {
            JobStatus::Completed => {
                println!(
                    "  {} Job completed after {queries} queries",
                    self.green.apply_to("✓")
                );
            }
            JobStatus::Error => {
                println!("  {} Job reported an error", self.red.apply_to("✗"));
            }
            JobStatus::Pending => {
                println!("  Job still pending");
            }
        }
    }

    /// Finaliza o spinner e exibe o motivo da falha do polling.
    pub fn fail(&self, error: &StatusError) {
        self.pb.finish_and_clear();
        println!(
            "  {} Polling failed ({}): {error}",
            self.red.apply_to("✗"),
            error.kind()
        );
    }
}

impl StatusObserver for PollProgress {
    fn on_status(&self, response: &StatusResponse) {
        let n = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        self.pb.set_message(format!("{} (query #{n})", response.status()));
    }
}
