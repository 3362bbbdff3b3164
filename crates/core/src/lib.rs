pub mod domain;
pub mod render;
pub mod screen;
pub mod view;

pub mod config {
    use anyhow::{ensure, Context};
    use std::time::Duration;

    const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;
    const DEFAULT_PORT: u16 = 3000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub analysis_delay_ms: u64,
        pub port: u16,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let analysis_delay_ms = match lookup("ANALYSIS_DELAY_MS") {
                Some(v) => v
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("ANALYSIS_DELAY_MS must be an integer (got {v:?})"))?,
                None => DEFAULT_ANALYSIS_DELAY_MS,
            };
            ensure!(
                analysis_delay_ms > 0,
                "ANALYSIS_DELAY_MS must be greater than zero"
            );

            let port = match lookup("PORT") {
                Some(v) => v
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a valid port number (got {v:?})"))?,
                None => DEFAULT_PORT,
            };

            Ok(Self {
                analysis_delay_ms,
                port,
                sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.trim().is_empty()),
            })
        }

        pub fn analysis_delay(&self) -> Duration {
            Duration::from_millis(self.analysis_delay_ms)
        }
    }

}
