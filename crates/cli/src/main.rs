use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use stockpick_core::config::Settings;
use stockpick_core::view::{AnalysisView, TokioDelay, Trigger, ViewDriver};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "stockpick_cli")]
struct Args {
    /// Simulated analysis delay in milliseconds. Defaults to ANALYSIS_DELAY_MS (2000).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    delay_ms: Option<u64>,

    /// Print the analysis as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let settings = load_settings(&args, |key| std::env::var(key).ok())?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let view = ViewDriver::spawn(
        AnalysisView::reference(),
        Arc::new(TokioDelay::new(settings.analysis_delay())),
    );

    let outcome = view.trigger().await?;
    anyhow::ensure!(
        outcome == Trigger::Started,
        "analysis did not start (outcome={outcome:?})"
    );
    eprintln!("{}", view.state().control().label);

    let analysis = match view.wait_analyzed().await {
        Ok(analysis) => analysis,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            return Err(err);
        }
    };

    tracing::info!(
        run_id = %analysis.run_id,
        picks = analysis.picks.len(),
        "analysis finished"
    );

    if args.json {
        let out = serde_json::to_string_pretty(&analysis).context("serialize analysis failed")?;
        println!("{out}");
    } else {
        print!("{}", stockpick_core::render::text::render_report(&analysis));
    }

    Ok(())
}

/// `--delay-ms` replaces ANALYSIS_DELAY_MS, so a bad value in the environment is never read.
fn load_settings(args: &Args, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Settings> {
    Settings::from_lookup(|key| match (key, args.delay_ms) {
        ("ANALYSIS_DELAY_MS", Some(ms)) => Some(ms.to_string()),
        _ => env(key),
    })
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from(["stockpick_cli", "--delay-ms", "50", "--json"]).unwrap();
        assert_eq!(args.delay_ms, Some(50));
        assert!(args.json);
    }

    #[test]
    fn rejects_zero_delay() {
        assert!(Args::try_parse_from(["stockpick_cli", "--delay-ms", "0"]).is_err());
    }

    #[test]
    fn delay_flag_overrides_invalid_env_delay() {
        let env = |key: &str| (key == "ANALYSIS_DELAY_MS").then(|| "0".to_string());

        let args = Args::try_parse_from(["stockpick_cli", "--delay-ms", "500"]).unwrap();
        let settings = load_settings(&args, env).unwrap();
        assert_eq!(settings.analysis_delay(), Duration::from_millis(500));

        let args = Args::try_parse_from(["stockpick_cli"]).unwrap();
        assert!(load_settings(&args, env).is_err());
    }

    #[test]
    fn env_delay_applies_without_flag() {
        let env = |key: &str| (key == "ANALYSIS_DELAY_MS").then(|| "750".to_string());
        let args = Args::try_parse_from(["stockpick_cli"]).unwrap();
        let settings = load_settings(&args, env).unwrap();
        assert_eq!(settings.analysis_delay_ms, 750);
    }

    #[test]
    fn delay_is_optional() {
        let args = Args::try_parse_from(["stockpick_cli"]).unwrap();
        assert_eq!(args.delay_ms, None);
        assert!(!args.json);
    }
}
