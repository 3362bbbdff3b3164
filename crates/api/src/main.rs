use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockpick_core::render::html::{render_page, ANALYZE_PATH};
use stockpick_core::view::{
    AnalysisView, Control, TokioDelay, Trigger, ViewDriver, ViewHandle, ViewState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stockpick_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let view = ViewDriver::spawn(
        AnalysisView::reference(),
        Arc::new(TokioDelay::new(settings.analysis_delay())),
    );
    let app = router(AppState { view });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, delay_ms = settings.analysis_delay_ms, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        let err = anyhow::Error::new(e);
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "server stopped with error");
        return Err(err);
    }

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page))
        .route(ANALYZE_PATH, post(analyze_form))
        .route("/api/state", get(api_state))
        .route("/api/analyze", post(api_analyze))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Clone)]
struct AppState {
    view: ViewHandle,
}

#[derive(Debug, Serialize)]
struct ApiState {
    view: ViewState,
    control: Control,
}

#[derive(Debug, Serialize)]
struct ApiTrigger {
    outcome: Trigger,
}

async fn page(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let html = render_page(&state.view.state()).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "page render failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Html(html))
}

async fn trigger(view: &ViewHandle) -> Result<Trigger, StatusCode> {
    view.trigger().await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "trigger failed");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

async fn analyze_form(State(state): State<AppState>) -> Result<Redirect, StatusCode> {
    // The page disables the button while loading, so an ignored trigger just shows the page again.
    trigger(&state.view).await?;
    Ok(Redirect::to("/"))
}

async fn api_state(State(state): State<AppState>) -> Json<ApiState> {
    let view = state.view.state();
    let control = view.control();
    Json(ApiState { view, control })
}

async fn api_analyze(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiTrigger>), StatusCode> {
    let outcome = trigger(&state.view).await?;
    let status = match outcome {
        Trigger::Started => StatusCode::ACCEPTED,
        Trigger::Ignored => StatusCode::CONFLICT,
    };
    Ok((status, Json(ApiTrigger { outcome })))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &stockpick_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
