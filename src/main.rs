use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use mobility_ai::config::AppConfig;
use mobility_ai::error::AppError;
use mobility_ai::telemetry;
use mobility_ai::workflows::sirw::{
    calendar, countries, sirw_router, AssessmentResult, ComplianceEngine, EvaluationContext,
    InMemoryRequestRepository, RoleCategory, SirwRequestService,
};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "SIRW Compliance Service",
    about = "Evaluate short-term international remote work requests against mobility policy",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a one-off compliance assessment and print the rule trace
    Assess(AssessArgs),
    /// Check whether a destination country is blocked for SIRW
    Country {
        /// Country name or ISO alpha-2 code
        name: String,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct AssessArgs {
    /// Country of employment
    #[arg(long)]
    home: String,
    /// Country where the remote work will take place
    #[arg(long)]
    destination: String,
    /// First day of the stay (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    start: NaiveDate,
    /// Last day of the stay (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    end: NaiveDate,
    /// Employee holds the right to work in the destination
    #[arg(long)]
    right_to_work: bool,
    /// Legacy contract-signing-authority flag
    #[arg(long)]
    sales_role: bool,
    /// Ineligible role category tokens (e.g. procurement), repeatable
    #[arg(long = "category", value_parser = parse_category)]
    categories: Vec<RoleCategory>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Assess(args) => run_assessment(args),
        Command::Country { name } => {
            run_country_check(&name);
            Ok(())
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_category(raw: &str) -> Result<RoleCategory, String> {
    RoleCategory::from_token(raw).ok_or_else(|| {
        let known: Vec<&str> = RoleCategory::ALL.iter().map(|c| c.token()).collect();
        format!("unknown role category '{raw}' (expected one of: {})", known.join(", "))
    })
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let repository = Arc::new(InMemoryRequestRepository::default());
    let service = Arc::new(SirwRequestService::new(repository, config.policy.clone()));

    let operational = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    let app = operational
        .merge(sirw_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "SIRW compliance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let context = EvaluationContext {
        has_right_to_work: args.right_to_work,
        is_sales_role: args.sales_role,
        ineligible_role_categories: args.categories.iter().copied().collect::<BTreeSet<_>>(),
        duration_days: calendar::workdays(args.start, args.end),
        home_country: args.home,
        destination_country: args.destination,
    };

    let engine = ComplianceEngine::new(config.policy);
    let result = engine
        .assess(&context)
        .map_err(mobility_ai::workflows::sirw::ServiceError::Context)?;

    render_assessment(&context, &result);
    Ok(())
}

fn run_country_check(name: &str) {
    let classification = countries::classify(name);
    if classification.blocked {
        let reason = classification
            .reason
            .map(|reason| reason.token())
            .unwrap_or("unknown");
        println!("BLOCKED ({reason})");
        if let Some(message) = classification.message {
            println!("{message}");
        }
    } else {
        println!("{name} is an eligible destination for SIRW.");
    }
}

fn render_assessment(context: &EvaluationContext, result: &AssessmentResult) {
    println!(
        "Assessment: {} -> {} ({} workdays)",
        context.home_country, context.destination_country, context.duration_days
    );
    println!("Outcome: {}", result.outcome.label());
    println!("Reason: {}", result.reason);
    if !result.escalation_note.is_empty() {
        println!("Escalation note: {}", result.escalation_note);
    }
    if !result.flags.is_empty() {
        let tokens: Vec<&str> = result.flags.iter().map(|flag| flag.token()).collect();
        println!("Flags: {}", tokens.join(", "));
    }
    println!();
    for verdict in &result.rules {
        let marker = if verdict.passed { "PASS" } else { "FAIL" };
        println!(
            "[{marker}] {} ({}): {}",
            verdict.name,
            verdict.severity.label(),
            verdict.reason
        );
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
