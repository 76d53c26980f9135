use anyhow::{Context, Result};
use clap::Parser;
use fs_err as fs;
use std::sync::Arc;
use tracing::info;

use escaply::cli::{Args, Command, PlanArgs};
use escaply::config::Config;
use escaply::plan::Planner;
use escaply::server::{self, AppState};
use escaply::{provider, render, ux};

fn setup_logging(debug: bool) {
    let level = if debug { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut cfg);
    Ok(cfg)
}

fn build_planner(cfg: &Config) -> Result<Planner> {
    let planner = Planner::new(provider::make_provider(cfg)?);
    Ok(if cfg.save_artifacts {
        planner.with_artifacts(&cfg.artifacts_root)
    } else {
        planner
    })
}

async fn run_plan(planner: &Planner, p: &PlanArgs) -> Result<()> {
    let pb = (!p.no_progress).then(|| ux::spinner("Planning your trip"));
    let result = planner.generate(&p.constraints()).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let generated = result?;

    ux::show_itinerary(&generated.plan);
    ux::show_warnings(&generated.warnings);
    if let Some(dir) = &generated.artifacts {
        ux::show_artifacts(dir);
    }

    if let Some(out) = &p.out {
        let body = if p.json {
            serde_json::to_string_pretty(&generated.data)?
        } else {
            render::text_report(&generated.plan)
        };
        fs::write(out, body)?;
        println!("saved to {}", out.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    setup_logging(args.debug);

    let cfg = load_config(&args)?;
    info!(provider = ?cfg.provider, model = %cfg.model(), grounding = cfg.grounding, "configuration loaded");

    match &args.command {
        Some(Command::Check) => {
            ux::show_diagnostics(&server::diagnostics_for(&cfg));
            Ok(())
        }
        Some(Command::Plan(p)) => run_plan(&build_planner(&cfg)?, p).await,
        Some(Command::Serve) | None => {
            let planner = build_planner(&cfg)?;
            server::serve(AppState { planner: Arc::new(planner), config: Arc::new(cfg) }).await
        }
    }
}
