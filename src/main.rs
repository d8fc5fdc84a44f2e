use anyhow::Result;
use clap::Parser;
use live_call_server::{create_router, AppState, Config};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "live-call-server", about = "Bidirectional call-audio echo service")]
struct Args {
    /// Path to the configuration file (extension optional)
    #[arg(long, default_value = "config/live-call")]
    config: String,

    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    let port = args.port.unwrap_or(cfg.service.port);
    let addr = format!("{}:{}", cfg.service.bind, port);

    info!("{} v0.1.0", cfg.service.name);
    info!(
        "audio profile: {}Hz, {}-bit, {} channel(s)",
        cfg.audio.sample_rate,
        cfg.audio.sample_width * 8,
        cfg.audio.channels
    );
    info!("recordings under {}", cfg.recording.base_dir.display());
    info!(
        "up to {} concurrent sessions, start message {}",
        cfg.session.max_sessions,
        if cfg.session.require_start_message {
            "required"
        } else {
            "optional"
        }
    );

    let app = create_router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {} (insecure)", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
