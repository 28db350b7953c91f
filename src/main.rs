use anyhow::Result;
use call_captions::{
    Config, MemoryHub, MemoryProvider, PeerSession, ScriptedRecognizerFactory, SessionConfig,
    Side, SyntheticMediaSource,
};
use clap::Parser;
use tracing::info;

/// Two in-process peers holding a captioned call.
#[derive(Parser)]
#[command(name = "call-captions")]
struct Args {
    /// Config file (TOML, extension optional)
    #[arg(long, default_value = "config/call-captions")]
    config: String,
}

fn session(
    hub: &MemoryHub,
    config: SessionConfig,
    script: Vec<&str>,
) -> PeerSession {
    PeerSession::new(
        config,
        Box::new(MemoryProvider::new(hub.clone())),
        Box::new(ScriptedRecognizerFactory::new(
            script.into_iter().map(String::from).collect(),
        )),
        Box::new(SyntheticMediaSource),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    let session_cfg = cfg.session_config();

    info!("call-captions demo");
    info!("summarizer endpoint: {}", cfg.summarizer.endpoint);
    let hint = call_captions::languages::find(&cfg.session.language)
        .map(|language| language.name)
        .unwrap_or("English");
    info!("summary language hint: {hint}");

    let hub = MemoryHub::new();
    let mut alice = session(
        &hub,
        session_cfg.clone(),
        vec!["good morning", "shall we go through the agenda"],
    );
    let mut bob = session(&hub, session_cfg, vec!["hi there", "yes let us start"]);

    alice.start().await?;
    let bob_id = bob.start().await?;

    alice.call(&bob_id).await?;
    bob.pump().await;
    alice.pump().await;
    info!(alice = ?alice.phase(), bob = ?bob.phase(), "call established");

    alice.start_recognition().await?;
    alice.pump().await;
    bob.pump().await;

    bob.start_recognition().await?;
    bob.pump().await;
    alice.pump().await;

    info!(
        local = ?alice.caption(Side::Local),
        remote = ?alice.caption(Side::Remote),
        "captions on alice's side"
    );

    println!("merged transcript:");
    for entry in alice.snapshot() {
        println!("  [{}] {}: {}", entry.timestamp, entry.participant_id, entry.text);
    }

    alice.end().await;
    bob.pump().await;
    info!(alice = ?alice.phase(), bob = ?bob.phase(), "sessions ended");

    Ok(())
}
