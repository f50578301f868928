use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sigform", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten a recorded form into a PNG.
    Snapshot(SnapshotArgs),
    /// Run the full submission pipeline for a recorded form.
    Submit(SubmitArgs),
    /// Print the default configuration as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Recorded form JSON (fields plus per-pad ink).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Date printed in the date stamp (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<chrono::NaiveDate>,
}

#[derive(Parser, Debug)]
struct SubmitArgs {
    /// Recorded form JSON (fields plus per-pad ink).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Upload endpoint, overriding config and environment.
    #[arg(long)]
    endpoint: Option<String>,

    /// Config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// On-disk form recording.
#[derive(serde::Deserialize, Debug)]
struct RecordedForm {
    fields: sigform::FormFields,
    #[serde(default)]
    pads: BTreeMap<sigform::SignerRole, RecordedPad>,
}

#[derive(serde::Deserialize, Debug, Default)]
struct RecordedPad {
    #[serde(default)]
    layout: Option<sigform::SurfaceSize>,
    #[serde(default)]
    segments: Vec<sigform::InkSegment>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sigform=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Snapshot(args) => cmd_snapshot(args).await,
        Command::Submit(args) => cmd_submit(args).await,
        Command::Config => {
            let json = serde_json::to_string_pretty(&sigform::SigformConfig::default())?;
            println!("{json}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<sigform::SigformConfig> {
    let cfg = match path {
        Some(p) => sigform::SigformConfig::from_path(p)?,
        None => sigform::SigformConfig::default(),
    };
    let cfg = cfg.with_env_overrides();
    cfg.validate()?;
    Ok(cfg)
}

fn read_recording(path: &Path) -> anyhow::Result<RecordedForm> {
    let f = File::open(path).with_context(|| format!("open recording '{}'", path.display()))?;
    let rec: RecordedForm = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse recording '{}'", path.display()))?;
    Ok(rec)
}

fn apply_recording(ctx: &mut sigform::FormContext, rec: RecordedForm) {
    ctx.model.set_fields(rec.fields);
    for (role, pad) in rec.pads {
        let surface = ctx.model.surface_mut(role);
        if let Some(layout) = pad.layout {
            surface.rescale(layout);
        }
        surface.load_segments(pad.segments);
    }
}

async fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let rec = read_recording(&args.in_path)?;

    let mut ctx = sigform::FormContext::new(cfg.brush.clone(), cfg.labels.clone());
    apply_recording(&mut ctx, rec);

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let rasterizer = sigform::DocumentRasterizer::new(cfg.capture.clone());
    let snapshot = tokio::task::spawn_blocking(move || rasterizer.snapshot(&ctx, date))
        .await
        .context("snapshot task")??;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, snapshot.png_bytes()?)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        snapshot.size.width,
        snapshot.size.height
    );
    Ok(())
}

async fn cmd_submit(args: SubmitArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        cfg.upload.endpoint = endpoint;
    }
    let rec = read_recording(&args.in_path)?;

    let services = sigform::Services {
        renderer: Arc::new(sigform::DocumentRasterizer::new(cfg.capture.clone())),
        uploader: Arc::new(sigform::HttpUploadClient::new(&cfg.upload)?),
        clock: Arc::new(sigform::TokioClock::new()),
        feedback: Arc::new(sigform::TracingFeedback),
    };
    let session = sigform::FormSession::new(cfg, services);
    session.with_form(|ctx| apply_recording(ctx, rec));

    match session.submit().await {
        sigform::SubmitOutcome::Submitted(ack) => {
            eprintln!(
                "submitted{}",
                ack.filename
                    .map(|f| format!(" as {f}"))
                    .unwrap_or_default()
            );
            Ok(())
        }
        sigform::SubmitOutcome::Rejected(reason) => anyhow::bail!("rejected: {reason}"),
        sigform::SubmitOutcome::Failed(reason) => anyhow::bail!("submission failed: {reason}"),
        sigform::SubmitOutcome::Ignored => anyhow::bail!("submission already in flight"),
    }
}
