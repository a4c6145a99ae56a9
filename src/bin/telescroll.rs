use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use telescroll::capture::{CancelToken, CaptureController};
use telescroll::encode::{Container, FfmpegEncoder};
use telescroll::layout::FontMeasurer;
use telescroll::playback::{PacedRefresh, SinkHandle, SystemClock, TracingSink, drive};
use telescroll::render::{CpuSurface, RecordingSurface, Surface};
use telescroll::{ProjectConfig, ScriptSummary, Studio};

#[derive(Parser, Debug)]
#[command(name = "telescroll", version, about = "Teleprompter-style scrolling text videos")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print word count, duration, and reading-speed hint for a script.
    Summary(ProjectArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Record the scrolling video (requires `ffmpeg` on PATH).
    Export(ExportArgs),
    /// Play back in real time without a window, logging progress.
    Play(PlayArgs),
}

#[derive(Args, Debug, Clone)]
struct ProjectArgs {
    /// Project JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script text (overrides the project's script).
    #[arg(long, conflicts_with = "script_file")]
    script: Option<String>,

    /// Read the script from a file.
    #[arg(long)]
    script_file: Option<PathBuf>,

    #[arg(long, value_enum)]
    gradient: Option<GradientArg>,

    /// Background image (cover-fit).
    #[arg(long)]
    background: Option<PathBuf>,

    /// Soundtrack, looped for the length of the video.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Font file used for the text.
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Scene length in milliseconds.
    #[arg(long)]
    duration_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Scroll progress in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Directory the video is written into.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    container: Option<ContainerArg>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Pause once playback reaches this position.
    #[arg(long)]
    pause_after_ms: Option<u64>,

    /// Resume after staying paused this long.
    #[arg(long, requires = "pause_after_ms")]
    resume_after_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GradientArg {
    DeepBlue,
    Navy,
    DarkTeal,
    Midnight,
}

impl From<GradientArg> for telescroll::GradientPreset {
    fn from(g: GradientArg) -> Self {
        match g {
            GradientArg::DeepBlue => Self::DeepBlue,
            GradientArg::Navy => Self::Navy,
            GradientArg::DarkTeal => Self::DarkTeal,
            GradientArg::Midnight => Self::Midnight,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ContainerArg {
    Mp4,
    Webm,
}

impl From<ContainerArg> for Container {
    fn from(c: ContainerArg) -> Self {
        match c {
            ContainerArg::Mp4 => Self::Mp4,
            ContainerArg::Webm => Self::WebM,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("telescroll=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Summary(args) => cmd_summary(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn load_project(args: &ProjectArgs) -> anyhow::Result<ProjectConfig> {
    let mut cfg = match &args.config {
        Some(path) => ProjectConfig::load(path)?,
        None => ProjectConfig::default(),
    };
    if let Some(script) = &args.script {
        cfg.script = Some(script.clone());
    }
    if let Some(path) = &args.script_file {
        cfg.script = None;
        cfg.script_path = Some(path.clone());
    }
    if let Some(g) = args.gradient {
        cfg.style.gradient = g.into();
    }
    if let Some(p) = &args.background {
        cfg.style.background_image = Some(p.clone());
    }
    if let Some(p) = &args.audio {
        cfg.audio = Some(p.clone());
    }
    if let Some(p) = &args.font {
        cfg.style.font_path = Some(p.clone());
    }
    if let Some(w) = args.width {
        cfg.canvas.width = w;
    }
    if let Some(h) = args.height {
        cfg.canvas.height = h;
    }
    if let Some(d) = args.duration_ms {
        cfg.scene_duration_ms = d;
    }
    cfg.validate().context("invalid project settings")?;
    Ok(cfg)
}

fn cpu_surface(cfg: &ProjectConfig) -> anyhow::Result<Box<dyn Surface>> {
    let font = FontMeasurer::discover(cfg.style.font_path.as_deref())?;
    Ok(Box::new(CpuSurface::new(cfg.canvas, font)?))
}

fn studio(cfg: &ProjectConfig, surface: Box<dyn Surface>) -> anyhow::Result<Studio> {
    let studio = Studio::from_config(
        cfg,
        surface,
        Box::new(SystemClock::new()),
        SinkHandle::new(TracingSink),
    )?;
    Ok(studio)
}

fn cmd_summary(args: ProjectArgs) -> anyhow::Result<()> {
    let cfg = load_project(&args)?;
    let script = cfg.script_text()?;
    let summary = ScriptSummary::from_script(&script, cfg.scene_duration_ms);
    println!("{summary}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.progress) {
        anyhow::bail!("--progress must be within [0, 1], got {}", args.progress);
    }
    let cfg = load_project(&args.project)?;
    let surface: Box<dyn Surface> = match cpu_surface(&cfg) {
        Ok(s) => s,
        Err(err) => {
            tracing::warn!(error = %err, "no font available; rendering the background only");
            Box::new(CpuSurface::shapes_only(cfg.canvas)?)
        }
    };
    let mut studio = studio(&cfg, surface)?;
    studio.generate()?;
    studio.player_mut().render_scene(0, args.progress)?;
    let frame = studio.player().snapshot();

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut cfg = load_project(&args.project)?;
    if let Some(dir) = args.out_dir {
        cfg.output.dir = dir;
    }
    if let Some(c) = args.container {
        cfg.output.container = c.into();
    }

    let mut studio = studio(&cfg, cpu_surface(&cfg)?)?;
    studio.generate()?;
    let controller = CaptureController::new(&cfg.output.dir).with_fps(cfg.fps);
    let mut encoder = FfmpegEncoder::new(cfg.output.container);
    let report = studio.export(&controller, &mut encoder, &CancelToken::new())?;

    eprintln!(
        "wrote {} ({} frames, {} bytes)",
        report.path.display(),
        report.frames,
        report.bytes
    );
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let cfg = load_project(&args.project)?;
    let surface: Box<dyn Surface> = match cpu_surface(&cfg) {
        Ok(s) => s,
        Err(err) => {
            tracing::warn!(error = %err, "no font available; playing without rasterizing text");
            Box::new(RecordingSurface::new(cfg.canvas))
        }
    };
    let mut studio = studio(&cfg, surface)?;
    studio.generate()?;
    studio.play()?;

    let mut refresh = PacedRefresh::default();
    let pause_after = args.pause_after_ms;
    let mut ticks = drive(studio.player_mut(), &mut refresh, |player| {
        if let Some(limit) = pause_after
            && player.state().elapsed_ms() >= limit
        {
            player.pause();
        }
        Ok(())
    })?;

    if let Some(wait) = args.resume_after_ms
        && studio.player().state().is_paused()
    {
        tracing::info!(wait_ms = wait, "paused; resuming shortly");
        std::thread::sleep(Duration::from_millis(wait));
        studio.play()?;
        ticks += drive(studio.player_mut(), &mut refresh, |_| Ok(()))?;
    }

    let state = studio.player().state();
    eprintln!(
        "played {ticks} frames, stopped at {} ms of {} ms",
        state.elapsed_ms(),
        state.total_duration_ms()
    );
    Ok(())
}
