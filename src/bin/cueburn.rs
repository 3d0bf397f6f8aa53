use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cueburn", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Segment word timestamps into an SRT subtitle file.
    Segment(SegmentArgs),
    /// Render one caption as a PNG (for previewing styles).
    Render(RenderArgs),
    /// Burn an SRT file into a video (requires `ffmpeg` on PATH).
    Burn(BurnArgs),
}

#[derive(Parser, Debug)]
struct SegmentArgs {
    /// Input word-timestamp JSON (array of {text, start_sec, end_sec}).
    #[arg(long)]
    words: PathBuf,

    /// Output SRT path.
    #[arg(long)]
    out: PathBuf,

    /// Segmenter config JSON; defaults to three words per cue.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Caption text to rasterize.
    #[arg(long)]
    text: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Caption style JSON; defaults apply for missing fields.
    #[arg(long)]
    style: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BurnArgs {
    /// Input video file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Subtitle file to burn in.
    #[arg(long)]
    srt: PathBuf,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    /// Caption style JSON; defaults apply for missing fields.
    #[arg(long)]
    style: Option<PathBuf>,

    /// x264 constant rate factor (0..=51).
    #[arg(long, default_value_t = 18)]
    crf: u32,

    /// x264 preset.
    #[arg(long, default_value = "medium")]
    preset: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Segment(args) => cmd_segment(args),
        Command::Render(args) => cmd_render(args),
        Command::Burn(args) => cmd_burn(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let bytes =
        std::fs::read(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {what} JSON"))
}

fn read_style(path: Option<&Path>) -> anyhow::Result<cueburn::CaptionStyle> {
    match path {
        Some(p) => read_json(p, "caption style"),
        None => Ok(cueburn::CaptionStyle::default()),
    }
}

fn cmd_segment(args: SegmentArgs) -> anyhow::Result<()> {
    let cfg = match args.config.as_deref() {
        Some(p) => read_json::<cueburn::SegmenterConfig>(p, "segmenter config")?,
        None => cueburn::SegmenterConfig::default(),
    };

    let words = cueburn::read_words_json(&args.words)?;
    let cues = cueburn::generate_srt(&words, &args.out, &cfg)?;

    eprintln!("wrote {} ({} cues)", args.out.display(), cues.len());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let style = read_style(args.style.as_deref())?;
    style.validate()?;

    let font = cueburn::resolve_font(style.font_path.as_deref())?;
    let mut renderer = cueburn::CaptionRenderer::new(&font)?;
    let rendered = renderer.render_cue(&args.text, &style)?;

    cueburn::ensure_parent_dir(&args.out)?;
    cueburn::save_png(&rendered, &args.out)?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        rendered.width,
        rendered.height
    );
    Ok(())
}

fn cmd_burn(args: BurnArgs) -> anyhow::Result<()> {
    let style = read_style(args.style.as_deref())?;

    let mut encode = cueburn::default_h264_config(&args.out);
    encode.crf = args.crf;
    encode.preset = args.preset;

    let opts = cueburn::BurnOptions {
        video_path: args.in_path,
        srt_path: args.srt,
        style,
        encode,
    };
    cueburn::burn_captions(&opts)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
