use anyhow::{Context, Result, bail};
use chartkit::colors::label_color;
use chartkit::labels::{HorzAlign, VertAlign};
use chartkit::{HeuristicMeasurer, LabelOptions, Value, build_interpolator, layout_label};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::debug;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chartkit",
    version,
    about = "Lay out chart labels and preview value transitions"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit a label into a box and print the layout as JSON.
    Layout(LayoutArgs),
    /// Interpolate between two JSON values and print the result(s).
    Tween(TweenArgs),
    /// Print the readable text colour for a background colour.
    LabelColor {
        /// Background colour (hex, rgb(), hsl(), named, ...)
        color: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HAlign {
    Left,
    Center,
    Right,
}

impl From<VAlign> for VertAlign {
    fn from(v: VAlign) -> Self {
        match v {
            VAlign::Top => VertAlign::Top,
            VAlign::Middle => VertAlign::Middle,
            VAlign::Bottom => VertAlign::Bottom,
        }
    }
}

impl From<HAlign> for HorzAlign {
    fn from(h: HAlign) -> Self {
        match h {
            HAlign::Left => HorzAlign::Left,
            HAlign::Center => HorzAlign::Center,
            HAlign::Right => HorzAlign::Right,
        }
    }
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Label text. Required unless given in --options.
    #[arg(short, long)]
    text: Option<String>,
    /// Box width in pixels.
    #[arg(short, long)]
    width: Option<f64>,
    /// Box height in pixels.
    #[arg(short = 'H', long)]
    height: Option<f64>,
    /// Use this font size instead of searching for the largest fit.
    #[arg(long)]
    font_size: Option<f64>,
    /// Largest font size to try (default 30).
    #[arg(long)]
    max_font_size: Option<f64>,
    /// Font weight (default 400).
    #[arg(long)]
    font_weight: Option<u16>,
    /// Line height as a multiple of the font size (default 1.2).
    #[arg(long)]
    line_height: Option<f64>,
    #[arg(long, value_enum)]
    vert_align: Option<VAlign>,
    #[arg(long, value_enum)]
    horz_align: Option<HAlign>,
    /// JSON file with label options; flags override its fields.
    #[arg(long)]
    options: Option<PathBuf>,
    /// Average glyph advance as a fraction of the font size.
    #[arg(long, default_value_t = 0.6)]
    em_ratio: f64,
}

#[derive(Args, Debug)]
struct TweenArgs {
    /// Start value: a JSON literal, or @path to a JSON file.
    #[arg(long)]
    from: String,
    /// End value: a JSON literal, or @path to a JSON file.
    #[arg(long)]
    to: String,
    /// Progress to evaluate at (0..1).
    #[arg(long, conflicts_with = "steps")]
    t: Option<f64>,
    /// Print this many evenly spaced samples from 0 to 1 instead.
    #[arg(long)]
    steps: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Tween(args) => cmd_tween(args),
        Command::LabelColor { color } => {
            println!("{}", label_color(&color));
            Ok(())
        }
    }
}

fn cmd_layout(args: LayoutArgs) -> Result<()> {
    let mut options = match &args.options {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<LabelOptions>(&raw)
                .with_context(|| format!("parsing label options in {}", path.display()))?
        }
        None => {
            let (Some(text), Some(width), Some(height)) = (&args.text, args.width, args.height)
            else {
                bail!("--text, --width and --height are required without --options");
            };
            LabelOptions::new(text.clone(), width, height)
        }
    };

    if let Some(text) = args.text {
        options.text = text;
    }
    if let Some(w) = args.width {
        options.width = w;
    }
    if let Some(h) = args.height {
        options.height = h;
    }
    if let Some(size) = args.font_size {
        options.fixed_font_size = Some(size);
    }
    if let Some(size) = args.max_font_size {
        options.max_font_size = size;
    }
    if let Some(weight) = args.font_weight {
        options.font_weight = weight;
    }
    if let Some(ratio) = args.line_height {
        options.line_height = ratio;
    }
    if let Some(v) = args.vert_align {
        options.vert_align = v.into();
    }
    if let Some(h) = args.horz_align {
        options.horz_align = h.into();
    }

    let measurer = HeuristicMeasurer {
        em_ratio: args.em_ratio,
    };
    let layout = layout_label(&options, &measurer);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

/// A JSON literal, or the contents of the file after `@`.
fn read_value(arg: &str) -> Result<Value> {
    let raw = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => arg.to_string(),
    };
    let json: JsonValue =
        serde_json::from_str(&raw).with_context(|| format!("invalid JSON value: {raw}"))?;
    Ok(Value::from(json))
}

fn cmd_tween(args: TweenArgs) -> Result<()> {
    let from = read_value(&args.from)?;
    let to = read_value(&args.to)?;
    let interp = build_interpolator(&from, &to)?;
    debug!("interpolating {} -> {}", from.kind(), to.kind());

    let out = match (args.t, args.steps) {
        (_, Some(steps)) => serde_json::to_string(&interp.samples(steps))?,
        (t, None) => serde_json::to_string(&interp.at(t.unwrap_or(1.0)))?,
    };
    println!("{out}");
    Ok(())
}
