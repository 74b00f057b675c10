use anyhow::Context;
use clap::Parser;
use decode_label::{
    Config, Direction, GlyphMode, ScrambleAnimator, SystemFrameClock, TerminalLine,
    config::{parse_duration, parse_whitelist},
    demo::{DemoControls, DemoScreen},
    scramble::GlyphGenerator,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Reveal text with a scrambled decoding animation.
#[derive(Parser)]
#[command(author, version, about = "Reveal text with a scrambled decoding animation", long_about = None)]
struct Cli {
    /// The text to decode. Opens the interactive screen when missing.
    text: Option<String>,

    /// The animation duration, in seconds.
    #[clap(short, long)]
    duration: Option<f64>,

    /// The class of glyphs shown for positions that haven't settled.
    #[clap(short, long, value_enum)]
    mode: Option<GlyphMode>,

    /// The end of the text that settles first.
    #[clap(long, value_enum)]
    direction: Option<Direction>,

    /// Characters that are never scrambled, e.g. ".,%".
    #[clap(short, long)]
    whitelist: Option<String>,

    /// The number of frames drawn per second.
    #[clap(long)]
    fps: Option<u32>,

    /// A seed for the glyph generator.
    #[clap(long)]
    seed: Option<u64>,

    /// The path to the configuration file.
    #[clap(short, long, env = "DECODE_LABEL_CONFIG")]
    config: Option<PathBuf>,

    /// Open the interactive screen.
    #[clap(short, long)]
    interactive: bool,

    /// Log debug information to stderr.
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply the command line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(duration) = self.duration {
            parse_duration(duration)?;
            config.defaults.duration = duration;
        }
        if let Some(mode) = self.mode {
            config.defaults.mode = mode;
        }
        if let Some(direction) = self.direction {
            config.defaults.direction = direction;
        }
        if let Some(whitelist) = &self.whitelist {
            config.whitelist = whitelist.chars().map(String::from).collect();
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(())
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("decode_label={level}")));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn glyphs(config: &Config) -> GlyphGenerator {
    match config.seed {
        Some(seed) => GlyphGenerator::with_seed(seed),
        None => GlyphGenerator::new(),
    }
}

fn decode_once(text: &str, config: &Config) -> anyhow::Result<()> {
    let animation = config.animation(text)?;
    let clock = SystemFrameClock::new(config.frame_rate);
    let line = TerminalLine::new(io::stdout());
    let mut animator = ScrambleAnimator::with_glyphs(clock, line, glyphs(config));
    animator.start(animation)?;
    animator.run_to_completion();
    let (_, line) = animator.into_parts();
    line.finish().context("failed to write to terminal")?;
    Ok(())
}

fn run_demo(config: &Config, text: Option<&str>) -> anyhow::Result<()> {
    let whitelist = parse_whitelist(&config.whitelist)?;
    let controls = DemoControls::new(config, whitelist).with_text(text.unwrap_or_default());
    let clock = SystemFrameClock::new(config.frame_rate);
    let screen = DemoScreen::new(io::stdout(), controls, clock, glyphs(config));
    screen.run().context("terminal error")?;
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config)?;
    tracing::info!("using frame rate {} and whitelist {:?}", config.frame_rate, config.whitelist);

    match (&cli.text, cli.interactive) {
        (Some(text), false) => decode_once(text, &config),
        (text, _) => run_demo(&config, text.as_deref()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
