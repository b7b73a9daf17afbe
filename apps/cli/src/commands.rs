//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use notedown_core::pipeline::{self, ConvertJobConfig, ConvertJobResult, ProgressReporter};
use notedown_shared::{AppConfig, CodeLanguage, RenderConfig, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// notedown — turn exported course notes into Markdown.
#[derive(Parser)]
#[command(
    name = "notedown",
    version,
    about = "Convert exported course-note JSON into readable Markdown documents.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert a notes JSON export into a Markdown document.
    Convert {
        /// Input JSON file (flat note array or grouped course export).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output Markdown file. Defaults to `<course>.md` for grouped
        /// exports, otherwise the configured default path.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Course language selecting the code-fence hint: `js` or `css`.
        #[arg(short, long)]
        course: Option<String>,

        /// Drop timestamp footnote links from grouped exports.
        #[arg(long)]
        no_time_links: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "notedown=info",
        1 => "notedown=debug",
        _ => "notedown=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            input,
            output,
            course,
            no_time_links,
        } => cmd_convert(input, output, course.as_deref(), no_time_links).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_convert(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    course: Option<&str>,
    no_time_links: bool,
) -> Result<()> {
    let config = load_config()?;

    // CLI flags override config file values.
    let mut render = RenderConfig::try_from(&config)?;
    if let Some(course) = course {
        render.code_language = CodeLanguage::from_course(course);
    }
    if no_time_links {
        render.time_links = false;
    }

    let input = input.unwrap_or_else(|| PathBuf::from(&config.defaults.input));
    let default_output = PathBuf::from(&config.defaults.output);

    info!(input = %input.display(), "converting notes");

    let job = ConvertJobConfig {
        input,
        output,
        default_output,
        render,
    };

    let reporter = CliProgress::new();
    let result = pipeline::convert_notes(&job, &reporter).await?;

    println!();
    println!("  Notes converted successfully!");
    println!("  Source:  {}", result.source);
    println!("  Notes:   {}", result.note_count);
    println!("  Modules: {}", result.module_count);
    println!("  Output:  {}", result.output_path.display());
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn note_converted(&self, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Converting note [{current}/{total}]"));
    }

    fn done(&self, _result: &ConvertJobResult) {
        self.spinner.finish_and_clear();
    }
}
