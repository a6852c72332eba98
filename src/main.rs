//! instance-diff: recursive comparison of object-store instance graphs
//!
//! Compares records across two database snapshots and lists every attribute
//! that differs, following references to a bounded depth.

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use instance_diff::{
    cli::{self, ClassRequest, PairRequest},
    config::{self, AppConfig, ConfigPreset},
    model::DbId,
    reports::ReportFormat,
};
use std::io::{self, Write as _};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with format support info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nSnapshot Formats:",
        "\n  JSON, YAML (schema + instances)",
        "\n\nOutput Formats:",
        "\n  text, summary, json"
    )
}

#[derive(Parser)]
#[command(name = "instance-diff")]
#[command(version, long_version = build_long_version())]
#[command(about = "Recursive comparison of object-store instance graphs", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  No differences (or --fail-on-diff not given)
    1  Differences found with --fail-on-diff
    3  Error occurred

EXAMPLES:
    # Compare one pathway across two releases
    instance-diff compare release-85.json release-86.json --id 109581

    # Follow references two levels deep and only look at names
    instance-diff compare old.json new.json --id 42 --depth 2 --only name,displayName

    # Compare every Pathway, JSON output for scripts
    instance-diff compare-class old.json new.json --class Pathway -o json > diff.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Options shared by every comparison command
#[derive(Parser)]
struct ComparisonArgs {
    /// Path to the left snapshot
    left: PathBuf,

    /// Path to the right snapshot
    right: PathBuf,

    /// Start from a named preset (default, strict, shallow, audit)
    #[arg(long)]
    preset: Option<String>,

    /// Reference hops to follow from the root pair (0 = root attributes only)
    #[arg(short, long)]
    depth: Option<usize>,

    /// Compare only these attributes (comma-separated)
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Exclude these attributes (comma-separated, repeatable)
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Exclude an attribute on one class and its subclasses, as Class.attribute
    #[arg(long = "exclude-on", value_name = "CLASS.ATTR")]
    exclude_on: Vec<String>,

    /// Exclude attributes whose names match this regex (repeatable)
    #[arg(long = "exclude-matching", value_name = "REGEX")]
    exclude_matching: Vec<String>,

    /// Also compare how many instances refer to the roots
    #[arg(long)]
    check_referrers: bool,

    /// Output format (auto: text on a terminal, summary otherwise)
    #[arg(short, long, default_value = "auto")]
    output: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Show at most this many difference lines per pair
    #[arg(long)]
    max_items: Option<usize>,

    /// Exit with code 1 if any difference is found
    #[arg(long)]
    fail_on_diff: bool,
}

/// Arguments for the `compare` subcommand
#[derive(Parser)]
struct CompareArgs {
    #[command(flatten)]
    common: ComparisonArgs,

    /// Root instance id in the left snapshot
    #[arg(long)]
    id: i64,

    /// Root instance id in the right snapshot (defaults to --id)
    #[arg(long)]
    right_id: Option<i64>,
}

/// Arguments for the `compare-class` subcommand
#[derive(Parser)]
struct CompareClassArgs {
    #[command(flatten)]
    common: ComparisonArgs,

    /// Root class; instances of subclasses are compared too
    #[arg(long)]
    class: String,

    /// Skip roots of these subclasses (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude_class: Vec<String>,

    /// Compare roots one at a time
    #[arg(long)]
    sequential: bool,

    /// List identical roots in the report
    #[arg(long)]
    include_identical: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare one root instance across two snapshots
    Compare(CompareArgs),

    /// Compare every instance of a class across two snapshots
    CompareClass(CompareClassArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate a man page and print it to stdout
    Man,
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .instance-diff.yaml in the current directory
    Init,
}

/// Layer command-line flags over the preset and the discovered config file.
fn build_config(cli: &Cli, args: &ComparisonArgs) -> Result<AppConfig> {
    let base = match &args.preset {
        Some(name) => {
            let preset = ConfigPreset::from_name(name).with_context(|| {
                let known: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
                format!("unknown preset '{name}' (expected one of: {})", known.join(", "))
            })?;
            AppConfig::from_preset(preset)
        }
        None => AppConfig::default(),
    };

    let (file_config, loaded_from) = config::load_or_default(cli.config.as_deref());
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file {}", path.display());
    }

    let mut overrides = AppConfig::builder()
        .check_referrers(args.check_referrers)
        .output_format(args.output)
        .output_file(args.output_file.clone())
        .no_color(cli.no_color)
        .fail_on_diff(args.fail_on_diff)
        .quiet(cli.quiet);
    if let Some(depth) = args.depth {
        overrides = overrides.max_depth(depth);
    }
    if !args.only.is_empty() {
        overrides = overrides.only_attributes(args.only.iter().cloned());
    }
    for name in &args.exclude {
        overrides = overrides.exclude_attribute(name.clone());
    }
    for spec in &args.exclude_on {
        let (class, attribute) = spec
            .split_once('.')
            .with_context(|| format!("--exclude-on expects Class.attribute, got '{spec}'"))?;
        overrides = overrides.exclude_on_class(class, attribute);
    }
    let mut overrides = overrides.build();
    overrides
        .comparison
        .exclude_patterns
        .extend(args.exclude_matching.iter().cloned());
    overrides.output.max_items = args.max_items;

    let mut config = base;
    config.merge(&file_config);
    config.merge(&overrides);
    // An explicit depth wins even when it equals the default
    if let Some(depth) = args.depth {
        config.comparison.max_depth = depth;
    }
    Ok(config)
}

fn exit_with(code: i32) -> Result<()> {
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    // Dispatch to command handlers
    match &cli.command {
        Commands::Compare(args) => {
            let config = build_config(&cli, &args.common)?;
            let request = PairRequest {
                left: args.common.left.clone(),
                right: args.common.right.clone(),
                left_id: DbId(args.id),
                right_id: DbId(args.right_id.unwrap_or(args.id)),
            };
            exit_with(cli::run_compare(config, &request)?)
        }

        Commands::CompareClass(args) => {
            let mut config = build_config(&cli, &args.common)?;
            config
                .batch
                .exclude_classes
                .extend(args.exclude_class.iter().cloned());
            if args.sequential {
                config.batch.parallel = false;
            }
            if args.include_identical {
                config.batch.include_identical = true;
            }
            let request = ClassRequest {
                left: args.common.left.clone(),
                right: args.common.right.clone(),
                class: args.class.clone(),
            };
            exit_with(cli::run_compare_class(config, &request)?)
        }

        Commands::Completions { shell } => {
            generate(*shell, &mut Cli::command(), "instance-diff", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let (config, loaded_from) = config::load_or_default(cli.config.as_deref());
                if let Some(path) = &loaded_from {
                    eprintln!("# Loaded from: {}", path.display());
                } else {
                    eprintln!("# No config file found; showing defaults");
                }
                let yaml =
                    serde_yaml_ng::to_string(&config).context("failed to serialize config")?;
                print!("{yaml}");
                Ok(())
            }
            ConfigAction::Path => {
                let search_paths: [Option<String>; 3] = [
                    std::env::current_dir()
                        .ok()
                        .map(|p| p.display().to_string()),
                    config::user_config_dir().map(|p| p.display().to_string()),
                    dirs::home_dir().map(|p| p.display().to_string()),
                ];
                eprintln!("Config file search paths (in order):");
                for path in search_paths.into_iter().flatten() {
                    eprintln!("  {path}");
                }
                eprintln!();
                eprintln!("Recognized file names:");
                for name in config::file::CONFIG_FILE_NAMES {
                    eprintln!("  {name}");
                }
                eprintln!();
                match config::discover_config_file(cli.config.as_deref()) {
                    Some(path) => eprintln!("Active config file: {}", path.display()),
                    None => eprintln!("No config file found."),
                }
                Ok(())
            }
            ConfigAction::Init => {
                let target = std::env::current_dir()
                    .context("cannot determine current directory")?
                    .join(".instance-diff.yaml");
                if target.exists() {
                    anyhow::bail!(
                        "{} already exists. Remove it first to re-initialize.",
                        target.display()
                    );
                }
                let content = config::generate_full_example_config();
                std::fs::write(&target, content)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                eprintln!("Created {}", target.display());
                Ok(())
            }
        },

        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut buf = Vec::new();
            man.render(&mut buf).context("failed to render man page")?;
            io::stdout().write_all(&buf)?;
            Ok(())
        }
    }
}
