// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the icon sprite generator.
//!
//! Without a subcommand the binary runs the one-shot generator. The `build`
//! subcommand inlines the sprite into a page and `serve` starts the
//! development server that rebuilds on every icon change.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process,
    time::Duration,
};

use clap::{ArgAction, Args, Parser, Subcommand};
use icon_sprite::{
    BuildHook, ConfigOverrides, DevServer, Error, GenerationReport, SpriteConfig, SpriteSettings,
    io_error, run_generation, write_artifact, write_error,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

/// Command line interface for generating icon sprites and identifier types.
#[derive(Debug, Parser,)]
#[command(name = "icon-sprite", version, about = "Merge SVG icons into a typed sprite")]
struct Cli
{
    #[command(subcommand)]
    command: Option<Command,>,

    /// Locations shared by every command.
    #[command(flatten)]
    source: SourceArgs,

    /// Output options used when the CLI is invoked without a subcommand.
    #[command(flatten)]
    legacy: GenerateArgs,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Generate the identifier module (and the standalone sprite, if
    /// configured) once.
    Generate(GenerateArgs,),
    /// Inline the sprite into an HTML page after generating artifacts.
    Build(BuildArgs,),
    /// Serve the sprite and rebuild it whenever an icon changes.
    Serve(ServeArgs,),
}

/// Where icons are read from and where artifacts are written to.
#[derive(Debug, Args, Default,)]
struct SourceArgs
{
    /// Optional YAML configuration document.
    #[arg(long = "config", value_name = "PATH", env = "ICON_SPRITE_CONFIG", global = true)]
    config: Option<PathBuf,>,

    /// Directory containing the `.svg` icon files.
    #[arg(long = "icons-dir", value_name = "DIR", env = "ICON_SPRITE_ICONS_DIR", global = true)]
    icons_dir: Option<PathBuf,>,

    /// Destination of the generated TypeScript identifier module.
    #[arg(
        long = "types-output",
        value_name = "PATH",
        env = "ICON_SPRITE_TYPES_OUTPUT",
        global = true
    )]
    types_output: Option<PathBuf,>,

    /// Destination of a standalone sprite document.
    #[arg(long = "sprite-output", value_name = "PATH", global = true)]
    sprite_output: Option<PathBuf,>,
}

/// Arguments accepted by the `generate` subcommand.
#[derive(Debug, Args, Default,)]
struct GenerateArgs
{
    /// Print the generation report as JSON instead of a summary.
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// Output formatted JSON for easier inspection. Implies `--json`.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct BuildArgs
{
    /// Page that receives the inline sprite.
    #[arg(long = "html", value_name = "PATH")]
    html: PathBuf,

    /// Destination of the transformed page. Defaults to rewriting `--html`.
    #[arg(long = "out", value_name = "PATH")]
    out: Option<PathBuf,>,
}

#[derive(Debug, Args,)]
struct ServeArgs
{
    /// Socket address the development server binds to.
    #[arg(long = "address", value_name = "HOST:PORT")]
    address: Option<String,>,
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, pipeline, and server errors.
fn run() -> Result<(), Error,>
{
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Generate(args,),) => run_generate(&cli.source, &args,),
        Some(Command::Build(args,),) => run_build(&cli.source, &args,),
        Some(Command::Serve(args,),) => run_serve(&cli.source, args,),
        None => run_generate(&cli.source, &cli.legacy,),
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

fn resolve_settings(
    source: &SourceArgs,
    dev_address: Option<String,>,
) -> Result<SpriteSettings, Error,>
{
    let config = match source.config.as_deref() {
        Some(path,) => SpriteConfig::load(path,)?,
        None => SpriteConfig::default(),
    };

    config.resolve(&ConfigOverrides {
        icons_dir: source.icons_dir.clone(),
        types_output: source.types_output.clone(),
        sprite_output: source.sprite_output.clone(),
        dev_address,
    },)
}

fn run_generate(source: &SourceArgs, args: &GenerateArgs,) -> Result<(), Error,>
{
    let settings = resolve_settings(source, None,)?;

    let pb = ProgressBar::new_spinner();
    if let Ok(style,) =
        ProgressStyle::default_spinner().template("{spinner:.yellow} [{elapsed_precise}] {msg}",)
    {
        pb.set_style(style,);
    }
    pb.enable_steady_tick(Duration::from_millis(100,),);
    pb.set_message(format!("Generating sprite from {}...", settings.icons_dir.display()),);

    let outcome = run_generation(&settings,);
    pb.finish_and_clear();
    let report = outcome?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.json || args.pretty {
        write_report_json(&mut handle, &report, args.pretty,)
    } else {
        write_summary(&mut handle, &report,)
    }
}

fn write_report_json<W: io::Write,>(
    writer: &mut W,
    report: &GenerationReport,
    pretty: bool,
) -> Result<(), Error,>
{
    if pretty {
        serde_json::to_writer_pretty(writer, report,)?;
    } else {
        serde_json::to_writer(writer, report,)?;
    }

    Ok((),)
}

fn write_summary<W: io::Write,>(writer: &mut W, report: &GenerationReport,) -> Result<(), Error,>
{
    render_summary(writer, report,).map_err(|source| write_error(Path::new("<stdout>",), source,),)
}

fn render_summary<W: io::Write,>(writer: &mut W, report: &GenerationReport,) -> io::Result<(),>
{
    if report.is_empty() {
        return writeln!(writer, "No icons found.");
    }

    writeln!(writer, "Found {} icon(s):", report.icon_names.len())?;
    for name in report.icon_names.iter() {
        writeln!(writer, "  {name}")?;
    }
    if let Some(path,) = report.types_output.as_deref() {
        writeln!(writer, "\nTypes generated: {}", path.display())?;
    }
    if let Some(path,) = report.sprite_output.as_deref() {
        writeln!(writer, "Sprite written: {}", path.display())?;
    }

    Ok((),)
}

fn run_build(source: &SourceArgs, args: &BuildArgs,) -> Result<(), Error,>
{
    let settings = resolve_settings(source, None,)?;
    let mut hook = BuildHook::new(settings,)?;
    hook.build_start()?;

    let html = fs::read_to_string(&args.html,).map_err(|e| io_error(&args.html, e,),)?;
    let transformed = hook.transform_index_html(&html,);

    let destination = args.out.as_deref().unwrap_or(args.html.as_path(),);
    write_artifact(destination, &transformed,)
}

fn run_serve(source: &SourceArgs, args: ServeArgs,) -> Result<(), Error,>
{
    let settings = resolve_settings(source, args.address,)?;
    DevServer::new(settings,).serve()
}
