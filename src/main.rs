use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hel_assets::bundle::meta::load_meta;
use hel_assets::logging::init_logging;
use hel_assets::{MetaBuilder, ProjectConfig};

#[derive(Debug, Parser)]
#[command(name = "hel-assets", version, about = "Extract sub-application asset manifests")]
struct Cli {
  /// Enable debug logging.
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Scan a built sub-application and write its meta file.
  Extract(ExtractArgs),
  /// Summarize a previously written meta file.
  Inspect {
    /// Path to the meta JSON file.
    meta: PathBuf,
  },
}

#[derive(Debug, clap::Args)]
struct ExtractArgs {
  /// Project directory containing the configuration and build output.
  #[arg(long, default_value = ".")]
  project: PathBuf,
  /// Explicit configuration file; defaults to `hel.config.json` in the project directory.
  #[arg(long)]
  config: Option<PathBuf>,
  /// Build output directory, relative to the project directory.
  #[arg(long)]
  build_dir: Option<String>,
  /// Absolute URL the build is served from.
  #[arg(long)]
  home_page: Option<String>,
  /// Extract mode (`build` or `bu_st`).
  #[arg(long)]
  mode: Option<String>,
  /// Sub-application name.
  #[arg(long)]
  name: Option<String>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match cli.command {
    Command::Extract(args) => extract(args),
    Command::Inspect { meta } => inspect(&meta),
  }
}

fn extract(args: ExtractArgs) -> Result<()> {
  let mut config = match &args.config {
    Some(path) => ProjectConfig::from_path(path)
      .with_context(|| format!("failed to load configuration from {}", path.display()))?,
    None => ProjectConfig::discover(&args.project),
  };

  if let Some(build_dir) = args.build_dir {
    config.build_dir = build_dir;
  }
  if let Some(home_page) = args.home_page {
    config.app_home_page = home_page;
  }
  if let Some(mode) = args.mode {
    config.extract_mode = mode;
  }
  if let Some(name) = args.name {
    config.app_name = name;
  }

  let options = config.to_build_options(&args.project)?;
  let artifacts = MetaBuilder::new(options).build()?;
  let manifest = &artifacts.meta.manifest;

  println!(
    "{}: {} head / {} body assets, {} stylesheets, {} inline chunks, {} replacements",
    artifacts.meta.name,
    manifest.head_asset_list.len(),
    manifest.body_asset_list.len(),
    manifest.css_url_list.len(),
    artifacts.chunk_files.len(),
    artifacts.meta.replacements.len()
  );
  Ok(())
}

fn inspect(path: &std::path::Path) -> Result<()> {
  let meta = load_meta(path)?;

  println!(
    "{} ({}) served from {}",
    meta.name, meta.extract_mode, meta.home_page
  );
  println!(
    "head assets: {}, body assets: {}",
    meta.manifest.head_asset_list.len(),
    meta.manifest.body_asset_list.len()
  );
  for url in &meta.manifest.css_url_list {
    let marker = if meta.manifest.privileged_css_url_list.contains(url) {
      " (privileged)"
    } else {
      ""
    };
    println!("  css {url}{marker}");
  }
  Ok(())
}
