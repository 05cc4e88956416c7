use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use serde::Deserialize;
use snapsheet_core::config::{PageOrientation, PageSize, SortOrder};
use snapsheet_core::{Layout, PackerConfig, pack_layout, to_json_hash, to_json_pages};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "snapsheet",
    about = "Lay out screenshots onto printable pages",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute page placements and export them as JSON
    Layout(LayoutArgs),
    /// Simple timing bench (lays out once, prints time + occupancy)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct LayoutArgs {
    // Input/Output
    /// Image file, directory of images, or JSON manifest ([{"id","width","height"}])
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output file for the layout JSON (stdout when omitted)
    #[arg(short, long, help_heading = "Input/Output")]
    out: Option<PathBuf>,
    /// YAML config file path (overrides page and placement options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    #[command(flatten)]
    opts: PageArgs,

    // Export
    /// Layout format: pages | hash
    #[arg(long, default_value = "pages", value_parser = ["pages", "hash"], help_heading = "Export")]
    format: String,
    /// Export layout stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(clap::Args, Debug, Clone)]
struct PageArgs {
    /// Page preset: a3 | a4 | a5 | letter | legal | <W>x<H>
    #[arg(long, default_value = "a4", help_heading = "Page")]
    page: String,
    /// Page orientation: portrait | landscape
    #[arg(long, default_value = "portrait", help_heading = "Page")]
    orientation: String,
    /// Explicit page width in mm (overrides --page)
    #[arg(long, requires = "page_height", help_heading = "Page")]
    page_width: Option<f64>,
    /// Explicit page height in mm (overrides --page)
    #[arg(long, requires = "page_width", help_heading = "Page")]
    page_height: Option<f64>,
    /// Blank border on every side (mm)
    #[arg(long, default_value_t = 10.0, help_heading = "Page")]
    margin: f64,

    // Placement
    /// Clearance between screenshots (mm)
    #[arg(long, default_value_t = 5.0, help_heading = "Placement")]
    gap: f64,
    /// Allow 90deg rotation when the upright orientation does not fit
    #[arg(long, default_value_t = false, action=ArgAction::Set, help_heading = "Placement")]
    allow_rotation: bool,
    /// Pixels to mm (0.1 => 1920px prints 192mm wide)
    #[arg(long, default_value_t = 0.1, help_heading = "Placement")]
    scale: f64,
    /// Largest fractional size reduction accepted as a last resort (0 disables)
    #[arg(long, default_value_t = 0.0, help_heading = "Placement")]
    shrink_tolerance: f64,
    /// Sort order: area_desc|max_side_desc|none
    #[arg(long, default_value = "area_desc", help_heading = "Placement")]
    sort_order: String,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Image file, directory of images, or JSON manifest
    input: PathBuf,
    #[command(flatten)]
    opts: PageArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Layout(args) => run_layout(args, cli.progress && !cli.quiet),
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_layout(cli: &LayoutArgs, show_progress: bool) -> anyhow::Result<()> {
    let base = page_config(&cli.opts)?;
    // Config file sets page/placement options field by field
    let cfg = if let Some(path) = &cli.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_packer_config(base, parse_orientation(&cli.opts.orientation)?)?
    } else {
        base
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let entries = load_entries(&cli.input, &cli.include, &cli.exclude, show_progress)?;
    info!(count = entries.len(), "loaded screenshot sizes");

    let layout = pack_layout(entries, cfg)?;
    let stats = layout.stats();
    info!(
        pages = stats.num_pages,
        placed = stats.num_placed,
        dropped = stats.num_dropped,
        occupancy = format!("{:.2}%", stats.occupancy * 100.0),
        "stats"
    );

    let json_value = match cli.format.as_str() {
        "hash" => to_json_hash(&layout),
        _ => to_json_pages(&layout),
    };
    let json = serde_json::to_string_pretty(&json_value)?;
    if !cli.dry_run {
        match &cli.out {
            Some(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    fs::create_dir_all(dir)
                        .with_context(|| format!("create dir {}", dir.display()))?;
                }
                fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
                info!(?path, pages = layout.page_count, "layout written");
            }
            None => println!("{}", json),
        }
    }

    if let Some(stats_path) = &cli.export_stats {
        if !cli.dry_run {
            fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
                .with_context(|| format!("write {}", stats_path.display()))?;
            info!(?stats_path, "stats exported");
        } else {
            println!("{}", stats.summary());
        }
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    use std::time::Instant;
    let cfg = page_config(&b.opts)?;
    let entries = load_entries(&b.input, &[], &[], false)?;
    let start = Instant::now();
    let layout: Layout = pack_layout(entries, cfg)?;
    let dur = start.elapsed();
    let stats = layout.stats();
    println!(
        "pages={} placed={} dropped={} occupancy={:.2}% time={}",
        stats.num_pages,
        stats.num_placed,
        stats.num_dropped,
        stats.occupancy * 100.0,
        bench_fmt_dur(dur)
    );
    Ok(())
}

fn bench_fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn page_config(args: &PageArgs) -> anyhow::Result<PackerConfig> {
    let builder = PackerConfig::builder();
    let builder = match (args.page_width, args.page_height) {
        (Some(w), Some(h)) => builder.with_page_dimensions(w, h),
        _ => builder.page_size(
            parse_page_size(&args.page)?,
            parse_orientation(&args.orientation)?,
        ),
    };
    Ok(builder
        .margin(args.margin)
        .gap(args.gap)
        .allow_rotation(args.allow_rotation)
        .scale(args.scale)
        .shrink_tolerance(args.shrink_tolerance)
        .sort_order(parse_sort_order(&args.sort_order)?)
        .build())
}

/// One manifest row: a screenshot the editor already knows the size of.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    id: String,
    width: f64,
    height: f64,
}

fn load_entries(
    input: &Path,
    include: &[String],
    exclude: &[String],
    progress: bool,
) -> anyhow::Result<Vec<(String, f64, f64)>> {
    if input.is_file() && is_manifest(input) {
        let text = fs::read_to_string(input)
            .with_context(|| format!("read manifest {}", input.display()))?;
        let rows: Vec<ManifestEntry> = serde_json::from_str(&text)
            .with_context(|| format!("parse manifest {}", input.display()))?;
        return Ok(rows.into_iter().map(|r| (r.id, r.width, r.height)).collect());
    }
    let paths = gather_paths(input, include, exclude)?;
    if paths.is_empty() {
        warn!(input = %input.display(), "no images found");
    }
    read_dimensions_with_progress(&paths, progress)
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn extension_lower(p: &Path) -> Option<String> {
    p.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
}

fn is_image(p: &Path) -> bool {
    matches!(
        extension_lower(p),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

fn is_manifest(p: &Path) -> bool {
    extension_lower(p).as_deref() == Some("json")
}

fn read_dimensions_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<(String, f64, f64)>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        // header-only read; pixels are never decoded
        match image::image_dimensions(p) {
            Ok((w, h)) => {
                let key = p.to_string_lossy().replace('\\', "/");
                list.push((key, w as f64, h as f64));
            }
            Err(e) => {
                warn!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    page: Option<String>,
    orientation: Option<String>,
    page_width: Option<f64>,
    page_height: Option<f64>,
    margin: Option<f64>,
    gap: Option<f64>,
    allow_rotation: Option<bool>,
    scale: Option<f64>,
    shrink_tolerance: Option<f64>,
    sort_order: Option<String>,
}

impl YamlConfig {
    /// `orientation` is the command-line orientation, used when the file names a page
    /// preset without one.
    fn into_packer_config(
        self,
        mut cfg: PackerConfig,
        orientation: PageOrientation,
    ) -> anyhow::Result<PackerConfig> {
        let own_orientation = self
            .orientation
            .as_deref()
            .map(parse_orientation)
            .transpose()?;
        let size = match self.page {
            Some(v) => Some(parse_page_size(&v)?),
            // orientation alone turns the current page
            None => own_orientation.map(|_| PageSize::Custom {
                width: cfg.page_width,
                height: cfg.page_height,
            }),
        };
        if let Some(size) = size {
            let (w, h) = size.oriented(own_orientation.unwrap_or(orientation));
            cfg.page_width = w;
            cfg.page_height = h;
        }
        if let Some(v) = self.page_width {
            cfg.page_width = v;
        }
        if let Some(v) = self.page_height {
            cfg.page_height = v;
        }
        if let Some(v) = self.margin {
            cfg.margin = v;
        }
        if let Some(v) = self.gap {
            cfg.gap = v;
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        if let Some(v) = self.scale {
            cfg.scale = v;
        }
        if let Some(v) = self.shrink_tolerance {
            cfg.shrink_tolerance = v;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = parse_sort_order(&v)?;
        }
        Ok(cfg)
    }
}

fn parse_page_size(s: &str) -> anyhow::Result<PageSize> {
    s.parse()
        .map_err(|_| anyhow!("unknown page size: {} (expected a3|a4|a5|letter|legal|WxH)", s))
}

fn parse_orientation(s: &str) -> anyhow::Result<PageOrientation> {
    s.parse()
        .map_err(|_| anyhow!("unknown orientation: {}", s))
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse()
        .map_err(|_| anyhow!("unknown sort order: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> YamlConfig {
        serde_yaml::from_str(text).expect("yaml")
    }

    #[test]
    fn yaml_page_keeps_command_line_orientation() {
        let cfg = yaml("page: a5\n")
            .into_packer_config(PackerConfig::default(), PageOrientation::Landscape)
            .expect("config");
        assert_eq!((cfg.page_width, cfg.page_height), (210.0, 148.0));
    }

    #[test]
    fn yaml_orientation_overrides_command_line() {
        let cfg = yaml("page: a5\norientation: portrait\n")
            .into_packer_config(PackerConfig::default(), PageOrientation::Landscape)
            .expect("config");
        assert_eq!((cfg.page_width, cfg.page_height), (148.0, 210.0));
    }

    #[test]
    fn yaml_orientation_alone_turns_the_current_page() {
        let cfg = yaml("orientation: landscape\nmargin: 5.0\n")
            .into_packer_config(PackerConfig::default(), PageOrientation::Portrait)
            .expect("config");
        assert_eq!((cfg.page_width, cfg.page_height), (297.0, 210.0));
        assert_eq!(cfg.margin, 5.0);
    }

    #[test]
    fn unknown_yaml_sort_order_is_an_error() {
        let err = yaml("sort_order: shuffle\n")
            .into_packer_config(PackerConfig::default(), PageOrientation::Portrait);
        assert!(err.is_err());
    }
}
