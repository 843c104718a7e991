//! ForgeFunnel CLI - Build a client landing page
//!
//! Default: build templates + assets into the output directory
//! --check: preflight only, nothing written
//! --json: print the report as JSON to stdout
//! Exit 1 on config failure, 2 on missing placeholders or failed pages

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use forgefunnel_core::{
    config::{self, DEFAULT_CONFIG_PATH},
    logging::init_tracing,
    pipeline::{BuildPipeline, BuildReport, PageStatus, PAGES},
    assets::AssetAction,
    BuildSettings, ClientConfig, ConfigError, Preflight,
};

#[derive(Parser)]
#[command(name = "forgefunnel-cli")]
#[command(about = "ForgeFunnel CLI - Landing Page Compiler")]
struct Cli {
    /// Client config JSON
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Project root holding templates/, assets/ and output/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Path to templates directory (default: <root>/templates)
    #[arg(short, long)]
    templates_dir: Option<PathBuf>,

    /// Path to output directory (default: <root>/output)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to asset source directory (default: <root>/assets)
    #[arg(short, long)]
    assets_dir: Option<PathBuf>,

    /// Only check templates against the config
    #[arg(long)]
    check: bool,

    /// Print JSON instead of the summary
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn settings(&self) -> BuildSettings {
        let defaults = BuildSettings::from_root(&self.root);
        BuildSettings {
            template_dir: self.templates_dir.clone().unwrap_or(defaults.template_dir),
            output_dir: self.output_dir.clone().unwrap_or(defaults.output_dir),
            assets_dir: self.assets_dir.clone().unwrap_or(defaults.assets_dir),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            println!("❌ {}", e);
            if let ConfigError::NotFound(_) = e {
                print_available_configs();
            }
            return ExitCode::FAILURE;
        }
    };

    let settings = cli.settings();

    if cli.check {
        return run_check(&config, &settings, cli.json);
    }

    let pipeline = BuildPipeline::new(config, settings);

    if !cli.json {
        println!("🚀 Building funnel template...");
        println!("📁 Client: {}", pipeline.config().client_name().unwrap_or("(unnamed)"));
        println!("🎨 Primary Color: {}", pipeline.config().primary_color().unwrap_or("(none)"));
    }

    let report = match pipeline.build() {
        Ok(r) => r,
        Err(e) => {
            if cli.json {
                let output = serde_json::json!({ "success": false, "error": e.to_string() });
                println!("{}", output);
            } else {
                println!("❌ {}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("failed to encode report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&report);
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2) // A page or asset failed
    }
}

fn print_available_configs() {
    let dir = Path::new(DEFAULT_CONFIG_PATH)
        .parent()
        .unwrap_or_else(|| Path::new("config"));
    println!("Available config files:");
    for path in config::available_configs(dir) {
        println!("  - {}", path.display());
    }
}

fn run_check(config: &ClientConfig, settings: &BuildSettings, json: bool) -> ExitCode {
    let preflight = Preflight::new();
    let mut results = vec![];
    let mut unreadable = false;

    for (template, _) in PAGES {
        let path = settings.template_dir.join(template);
        match std::fs::read_to_string(&path) {
            Ok(text) => results.push(preflight.check(config, template, &text)),
            Err(e) => {
                unreadable = true;
                println!("❌ Error reading {}: {}", path.display(), e);
            }
        }
    }

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("failed to encode results: {}", e),
        }
    } else {
        for result in &results {
            let mark = if result.ready { "✅" } else { "❌" };
            println!("{} {}", mark, result.template);
            for v in &result.violations {
                println!("   [{:?}] {}: {}", v.severity, v.path, v.message);
            }
        }
    }

    if unreadable || results.iter().any(|r| r.has_errors()) {
        ExitCode::from(2) // Validation failure
    } else {
        ExitCode::SUCCESS
    }
}

fn print_summary(report: &BuildReport) {
    for page in &report.pages {
        match page.status {
            PageStatus::Built => println!("✅ Processed {} → {}", page.template, page.output),
            PageStatus::Failed => println!(
                "❌ Error processing {}: {}",
                page.template,
                page.error.as_deref().unwrap_or("unknown error")
            ),
        }
        for marker in &page.unresolved {
            println!("   ⚠️  Left unresolved: {}", marker);
        }
    }

    if !report.assets.report.source_found && report.assets.error.is_none() {
        println!("⚠️  No assets directory found - creating placeholder assets");
    }
    for action in &report.assets.report.actions {
        match action {
            AssetAction::CopiedFile(name) => println!("📄 Copied asset: {}", name),
            AssetAction::CopiedFolder(name) => println!("📁 Copied asset folder: {}", name),
            AssetAction::Placeholder(name) => println!("📄 Created placeholder: {}", name),
        }
    }
    for failure in &report.assets.report.failures {
        println!("❌ Error copying asset {}: {}", failure.name, failure.error);
    }
    if let Some(error) = &report.assets.error {
        println!("❌ Error copying assets: {}", error);
    }

    println!("✨ Template build complete!");
    println!("📂 Output directory: {}", report.output_dir.display());
    println!(
        "🌐 To preview: python3 -m http.server 8000 -d {}",
        report.output_dir.display()
    );
}
