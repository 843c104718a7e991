//! ForgeFunnel Renumber - Reorder testimonial images best to worst
//!
//! Uses the built-in tier table unless --mapping is given.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use forgefunnel_core::{
    logging::init_tracing,
    renumber::{renumber, RenumberPlan, RenumberReport, DEFAULT_DIR},
};

#[derive(Parser)]
#[command(name = "forgefunnel-renumber")]
#[command(about = "Renumber testimonial images according to a position table")]
struct Cli {
    /// Folder holding testimonial-NNN.png files
    #[arg(short, long, default_value = DEFAULT_DIR)]
    dir: PathBuf,

    /// JSON array of [old, new] pairs replacing the built-in table
    #[arg(short, long)]
    mapping: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let plan = match &cli.mapping {
        Some(path) => match RenumberPlan::load_mapping(path) {
            Ok(mapping) => RenumberPlan::new(&cli.dir, mapping),
            Err(e) => {
                println!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => RenumberPlan::with_default_order(&cli.dir),
    };

    if !cli.json {
        println!("📋 Starting testimonial reorganization...");
        println!("   Organizing from BEST results (Top Tier) to earliest sales (Early Stage)\n");
    }

    let report = match renumber(&plan) {
        Ok(r) => r,
        Err(e) => {
            println!("Error: {}", e);
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
        print_report(&plan, &report);
    }

    ExitCode::SUCCESS
}

fn print_report(plan: &RenumberPlan, report: &RenumberReport) {
    for (old, new) in &report.staged {
        println!("   ✓ Copied {:03} → {}", old, plan.temp_name(*new));
    }
    for name in &report.missing {
        println!("   ⚠ Missing: {}", name);
    }
    for c in &report.collisions {
        println!(
            "   ⚠ Position {:03} assigned to {:03} and {:03}; the later entry wins",
            c.position, c.discarded, c.winner
        );
    }

    println!("\n   Finalizing new numbering...");
    for name in &report.finalized {
        println!("   ✓ Finalized: {}", name);
    }
    for name in &report.cleaned {
        println!("   ✓ Cleaned up: {}", name);
    }

    println!("\n✨ Testimonial reorganization complete!");
    println!("   {} staged, {} missing, {} finalized", report.staged.len(), report.missing.len(), report.finalized.len());
}
