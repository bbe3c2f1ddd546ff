use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use fieldorder::app::persist::state_path_for;
use fieldorder::{apply_order, inspect, reset_order, ProtectedSet};

#[derive(Parser)]
#[command(name = "fieldorder", version, about = "Reorder user fields in KiCad schematic symbols")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List present user fields and the saved order for a schematic
    Show(ShowArgs),

    /// Reorder fields in every symbol and write the schematic back
    Apply(ApplyArgs),

    /// Replace the saved order with the fields currently in the schematic
    Reset(ResetArgs),
}

#[derive(clap::Args)]
struct ShowArgs {
    /// Path to the .kicad_sch file
    file: PathBuf,

    /// Treat an extra field name as protected. Repeatable.
    #[arg(long = "protect")]
    protect: Vec<String>,
}

#[derive(clap::Args)]
struct ApplyArgs {
    /// Path to the .kicad_sch file
    file: PathBuf,

    /// Target order as a comma-separated list of field names
    /// (defaults to the saved per-schematic order)
    #[arg(short, long, value_delimiter = ',')]
    order: Option<Vec<String>>,

    /// Treat an extra field name as protected. Repeatable.
    #[arg(long = "protect")]
    protect: Vec<String>,
}

#[derive(clap::Args)]
struct ResetArgs {
    /// Path to the .kicad_sch file
    file: PathBuf,

    /// Treat an extra field name as protected. Repeatable.
    #[arg(long = "protect")]
    protect: Vec<String>,
}

fn protected_set(extra: Vec<String>) -> ProtectedSet {
    let mut set = ProtectedSet::default();
    set.extend(extra);
    set
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Show(args) => run_show(args),
        Command::Apply(args) => run_apply(args),
        Command::Reset(args) => run_reset(args),
    };
    if let Err(e) = result {
        eprintln!("fieldorder: {}", e);
        process::exit(1);
    }
}

fn run_show(args: ShowArgs) -> fieldorder::Result<()> {
    let protected = protected_set(args.protect);
    let report = inspect(&args.file, &protected)?;

    println!("Present user fields: {}", report.present.len());
    for name in &report.present {
        println!("  - {}", name);
    }
    if report.has_saved_order {
        println!("\nSaved order ({}):", state_path_for(&args.file).display());
    } else {
        println!("\nNo saved order; order as found in the schematic:");
    }
    for name in &report.reconciled.order {
        println!("  - {}", name);
    }
    print_name_list("Removed (no longer present)", &report.reconciled.removed);
    print_name_list("Added (newly present)", &report.reconciled.added);
    println!("\nProtected fields: {}", protected.names().join(", "));
    Ok(())
}

fn run_apply(args: ApplyArgs) -> fieldorder::Result<()> {
    let protected = protected_set(args.protect);
    let report = apply_order(&args.file, args.order.as_deref(), &protected)?;

    println!("{}", if report.changed { "Modified" } else { "No change" });
    println!("Symbols reordered: {}", report.symbols_touched);
    println!("Saved order file: {}", state_path_for(&args.file).display());
    if let Some(receipt) = &report.receipt {
        println!("Backup: {}", receipt.backup_path.display());
        for note in &receipt.diagnostics {
            eprintln!("warning: {}", note);
        }
    }
    print_name_list("Removed (no longer present)", &report.removed);
    print_name_list("Added (newly present)", &report.added);
    print_name_list("Names with 0 placements", &report.zero_hit_names);
    Ok(())
}

fn run_reset(args: ResetArgs) -> fieldorder::Result<()> {
    let seeded = reset_order(&args.file, &protected_set(args.protect))?;
    println!("Saved order reset to the {} fields present in the schematic:", seeded.len());
    for name in &seeded {
        println!("  - {}", name);
    }
    Ok(())
}

fn print_name_list(title: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    println!("\n{}:", title);
    for name in names {
        println!("  - {}", name);
    }
}
