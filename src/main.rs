use std::path::Path;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use patrev::config::WorkbenchConfig;
use patrev::format::OutputFormat;
use patrev::model::fields::{FieldKey, FieldValues};
use patrev::model::pattern::Pattern;
use patrev::model::types::PatternId;
use patrev::store::{self, PATTERNS_KIND, PatternStore};
use patrev::{telemetry, tui};

/// Pattern review workbench
///
/// patrev loads software-license classification records ("patterns") and
/// opens a terminal workbench for reviewing them: a sortable candidate
/// table, a single-record detail sheet, and a compare-and-merge flow
/// where one record acts as the master and the others are diffed against
/// it field by field before batch registration.
///
/// Registration is demonstration-only — nothing is persisted.
///
/// QUICK START:
///
///   patrev                       # open the workbench on the sample set
///   patrev list                  # dump the records to stdout
///   patrev types --format json   # enumeration values as JSON
///
/// Records come from the built-in sample set unless patrev.toml points
/// [data] path at a JSON file. Set PATREV_LOG=stderr for JSON logs.
#[derive(Parser)]
#[command(name = "patrev")]
#[command(version, about)]
#[command(after_help = "See 'patrev <command> --help' for more information on a specific command.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal workbench (the default)
    Ui,

    /// Print the loaded records
    List {
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print one record's registration fields
    Show {
        /// The record id
        id: PatternId,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the enumeration values derived from the record set
    ///
    /// Software types, scan classifications, and software groups — each
    /// sorted and de-duplicated, with the "Unspecified" sentinel removed.
    Types {
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let config = WorkbenchConfig::load(Path::new("."))?;
    let store = config
        .data
        .path
        .clone()
        .map_or_else(PatternStore::builtin, PatternStore::from_file);

    // A failed fetch aborts here — no UI is built without records.
    let records = store.fetch(PATTERNS_KIND)?;

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => tui::run(records, config.ui.toast_secs),
        Commands::List { format } => list(&records, format),
        Commands::Show { id, format } => show(&records, id, format),
        Commands::Types { format } => types(&records, format),
    }
}

fn list(records: &[Pattern], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format.serialize(&records)?),
        OutputFormat::Text => {
            for p in records {
                println!(
                    "{:>3}  {:<10}  {:<34}  {:<30}  {}",
                    p.id, p.inspection_date, p.control_panel_name, p.copyright_name, p.license_type
                );
            }
        }
    }
    Ok(())
}

fn show(records: &[Pattern], id: PatternId, format: OutputFormat) -> Result<()> {
    let Some(pattern) = records.iter().find(|p| p.id == id) else {
        bail!("record {id} not found. Run 'patrev list' to see the known ids.");
    };

    match format {
        OutputFormat::Json => println!("{}", format.serialize(pattern)?),
        OutputFormat::Text => {
            let values = FieldValues::project(pattern);
            println!("{}", pattern.control_panel_name);
            for key in FieldKey::ALL {
                println!("  {:<22}{}", key.label(), values.get(key));
            }
        }
    }
    Ok(())
}

fn types(records: &[Pattern], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "swTypes": store::sw_types(records),
                "scanSwTypes": store::scan_sw_types(records),
                "swGroups": store::sw_groups(records),
            });
            println!("{}", format.serialize(&value)?);
        }
        OutputFormat::Text => {
            println!("Software types:");
            for value in store::sw_types(records) {
                println!("  {value}");
            }
            println!("Scan classifications:");
            for value in store::scan_sw_types(records) {
                println!("  {value}");
            }
            println!("Software groups:");
            for value in store::sw_groups(records) {
                println!("  {value}");
            }
        }
    }
    Ok(())
}
