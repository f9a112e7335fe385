#![forbid(unsafe_code)]
use anyhow::Result;
use rotaplan::{
    calendar, io,
    model::{InputBundle, WorkShift},
    scheduler::{generate_schedule, Scheduler},
};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification des rotations (lot JSON en entrée, résultat JSON en sortie)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Lot d'entrée JSON (configuration, cycles, positions, opérateurs)
    #[arg(long, global = true, default_value = "bundle.json")]
    input: String,

    /// Remplace l'année d'analyse du lot
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Remplace le mois de départ du lot (1-12)
    #[arg(long, global = true)]
    start_month: Option<u32>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le planning complet
    Run {
        /// Fichier JSON de sortie
        #[arg(long, default_value = "schedule.json")]
        out: String,
    },

    /// Vérifier la couverture (trous et doublons)
    Check,

    /// Afficher les créneaux de congés attribués
    Plan,
}

fn load(cli: &Cli) -> Result<InputBundle> {
    let mut bundle = io::load_bundle(&cli.input)?;
    if let Some(year) = cli.year {
        bundle.configuration.analysis_year = year;
    }
    if let Some(month) = cli.start_month {
        bundle.configuration.analysis_start_month = month;
    }
    Ok(bundle)
}

fn shift_label(shift: WorkShift) -> &'static str {
    match shift {
        WorkShift::Day => "day",
        WorkShift::Night => "night",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let bundle = load(&cli)?;

    let code = match cli.cmd {
        Commands::Run { ref out } => {
            let output = generate_schedule(&bundle)?;
            io::export_output_json(out, &output)?;
            let m = &output.metrics;
            println!(
                "{} records | day {} | night {} | rest {} | vacation {} | gaps {} | duplicates {}",
                m.total_records,
                m.day_shift_count,
                m.night_shift_count,
                m.rest_day_count,
                m.vacation_day_count,
                m.gap_count,
                m.duplicate_count
            );
            for w in &output.warnings {
                eprintln!("warning: {}", serde_json::to_string(w)?);
            }
            0
        }
        Commands::Check => {
            let output = generate_schedule(&bundle)?;
            if output.gaps.is_empty() && output.duplicates.is_empty() {
                println!("OK: full coverage");
                0
            } else {
                for gap in &output.gaps {
                    println!(
                        "gap | {} | {} | {}",
                        calendar::format_date(gap.date),
                        gap.position,
                        shift_label(gap.missing_shift)
                    );
                }
                for dup in &output.duplicates {
                    let ids: Vec<&str> = dup.operator_ids.iter().map(|id| id.as_str()).collect();
                    println!(
                        "duplicate | {} | {} | {} | {}",
                        calendar::format_date(dup.date),
                        dup.position,
                        shift_label(dup.shift),
                        ids.join(",")
                    );
                }
                eprintln!(
                    "Found {} gap(s), {} duplicate(s)",
                    output.gaps.len(),
                    output.duplicates.len()
                );
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Plan => {
            let scheduler = Scheduler::new(&bundle)?;
            for slot in scheduler.plan() {
                let anniversary = slot
                    .anniversary
                    .map(calendar::format_date)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>2}. {} | days {:>3}-{:>3} | anniversary {}{}",
                    slot.priority,
                    slot.operator_id,
                    slot.start_offset,
                    slot.end_offset,
                    anniversary,
                    if slot.replacement { " | replacement" } else { "" }
                );
            }
            0
        }
    };

    std::process::exit(code);
}
