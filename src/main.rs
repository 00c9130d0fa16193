use anyhow::Context;
use clap::{Parser, Subcommand};
use cockatoo::{
    apply_summary_stats, classify_screen, derive_structures, explain, load_csv_screen,
    load_ion_records, load_summary_stats, read_screen, to_json_string, write_screen, Diagnostics,
    DistanceMatrix, EngineConfig, Screen, SmilesEngine, Weights,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Compare macromolecular crystallization screens
#[derive(Parser, Debug)]
#[command(name = "cockatoo")]
#[command(about = "Crystallization screen ion classification and cocktail distances", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a CSV screen to a classified JSON document
    Convert {
        /// CSV screen file
        csv: PathBuf,

        /// Name of the screen
        #[arg(short, long)]
        name: String,

        /// Reference ion table (TSV: name, type, smiles)
        #[arg(long)]
        ions: Option<PathBuf>,

        /// Compound summary table (TSV: name, conc_min, conc_max, molecular_weight, smiles)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Morgan fingerprint radius
        #[arg(long, default_value_t = EngineConfig::default().fingerprint_radius)]
        radius: u32,

        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print summary statistics of a screen
    Stats {
        /// JSON screen document
        screen: PathBuf,
    },

    /// Explain the distance between two cocktails
    Distance {
        /// JSON screen document
        screen: PathBuf,

        /// First cocktail
        a: String,

        /// Second cocktail
        b: String,

        /// Look up the second cocktail in this screen instead
        #[arg(long)]
        other: Option<PathBuf>,

        #[command(flatten)]
        metric: MetricArgs,
    },

    /// Compute all pairwise distances of a screen
    Matrix {
        /// JSON screen document
        screen: PathBuf,

        /// Report pairs at or below this distance
        #[arg(long, default_value_t = 0.0)]
        threshold: f64,

        #[command(flatten)]
        metric: MetricArgs,
    },
}

#[derive(clap::Args, Debug)]
struct MetricArgs {
    /// Weight of the pH term
    #[arg(long, default_value_t = 1.0)]
    ph_weight: f64,

    /// Weight of the fingerprint term
    #[arg(long, default_value_t = 1.0)]
    fp_weight: f64,

    /// Morgan fingerprint radius
    #[arg(long, default_value_t = EngineConfig::default().fingerprint_radius)]
    radius: u32,
}

impl MetricArgs {
    fn weights(&self) -> anyhow::Result<Weights> {
        Ok(Weights::new(self.ph_weight, self.fp_weight)?)
    }

    fn engine(&self) -> SmilesEngine {
        SmilesEngine::new(EngineConfig {
            fingerprint_radius: self.radius,
        })
    }
}

fn report(diags: &Diagnostics) {
    if !diags.is_empty() {
        warn!("{} problem(s) recorded", diags.len());
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Convert {
            csv,
            name,
            ions,
            summary,
            radius,
            output,
        } => {
            let mut diags = Diagnostics::new();
            let mut screen = load_csv_screen(&name, &csv, &mut diags)
                .with_context(|| format!("failed to read screen {:?}", csv))?;
            info!("Loaded {} cocktails from {:?}", screen.len(), csv);

            if let Some(path) = summary {
                let table = load_summary_stats(&path, &mut diags)
                    .with_context(|| format!("failed to read summary table {:?}", path))?;
                apply_summary_stats(&mut screen, &table, &mut diags);
            }

            let records = match ions {
                Some(path) => load_ion_records(&path, &mut diags)
                    .with_context(|| format!("failed to read ion table {:?}", path))?,
                None => Vec::new(),
            };
            let engine = SmilesEngine::new(EngineConfig {
                fingerprint_radius: radius,
            });
            classify_screen(&engine, records, &mut screen, &mut diags);
            report(&diags);

            match output {
                Some(path) => {
                    write_screen(&screen, &path)?;
                    info!("Wrote {:?}", path);
                }
                None => println!("{}", to_json_string(&screen)?),
            }
        }

        Command::Stats { screen } => {
            let mut diags = Diagnostics::new();
            let screen = read_screen(&screen, &mut diags)?;
            report(&diags);
            print!("{}", screen.stats());
        }

        Command::Distance {
            screen,
            a,
            b,
            other,
            metric,
        } => {
            let weights = metric.weights()?;
            let engine = metric.engine();
            let mut diags = Diagnostics::new();
            let first = with_structures(&engine, &screen, &mut diags)?;
            let second = match other {
                Some(path) => with_structures(&engine, &path, &mut diags)?,
                None => first.clone(),
            };
            report(&diags);

            let breakdown = explain(first.require(&a)?, second.require(&b)?, &weights)?;
            info!("{}", breakdown);
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }

        Command::Matrix {
            screen,
            threshold,
            metric,
        } => {
            let weights = metric.weights()?;
            let mut diags = Diagnostics::new();
            let screen = with_structures(&metric.engine(), &screen, &mut diags)?;
            report(&diags);

            let matrix = DistanceMatrix::compute(&screen.cocktails, &weights)?;
            let names = matrix.names();
            for (i, j, d) in matrix.pairs_below(threshold) {
                println!("{}\t{}\t{:.6}", names[i], names[j], d);
            }
        }
    }

    Ok(())
}

/// Read a JSON screen and derive fingerprints for its compounds
fn with_structures(engine: &SmilesEngine, path: &Path, diags: &mut Diagnostics) -> anyhow::Result<Screen> {
    let mut screen =
        read_screen(path, diags).with_context(|| format!("failed to read screen {:?}", path))?;
    diags.extend(derive_structures(engine, &mut screen));
    Ok(screen)
}
