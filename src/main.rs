//! Command line interface for the Sudoku CNF encoder

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use sudoku_cnf::{
    analysis::{evaluate_corpus, Histogram, Metric, MetricSummary},
    config::{CliOverrides, Settings},
    sat::{self, EncodingStrategy, ExternalSolver, SolverOutcome, SolverRunner},
    sudoku::{self, PuzzleGrid},
    utils::{PuzzleFormatter, Tone},
};

#[derive(Parser)]
#[command(name = "sudoku_cnf")]
#[command(about = "Sudoku to DIMACS CNF encoder")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode puzzles as DIMACS CNF files
    Encode {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Corpus file (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Encode a single puzzle record instead of a corpus
        #[arg(short, long, conflicts_with = "input")]
        puzzle: Option<String>,

        /// Encoding strategy (overrides config)
        #[arg(short, long, value_enum)]
        strategy: Option<EncodingStrategy>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only encode the puzzle at this corpus index
        #[arg(long)]
        index: Option<usize>,
    },

    /// Convert a raw corpus (one record per line) to JSON
    Ingest {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Raw corpus file (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON output file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute a metric over a corpus and show its distribution
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Corpus file, raw or JSON (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Metric to compute (overrides config)
        #[arg(short, long, value_enum)]
        metric: Option<Metric>,

        /// Print the per-puzzle values too
        #[arg(short, long)]
        verbose: bool,
    },

    /// Encode one puzzle and run the configured SAT solver on it
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Corpus file (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Index of the puzzle in the corpus
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Encoding strategy (overrides config)
        #[arg(short, long, value_enum)]
        strategy: Option<EncodingStrategy>,

        /// Solver executable (overrides config)
        #[arg(long)]
        solver: Option<String>,
    },

    /// Create example configuration and corpus files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { config, input, puzzle, strategy, output, index } => {
            encode_command(config, input, puzzle, strategy, output, index)
        }
        Commands::Ingest { config, input, output } => ingest_command(config, input, output),
        Commands::Analyze { config, input, metric, verbose } => {
            analyze_command(config, input, metric, verbose)
        }
        Commands::Solve { config, input, index, strategy, solver } => {
            solve_command(config, input, index, strategy, solver)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        println!(
            "{}",
            Tone::Warn.paint(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn encode_command(
    config_path: PathBuf,
    input: Option<PathBuf>,
    puzzle: Option<String>,
    strategy: Option<EncodingStrategy>,
    output_dir: Option<PathBuf>,
    index: Option<usize>,
) -> Result<()> {
    let settings = load_settings(
        &config_path,
        &CliOverrides { strategy, input, output_dir, ..Default::default() },
    )?;
    let strategy = settings.encoding.strategy;
    let start_time = Instant::now();

    if let Some(record) = puzzle {
        let grid = PuzzleGrid::parse_record(record.trim(), settings.encoding.size)
            .context("Invalid puzzle record")?;
        let path = settings.output.directory.join(format!("puzzle_{}.cnf", strategy));
        sat::save_dimacs(&grid, strategy, &path)?;
        println!("{}", Tone::Done.paint(&format!("Wrote {}", path.display())));
        return Ok(());
    }

    let puzzles = sudoku::load_puzzles(&settings.input.corpus_file, settings.encoding.size)?;
    let paths = match index {
        Some(i) => {
            let grid = puzzles
                .get(i)
                .with_context(|| format!("Corpus has {} puzzles, no index {}", puzzles.len(), i))?;
            let path = settings
                .output
                .directory
                .join(sat::dimacs::corpus_file_name(i, strategy));
            sat::save_dimacs(grid, strategy, &path)?;
            vec![path]
        }
        None => sat::save_corpus_dimacs(&puzzles, strategy, &settings.output.directory)?,
    };

    println!(
        "{}",
        Tone::Done.paint(&format!(
            "Encoded {} puzzle(s) with the {} encoding in {:.3}s",
            paths.len(),
            strategy,
            start_time.elapsed().as_secs_f64()
        ))
    );
    println!("Output directory: {}", settings.output.directory.display());
    Ok(())
}

fn ingest_command(config_path: PathBuf, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let mut settings = load_settings(&config_path, &CliOverrides { input, ..Default::default() })?;
    if let Some(output) = output {
        settings.output.corpus_json = output;
    }

    let puzzles = sudoku::load_corpus(&settings.input.corpus_file, settings.encoding.size)?;
    sudoku::save_corpus_json(&puzzles, &settings.output.corpus_json)?;

    println!(
        "{}",
        Tone::Done.paint(&format!(
            "Ingested {} puzzles into {}",
            puzzles.len(),
            settings.output.corpus_json.display()
        ))
    );
    Ok(())
}

fn analyze_command(
    config_path: PathBuf,
    input: Option<PathBuf>,
    metric: Option<Metric>,
    verbose: bool,
) -> Result<()> {
    let settings = load_settings(&config_path, &CliOverrides { input, metric, ..Default::default() })?;
    let metric = settings.analysis.metric;

    let puzzles = sudoku::load_puzzles(&settings.input.corpus_file, settings.encoding.size)?;
    let values = evaluate_corpus(&puzzles, metric);

    let Some(summary) = MetricSummary::from_values(metric, &values) else {
        println!("{}", Tone::Warn.paint("Corpus is empty, nothing to analyze"));
        return Ok(());
    };
    let histogram = Histogram::from_values(&values, settings.analysis.histogram_bins);

    println!("{}", PuzzleFormatter::format_analysis(&summary, &histogram));

    println!("Puzzle with the highest {}:", metric);
    println!("{}", PuzzleFormatter::format_grid_with_coords(&puzzles[summary.argmax]));
    println!("Puzzle with the lowest {}:", metric);
    println!("{}", PuzzleFormatter::format_grid_with_coords(&puzzles[summary.argmin]));

    if verbose {
        println!("{}", PuzzleFormatter::format_metric_table(&values, 50));
    }

    Ok(())
}

fn solve_command(
    config_path: PathBuf,
    input: Option<PathBuf>,
    index: usize,
    strategy: Option<EncodingStrategy>,
    solver: Option<String>,
) -> Result<()> {
    let settings = load_settings(
        &config_path,
        &CliOverrides { strategy, input, solver, ..Default::default() },
    )?;
    let strategy = settings.encoding.strategy;

    let puzzles = sudoku::load_puzzles(&settings.input.corpus_file, settings.encoding.size)?;
    let grid = puzzles
        .get(index)
        .with_context(|| format!("Corpus has {} puzzles, no index {}", puzzles.len(), index))?;

    println!("Puzzle {} ({} givens):", index, grid.given_count());
    println!("{}", grid);

    let cnf_path = settings
        .output
        .directory
        .join(sat::dimacs::corpus_file_name(index, strategy));
    sat::save_dimacs(grid, strategy, &cnf_path)?;
    info!("Formula written to {}", cnf_path.display());

    println!("{}", Tone::Step.paint(&format!("Running {}...", settings.solver.command)));
    let runner = ExternalSolver::from_config(&settings.solver);
    let statistics = runner
        .run(&cnf_path)
        .with_context(|| format!("Solver '{}' failed", settings.solver.command))?;

    println!("{}", statistics);
    println!("{}", Tone::verdict(statistics.outcome));
    if statistics.outcome == SolverOutcome::Satisfiable && statistics.model.is_some() {
        let solved = statistics.solved_grid(grid.size())?;
        println!("{}", solved);
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", Tone::Step.paint("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input");
    let output_dir = directory.join("output/cnf");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let corpus_path = input_dir.join("raw_17_clue_sudokus.txt");
    if !corpus_path.exists() || force {
        sudoku::create_example_corpus(&corpus_path).context("Failed to create example corpus")?;
        println!("Created: {}", corpus_path.display());
    } else {
        println!("Skipped: {} (already exists)", corpus_path.display());
    }

    // MiniSat variant of the configuration
    let examples_dir = config_dir.join("examples");
    let mut minisat = Settings::default();
    minisat.solver.command = "minisat".to_string();
    minisat.solver.args = vec!["-verb=1".to_string(), sat::runner::CNF_PLACEHOLDER.to_string()];
    minisat.solver.required_statistics = vec!["conflicts".to_string(), "decisions".to_string()];
    minisat.to_file(&examples_dir.join("minisat.yaml"))?;

    let mut extended = Settings::default();
    extended.encoding.strategy = EncodingStrategy::Extended;
    extended.to_file(&examples_dir.join("extended.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());
    println!("\n{}", Tone::Done.paint("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: cargo run -- encode --config config/default.yaml");

    Ok(())
}
