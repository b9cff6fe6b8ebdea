use clap::{arg, value_parser, Command};
use maxcov::construction::ConstructionStrategy;
use maxcov::instance::ProblemInstance;
use maxcov::search::{run_search, SearchConfig, SearchOutcome};
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("maxcov")
        .about("Greedy/GRASP + 1-swap local search for the maximum coverage problem")
        .arg(
            arg!(<FILE> "Instance in OR-Library set-covering format")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(<K> "Number of columns to select").value_parser(value_parser!(usize)))
        .arg(
            arg!(--iterations [N] "Restarts per search")
                .default_value("500")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--alpha [A] "GRASP greediness in [0, 1]")
                .default_value("0.95")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            arg!(--strategy [STRATEGY] "Construction heuristic")
                .default_value("both")
                .value_parser(["greedy", "grasp", "both"]),
        )
        .arg(
            arg!(--passes [P] "Maximum improvement passes per restart")
                .default_value("1")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--seed [SEED] "Seed for the random stream")
                .default_value("0")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--"report-every" [N] "Progress log period in iterations (0 disables)")
                .default_value("100")
                .value_parser(value_parser!(u64)),
        )
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    enable_tracing();
    let matches = cli().get_matches();

    let path = matches
        .get_one::<PathBuf>("FILE")
        .ok_or("missing instance file")?;
    let instance = ProblemInstance::load_from_file(path)?;
    tracing::info!(
        path = %path.display(),
        rows = instance.num_rows(),
        columns = instance.num_columns(),
        density = instance.density(),
        "loaded instance"
    );

    let alpha = matches
        .get_one::<f64>("alpha")
        .copied()
        .unwrap_or(SearchConfig::DEFAULT_ALPHA);
    let base = SearchConfig {
        k: matches.get_one::<usize>("K").copied().ok_or("missing K")?,
        iterations: matches.get_one::<u64>("iterations").copied().unwrap_or(500),
        max_passes: matches.get_one::<usize>("passes").copied().unwrap_or(1),
        seed: matches.get_one::<u64>("seed").copied(),
        report_every: matches.get_one::<u64>("report-every").copied().unwrap_or(100),
        ..Default::default()
    };

    let strategies: &[ConstructionStrategy] = match matches
        .get_one::<String>("strategy")
        .map_or("both", String::as_str)
    {
        "greedy" => &[ConstructionStrategy::Greedy],
        "grasp" => &[ConstructionStrategy::Grasp { alpha }],
        _ => &[
            ConstructionStrategy::Greedy,
            ConstructionStrategy::Grasp { alpha },
        ],
    };

    for &strategy in strategies {
        let cfg = SearchConfig {
            strategy,
            ..base.clone()
        };
        let outcome = run_search(&instance, &cfg)?;
        print_outcome(&outcome);
    }
    Ok(())
}

/// Prints the covered-row count and the selected columns, 1-based as in the input file.
fn print_outcome(outcome: &SearchOutcome<'_>) {
    println!("Covers {} rows.", outcome.covered_rows());
    let columns: Vec<String> = outcome
        .best
        .selected_columns()
        .iter()
        .map(|c| (c + 1).to_string())
        .collect();
    println!("{}", columns.join(" "));
}
