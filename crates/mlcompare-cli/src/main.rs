use anyhow::Result;
use clap::ArgMatches;
use log::LevelFilter;
use std::path::PathBuf;

use mlcompare_classifiers::config::ClassifierKind;
use mlcompare_classifiers::datasets::DatasetId;
use mlcompare_classifiers::evaluation::DEFAULT_TEST_FRACTION;
use mlcompare_cli::cli::build_cli;
use mlcompare_cli::commands::compare::{compare, format_comparison};
use mlcompare_cli::commands::datasets::catalog;
use mlcompare_cli::commands::params::describe;
use mlcompare_cli::commands::run::{run, RunConfig, DEFAULT_SEED};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MLCOMPARE_LOG", "error,mlcompare=info"))
        .init();

    let matches = build_cli().get_matches();

    let outcome = match matches.subcommand() {
        Some(("run", sub_m)) => handle_run(sub_m),
        Some(("compare", sub_m)) => handle_compare(sub_m),
        Some(("datasets", _)) => handle_datasets(),
        Some(("params", sub_m)) => handle_params(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    if let Err(e) = outcome {
        log::error!("{:#}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let config_path: Option<&PathBuf> = matches.get_one("config");
    match config_path {
        Some(path) => log::info!("[mlcompare::run] Using config: {:?}", path),
        None => log::info!("[mlcompare::run] No config provided; using defaults."),
    }

    let config = RunConfig::from_arguments(config_path, matches)?;
    if config_path.is_none() {
        let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
        eprintln!("[mlcompare::run] Config:\n{}", default_json);
    }

    let output: Option<&PathBuf> = matches.get_one("output_file");
    let outcome = run(&config, output.map(|p| p.as_path()))?;
    outcome.write_summary(&mut std::io::stdout())?;
    Ok(())
}

fn handle_compare(matches: &ArgMatches) -> Result<()> {
    let dataset_id: DatasetId = match matches.get_one::<String>("dataset") {
        Some(name) => name.parse()?,
        None => DatasetId::Iris,
    };
    let test_fraction = matches
        .get_one::<f64>("test_fraction")
        .copied()
        .unwrap_or(DEFAULT_TEST_FRACTION);
    let seed = matches.get_one::<u64>("seed").copied().unwrap_or(DEFAULT_SEED);

    let results = compare(dataset_id, test_fraction, seed)?;
    println!("{} DATASET", dataset_id);
    for line in format_comparison(&results) {
        println!("{}", line);
    }
    Ok(())
}

fn handle_datasets() -> Result<()> {
    for info in catalog()? {
        println!("{}", info.describe());
    }
    Ok(())
}

fn handle_params(matches: &ArgMatches) -> Result<()> {
    let kinds = match matches.get_one::<String>("classifier") {
        Some(name) => vec![name.parse::<ClassifierKind>()?],
        None => ClassifierKind::ALL.to_vec(),
    };
    for line in describe(&kinds) {
        println!("{}", line);
    }
    Ok(())
}
