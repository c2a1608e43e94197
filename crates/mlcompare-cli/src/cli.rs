use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

fn dataset_arg() -> Arg {
    Arg::new("dataset")
        .short('d')
        .long("dataset")
        .help("Dataset to use: IRIS, BREAST CANCER or WINE. Overrides the configuration file.")
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
        .value_hint(ValueHint::Other)
}

fn test_fraction_arg() -> Arg {
    Arg::new("test_fraction")
        .long("test-fraction")
        .help("Share of rows held out for testing, strictly between 0 and 1.")
        .value_parser(clap::value_parser!(f64))
}

fn seed_arg() -> Arg {
    Arg::new("seed")
        .long("seed")
        .help("Seed of the train/test shuffle.")
        .value_parser(clap::value_parser!(u64))
}

/// Command-line definition shared by the binary and the tests.
pub fn build_cli() -> Command {
    Command::new("mlcompare")
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about("\u{1F4CA} mlcompare - Compare KNN, SVM and random forest classifiers on toy datasets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Train and score one classifier on one dataset")
                .arg(
                    Arg::new("config")
                        .help("Path to a JSON run configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(dataset_arg())
                .arg(
                    Arg::new("classifier")
                        .short('c')
                        .long("classifier")
                        .help("Classifier to use: KNN, SVM or RANDOM FOREST. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("param")
                        .short('p')
                        .long("param")
                        .help("Hyperparameter as NAME=VALUE, e.g. K=5 or C=1.0. May be repeated.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .action(ArgAction::Append),
                )
                .arg(test_fraction_arg())
                .arg(seed_arg())
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path of the HTML report. Defaults to mlcompare_<dataset>_<classifier>.html")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Score every classifier with its default hyperparameters on one dataset")
                .arg(dataset_arg())
                .arg(test_fraction_arg())
                .arg(seed_arg()),
        )
        .subcommand(Command::new("datasets").about("List the built-in datasets"))
        .subcommand(
            Command::new("params")
                .about("List the tunable hyperparameters of a classifier")
                .arg(
                    Arg::new("classifier")
                        .help("Classifier name; lists all classifiers when omitted")
                        .required(false)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_repeated_params() {
        let matches = build_cli()
            .try_get_matches_from(["mlcompare", "run", "-c", "rf", "-p", "max_depth=4", "-p", "n_estimators=9"])
            .unwrap();
        let (_, run) = matches.subcommand().unwrap();
        let params: Vec<&String> = run.get_many::<String>("param").unwrap().collect();
        assert_eq!(params, vec!["max_depth=4", "n_estimators=9"]);
    }
}
