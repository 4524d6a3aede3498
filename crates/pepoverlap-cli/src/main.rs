use clap::{Arg, Command, ValueHint};
use pepoverlap_cli::input::Input;
use pepoverlap_cli::runner::Runner;

fn cli() -> Command {
    Command::new("pepoverlap")
        .version(clap::crate_version!())
        .about("Compare in-silico digested proteomes: total, unique and high-frequency peptides")
        .arg(
            Arg::new("parameters")
                .required(true)
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help("Path to configuration parameters (JSON file)")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("organisms")
                .num_args(1..)
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Names of organisms to compare. Restricts the organisms listed in the \
                     configuration file.",
                )
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("data_directory")
                .short('d')
                .long("data_directory")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Directory holding cached sequences and digest reports. \
                     Overrides the directory specified in the configuration file.",
                )
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("output_directory")
                .short('o')
                .long("output_directory")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .help(
                    "Path where summaries and peptide tables will be written. \
                     Overrides the directory specified in the configuration file.",
                )
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new("no_annotate")
                .long("no-annotate")
                .action(clap::ArgAction::SetTrue)
                .help(
                    "Do not add gene symbols and protein descriptions to peptide tables. \
                     Overrides `annotate` in the configuration file.",
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::default()
        .filter_level(log::LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("PEPOVERLAP_LOG", "error,pepoverlap=info"))
        .init();

    let matches = cli().get_matches();
    let input = Input::from_arguments(matches)?;
    let runner = input.build().map(Runner::new)?;
    runner.run()?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn parameters(dir: &std::path::Path, annotate: bool) -> String {
        let path = dir.join("parameters.json");
        let json = format!(
            r#"{{"organisms": [{{"name": "candida"}}, {{"name": "mouse"}}], "annotate": {}}}"#,
            annotate
        );
        std::fs::write(&path, json).unwrap();
        path.display().to_string()
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn no_annotate_overrides_configuration() -> anyhow::Result<()> {
        let tmp = tempfile::TempDir::new()?;
        let path = parameters(tmp.path(), true);
        let output = tmp.path().join("out").display().to_string();

        let args = ["pepoverlap", path.as_str(), "-o", output.as_str()];
        let matches = cli().try_get_matches_from(args)?;
        assert!(Input::from_arguments(matches)?.build()?.annotate);

        let args = ["pepoverlap", path.as_str(), "-o", output.as_str(), "--no-annotate"];
        let matches = cli().try_get_matches_from(args)?;
        let analysis = Input::from_arguments(matches)?.build()?;
        assert!(!analysis.annotate);
        assert_eq!(analysis.organisms.len(), 2);

        let path = parameters(tmp.path(), false);
        let args = ["pepoverlap", path.as_str(), "-o", output.as_str()];
        let matches = cli().try_get_matches_from(args)?;
        assert!(!Input::from_arguments(matches)?.build()?.annotate);
        Ok(())
    }
}
