use clap::{Arg, Command};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::{Path, PathBuf};

use libsvt_survey::config::SurveyConfig;
use libsvt_survey::process::process;

fn make_template_config(path: &Path) {
    let config = SurveyConfig::default();
    let yaml_str = serde_yaml::to_string(&config).expect("Could not serialize template config!");
    std::fs::write(path, yaml_str).expect("Failed to write yaml data to file!");
}

/// Terminal logging always, plus a log file when the config asks for one
fn init_logging(log_path: Option<&Path>) {
    let log_config = ConfigBuilder::new().build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        LevelFilter::Info,
        log_config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(path) = log_path {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, log_config, file)),
            Err(e) => eprintln!("Could not create log file {}: {e}", path.to_string_lossy()),
        }
    }
    CombinedLogger::init(loggers).expect("Could not create logging!");
}

fn main() {
    // Create a cli
    let matches = Command::new("svt_survey_cli")
        .about("Compute SVT geometry constants from optical survey reports")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .global(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    if let Some(("new", _)) = matches.subcommand() {
        init_logging(None);
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        make_template_config(&config_path);
        log::info!("Done.");
        return;
    }

    // Load our config
    let config = match SurveyConfig::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            init_logging(None);
            log::error!("{e}");
            return;
        }
    };
    init_logging(config.log_path.as_deref());
    log::info!("Config loaded from {}.", config_path.to_string_lossy());
    log::info!("Detector Year: {}", config.year);
    log::info!("Output Path: {}", config.output_path.to_string_lossy());
    if let Some(csv_path) = &config.csv_path {
        log::info!("CSV Path: {}", csv_path.to_string_lossy());
    }
    log::info!("Half-modules: {}", config.modules.len());

    match process(&config) {
        Ok(_) => log::info!("Successfully computed survey constants!"),
        Err(e) => log::error!("Survey failed with error: {e}"),
    }

    log::info!("Done.");
}
