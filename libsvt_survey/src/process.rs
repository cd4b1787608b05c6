use super::config::SurveyConfig;
use super::error::ProcessorError;
use super::survey::Survey;
use super::writer::{ConstantsWriter, CsvWriter};

/// The main entry of svt_survey.
///
/// Checks the configuration, reads every survey report it names, composes the frame
/// chain and writes the geometry constants (plus the CSV dump if asked for).
pub fn process(config: &SurveyConfig) -> Result<(), ProcessorError> {
    config.validate()?;
    log::info!("Processing {} survey...", config.year);

    let survey = Survey::new(config)?;
    let volumes = survey.volumes()?;

    let mut writer = ConstantsWriter::new(&config.output_path, config.year)?;
    for volume in volumes.iter() {
        writer.write_volume(volume)?;
    }
    let n_volumes = writer.close()?;
    log::info!(
        "Wrote {n_volumes} survey volumes to {}",
        config.output_path.to_string_lossy()
    );

    if let Some(csv_path) = &config.csv_path {
        let mut csv = CsvWriter::new(csv_path)?;
        for placement in survey.placements()?.iter() {
            csv.write_placement(placement)?;
        }
        let n_rows = csv.close()?;
        log::info!(
            "Wrote {n_rows} sensor placements to {}",
            csv_path.to_string_lossy()
        );
    }

    Ok(())
}
