use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("Invalid volume name {0}; expected top or bottom")]
    Volume(String),
    #[error("Invalid layer number {0}; expected 1, 2 or 3")]
    Layer(u8),
    #[error("Invalid layer token {0}")]
    LayerToken(String),
    #[error("Layer {0} does not carry U-channel balls; expected 1 or 3")]
    BallLayer(u8),
    #[error("Invalid ball/pin type {0}; expected hole or slot")]
    FeatureType(String),
    #[error("Invalid fixture ball {0}; expected ori, axi or diag")]
    FixtureBall(String),
    #[error("Invalid sensor kind {0}; expected axial or stereo")]
    SensorKind(String),
    #[error("Unsupported detector year {0}; expected 2016 or 2019")]
    Year(u32),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Could not open survey report because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Survey report failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Label {label:?} was not found in survey report {report}")]
    LabelNotFound { label: String, report: String },
    #[error("Failed to parse value on line {line} of survey report {report}: {text:?}")]
    BadValue {
        line: usize,
        report: String,
        text: String,
    },
}

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Measurement {0:?} is not a coordinate record; missing {1}")]
    NotACoordinate(String, &'static str),
    #[error("Measurement {0:?} is not a plane record; missing {1}")]
    NotAPlane(String, &'static str),
    #[error("Geometry failed due to invalid identifier: {0}")]
    BadId(#[from] IdError),
    #[error("Geometry failed due to survey report error: {0}")]
    ReportError(#[from] ReportError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config has no module entry for the {0} layer {1} half-module")]
    MissingModule(String, u8),
    #[error("Config has more than one module entry for the {0} layer {1} half-module")]
    DuplicateModule(String, u8),
    #[error("Config for 2019 requires a transition fixture file for the {0} volume")]
    MissingTransition(String),
    #[error("Config has an invalid identifier: {0}")]
    BadId(#[from] IdError),
}

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Writer failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Writer failed to format the generation time: {0}")]
    TimeError(#[from] time::error::Format),
}

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Survey failed due to geometry error: {0}")]
    GeometryError(#[from] GeometryError),
    #[error("Survey failed due to configuration error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Survey has no sensor for the {0} layer {1} {2} position")]
    MissingSensor(String, u8, String),
}

impl From<ReportError> for SurveyError {
    fn from(value: ReportError) -> Self {
        Self::GeometryError(GeometryError::ReportError(value))
    }
}

impl From<IdError> for SurveyError {
    fn from(value: IdError) -> Self {
        Self::GeometryError(GeometryError::BadId(value))
    }
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Survey error: {0}")]
    SurveyError(#[from] SurveyError),
    #[error("Processor failed due to Writer error: {0}")]
    WriterError(#[from] WriterError),
}
