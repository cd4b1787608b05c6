use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::ids::{DetectorYear, Layer, Volume};

/// A pair of values, one for each detector volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerVolume<T> {
    pub top: T,
    pub bottom: T,
}

impl<T> PerVolume<T> {
    pub fn get(&self, volume: Volume) -> &T {
        match volume {
            Volume::Top => &self.top,
            Volume::Bottom => &self.bottom,
        }
    }
}

/// Survey reports of one U-channel half
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UChannelConfig {
    /// Report with the four U-channel balls
    pub ball_path: PathBuf,
    /// Report with the pins and base planes of every layer
    pub pin_path: PathBuf,
}

/// Measurement convention of a module fixture and the reports it needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FixtureConfig {
    Plain {
        survey_path: PathBuf,
    },
    Matt {
        ball_path: PathBuf,
        matt_path: PathBuf,
    },
    Sho {
        ball_path: PathBuf,
        sho_path: PathBuf,
    },
}

/// One half-module: the fixture it was surveyed on and the report of its two sensors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub volume: Volume,
    pub layer: Layer,
    pub fixture: FixtureConfig,
    pub sensor_path: PathBuf,
}

/// Structure representing the application configuration. Contains the detector year, the
/// manifest of survey reports and the output paths.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub year: DetectorYear,
    pub output_path: PathBuf,
    pub csv_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub uchannel: PerVolume<UChannelConfig>,
    #[serde(default)]
    pub transition: PerVolume<Option<PathBuf>>,
    pub modules: Vec<ModuleConfig>,
}

impl Default for SurveyConfig {
    /// Generate a template config for 2019 with one plain module per position. All paths
    /// are placeholders.
    fn default() -> Self {
        let uchannel = UChannelConfig {
            ball_path: PathBuf::from("None"),
            pin_path: PathBuf::from("None"),
        };
        let mut modules = Vec::new();
        for volume in Volume::ALL {
            for layer in Layer::ALL {
                modules.push(ModuleConfig {
                    volume,
                    layer,
                    fixture: FixtureConfig::Plain {
                        survey_path: PathBuf::from("None"),
                    },
                    sensor_path: PathBuf::from("None"),
                })
            }
        }
        Self {
            year: DetectorYear::Y2019,
            output_path: PathBuf::from("None"),
            csv_path: None,
            log_path: None,
            uchannel: PerVolume {
                top: uchannel.clone(),
                bottom: uchannel,
            },
            transition: PerVolume {
                top: Some(PathBuf::from("None")),
                bottom: Some(PathBuf::from("None")),
            },
            modules,
        }
    }
}

impl SurveyConfig {
    /// Read the configuration in a YAML file
    /// Returns a SurveyConfig if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Check the manifest is complete: exactly one module per (volume, layer), and a
    /// transition fixture report for both volumes when the year needs one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for volume in Volume::ALL {
            for layer in Layer::ALL {
                match self
                    .modules
                    .iter()
                    .filter(|m| m.volume == volume && m.layer == layer)
                    .count()
                {
                    0 => return Err(ConfigError::MissingModule(volume.to_string(), layer.number())),
                    1 => (),
                    _ => {
                        return Err(ConfigError::DuplicateModule(
                            volume.to_string(),
                            layer.number(),
                        ))
                    }
                }
            }
            let needs_transition = Layer::ALL.iter().any(|l| self.year.has_transition(*l));
            if needs_transition && self.transition.get(volume).is_none() {
                return Err(ConfigError::MissingTransition(volume.to_string()));
            }
        }
        Ok(())
    }

    /// The module entry of one half-module
    pub fn module(&self, volume: Volume, layer: Layer) -> Result<&ModuleConfig, ConfigError> {
        self.modules
            .iter()
            .find(|m| m.volume == volume && m.layer == layer)
            .ok_or_else(|| ConfigError::MissingModule(volume.to_string(), layer.number()))
    }

    pub fn has_csv_path(&self) -> bool {
        self.csv_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_round_trip() {
        let config = SurveyConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("year: 2019"));
        assert!(yaml.contains("kind: plain"));
        let back: SurveyConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn test_parse_manifest() {
        let yaml = r#"
year: 2016
output_path: out/constants.txt
csv_path: out/sensors.csv
log_path: null
uchannel:
  top:
    ball_path: top_balls.txt
    pin_path: top_pins.txt
  bottom:
    ball_path: bot_balls.txt
    pin_path: bot_pins.txt
modules:
  - volume: top
    layer: 1
    fixture:
      kind: matt
      ball_path: l1t_balls.txt
      matt_path: l1t_matt.txt
    sensor_path: l1t_sensors.txt
  - volume: bottom
    layer: 3
    fixture:
      kind: sho
      ball_path: l3b_cmm.txt
      sho_path: l3b_sho.txt
    sensor_path: l3b_sensors.txt
"#;
        let config: SurveyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.year, DetectorYear::Y2016);
        assert!(config.has_csv_path());
        assert_eq!(config.transition, PerVolume::default());
        assert_eq!(
            config.uchannel.get(Volume::Bottom).pin_path,
            PathBuf::from("bot_pins.txt")
        );
        let module = config.module(Volume::Top, Layer::L1).unwrap();
        assert_eq!(
            module.fixture,
            FixtureConfig::Matt {
                ball_path: PathBuf::from("l1t_balls.txt"),
                matt_path: PathBuf::from("l1t_matt.txt"),
            }
        );
        assert!(matches!(
            config.module(Volume::Bottom, Layer::L3).unwrap().fixture,
            FixtureConfig::Sho { .. }
        ));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingModule(_, 2))
        ));
    }

    #[test]
    fn test_bad_year_and_layer() {
        let mut config = SurveyConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(serde_yaml::from_str::<SurveyConfig>(&yaml.replace("year: 2019", "year: 2017")).is_err());

        config.modules[0].layer = Layer::L2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingModule(_, 1))
        ));
    }

    #[test]
    fn test_validate_duplicates_and_transition() {
        let mut config = SurveyConfig::default();
        config.modules.push(config.modules[4].clone());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateModule(_, 2))
        ));

        let mut config = SurveyConfig::default();
        config.transition.bottom = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingTransition(v)) if v == "bottom"
        ));
        config.year = DetectorYear::Y2016;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_config_file() {
        let path = Path::new("/definitely/not/a/config.yml");
        assert!(matches!(
            SurveyConfig::read_config_file(path),
            Err(ConfigError::BadFilePath(_))
        ));
    }
}
