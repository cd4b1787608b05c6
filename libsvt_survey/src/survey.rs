use fxhash::FxHashMap;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::config::SurveyConfig;
use super::error::{ConfigError, SurveyError};
use super::frame::Frame;
use super::ids::{DetectorYear, Layer, SensorKind, Volume};
use super::module_fixture::ModuleFixture;
use super::sensor::Sensor;
use super::uchannel::{TransitionFixture, UChannel, UChannelHalf};
use super::vector::Point3;

/// One named placement of the geometry constants
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyVolume {
    pub name: String,
    pub desc: String,
    pub frame: Frame,
}

/// Where a sensor ended up, for the flat CSV dump
#[derive(Debug, Clone, PartialEq)]
pub struct SensorPlacement {
    pub name: String,
    /// Sensor origin in U-channel ball coordinates
    pub origin_ball: Point3,
    /// Sensor origin in its module pin frame
    pub origin_pin: Point3,
    /// Sensor frame in U-channel ball coordinates
    pub frame_ball: Frame,
}

fn pin_frame_name(volume: Volume, layer: Layer) -> String {
    format!("module_L{}{}_pinframe", layer.number(), volume.suffix())
}

fn sensor_name(volume: Volume, layer: Layer, kind: SensorKind) -> String {
    format!(
        "module_L{}{}_halfmodule_{kind}_sensor0",
        layer.number(),
        volume.suffix()
    )
}

/// Every holder of one survey run, keyed the way the geometry walks them.
#[derive(Debug)]
pub struct Survey {
    year: DetectorYear,
    uchannel: UChannel,
    transitions: FxHashMap<Volume, TransitionFixture>,
    sensors: BTreeMap<(Volume, Layer, SensorKind), Sensor>,
}

impl Survey {
    /// An empty survey on the given U-channel; sensors and transition fixtures are added
    /// with [`Survey::insert_sensor`] and [`Survey::insert_transition`].
    pub fn with_uchannel(year: DetectorYear, uchannel: UChannel) -> Self {
        Self {
            year,
            uchannel,
            transitions: FxHashMap::default(),
            sensors: BTreeMap::new(),
        }
    }

    /// Read every report named in the configuration. The two sensors of a half-module
    /// share its fixture.
    pub fn new(config: &SurveyConfig) -> Result<Self, SurveyError> {
        let top = &config.uchannel.top;
        let bottom = &config.uchannel.bottom;
        let uchannel = UChannel::new(
            UChannelHalf::new(
                Some(top.ball_path.as_path()),
                Some(top.pin_path.as_path()),
                Volume::Top,
            )?,
            UChannelHalf::new(
                Some(bottom.ball_path.as_path()),
                Some(bottom.pin_path.as_path()),
                Volume::Bottom,
            )?,
        );
        log::info!("Loaded U-channel for {}", config.year);

        let mut survey = Self::with_uchannel(config.year, uchannel);
        let needs_transition = Layer::ALL.iter().any(|l| config.year.has_transition(*l));
        for volume in Volume::ALL {
            if needs_transition {
                let path = config
                    .transition
                    .get(volume)
                    .as_deref()
                    .ok_or_else(|| ConfigError::MissingTransition(volume.to_string()))?;
                survey.insert_transition(volume, TransitionFixture::new(Some(path))?);
                log::info!("Loaded {volume} transition fixture");
            }

            for layer in Layer::ALL {
                let module = config.module(volume, layer)?;
                let fixture = Rc::new(ModuleFixture::from_config(&module.fixture, layer)?);
                for kind in SensorKind::ALL {
                    survey.insert_sensor(Sensor::new(
                        Some(module.sensor_path.as_path()),
                        volume,
                        layer,
                        kind,
                        fixture.clone(),
                    )?);
                }
                log::info!("Loaded {volume} {layer} half-module");
            }
        }
        Ok(survey)
    }

    pub fn year(&self) -> DetectorYear {
        self.year
    }

    pub fn uchannel(&self) -> &UChannel {
        &self.uchannel
    }

    pub fn uchannel_mut(&mut self) -> &mut UChannel {
        &mut self.uchannel
    }

    pub fn insert_sensor(&mut self, sensor: Sensor) {
        self.sensors
            .insert((sensor.volume(), sensor.layer(), sensor.kind()), sensor);
    }

    pub fn insert_transition(&mut self, volume: Volume, fixture: TransitionFixture) {
        self.transitions.insert(volume, fixture);
    }

    pub fn sensor(&self, volume: Volume, layer: Layer, kind: SensorKind) -> Result<&Sensor, SurveyError> {
        self.sensors.get(&(volume, layer, kind)).ok_or_else(|| {
            SurveyError::MissingSensor(volume.to_string(), layer.number(), kind.to_string())
        })
    }

    /// Pin frame of a half-module in U-channel ball coordinates, moved onto the
    /// transition fixture where the year has one
    pub fn pin_frame(&self, volume: Volume, layer: Layer) -> Result<Frame, SurveyError> {
        let pin = self.uchannel.get_pin_frame(volume, layer)?;
        if !self.year.has_transition(layer) {
            return Ok(pin);
        }
        let transition = self
            .transitions
            .get(&volume)
            .ok_or_else(|| ConfigError::MissingTransition(volume.to_string()))?;
        Ok(transition.correct(&pin)?)
    }

    /// Walk top before bottom and layer 1 to 3, emitting each pin frame followed by its
    /// axial and stereo sensors
    pub fn volumes(&self) -> Result<Vec<SurveyVolume>, SurveyError> {
        let mut volumes = Vec::with_capacity(Volume::ALL.len() * Layer::ALL.len() * 3);
        for volume in Volume::ALL {
            for layer in Layer::ALL {
                volumes.push(SurveyVolume {
                    name: pin_frame_name(volume, layer),
                    desc: format!("{volume} {layer} pin frame in U-channel ball frame"),
                    frame: self.pin_frame(volume, layer)?,
                });
                for kind in SensorKind::ALL {
                    let sensor = self.sensor(volume, layer, kind)?;
                    volumes.push(SurveyVolume {
                        name: sensor_name(volume, layer, kind),
                        desc: format!("{volume} {layer} {kind} sensor in pin frame"),
                        frame: sensor.get_basis_pinframe()?,
                    });
                }
                log::debug!("Composed {volume} {layer} half-module");
            }
        }
        Ok(volumes)
    }

    /// Every sensor placed in U-channel ball coordinates, in the same order as
    /// [`Survey::volumes`]
    pub fn placements(&self) -> Result<Vec<SensorPlacement>, SurveyError> {
        let mut placements = Vec::with_capacity(self.sensors.len());
        for volume in Volume::ALL {
            for layer in Layer::ALL {
                let pin = self.pin_frame(volume, layer)?;
                for kind in SensorKind::ALL {
                    let in_pin = self.sensor(volume, layer, kind)?.get_basis_pinframe()?;
                    let frame_ball = in_pin.express_in(&pin);
                    placements.push(SensorPlacement {
                        name: sensor_name(volume, layer, kind),
                        origin_ball: frame_ball.origin,
                        origin_pin: in_pin.origin,
                        frame_ball,
                    });
                }
            }
        }
        Ok(placements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{FixtureBall, Side};
    use crate::module_fixture::PlainFixture;
    use crate::vector::Plane;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    fn stub_uchannel() -> UChannel {
        UChannel::new(
            UChannelHalf::new(None, None, Volume::Top).unwrap(),
            UChannelHalf::new(None, None, Volume::Bottom).unwrap(),
        )
    }

    fn stub_survey(year: DetectorYear) -> Survey {
        let mut survey = Survey::with_uchannel(year, stub_uchannel());
        for volume in Volume::ALL {
            for layer in Layer::ALL {
                let fixture = Rc::new(ModuleFixture::Plain(PlainFixture::new(None, layer).unwrap()));
                for kind in SensorKind::ALL {
                    survey.insert_sensor(
                        Sensor::new(None, volume, layer, kind, fixture.clone()).unwrap(),
                    );
                }
            }
        }
        survey
    }

    #[test]
    fn test_volume_names_and_order() {
        let volumes = stub_survey(DetectorYear::Y2016).volumes().unwrap();
        assert_eq!(volumes.len(), 18);
        assert_eq!(volumes[0].name, "module_L1t_pinframe");
        assert_eq!(volumes[1].name, "module_L1t_halfmodule_axial_sensor0");
        assert_eq!(volumes[2].name, "module_L1t_halfmodule_stereo_sensor0");
        assert_eq!(volumes[3].name, "module_L2t_pinframe");
        assert_eq!(volumes[9].name, "module_L1b_pinframe");
        assert_eq!(volumes[17].name, "module_L3b_halfmodule_stereo_sensor0");
    }

    #[test]
    fn test_missing_pieces() {
        let survey = stub_survey(DetectorYear::Y2019);
        assert!(matches!(
            survey.volumes(),
            Err(SurveyError::ConfigError(ConfigError::MissingTransition(_)))
        ));

        let survey = Survey::with_uchannel(DetectorYear::Y2016, stub_uchannel());
        assert!(matches!(
            survey.sensor(Volume::Bottom, Layer::L2, SensorKind::Stereo),
            Err(SurveyError::MissingSensor(_, 2, _))
        ));
        assert!(survey.volumes().is_err());
    }

    #[test]
    fn test_transition_applies_to_layer_one_only() {
        let mut survey = stub_survey(DetectorYear::Y2019);
        for volume in Volume::ALL {
            let mut transition = TransitionFixture::new(None).unwrap();
            transition
                .upper_pins_mut()
                .set_pin(Layer::L1, Side::Slot, Point3::new(1.0, 0.0, 0.0));
            transition
                .upper_planes_mut()
                .set_plane(Layer::L1, Plane::new(Point3::zeros(), Vector3::z()));
            survey.insert_transition(volume, transition);
        }
        let untouched = survey.uchannel().get_pin_frame(Volume::Top, Layer::L2).unwrap();
        assert_eq!(survey.pin_frame(Volume::Top, Layer::L2).unwrap(), untouched);
        // Stub frames stay degenerate through the correction
        let corrected = survey.pin_frame(Volume::Top, Layer::L1).unwrap();
        assert_eq!(corrected.origin, Point3::zeros());
        assert_eq!(survey.volumes().unwrap().len(), 18);
    }

    #[test]
    fn test_placement_composes_pin_and_sensor() {
        let mut survey = stub_survey(DetectorYear::Y2016);
        let half = survey.uchannel_mut().half_mut(Volume::Top);
        let balls = half.balls_mut();
        balls.set_ball(Layer::L1, Side::Hole, Point3::new(1.0, 2.0, 0.0)).unwrap();
        balls.set_ball(Layer::L1, Side::Slot, Point3::new(1.0, 0.0, 0.0)).unwrap();
        balls.set_ball(Layer::L3, Side::Hole, Point3::new(5.0, 2.0, 0.0)).unwrap();
        balls.set_ball(Layer::L3, Side::Slot, Point3::new(5.0, 0.0, 0.0)).unwrap();
        half.pins_mut().set_pin(Layer::L2, Side::Hole, Point3::new(3.0, 2.0, 0.0));
        half.pins_mut().set_pin(Layer::L2, Side::Slot, Point3::new(3.0, 0.0, 0.0));
        half.planes_mut()
            .set_plane(Layer::L2, Plane::new(Point3::zeros(), Vector3::z()));

        let mut plain = PlainFixture::new(None, Layer::L2).unwrap();
        plain.balls_mut().set_ball(FixtureBall::Axi, Point3::new(1.0, 0.0, 0.0));
        plain.balls_mut().set_ball(FixtureBall::Diag, Point3::new(0.0, 1.0, 0.0));
        plain.pins_mut().set_pin(Layer::L2, Side::Slot, Point3::new(1.0, 0.0, 0.0));
        plain
            .planes_mut()
            .set_plane(Layer::L2, Plane::new(Point3::zeros(), Vector3::z()));
        let mut sensor = Sensor::new(
            None,
            Volume::Top,
            Layer::L2,
            SensorKind::Axial,
            Rc::new(ModuleFixture::Plain(plain)),
        )
        .unwrap();
        sensor.set_plane(Plane::new(Point3::new(4.0, 0.0, 1.0), Vector3::z()));
        sensor.set_fiducials(Point3::zeros(), Point3::new(1.0, 0.0, 0.0));
        survey.insert_sensor(sensor);

        let pin = survey.pin_frame(Volume::Top, Layer::L2).unwrap();
        let placements = survey.placements().unwrap();
        assert_eq!(placements.len(), 12);
        let placement = &placements[2];
        assert_eq!(placement.name, "module_L2t_halfmodule_axial_sensor0");
        assert_abs_diff_eq!(
            placement.origin_ball,
            pin.to_parent(&placement.origin_pin),
            epsilon = 1e-12
        );
        assert!(placement.frame_ball.is_orthonormal(1e-12));
    }
}
