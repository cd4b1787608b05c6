use fxhash::FxHashMap;
use std::path::Path;

use super::base_plane::BasePlane;
use super::error::GeometryError;
use super::frame::{Frame, FrameHolder};
use super::ids::{Layer, Side};
use super::report::{BlockLayout, MeasurementBlock, SurveyReport};
use super::vector::{Plane, Point3};

/// Hole and slot alignment pins for each layer of a carrier (U-channel, transition
/// fixture or module fixture).
///
/// Pins are labelled `{prefix}L{n} Hole Pin` / `{prefix}L{n} Slot Pin`. Only the layers
/// asked for are read; the rest stay zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pins: FxHashMap<(Layer, Side), Point3>,
}

impl Pin {
    pub fn new(path: Option<&Path>, prefix: &str, layers: &[Layer]) -> Result<Self, GeometryError> {
        let mut pin = Self::stub();
        if let Some(report) = SurveyReport::open_for(path, &format!("{prefix}pins"))? {
            for layer in layers {
                for side in Side::ALL {
                    let block = MeasurementBlock::new(
                        format!("{prefix}{layer} {side} Pin"),
                        BlockLayout::PIN,
                    );
                    pin.set_pin(*layer, side, report.measure_point(&block)?);
                }
            }
        }
        Ok(pin)
    }

    fn stub() -> Self {
        let mut pins = FxHashMap::default();
        for layer in Layer::ALL {
            for side in Side::ALL {
                pins.insert((layer, side), Point3::zeros());
            }
        }
        Self { pins }
    }

    pub fn get_pin(&self, layer: Layer, side: Side) -> Point3 {
        self.pins
            .get(&(layer, side))
            .copied()
            .unwrap_or_else(Point3::zeros)
    }

    pub fn set_pin(&mut self, layer: Layer, side: Side, pin: Point3) {
        self.pins.insert((layer, side), pin);
    }

    /// The pin frame of `layer` on `plane`: origin at the projected hole pin, u towards
    /// the projected slot pin, v along the plane normal.
    pub fn get_basis(&self, layer: Layer, plane: &Plane) -> Frame {
        Frame::on_plane(
            &self.get_pin(layer, Side::Hole),
            &self.get_pin(layer, Side::Slot),
            plane,
        )
    }

    /// View of one layer's pin frame that can be handed around as a [`FrameHolder`]
    pub fn frame<'a>(&'a self, layer: Layer, planes: &'a BasePlane) -> PinFrame<'a> {
        PinFrame {
            pins: self,
            planes,
            layer,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PinFrame<'a> {
    pins: &'a Pin,
    planes: &'a BasePlane,
    layer: Layer,
}

impl FrameHolder for PinFrame<'_> {
    fn get_basis(&self) -> Result<Frame, GeometryError> {
        Ok(self
            .pins
            .get_basis(self.layer, &self.planes.get_plane(self.layer)))
    }
}
