use std::path::Path;

use super::ball_frame::BallFrame;
use super::base_plane::BasePlane;
use super::error::GeometryError;
use super::frame::{Frame, FrameHolder};
use super::ids::{Layer, Volume};
use super::pin::Pin;

/// One half of the U-channel: its precision balls, plus the pins and base planes the
/// half-modules of every layer seat on.
#[derive(Debug, Clone)]
pub struct UChannelHalf {
    balls: BallFrame,
    pins: Pin,
    planes: BasePlane,
}

impl UChannelHalf {
    pub fn new(
        ball_path: Option<&Path>,
        pin_path: Option<&Path>,
        volume: Volume,
    ) -> Result<Self, GeometryError> {
        Ok(Self {
            balls: BallFrame::new(ball_path, volume)?,
            pins: Pin::new(pin_path, "", &Layer::ALL)?,
            planes: BasePlane::new(pin_path, "", &Layer::ALL)?,
        })
    }

    pub fn balls(&self) -> &BallFrame {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut BallFrame {
        &mut self.balls
    }

    pub fn pins_mut(&mut self) -> &mut Pin {
        &mut self.pins
    }

    pub fn planes_mut(&mut self) -> &mut BasePlane {
        &mut self.planes
    }

    /// Pin frame of `layer` written in the ball frame
    pub fn get_pin_frame(&self, layer: Layer) -> Result<Frame, GeometryError> {
        let pin = self.pins.frame(layer, &self.planes).get_basis()?;
        Ok(pin.relative_to(&self.balls.get_basis()?))
    }
}

/// Both halves of the U-channel
#[derive(Debug, Clone)]
pub struct UChannel {
    top: UChannelHalf,
    bottom: UChannelHalf,
}

impl UChannel {
    pub fn new(top: UChannelHalf, bottom: UChannelHalf) -> Self {
        Self { top, bottom }
    }

    pub fn half(&self, volume: Volume) -> &UChannelHalf {
        match volume {
            Volume::Top => &self.top,
            Volume::Bottom => &self.bottom,
        }
    }

    pub fn half_mut(&mut self, volume: Volume) -> &mut UChannelHalf {
        match volume {
            Volume::Top => &mut self.top,
            Volume::Bottom => &mut self.bottom,
        }
    }

    pub fn get_pin_frame(&self, volume: Volume, layer: Layer) -> Result<Frame, GeometryError> {
        self.half(volume).get_pin_frame(layer)
    }
}

/// The 2019 adapter that sits on the layer 1 U-channel pins and carries the layer 1
/// half-module on a second pin pair.
///
/// The report labels the two pin pairs and base planes with `Lower ` and `Upper `
/// prefixes; only layer 1 is read.
#[derive(Debug, Clone)]
pub struct TransitionFixture {
    lower_pins: Pin,
    lower_planes: BasePlane,
    upper_pins: Pin,
    upper_planes: BasePlane,
}

impl TransitionFixture {
    pub const LOWER: &'static str = "Lower ";
    pub const UPPER: &'static str = "Upper ";

    pub fn new(path: Option<&Path>) -> Result<Self, GeometryError> {
        let layers = [Layer::L1];
        Ok(Self {
            lower_pins: Pin::new(path, Self::LOWER, &layers)?,
            lower_planes: BasePlane::new(path, Self::LOWER, &layers)?,
            upper_pins: Pin::new(path, Self::UPPER, &layers)?,
            upper_planes: BasePlane::new(path, Self::UPPER, &layers)?,
        })
    }

    pub fn lower_pins_mut(&mut self) -> &mut Pin {
        &mut self.lower_pins
    }

    pub fn lower_planes_mut(&mut self) -> &mut BasePlane {
        &mut self.lower_planes
    }

    pub fn upper_pins_mut(&mut self) -> &mut Pin {
        &mut self.upper_pins
    }

    pub fn upper_planes_mut(&mut self) -> &mut BasePlane {
        &mut self.upper_planes
    }

    /// Upper pin frame written in the lower pin frame
    pub fn offset(&self) -> Result<Frame, GeometryError> {
        let lower = self.lower_pins.frame(Layer::L1, &self.lower_planes).get_basis()?;
        let upper = self.upper_pins.frame(Layer::L1, &self.upper_planes).get_basis()?;
        Ok(upper.relative_to(&lower))
    }

    /// Move a U-channel layer 1 pin frame up to the pins the module actually sits on.
    ///
    /// The lower pins coincide with the U-channel pins, so the offset measured on the
    /// fixture is applied in the U-channel pin frame and the result is written in that
    /// frame's parent (the ball frame).
    pub fn correct(&self, uchannel_pin_frame: &Frame) -> Result<Frame, GeometryError> {
        Ok(self.offset()?.express_in(uchannel_pin_frame))
    }
}
