use fxhash::FxHashMap;
use std::path::Path;

use super::error::GeometryError;
use super::ids::Layer;
use super::report::{BlockLayout, MeasurementBlock, SurveyReport};
use super::vector::Plane;

/// Mounting surfaces the half-modules sit on, one per layer.
///
/// A report only needs to carry the planes for the layers asked for; the others stay
/// zero (and give degenerate frames if used).
#[derive(Debug, Clone, PartialEq)]
pub struct BasePlane {
    planes: FxHashMap<Layer, Plane>,
}

impl BasePlane {
    /// Read the base planes of `layers` from a survey report, looking for labels of the
    /// form `{prefix}L{n} Base Plane`.
    pub fn new(path: Option<&Path>, prefix: &str, layers: &[Layer]) -> Result<Self, GeometryError> {
        let mut planes = Self::stub();
        if let Some(report) = SurveyReport::open_for(path, &format!("{prefix}base planes"))? {
            for layer in layers {
                let block = MeasurementBlock::new(
                    format!("{prefix}{layer} Base Plane"),
                    BlockLayout::PLANE,
                );
                planes.set_plane(*layer, report.measure_plane(&block)?);
            }
        }
        Ok(planes)
    }

    fn stub() -> Self {
        Self {
            planes: Layer::ALL
                .iter()
                .map(|layer| (*layer, Plane::default()))
                .collect(),
        }
    }

    pub fn get_plane(&self, layer: Layer) -> Plane {
        self.planes.get(&layer).copied().unwrap_or_default()
    }

    pub fn set_plane(&mut self, layer: Layer, plane: Plane) {
        self.planes.insert(layer, plane);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Point3;

    #[test]
    fn test_stub_planes() {
        let mut planes = BasePlane::new(None, "", &Layer::ALL).unwrap();
        assert_eq!(planes.get_plane(Layer::L2), Plane::default());
        let plane = Plane::new(Point3::new(0.0, 0.0, 1.0), Point3::new(0.0, 1.0, 0.0));
        planes.set_plane(Layer::L2, plane);
        assert_eq!(planes.get_plane(Layer::L2), plane);
        assert_eq!(planes.get_plane(Layer::L3), Plane::default());
    }
}
