#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single range measurement.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanSample {
    /// Return strength of the laser pulse. Not used by the fusion core.
    pub quality: u8,
    /// Angle in degrees, clockwise from the sensor's zero reference.
    pub angle_degree: f64,
    /// Distance to an object in mm.
    pub distance_mm: f64,
}

impl ScanSample {
    pub fn new(quality: u8, angle_degree: f64, distance_mm: f64) -> Self {
        ScanSample {
            quality,
            angle_degree,
            distance_mm,
        }
    }

    /// Position in mm with the sensor's zero reference along +y and angles
    /// growing clockwise.
    pub fn to_cartesian(&self) -> (f64, f64) {
        let (sin, cos) = self.angle_degree.to_radians().sin_cos();
        (self.distance_mm * sin, self.distance_mm * cos)
    }
}

/// Struct to hold one lap of lidar scan data.
#[derive(Clone, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scan {
    pub samples: Vec<ScanSample>,
}

impl Scan {
    pub fn new() -> Scan {
        Scan {
            samples: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn push(&mut self, sample: ScanSample) {
        self.samples.push(sample);
    }
}

impl From<Vec<ScanSample>> for Scan {
    fn from(samples: Vec<ScanSample>) -> Self {
        Scan { samples }
    }
}

impl FromIterator<(u8, f64, f64)> for Scan {
    fn from_iter<I: IntoIterator<Item = (u8, f64, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(q, a, d)| ScanSample::new(q, a, d))
            .collect::<Vec<_>>()
            .into()
    }
}
