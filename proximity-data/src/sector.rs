use std::fmt;
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Forward-facing angular sector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sector {
    Left,
    Center,
    Right,
}

impl Sector {
    pub const ALL: [Sector; 3] = [Sector::Left, Sector::Center, Sector::Right];
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sector::Left => write!(f, "Left"),
            Sector::Center => write!(f, "Center"),
            Sector::Right => write!(f, "Right"),
        }
    }
}

/// Mean distance per sector, computed from one scan.
///
/// Distances are in mm. A value of `0.0` means that the sector had no return
/// in the scan it was computed from. It never means "obstacle at distance 0".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectorDistances {
    pub left: f64,
    pub center: f64,
    pub right: f64,
}

impl SectorDistances {
    pub fn new(left: f64, center: f64, right: f64) -> Self {
        SectorDistances {
            left,
            center,
            right,
        }
    }

    /// Whether the sector received at least one return.
    pub fn has_reading(&self, sector: Sector) -> bool {
        self[sector] != 0.
    }
}

impl Index<Sector> for SectorDistances {
    type Output = f64;

    fn index(&self, sector: Sector) -> &f64 {
        match sector {
            Sector::Left => &self.left,
            Sector::Center => &self.center,
            Sector::Right => &self.right,
        }
    }
}

impl IndexMut<Sector> for SectorDistances {
    fn index_mut(&mut self, sector: Sector) -> &mut f64 {
        match sector {
            Sector::Left => &mut self.left,
            Sector::Center => &mut self.center,
            Sector::Right => &mut self.right,
        }
    }
}

impl fmt::Display for SectorDistances {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "L:{:.0} C:{:.0} R:{:.0}",
            self.left, self.center, self.right
        )
    }
}
