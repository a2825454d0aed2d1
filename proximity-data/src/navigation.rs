use std::fmt;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Navigation hint derived from the sector distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NavigationHint {
    PathClear,
    TurnLeft,
    TurnRight,
    Stop,
}

impl NavigationHint {
    pub fn severity(&self) -> SeverityColor {
        match self {
            NavigationHint::Stop => SeverityColor::Red,
            NavigationHint::TurnLeft | NavigationHint::TurnRight => SeverityColor::Orange,
            NavigationHint::PathClear => SeverityColor::Green,
        }
    }

    /// Audible alert `(frequency in Hz, duration)` for this hint, if any.
    pub fn alert_tone(&self) -> Option<(u32, Duration)> {
        match self {
            NavigationHint::Stop => Some((900, Duration::from_millis(150))),
            NavigationHint::TurnLeft | NavigationHint::TurnRight => {
                Some((700, Duration::from_millis(150)))
            }
            NavigationHint::PathClear => None,
        }
    }
}

impl fmt::Display for NavigationHint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NavigationHint::PathClear => write!(f, "Path Clear"),
            NavigationHint::TurnLeft => write!(f, "Turn Left"),
            NavigationHint::TurnRight => write!(f, "Turn Right"),
            NavigationHint::Stop => write!(f, "STOP - Obstacle Ahead"),
        }
    }
}

/// Presentation tag attached to a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SeverityColor {
    Green,
    Orange,
    Red,
}

impl SeverityColor {
    /// Color as a (blue, green, red) triple.
    pub fn bgr(&self) -> (u8, u8, u8) {
        match self {
            SeverityColor::Green => (0, 255, 0),
            SeverityColor::Orange => (0, 165, 255),
            SeverityColor::Red => (0, 0, 255),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavigationDecision {
    pub hint: NavigationHint,
    pub color: SeverityColor,
}

impl From<NavigationHint> for NavigationDecision {
    fn from(hint: NavigationHint) -> Self {
        NavigationDecision {
            hint,
            color: hint.severity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        assert_eq!(NavigationHint::Stop.severity(), SeverityColor::Red);
        assert_eq!(NavigationHint::TurnLeft.severity(), SeverityColor::Orange);
        assert_eq!(NavigationHint::TurnRight.severity(), SeverityColor::Orange);
        assert_eq!(NavigationHint::PathClear.severity(), SeverityColor::Green);
        assert_eq!(SeverityColor::Red.bgr(), (0, 0, 255));
    }

    #[test]
    fn test_alert_tone() {
        assert_eq!(
            NavigationHint::Stop.alert_tone(),
            Some((900, Duration::from_millis(150)))
        );
        assert_eq!(
            NavigationHint::TurnRight.alert_tone(),
            Some((700, Duration::from_millis(150)))
        );
        assert_eq!(NavigationHint::PathClear.alert_tone(), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(NavigationHint::Stop.to_string(), "STOP - Obstacle Ahead");
        assert_eq!(NavigationHint::PathClear.to_string(), "Path Clear");
    }
}
