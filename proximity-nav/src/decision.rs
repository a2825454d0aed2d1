use proximity_data::{NavigationDecision, NavigationHint, Sector, SectorDistances};

/// Maps the sector distances to a navigation hint.
///
/// Center has priority over Left, Left over Right. A sector distance of 0
/// means "no reading" and never counts as an obstacle.
pub fn decide(distances: &SectorDistances, threshold: f64) -> NavigationDecision {
    let is_near = |sector: Sector| distances.has_reading(sector) && distances[sector] < threshold;

    let hint = if is_near(Sector::Center) {
        NavigationHint::Stop
    } else if is_near(Sector::Left) {
        NavigationHint::TurnRight
    } else if is_near(Sector::Right) {
        NavigationHint::TurnLeft
    } else {
        NavigationHint::PathClear
    };
    NavigationDecision::from(hint)
}
