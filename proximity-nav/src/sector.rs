use crate::numeric::normalize_degree;
use proximity_data::{Scan, Sector, SectorDistances};

/// Maps an angle to its forward sector.
///
/// The angle is wrapped into `[0, 360)` first. Samples from the rear
/// hemisphere (`[180, 300]`) are not assigned to any sector.
pub fn classify(angle_degree: f64) -> Option<Sector> {
    if !angle_degree.is_finite() {
        return None;
    }
    let a = normalize_degree(angle_degree);
    if a < 60. || a > 300. {
        Some(Sector::Right)
    } else if a < 120. {
        Some(Sector::Center)
    } else if a < 180. {
        Some(Sector::Left)
    } else {
        None
    }
}

#[derive(Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Reduces one scan to the mean distance of each sector.
/// A sector without samples yields 0.
pub fn aggregate(scan: &Scan) -> SectorDistances {
    let mut left = Accumulator::default();
    let mut center = Accumulator::default();
    let mut right = Accumulator::default();

    for sample in scan.samples.iter() {
        let acc = match classify(sample.angle_degree) {
            Some(Sector::Left) => &mut left,
            Some(Sector::Center) => &mut center,
            Some(Sector::Right) => &mut right,
            None => continue,
        };
        acc.sum += sample.distance_mm;
        acc.count += 1;
    }

    SectorDistances::new(left.mean(), center.mean(), right.mean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proximity_data::ScanSample;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0.), Some(Sector::Right));
        assert_eq!(classify(59.999), Some(Sector::Right));
        assert_eq!(classify(60.), Some(Sector::Center));
        assert_eq!(classify(119.999), Some(Sector::Center));
        assert_eq!(classify(120.), Some(Sector::Left));
        assert_eq!(classify(179.999), Some(Sector::Left));
        assert_eq!(classify(180.), None);
        assert_eq!(classify(240.), None);
        assert_eq!(classify(300.), None);
        assert_eq!(classify(300.001), Some(Sector::Right));
        assert_eq!(classify(359.999), Some(Sector::Right));
    }

    #[test]
    fn test_classify_wraps_angles() {
        for i in 0..1440 {
            let a = i as f64 * 0.25;
            assert_eq!(classify(a), classify(a + 360.), "angle {a}");
            assert_eq!(classify(a), classify(a - 360.), "angle {a}");
        }
        assert_eq!(classify(-30.), Some(Sector::Right));
        assert_eq!(classify(450.), Some(Sector::Center));
    }

    #[test]
    fn test_classify_non_finite() {
        assert_eq!(classify(f64::NAN), None);
        assert_eq!(classify(f64::INFINITY), None);
    }

    #[test]
    fn test_aggregate_means() {
        let scan: Scan = vec![
            (10u8, 10., 1000.),
            (10, 350., 2000.),
            (10, 90., 400.),
            (10, 100., 600.),
            (10, 150., 3000.),
            // rear hemisphere, ignored
            (10, 200., 1.),
            (10, 300., 1.),
        ]
        .into_iter()
        .collect();
        let d = aggregate(&scan);
        assert_eq!(d, SectorDistances::new(3000., 500., 1500.));
    }

    #[test]
    fn test_aggregate_empty_sectors_are_zero() {
        let d = aggregate(&Scan::new());
        assert_eq!(d, SectorDistances::default());

        let scan = Scan::from(vec![ScanSample::new(5, 90., 750.)]);
        let d = aggregate(&scan);
        assert_eq!(d.left, 0.);
        assert_eq!(d.center, 750.);
        assert_eq!(d.right, 0.);
        assert!(!d.left.is_nan() && !d.right.is_nan());
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let samples = vec![
            ScanSample::new(1, 10., 100.),
            ScanSample::new(1, 70., 250.),
            ScanSample::new(1, 130., 400.),
            ScanSample::new(1, 20., 300.),
        ];
        let mut reversed = samples.clone();
        reversed.reverse();
        assert_eq!(
            aggregate(&Scan::from(samples)),
            aggregate(&Scan::from(reversed))
        );
    }
}
