pub(crate) fn to_u16(a: u8, b: u8) -> u16 {
    ((a as u16) << 8) + (b as u16)
}

/// Angle field of a measurement node, q6 fixed point spread over two bytes.
/// The lowest bit of `bit1` is the check bit and is not part of the angle.
pub(crate) fn to_angle(bit1: u8, bit2: u8) -> f64 {
    let a = ((bit1 as u16) >> 1) + ((bit2 as u16) << 7);
    (a as f64) / 64.
}

/// Distance field of a measurement node in mm, q2 fixed point little endian.
pub(crate) fn calc_distance(b1: u8, b2: u8) -> f64 {
    (to_u16(b2, b1) as f64) / 4.
}

/// Wraps an angle into `[0, 360)`.
pub fn normalize_degree(degree: f64) -> f64 {
    let d = degree.rem_euclid(360.);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360. {
        0.
    } else {
        d
    }
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_angle() {
        // 90 degrees = 5760 in q6, check bit set
        let raw = 5760u16;
        let b1 = (((raw & 0x7F) << 1) | 1) as u8;
        let b2 = (raw >> 7) as u8;
        assert_eq!(to_angle(b1, b2), 90.);
    }

    #[test]
    fn test_calc_distance() {
        assert_eq!(calc_distance(0x10, 0x27), 2500.);
        assert_eq!(calc_distance(0x01, 0x00), 0.25);
    }

    #[test]
    fn test_normalize_degree() {
        assert_eq!(normalize_degree(370.), 10.);
        assert_eq!(normalize_degree(-10.), 350.);
        assert_eq!(normalize_degree(720.), 0.);
        assert_eq!(normalize_degree(-1e-20), 0.);
    }

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&[0xA5, 0x5A]), "A5 5A");
    }
}
