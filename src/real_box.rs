use core::fmt;
use serde::{Deserialize, Serialize};
use crate::error::{check_dir, Error, Result};
use crate::SPACEDIM;




#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRealBox", into = "RawRealBox")]


/**
 * An axis-aligned box in physical (problem) space.
 */
pub struct RealBox {
    lo: [f64; SPACEDIM],
    hi: [f64; SPACEDIM],
}




// ============================================================================
impl RealBox {

    pub fn new(lo: [f64; SPACEDIM], hi: [f64; SPACEDIM]) -> Result<Self> {
        for dir in 0..SPACEDIM {
            if !(lo[dir].is_finite() && hi[dir].is_finite() && lo[dir] <= hi[dir]) {
                return Err(Error::InvalidRegion(format!(
                    "real box has bounds {} .. {} on axis {}", lo[dir], hi[dir], dir)))
            }
        }
        Ok(Self { lo, hi })
    }

    /**
     * Construct from the six scalar bounds, lower corner first.
     */
    pub fn from_bounds(x0: f64, y0: f64, z0: f64, x1: f64, y1: f64, z1: f64) -> Result<Self> {
        Self::new([x0, y0, z0], [x1, y1, z1])
    }

    pub fn lo(&self) -> [f64; SPACEDIM] {
        self.lo
    }

    pub fn hi(&self) -> [f64; SPACEDIM] {
        self.hi
    }

    pub fn lo_dir(&self, dir: usize) -> Result<f64> {
        check_dir(dir).map(|d| self.lo[d])
    }

    pub fn hi_dir(&self, dir: usize) -> Result<f64> {
        check_dir(dir).map(|d| self.hi[d])
    }

    pub fn length(&self, dir: usize) -> Result<f64> {
        check_dir(dir).map(|d| self.hi[d] - self.lo[d])
    }

    pub fn lengths(&self) -> [f64; SPACEDIM] {
        let mut result = [0.0; SPACEDIM];

        for (dir, x) in result.iter_mut().enumerate() {
            *x = self.hi[dir] - self.lo[dir]
        }
        result
    }

    pub fn volume(&self) -> f64 {
        self.lengths().iter().product()
    }

    /**
     * Determine whether the point lies in the box, widened by `eps` on every
     * side.
     */
    pub fn contains(&self, x: [f64; SPACEDIM], eps: f64) -> bool {
        (0..SPACEDIM).all(|d| x[d] >= self.lo[d] - eps && x[d] <= self.hi[d] + eps)
    }

    /**
     * Compare bounds with an absolute tolerance.
     */
    pub fn almost_equal(&self, other: &Self, tol: f64) -> bool {
        (0..SPACEDIM).all(|d| {
            (self.lo[d] - other.lo[d]).abs() <= tol && (self.hi[d] - other.hi[d]).abs() <= tol
        })
    }

    pub(crate) fn with_hi(&self, hi: [f64; SPACEDIM]) -> Self {
        Self { lo: self.lo, hi }
    }
}




// ============================================================================
#[derive(Serialize, Deserialize)]
struct RawRealBox {
    lo: [f64; SPACEDIM],
    hi: [f64; SPACEDIM],
}

impl TryFrom<RawRealBox> for RealBox {
    type Error = Error;

    fn try_from(raw: RawRealBox) -> Result<Self> {
        Self::new(raw.lo, raw.hi)
    }
}

impl From<RealBox> for RawRealBox {
    fn from(rb: RealBox) -> Self {
        Self { lo: rb.lo, hi: rb.hi }
    }
}

impl fmt::Display for RealBox {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{:?} {:?}", self.lo, self.hi)
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use approx::assert_relative_eq;
    use super::RealBox;
    use crate::error::Error;

    #[test]
    fn inverted_or_non_finite_box_is_rejected() {
        assert!(matches!(RealBox::new([0.0, 1.0, 0.0], [1.0, 0.0, 1.0]), Err(Error::InvalidRegion(_))));
        assert!(RealBox::new([0.0, f64::NAN, 0.0], [1.0, 1.0, 1.0]).is_err());
        assert!(RealBox::new([0.0, 0.0, 0.0], [0.0, 1.0, 1.0]).is_ok());
    }

    #[test]
    fn lengths_and_volume_work() {
        let rb = RealBox::from_bounds(0.0, 0.0, 0.0, 1.0, 2.0, 5.0).unwrap();
        assert_eq!(rb.length(2).unwrap(), 5.0);
        assert_eq!(rb.volume(), 10.0);
        assert_eq!(rb.length(3), Err(Error::IndexOutOfRange(3)));

        let rb = RealBox::new([0.0, -1.0, 1.0], [1.0, 0.0, 2.0]).unwrap();
        assert_relative_eq!(rb.volume(), 1.0);
        assert_eq!(rb.lo_dir(1).unwrap(), -1.0);
        assert_eq!(rb.hi_dir(2).unwrap(), 2.0);
    }

    #[test]
    fn containment_honors_tolerance() {
        let rb = RealBox::from_bounds(0.0, 0.0, 0.0, 1.0, 1.0, 1.0).unwrap();
        assert!(rb.contains([0.5, 0.5, 1.0], 0.0));
        assert!(!rb.contains([0.5, 0.5, 1.01], 0.0));
        assert!(rb.contains([0.5, 0.5, 1.01], 0.02));
    }

    #[test]
    fn almost_equal_works() {
        let a = RealBox::from_bounds(0.0, 0.0, 0.0, 1.0, 2.0, 5.0).unwrap();
        let b = RealBox::from_bounds(1e-14, 0.0, 0.0, 1.0, 2.0, 5.0).unwrap();
        assert!(a.almost_equal(&b, 1e-12));
        assert!(!a.almost_equal(&b, 1e-16));
    }
}
