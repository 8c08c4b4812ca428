use core::fmt;
use core::ops::{Add, Index, IndexMut, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};
use crate::SPACEDIM;




/**
 * A point in a discrete index space: a fixed-size tuple of signed integers,
 * one per spatial dimension. Arithmetic is component-wise and produces new
 * values.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntVect([i64; SPACEDIM]);




// ============================================================================
impl IntVect {

    pub const fn new(data: [i64; SPACEDIM]) -> Self {
        Self(data)
    }

    pub const fn zero() -> Self {
        Self([0; SPACEDIM])
    }

    pub const fn unit() -> Self {
        Self([1; SPACEDIM])
    }

    /**
     * Return a vector with every component set to `value`.
     */
    pub const fn splat(value: i64) -> Self {
        Self([value; SPACEDIM])
    }

    /**
     * Return the unit vector along the given axis.
     */
    pub fn basis(dir: usize) -> Self {
        let mut data = [0; SPACEDIM];
        data[dir] = 1;
        Self(data)
    }

    pub fn as_array(&self) -> [i64; SPACEDIM] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &i64> {
        self.0.iter()
    }

    pub fn sum(&self) -> i64 {
        self.0.iter().sum()
    }

    pub fn product(&self) -> i64 {
        self.0.iter().product()
    }

    pub fn min(self, other: Self) -> Self {
        self.zip_with(other, i64::min)
    }

    pub fn max(self, other: Self) -> Self {
        self.zip_with(other, i64::max)
    }

    /**
     * Determine whether every component is less than or equal to the
     * corresponding component of `other`.
     */
    pub fn all_le(&self, other: Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    pub fn all_lt(&self, other: Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a < b)
    }

    pub fn all_ge(&self, other: Self) -> bool {
        other.all_le(*self)
    }

    /**
     * Determine whether every component is strictly positive.
     */
    pub fn all_positive(&self) -> bool {
        self.0.iter().all(|&a| a > 0)
    }

    /**
     * Component-wise floor division: the quotient is rounded toward negative
     * infinity, so that a negative fine index lands in the coarse cell
     * containing it. The divisor must be positive in every component.
     */
    pub fn div_floor(&self, divisor: Self) -> Self {
        self.zip_with(divisor, i64::div_euclid)
    }

    pub(crate) fn zip_with<F>(&self, other: Self, f: F) -> Self
    where
        F: Fn(i64, i64) -> i64
    {
        let mut data = [0; SPACEDIM];

        for (i, x) in data.iter_mut().enumerate() {
            *x = f(self.0[i], other.0[i])
        }
        Self(data)
    }
}




// ============================================================================
impl Add for IntVect {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}

impl Sub for IntVect {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}

impl Mul for IntVect {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }
}

impl Mul<i64> for IntVect {
    type Output = Self;

    fn mul(self, other: i64) -> Self {
        self.zip_with(Self::splat(other), |a, b| a * b)
    }
}

impl Neg for IntVect {
    type Output = Self;

    fn neg(self) -> Self {
        Self::zero() - self
    }
}




// ============================================================================
impl Index<usize> for IntVect {
    type Output = i64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for IntVect {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl From<[i64; SPACEDIM]> for IntVect {
    fn from(data: [i64; SPACEDIM]) -> Self {
        Self(data)
    }
}

impl From<IntVect> for [i64; SPACEDIM] {
    fn from(iv: IntVect) -> Self {
        iv.0
    }
}

/**
 * Periodicity flags become a 0/1 mask.
 */
impl From<[bool; SPACEDIM]> for IntVect {
    fn from(flags: [bool; SPACEDIM]) -> Self {
        let mut data = [0; SPACEDIM];

        for (x, &f) in data.iter_mut().zip(flags.iter()) {
            *x = f as i64
        }
        Self(data)
    }
}

impl fmt::Display for IntVect {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "(")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                write!(fmt, ",")?;
            }
            write!(fmt, "{}", x)?;
        }
        write!(fmt, ")")
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::IntVect;

    #[test]
    fn arithmetic_is_component_wise() {
        let a = IntVect::new([1, -2, 3]);
        let b = IntVect::new([4, 5, -6]);
        assert_eq!(a + b, IntVect::new([5, 3, -3]));
        assert_eq!(a - b, IntVect::new([-3, -7, 9]));
        assert_eq!(a * b, IntVect::new([4, -10, -18]));
        assert_eq!(a * 2, IntVect::new([2, -4, 6]));
        assert_eq!(-a, IntVect::new([-1, 2, -3]));
    }

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        let a = IntVect::new([-1, -2, -3]);
        assert_eq!(a.div_floor(IntVect::new([2, 2, 1])), IntVect::new([-1, -1, -3]));
        assert_eq!(IntVect::new([4, 5, 7]).div_floor(IntVect::splat(2)), IntVect::new([2, 2, 3]));
        assert_eq!(IntVect::new([-3, -4, -5]).div_floor(IntVect::splat(4)), IntVect::new([-1, -1, -2]));
    }

    #[test]
    fn bool_flags_become_a_mask() {
        assert_eq!(IntVect::from([false, true, true]), IntVect::new([0, 1, 1]));
        assert_eq!(IntVect::new([128, 128, 128]) * IntVect::from([false, false, true]), IntVect::new([0, 0, 128]));
    }

    #[test]
    fn comparisons_work() {
        let a = IntVect::new([0, 0, 0]);
        let b = IntVect::new([1, 0, 2]);
        assert!(a.all_le(b));
        assert!(!a.all_lt(b));
        assert!(b.all_ge(a));
        assert!(!b.all_positive());
        assert_eq!(a.max(b), b);
        assert_eq!(IntVect::new([2, 3, 4]).product(), 24);
    }

    #[test]
    fn display_matches_tuple_form() {
        assert_eq!(IntVect::new([0, -1, 30]).to_string(), "(0,-1,30)");
    }
}
