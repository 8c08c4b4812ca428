use core::fmt;
use serde::{Deserialize, Serialize};
use crate::error::{check_dir, Error, Result};
use crate::int_vect::IntVect;
use crate::SPACEDIM;




#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIndexSpace", into = "RawIndexSpace")]


/**
 * Represents a rectangular region in a discrete index space. Both the small
 * and big ends are included in the region, so a box whose ends coincide
 * contains exactly one cell. A box never has negative extent.
 */
pub struct IndexSpace {
    small_end: IntVect,
    big_end: IntVect,
}




// ============================================================================
impl IndexSpace {


    pub fn new(small_end: IntVect, big_end: IntVect) -> Result<Self> {
        if !small_end.all_le(big_end) {
            return Err(Error::InvalidRegion(format!(
                "index space {} {} has negative volume", small_end, big_end)))
        }
        Ok(Self { small_end, big_end })
    }


    pub(crate) fn new_unchecked(small_end: IntVect, big_end: IntVect) -> Self {
        debug_assert!(small_end.all_le(big_end));
        Self { small_end, big_end }
    }


    /**
     * Return the minimum index (inclusive).
     */
    pub fn small_end(&self) -> IntVect {
        self.small_end
    }


    /**
     * Return the maximum index (inclusive).
     */
    pub fn big_end(&self) -> IntVect {
        self.big_end
    }


    /**
     * Return the number of indexes on each axis.
     */
    pub fn length(&self) -> IntVect {
        self.big_end - self.small_end + IntVect::unit()
    }


    pub fn length_dir(&self, dir: usize) -> Result<i64> {
        check_dir(dir).map(|d| self.length()[d])
    }


    /**
     * Return the number of cells in this index space.
     */
    pub fn num_pts(&self) -> i64 {
        self.length().product()
    }


    /**
     * Determine whether this index space contains the given index.
     */
    pub fn contains(&self, index: IntVect) -> bool {
        self.small_end.all_le(index) && index.all_le(self.big_end)
    }


    /**
     * Determine whether another index space is a subset of this one.
     */
    pub fn contains_space(&self, other: &Self) -> bool {
        self.contains(other.small_end) && self.contains(other.big_end)
    }


    /**
     * Determine whether the two index spaces share at least one cell.
     */
    pub fn intersects(&self, other: &Self) -> bool {
        self.small_end.max(other.small_end).all_le(self.big_end.min(other.big_end))
    }


    pub fn intersection(&self, other: &Self) -> Option<Self> {
        Self::new(
            self.small_end.max(other.small_end),
            self.big_end.min(other.big_end)).ok()
    }


    /**
     * Expand this index space by the given number of elements on each axis.
     * A negative amount trims the space, and fails if nothing would remain.
     */
    pub fn grow(&self, delta: i64) -> Result<Self> {
        self.grow_by(IntVect::splat(delta))
    }


    /**
     * Expand this index space on both ends of one axis.
     */
    pub fn grow_dir(&self, dir: usize, delta: i64) -> Result<Self> {
        let dir = check_dir(dir)?;
        self.grow_by(IntVect::basis(dir) * delta)
    }


    /**
     * Expand each axis by the matching component of `delta`, on both ends.
     */
    pub fn grow_by(&self, delta: IntVect) -> Result<Self> {
        Self::new(self.small_end - delta, self.big_end + delta)
    }


    /**
     * Translate the index space by the given offset.
     */
    pub fn shift(&self, offset: IntVect) -> Self {
        Self {
            small_end: self.small_end + offset,
            big_end: self.big_end + offset,
        }
    }


    /**
     * Map this index space to a coarser level. Both ends are floor-divided
     * by the ratio, so the result covers every cell of the fine region.
     */
    pub fn coarsen(&self, ratio: IntVect) -> Result<Self> {
        check_ratio(ratio)?;
        Ok(Self {
            small_end: self.small_end.div_floor(ratio),
            big_end: self.big_end.div_floor(ratio),
        })
    }


    /**
     * Map this index space to a finer level. Each coarse cell becomes
     * `ratio` fine cells along each axis.
     */
    pub fn refine(&self, ratio: IntVect) -> Result<Self> {
        check_ratio(ratio)?;
        Ok(Self {
            small_end: self.small_end * ratio,
            big_end: (self.big_end + IntVect::unit()) * ratio - IntVect::unit(),
        })
    }


    /**
     * Return an iterator which traverses the index space in row-major order
     * (C-like; the final index increases fastest).
     */
    pub fn iter(&self) -> impl Iterator<Item = IntVect> + '_ {
        let (lo, hi) = (self.small_end, self.big_end);
        (lo[0]..=hi[0]).flat_map(move |i| {
            (lo[1]..=hi[1]).flat_map(move |j| {
                (lo[2]..=hi[2]).map(move |k| IntVect::new([i, j, k]))
            })
        })
    }
}




pub(crate) fn check_ratio(ratio: IntVect) -> Result<IntVect> {
    if ratio.all_positive() {
        Ok(ratio)
    } else {
        Err(Error::InvalidRatio(ratio))
    }
}




// ============================================================================
#[derive(Serialize, Deserialize)]
struct RawIndexSpace {
    small_end: IntVect,
    big_end: IntVect,
}

impl TryFrom<RawIndexSpace> for IndexSpace {
    type Error = Error;

    fn try_from(raw: RawIndexSpace) -> Result<Self> {
        Self::new(raw.small_end, raw.big_end)
    }
}

impl From<IndexSpace> for RawIndexSpace {
    fn from(space: IndexSpace) -> Self {
        Self { small_end: space.small_end, big_end: space.big_end }
    }
}

impl fmt::Display for IndexSpace {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "({} {})", self.small_end, self.big_end)
    }
}




/**
 * Less imposing factory function to construct an IndexSpace object from
 * inclusive corner arrays.
 */
pub fn range3d(small_end: [i64; SPACEDIM], big_end: [i64; SPACEDIM]) -> Result<IndexSpace> {
    IndexSpace::new(small_end.into(), big_end.into())
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{range3d, IndexSpace};
    use crate::error::Error;
    use crate::int_vect::IntVect;

    #[test]
    fn inverted_space_is_rejected() {
        assert!(matches!(range3d([0, 0, 0], [1, -1, 1]), Err(Error::InvalidRegion(_))));
        assert!(range3d([3, 3, 3], [3, 3, 3]).is_ok());
    }

    #[test]
    fn length_counts_both_ends() {
        let space = range3d([0, 0, 0], [127, 63, 0]).unwrap();
        assert_eq!(space.length(), IntVect::new([128, 64, 1]));
        assert_eq!(space.length_dir(1).unwrap(), 64);
        assert_eq!(space.num_pts(), 128 * 64);
        assert_eq!(space.length_dir(3), Err(Error::IndexOutOfRange(3)));
    }

    #[test]
    fn coarsen_covers_the_fine_region() {
        let fine = range3d([-1, -2, -3], [4, 5, 6]).unwrap();
        let coarse = fine.coarsen(IntVect::new([2, 2, 1])).unwrap();
        assert_eq!(coarse, range3d([-1, -1, -3], [2, 2, 6]).unwrap());
        assert!(coarse.refine(IntVect::new([2, 2, 1])).unwrap().contains_space(&fine));
    }

    #[test]
    fn refine_uses_inclusive_big_end() {
        let coarse = range3d([-1, -2, -3], [4, 5, 6]).unwrap();
        let fine = coarse.refine(IntVect::new([2, 2, 3])).unwrap();
        assert_eq!(fine, range3d([-2, -4, -9], [9, 11, 20]).unwrap());
        assert_eq!(fine.coarsen(IntVect::new([2, 2, 3])).unwrap(), coarse);
    }

    #[test]
    fn non_positive_ratio_is_rejected() {
        let space = range3d([0, 0, 0], [7, 7, 7]).unwrap();
        assert_eq!(space.coarsen(IntVect::new([2, 0, 2])), Err(Error::InvalidRatio(IntVect::new([2, 0, 2]))));
        assert!(space.refine(IntVect::new([-1, 1, 1])).is_err());
    }

    #[test]
    fn grow_and_trim_work() {
        let space = range3d([0, 0, 0], [9, 9, 9]).unwrap();
        assert_eq!(space.grow(2).unwrap(), range3d([-2, -2, -2], [11, 11, 11]).unwrap());
        assert_eq!(space.grow_dir(1, -4).unwrap(), range3d([0, 4, 0], [9, 5, 9]).unwrap());
        assert!(space.grow(-5).is_err());
    }

    #[test]
    fn intersection_works() {
        let a = range3d([0, 0, 0], [9, 9, 9]).unwrap();
        let b = range3d([5, 5, 5], [14, 14, 14]).unwrap();
        let c = range3d([10, 0, 0], [12, 9, 9]).unwrap();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.intersection(&b), Some(range3d([5, 5, 5], [9, 9, 9]).unwrap()));
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn traversal_is_row_major() {
        let space = range3d([0, 0, 0], [1, 1, 2]).unwrap();
        let indexes: Vec<_> = space.iter().collect();
        assert_eq!(indexes.len() as i64, space.num_pts());
        assert_eq!(indexes[0], IntVect::new([0, 0, 0]));
        assert_eq!(indexes[1], IntVect::new([0, 0, 1]));
        assert_eq!(indexes[11], IntVect::new([1, 1, 2]));
    }

    #[test]
    fn deserialize_rejects_inverted_space() {
        let mut buffer = Vec::new();
        let raw = (IntVect::new([0, 0, 0]), IntVect::new([1, 1, 1]));
        ciborium::ser::into_writer(&super::RawIndexSpace { small_end: raw.1, big_end: raw.0 }, &mut buffer).unwrap();
        let result: Result<IndexSpace, _> = ciborium::de::from_reader(buffer.as_slice());
        assert!(result.is_err());
    }
}
