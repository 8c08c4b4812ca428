use serde::{Deserialize, Serialize};
use crate::error::{check_dir, Result};
use crate::index_space::IndexSpace;
use crate::int_vect::IntVect;
use crate::SPACEDIM;




/**
 * The period of a domain along each axis, in index units. A zero period
 * means the axis is not periodic.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Periodicity {
    period: IntVect,
}




// ============================================================================
impl Periodicity {

    pub fn new(period: IntVect) -> Self {
        Self { period }
    }

    pub fn non_periodic() -> Self {
        Self { period: IntVect::zero() }
    }

    pub fn period(&self) -> IntVect {
        self.period
    }

    pub fn is_periodic(&self, dir: usize) -> Result<bool> {
        check_dir(dir).map(|d| self.period[d] > 0)
    }

    pub fn is_any_periodic(&self) -> bool {
        self.period.iter().any(|&p| p > 0)
    }

    pub fn is_all_periodic(&self) -> bool {
        self.period.iter().all(|&p| p > 0)
    }

    /**
     * Return every image offset of a periodic domain: each combination of
     * `-p`, `0`, `+p` on the periodic axes, and zero on the others. The zero
     * offset comes first.
     */
    pub fn shift_int_vect(&self) -> Vec<IntVect> {
        let mut shifts = vec![IntVect::zero()];

        for dir in 0..SPACEDIM {
            if self.period[dir] > 0 {
                let basis = IntVect::basis(dir) * self.period[dir];
                let current = shifts.clone();
                shifts.extend(current.iter().map(|&s| s - basis));
                shifts.extend(current.iter().map(|&s| s + basis));
            }
        }
        shifts
    }

    /**
     * Return the fundamental cell of the periodic lattice: `[0, p - 1]` on
     * periodic axes, effectively unbounded on the others.
     */
    pub fn domain(&self) -> IndexSpace {
        let mut lo = IntVect::splat(i32::MIN as i64);
        let mut hi = IntVect::splat(i32::MAX as i64);

        for dir in 0..SPACEDIM {
            if self.period[dir] > 0 {
                lo[dir] = 0;
                hi[dir] = self.period[dir] - 1;
            }
        }
        IndexSpace::new_unchecked(lo, hi)
    }
}
