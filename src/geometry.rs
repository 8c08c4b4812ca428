use core::fmt;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::error::{check_dir, Error, Result};
use crate::index_space::IndexSpace;
use crate::int_vect::IntVect;
use crate::periodicity::Periodicity;
use crate::real_box::RealBox;
use crate::session::GeometryDefaults;
use crate::SPACEDIM;




/// Bisection for the roundoff domain stops once the bracket is narrower than
/// this fraction of a cell (or a couple of ulps of the upper bound).
pub const ROUNDOFF_CELL_TOLERANCE: f64 = 1e-10;




/// Upper limit on bisection steps; each step halves the bracket, so this is
/// never reached for finite bounds.
const MAX_BISECTION_STEPS: usize = 200;




/**
 * Identifier for the coordinate system of a geometry. Only Cartesian
 * geometries use the cell sizes as plain volumes; the tag is otherwise
 * carried for consumers.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum CoordSys {
    Cartesian = 0,
    RZ = 1,
    Spherical = 2,
}




// ============================================================================
impl Default for CoordSys {
    fn default() -> Self {
        CoordSys::Cartesian
    }
}

impl TryFrom<i32> for CoordSys {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(CoordSys::Cartesian),
            1 => Ok(CoordSys::RZ),
            2 => Ok(CoordSys::Spherical),
            _ => Err(Error::InvalidCoord(value)),
        }
    }
}

impl From<CoordSys> for i32 {
    fn from(coord: CoordSys) -> Self {
        coord as i32
    }
}




#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry", into = "RawGeometry")]


/**
 * Binds an index-space domain to a physical domain. The geometry knows the
 * cell size on each axis, which axes are periodic, and how to grow, coarsen
 * and refine its domain.
 *
 * It also maintains a roundoff domain: a physical box, slightly smaller than
 * the problem domain in general, such that every point inside it is mapped
 * by `cell_index` to a cell inside `domain`. Points inside the problem domain
 * but within a tiny distance of its upper faces may fall outside the roundoff
 * domain. The lower faces of the two boxes coincide.
 */
pub struct Geometry {
    domain: IndexSpace,
    prob_domain: RealBox,
    coord: CoordSys,
    is_periodic: [bool; SPACEDIM],
    dx: [f64; SPACEDIM],
    inv_dx: [f64; SPACEDIM],
    roundoff_domain: RealBox,
}




// ============================================================================
impl Geometry {


    pub fn new(
        domain: IndexSpace,
        prob_domain: RealBox,
        coord: CoordSys,
        is_periodic: [bool; SPACEDIM]) -> Result<Self>
    {
        check_prob_domain(&prob_domain)?;

        let mut geometry = Self {
            domain,
            prob_domain,
            coord,
            is_periodic,
            dx: [0.0; SPACEDIM],
            inv_dx: [0.0; SPACEDIM],
            roundoff_domain: prob_domain,
        };
        geometry.compute_derived();
        Ok(geometry)
    }


    /**
     * Build a geometry from a set of defaults. The defaults must carry both a
     * domain and a problem domain.
     */
    pub fn from_defaults(defaults: &GeometryDefaults) -> Result<Self> {
        let domain = defaults.domain().ok_or(Error::UninitializedDefault("domain"))?;
        let prob_domain = defaults.prob_domain().ok_or(Error::UninitializedDefault("prob_domain"))?;
        Self::new(domain, prob_domain, defaults.coord(), defaults.is_periodic())
    }


    /**
     * Replace the whole state of this geometry. Nothing is changed if the
     * new state is invalid.
     */
    pub fn define(
        &mut self,
        domain: IndexSpace,
        prob_domain: RealBox,
        coord: CoordSys,
        is_periodic: [bool; SPACEDIM]) -> Result<()>
    {
        *self = Self::new(domain, prob_domain, coord, is_periodic)?;
        debug!("defined {}", self);
        Ok(())
    }


    pub fn domain(&self) -> IndexSpace {
        self.domain
    }


    pub fn set_domain(&mut self, domain: IndexSpace) {
        self.domain = domain;
        self.compute_derived();
    }


    pub fn prob_domain(&self) -> RealBox {
        self.prob_domain
    }


    /**
     * Replace the physical domain. Every axis must have positive length.
     */
    pub fn set_prob_domain(&mut self, prob_domain: RealBox) -> Result<()> {
        check_prob_domain(&prob_domain)?;
        self.prob_domain = prob_domain;
        self.compute_derived();
        Ok(())
    }


    pub fn prob_lo(&self, dir: usize) -> Result<f64> {
        self.prob_domain.lo_dir(dir)
    }


    pub fn prob_hi(&self, dir: usize) -> Result<f64> {
        self.prob_domain.hi_dir(dir)
    }


    pub fn prob_length(&self, dir: usize) -> Result<f64> {
        self.prob_domain.length(dir)
    }


    pub fn prob_lo_array(&self) -> [f64; SPACEDIM] {
        self.prob_domain.lo()
    }


    pub fn prob_hi_array(&self) -> [f64; SPACEDIM] {
        self.prob_domain.hi()
    }


    pub fn prob_length_array(&self) -> [f64; SPACEDIM] {
        self.prob_domain.lengths()
    }


    /**
     * Return the volume of the physical domain.
     */
    pub fn prob_size(&self) -> f64 {
        self.prob_domain.volume()
    }


    pub fn coord_sys(&self) -> CoordSys {
        self.coord
    }


    pub fn set_coord_sys(&mut self, coord: CoordSys) {
        self.coord = coord;
    }


    pub fn is_cartesian(&self) -> bool {
        self.coord == CoordSys::Cartesian
    }


    pub fn is_rz(&self) -> bool {
        self.coord == CoordSys::RZ
    }


    pub fn is_spherical(&self) -> bool {
        self.coord == CoordSys::Spherical
    }


    pub fn cell_size(&self) -> [f64; SPACEDIM] {
        self.dx
    }


    pub fn cell_size_dir(&self, dir: usize) -> Result<f64> {
        check_dir(dir).map(|d| self.dx[d])
    }


    pub fn inv_cell_size(&self) -> [f64; SPACEDIM] {
        self.inv_dx
    }


    /**
     * Return the physical coordinate of the lower face of the given cell
     * along one axis.
     */
    pub fn lo_edge(&self, index: IntVect, dir: usize) -> Result<f64> {
        let d = check_dir(dir)?;
        Ok(self.prob_domain.lo()[d] + (index[d] - self.domain.small_end()[d]) as f64 * self.dx[d])
    }


    pub fn hi_edge(&self, index: IntVect, dir: usize) -> Result<f64> {
        let d = check_dir(dir)?;
        Ok(self.prob_domain.lo()[d] + (index[d] + 1 - self.domain.small_end()[d]) as f64 * self.dx[d])
    }


    pub fn cell_center(&self, index: IntVect) -> [f64; SPACEDIM] {
        let lo = self.prob_domain.lo();
        let small = self.domain.small_end();
        let mut x = [0.0; SPACEDIM];

        for d in 0..SPACEDIM {
            x[d] = lo[d] + ((index[d] - small[d]) as f64 + 0.5) * self.dx[d];
        }
        x
    }


    /**
     * Return the index of the cell containing a physical point. The result
     * may lie outside `domain` if the point does.
     */
    pub fn cell_index(&self, x: [f64; SPACEDIM]) -> IntVect {
        let mut index = IntVect::zero();

        for d in 0..SPACEDIM {
            index[d] = self.cell_index_dir(x[d], d);
        }
        index
    }


    pub fn is_periodic(&self, dir: usize) -> Result<bool> {
        check_dir(dir).map(|d| self.is_periodic[d])
    }


    pub fn is_periodic_array(&self) -> [bool; SPACEDIM] {
        self.is_periodic
    }


    pub fn is_any_periodic(&self) -> bool {
        self.is_periodic.iter().any(|&p| p)
    }


    pub fn is_all_periodic(&self) -> bool {
        self.is_periodic.iter().all(|&p| p)
    }


    pub fn set_periodicity(&mut self, is_periodic: [bool; SPACEDIM]) {
        self.is_periodic = is_periodic;
    }


    /**
     * Return the period along an axis, in cells: the domain length if the
     * axis is periodic, zero otherwise.
     */
    pub fn period(&self, dir: usize) -> Result<i64> {
        let d = check_dir(dir)?;

        if self.is_periodic[d] {
            Ok(self.domain.length()[d])
        } else {
            Ok(0)
        }
    }


    pub fn periodicity(&self) -> Periodicity {
        self.periodicity_of(&self.domain)
    }


    /**
     * Return the periodicity the geometry would have if its domain were the
     * given space: the space's length on periodic axes, zero elsewhere.
     */
    pub fn periodicity_of(&self, space: &IndexSpace) -> Periodicity {
        Periodicity::new(space.length() * IntVect::from(self.is_periodic))
    }


    /**
     * Return the non-zero periodic image offsets which, applied to `src`,
     * make it overlap `target`.
     */
    pub fn periodic_shift(&self, target: &IndexSpace, src: &IndexSpace) -> Vec<IntVect> {
        self.periodicity()
            .shift_int_vect()
            .into_iter()
            .filter(|&s| s != IntVect::zero())
            .filter(|&s| src.shift(s).intersects(target))
            .collect()
    }


    /**
     * Return the domain grown by `n` cells on both ends of each periodic
     * axis. The geometry itself is not modified.
     */
    pub fn grow_periodic_domain(&self, n: i64) -> Result<IndexSpace> {
        self.domain.grow_by(IntVect::from(self.is_periodic) * n)
    }


    /**
     * Return the domain grown by `n` cells on both ends of each non-periodic
     * axis. The geometry itself is not modified.
     */
    pub fn grow_non_periodic_domain(&self, n: i64) -> Result<IndexSpace> {
        let mask = IntVect::unit() - IntVect::from(self.is_periodic);
        self.domain.grow_by(mask * n)
    }


    /**
     * Coarsen the domain by the given ratio. The physical domain is
     * unchanged, so cells become larger.
     */
    pub fn coarsen(&mut self, ratio: IntVect) -> Result<()> {
        let domain = self.domain.coarsen(ratio)?;
        debug!("coarsen {} by {} -> {}", self.domain, ratio, domain);
        self.set_domain(domain);
        Ok(())
    }


    /**
     * Refine the domain by the given ratio. The physical domain is
     * unchanged, so cells become smaller.
     */
    pub fn refine(&mut self, ratio: IntVect) -> Result<()> {
        let domain = self.domain.refine(ratio)?;
        debug!("refine {} by {} -> {}", self.domain, ratio, domain);
        self.set_domain(domain);
        Ok(())
    }


    pub fn roundoff_domain(&self) -> RealBox {
        self.roundoff_domain
    }


    /**
     * Determine whether a point lies outside the roundoff domain.
     */
    pub fn outside_roundoff_domain(&self, x: [f64; SPACEDIM]) -> bool {
        let lo = self.roundoff_domain.lo();
        let hi = self.roundoff_domain.hi();
        (0..SPACEDIM).any(|d| !(x[d] >= lo[d] && x[d] < hi[d]))
    }


    /**
     * Determine whether a point lies inside the roundoff domain. Such points
     * are guaranteed to map to a cell inside `domain`.
     */
    pub fn inside_roundoff_domain(&self, x: [f64; SPACEDIM]) -> bool {
        !self.outside_roundoff_domain(x)
    }


    /**
     * Classify a batch of points in parallel; `true` marks a point outside
     * the roundoff domain.
     */
    pub fn outside_roundoff_mask(&self, points: &[[f64; SPACEDIM]]) -> Vec<bool> {
        points
            .par_iter()
            .map(|&x| self.outside_roundoff_domain(x))
            .collect()
    }


    fn cell_index_dir(&self, x: f64, dir: usize) -> i64 {
        ((x - self.prob_domain.lo()[dir]) * self.inv_dx[dir]).floor() as i64 + self.domain.small_end()[dir]
    }


    fn compute_derived(&mut self) {
        let lengths = self.prob_domain.lengths();
        let cells = self.domain.length();

        for d in 0..SPACEDIM {
            self.dx[d] = lengths[d] / cells[d] as f64;
            self.inv_dx[d] = cells[d] as f64 / lengths[d];
        }

        let mut hi = [0.0; SPACEDIM];

        for (d, h) in hi.iter_mut().enumerate() {
            *h = self.roundoff_hi(d);
        }
        self.roundoff_domain = self.prob_domain.with_hi(hi);
    }


    /**
     * Find, by bisection on the problem domain, the upper roundoff bound
     * along one axis. The lower end of the bracket always maps inside the
     * domain and is the value returned, so every coordinate below it maps
     * inside too; `cell_index_dir` is monotone in `x`.
     */
    fn roundoff_hi(&self, dir: usize) -> f64 {
        let plo = self.prob_domain.lo()[dir];
        let phi = self.prob_domain.hi()[dir];
        let ihi = self.domain.big_end()[dir];
        let maps_inside = |x: f64| self.cell_index_dir(x, dir) <= ihi;

        if maps_inside(phi) {
            return phi
        }
        let tolerance = f64::max(
            ROUNDOFF_CELL_TOLERANCE * self.dx[dir],
            2.0 * f64::EPSILON * phi.abs());

        let mut lo = plo;
        let mut hi = phi;

        for _ in 0..MAX_BISECTION_STEPS {
            if hi - lo < tolerance {
                break
            }
            let mid = 0.5 * (lo + hi);

            if mid <= lo || mid >= hi {
                break
            }
            if maps_inside(mid) {
                lo = mid
            } else {
                hi = mid
            }
        }
        lo
    }
}




fn check_prob_domain(prob_domain: &RealBox) -> Result<()> {
    let lengths = prob_domain.lengths();

    if lengths.iter().all(|&l| l > 0.0) {
        Ok(())
    } else {
        Err(Error::InvalidRegion(format!("problem domain {} has zero extent", prob_domain)))
    }
}




// ============================================================================
#[derive(Clone, Serialize, Deserialize)]
struct RawGeometry {
    domain: IndexSpace,
    prob_domain: RealBox,
    coord: CoordSys,
    is_periodic: [bool; SPACEDIM],
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = Error;

    fn try_from(raw: RawGeometry) -> Result<Self> {
        Self::new(raw.domain, raw.prob_domain, raw.coord, raw.is_periodic)
    }
}

impl From<Geometry> for RawGeometry {
    fn from(geometry: Geometry) -> Self {
        Self {
            domain: geometry.domain,
            prob_domain: geometry.prob_domain,
            coord: geometry.coord,
            is_periodic: geometry.is_periodic,
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            fmt,
            "geometry: domain {} prob_domain {} coord {:?} periodic {}",
            self.domain,
            self.prob_domain,
            self.coord,
            IntVect::from(self.is_periodic))
    }
}
