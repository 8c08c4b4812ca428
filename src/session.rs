use log::{debug, info};
use crate::config::{Config, Parameters};
use crate::error::Result;
use crate::geometry::{CoordSys, Geometry};
use crate::index_space::IndexSpace;
use crate::real_box::RealBox;
use crate::SPACEDIM;




/**
 * The values a geometry is built from when the caller does not name them.
 * A fresh set has no domain and no problem domain, no periodic axes, and
 * Cartesian coordinates.
 */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryDefaults {
    domain: Option<IndexSpace>,
    prob_domain: Option<RealBox>,
    is_periodic: [bool; SPACEDIM],
    coord: CoordSys,
}




// ============================================================================
impl GeometryDefaults {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(&self) -> Option<IndexSpace> {
        self.domain
    }

    pub fn prob_domain(&self) -> Option<RealBox> {
        self.prob_domain
    }

    pub fn is_periodic(&self) -> [bool; SPACEDIM] {
        self.is_periodic
    }

    pub fn coord(&self) -> CoordSys {
        self.coord
    }

    pub fn reset_domain(&mut self, domain: IndexSpace) {
        self.domain = Some(domain)
    }

    pub fn reset_prob_domain(&mut self, prob_domain: RealBox) {
        self.prob_domain = Some(prob_domain)
    }

    pub fn reset_periodicity(&mut self, is_periodic: [bool; SPACEDIM]) {
        self.is_periodic = is_periodic
    }

    pub fn reset_coord(&mut self, coord: CoordSys) {
        self.coord = coord
    }

    /**
     * Forget everything, returning to the state of `GeometryDefaults::new`.
     */
    pub fn clear(&mut self) {
        *self = Self::new()
    }
}




/**
 * An initialized run of the geometry layer. The session owns the
 * configuration and the geometry defaults; resets of the defaults go through
 * it, so they can only happen after initialization. Independent sessions
 * (e.g. one per test) share nothing.
 */
#[derive(Clone, Debug)]
pub struct Session {
    config: Config,
    defaults: GeometryDefaults,
}




// ============================================================================
impl Session {

    /**
     * Start a session from `key=value` arguments.
     */
    pub fn initialize<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        Self::with_config(Config::from_parameters(&Parameters::parse(args)?)?)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let defaults = config.geometry_defaults()?;
        info!("initialized session (verbose = {})", config.verbose);
        debug!("geometry defaults: {:?}", defaults);
        Ok(Self { config, defaults })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn defaults(&self) -> &GeometryDefaults {
        &self.defaults
    }

    pub fn reset_default_domain(&mut self, domain: IndexSpace) {
        debug!("reset default domain to {}", domain);
        self.defaults.reset_domain(domain)
    }

    pub fn reset_default_prob_domain(&mut self, prob_domain: RealBox) {
        debug!("reset default prob domain to {}", prob_domain);
        self.defaults.reset_prob_domain(prob_domain)
    }

    pub fn reset_default_periodicity(&mut self, is_periodic: [bool; SPACEDIM]) {
        debug!("reset default periodicity to {:?}", is_periodic);
        self.defaults.reset_periodicity(is_periodic)
    }

    pub fn reset_default_coord(&mut self, coord: CoordSys) {
        debug!("reset default coordinate system to {:?}", coord);
        self.defaults.reset_coord(coord)
    }

    /**
     * Build a geometry from the current defaults.
     */
    pub fn geometry(&self) -> Result<Geometry> {
        Geometry::from_defaults(&self.defaults)
    }

    pub fn finalize(self) {
        info!("finalized session");
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{GeometryDefaults, Session};
    use crate::error::Error;
    use crate::geometry::CoordSys;
    use crate::index_space::range3d;
    use crate::real_box::RealBox;

    fn harness_args() -> Vec<&'static str> {
        vec!["amrex.verbose=2", "amrex.throw_exception=1", "amrex.signal_handling=0"]
    }

    #[test]
    fn resets_feed_the_default_geometry() {
        let mut args = harness_args();
        args.push("amr.n_cell=64 64 64");
        let mut session = Session::initialize(args).unwrap();

        session.reset_default_prob_domain(RealBox::from_bounds(0.0, 0.0, 0.0, 1.0, 2.0, 6.0).unwrap());
        session.reset_default_periodicity([true, false, true]);
        session.reset_default_coord(CoordSys::RZ);

        let gm = session.geometry().unwrap();
        assert_eq!(gm.prob_length(0).unwrap(), 1.0);
        assert_eq!(gm.prob_length(1).unwrap(), 2.0);
        assert_eq!(gm.prob_length(2).unwrap(), 6.0);
        assert_eq!(gm.is_periodic_array(), [true, false, true]);
        assert_eq!(gm.coord_sys(), CoordSys::RZ);
        session.finalize();
    }

    #[test]
    fn default_geometry_needs_a_domain() {
        let mut session = Session::initialize(harness_args()).unwrap();
        session.reset_default_prob_domain(RealBox::from_bounds(0.0, 0.0, 0.0, 1.0, 1.0, 1.0).unwrap());
        assert_eq!(session.geometry(), Err(Error::UninitializedDefault("domain")));

        session.reset_default_domain(range3d([0, 0, 0], [63, 63, 63]).unwrap());
        assert_eq!(session.geometry().unwrap().domain().length()[0], 64);
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = Session::initialize(["amr.n_cell=8 8 8", "geometry.prob_lo=0 0 0", "geometry.prob_hi=1 1 1"]).unwrap();
        let b = a.clone();
        a.reset_default_periodicity([true; 3]);
        assert!(a.geometry().unwrap().is_all_periodic());
        assert!(!b.geometry().unwrap().is_any_periodic());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut defaults = GeometryDefaults::new();
        defaults.reset_coord(CoordSys::Spherical);
        defaults.reset_domain(range3d([0, 0, 0], [1, 1, 1]).unwrap());
        defaults.clear();
        assert_eq!(defaults, GeometryDefaults::new());
    }

    #[test]
    fn bad_arguments_fail_initialization() {
        assert!(Session::initialize(["amrex.verbose"]).is_err());
    }
}
