use std::collections::BTreeMap;
use std::str::FromStr;
use log::{debug, LevelFilter};
use crate::error::{Error, Result};
use crate::geometry::CoordSys;
use crate::index_space::IndexSpace;
use crate::int_vect::IntVect;
use crate::real_box::RealBox;
use crate::session::GeometryDefaults;
use crate::SPACEDIM;




/// Keys understood by `Config`; anything else is kept but ignored.
pub const KNOWN_KEYS: [&str; 8] = [
    "amrex.verbose",
    "amrex.throw_exception",
    "amrex.signal_handling",
    "amr.n_cell",
    "geometry.prob_lo",
    "geometry.prob_hi",
    "geometry.is_periodic",
    "geometry.coord_sys",
];




/**
 * A table of runtime parameters, read from `key=value` strings. Array values
 * are whitespace separated, e.g. `geometry.prob_hi=1.0 2.0 5.0`. Later
 * entries override earlier ones.
 */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters {
    table: BTreeMap<String, String>,
}




// ============================================================================
impl Parameters {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let mut result = Self::new();

        for arg in args {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    result.insert(key.trim(), value.trim())
                }
                _ => return Err(invalid(arg, "")),
            }
        }
        Ok(result)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.table.insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    pub fn get<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.table.get(key) {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| invalid(key, value)),
        }
    }

    /**
     * Look up a flag, written either as `0`/`1` or `false`/`true`.
     */
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.table.get(key) {
            None => Ok(None),
            Some(value) => parse_bool(value).map(Some).ok_or_else(|| invalid(key, value)),
        }
    }

    /**
     * Look up a value with one entry per spatial dimension.
     */
    pub fn get_array<T: FromStr>(&self, key: &str) -> Result<Option<[T; SPACEDIM]>> {
        let value = match self.table.get(key) {
            None => return Ok(None),
            Some(value) => value,
        };
        let items = value
            .split_whitespace()
            .map(|s| s.parse::<T>().map_err(|_| invalid(key, value)))
            .collect::<Result<Vec<_>>>()?;

        <[T; SPACEDIM]>::try_from(items)
            .map(Some)
            .map_err(|_| invalid(key, value))
    }

    pub fn get_bool_array(&self, key: &str) -> Result<Option<[bool; SPACEDIM]>> {
        let value = match self.table.get(key) {
            None => return Ok(None),
            Some(value) => value,
        };
        let items = value
            .split_whitespace()
            .map(|s| parse_bool(s).ok_or_else(|| invalid(key, value)))
            .collect::<Result<Vec<_>>>()?;

        <[bool; SPACEDIM]>::try_from(items)
            .map(Some)
            .map_err(|_| invalid(key, value))
    }
}




fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn invalid(key: &str, value: &str) -> Error {
    Error::InvalidParameter { key: key.to_string(), value: value.to_string() }
}




/**
 * Session configuration. Everything except the verbosity and the geometry
 * defaults is carried for the surrounding application.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub verbose: u32,
    pub throw_exception: bool,
    pub signal_handling: bool,
    pub n_cell: Option<[i64; SPACEDIM]>,
    pub prob_lo: Option<[f64; SPACEDIM]>,
    pub prob_hi: Option<[f64; SPACEDIM]>,
    pub is_periodic: [bool; SPACEDIM],
    pub coord_sys: CoordSys,
}




// ============================================================================
impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: 1,
            throw_exception: false,
            signal_handling: true,
            n_cell: None,
            prob_lo: None,
            prob_hi: None,
            is_periodic: [false; SPACEDIM],
            coord_sys: CoordSys::Cartesian,
        }
    }
}

impl Config {

    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        Self::from_parameters(&Parameters::parse(args)?)
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        for key in params.keys().filter(|k| !KNOWN_KEYS.contains(k)) {
            debug!("ignoring unrecognised parameter {}", key);
        }
        let default = Self::default();

        let coord_sys = match params.get::<i32>("geometry.coord_sys")? {
            Some(c) => CoordSys::try_from(c)?,
            None => default.coord_sys,
        };

        let config = Self {
            verbose: params.get("amrex.verbose")?.unwrap_or(default.verbose),
            throw_exception: params.get_bool("amrex.throw_exception")?.unwrap_or(default.throw_exception),
            signal_handling: params.get_bool("amrex.signal_handling")?.unwrap_or(default.signal_handling),
            n_cell: params.get_array("amr.n_cell")?,
            prob_lo: params.get_array("geometry.prob_lo")?,
            prob_hi: params.get_array("geometry.prob_hi")?,
            is_periodic: params.get_bool_array("geometry.is_periodic")?.unwrap_or(default.is_periodic),
            coord_sys,
        };
        config.validate()?;
        Ok(config)
    }

    /**
     * Map the verbosity level to a log filter.
     */
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /**
     * Return the default domain, `[0, n_cell - 1]`, if `amr.n_cell` was given.
     */
    pub fn domain(&self) -> Result<Option<IndexSpace>> {
        match self.n_cell {
            None => Ok(None),
            Some(n) => IndexSpace::new(IntVect::zero(), IntVect::from(n) - IntVect::unit()).map(Some),
        }
    }

    pub fn prob_domain(&self) -> Result<Option<RealBox>> {
        match (self.prob_lo, self.prob_hi) {
            (Some(lo), Some(hi)) => RealBox::new(lo, hi).map(Some),
            _ => Ok(None),
        }
    }

    pub fn geometry_defaults(&self) -> Result<GeometryDefaults> {
        let mut defaults = GeometryDefaults::new();

        if let Some(domain) = self.domain()? {
            defaults.reset_domain(domain)
        }
        if let Some(prob_domain) = self.prob_domain()? {
            defaults.reset_prob_domain(prob_domain)
        }
        defaults.reset_periodicity(self.is_periodic);
        defaults.reset_coord(self.coord_sys);
        Ok(defaults)
    }

    fn validate(&self) -> Result<()> {
        if let Some(n) = self.n_cell {
            if !IntVect::from(n).all_positive() {
                return Err(invalid("amr.n_cell", &IntVect::from(n).to_string()))
            }
        }
        match (self.prob_lo, self.prob_hi) {
            (Some(_), None) => Err(invalid("geometry.prob_hi", "")),
            (None, Some(_)) => Err(invalid("geometry.prob_lo", "")),
            _ => self.prob_domain().map(|_| ()),
        }
    }
}
