use crate::int_vect::IntVect;




/**
 * Error to represent invalid regions, ratios, directions or configuration
 * entries passed to the geometry layer.
 */
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("default {0} has not been set")]
    UninitializedDefault(&'static str),

    #[error("ratio components must be positive, got {0}")]
    InvalidRatio(IntVect),

    #[error("direction {0} out of range for {dim}-dimensional space", dim = crate::SPACEDIM)]
    IndexOutOfRange(usize),

    #[error("unknown coordinate system {0}")]
    InvalidCoord(i32),

    #[error("invalid parameter {key} = {value}")]
    InvalidParameter { key: String, value: String },
}




pub type Result<T> = std::result::Result<T, Error>;




/**
 * Return an `IndexOutOfRange` error unless `dir` names an axis.
 */
pub(crate) fn check_dir(dir: usize) -> Result<usize> {
    if dir < crate::SPACEDIM {
        Ok(dir)
    } else {
        Err(Error::IndexOutOfRange(dir))
    }
}
