use crate::error::Result;

/// Validate structural integrity of a record or data holder.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}
