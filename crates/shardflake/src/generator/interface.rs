use crate::{error::Result, id::SnowflakeId};

/// A minimal interface for generating Snowflake IDs.
///
/// This is the seam persistence code depends on (see [`assign_ids`]), so a
/// shared generator can be passed around by reference or behind an `Arc`.
///
/// [`assign_ids`]: crate::assign_ids
pub trait SnowflakeGenerator {
    /// Generates the next available ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock moved backwards, or
    /// [`Error::LockPoisoned`] if the implementation uses a std mutex that
    /// was poisoned.
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`Error::LockPoisoned`]: crate::Error
    fn next_id(&self) -> Result<SnowflakeId>;
}

impl<G: SnowflakeGenerator + ?Sized> SnowflakeGenerator for &G {
    fn next_id(&self) -> Result<SnowflakeId> {
        (**self).next_id()
    }
}

impl<G: SnowflakeGenerator + ?Sized> SnowflakeGenerator for std::sync::Arc<G> {
    fn next_id(&self) -> Result<SnowflakeId> {
        (**self).next_id()
    }
}
