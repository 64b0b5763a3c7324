//! Prefetch companion binding.
//!
//! A fetch unit may sit behind a prefetch resolver gasket (PRG) and its
//! display prefetch controller. That companion is owned elsewhere; the fetch
//! unit only keeps a non-owning handle so the plane code can find it.

use std::fmt;

/// A prefetch resolver bound to a fetch unit.
pub trait PrefetchCompanion: Send + Sync + fmt::Debug {
    /// Returns a short name for logging (e.g. `"dprc0"`).
    fn name(&self) -> &str;
}
