//! Page-cache residency checks for probe files
//!
//! Answers one question: are the pages backing an open file currently
//! resident in the OS page cache? The production backend wraps mincore(2);
//! the trait exists so callers can swap in alternate platform backends or
//! a deterministic double in tests.

mod error;
mod mincore;
mod types;

pub use error::{ResidencyError, Result};
pub use mincore::MincoreOracle;
pub use types::PageResidency;

use std::fs::File;

/// Queries OS page-cache state for an open file's backing pages.
///
/// Implementations must reflect the current kernel state on every call,
/// never a cached answer.
pub trait ResidencyOracle {
    /// Report how many of the file's pages are resident in the page cache.
    fn residency(&self, file: &File) -> Result<PageResidency>;

    /// Whether any of the file's pages are still resident.
    fn is_resident(&self, file: &File) -> Result<bool> {
        Ok(self.residency(file)?.cached > 0)
    }
}
