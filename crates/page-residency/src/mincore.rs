//! mincore(2)-backed residency oracle
//!
//! Maps the file read-only, asks the kernel which backing pages are in
//! core, and unmaps before returning. One mapping is live per call, so
//! callers scanning many files hold O(1) resources.

use crate::error::{ResidencyError, Result};
use crate::types::PageResidency;
use crate::ResidencyOracle;
use memmap2::Mmap;
use std::fs::File;
use tracing::debug;

/// Residency oracle backed by mmap(2) + mincore(2)
pub struct MincoreOracle {
    page_size: usize,
}

impl MincoreOracle {
    pub fn new() -> Self {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        // sysconf reports -1 only on misconfigured libcs; 4K is the
        // smallest page size on every supported target
        let page_size = if page_size > 0 { page_size as usize } else { 4096 };
        Self { page_size }
    }
}

impl Default for MincoreOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ResidencyOracle for MincoreOracle {
    fn residency(&self, file: &File) -> Result<PageResidency> {
        let len = file.metadata()?.len() as usize;
        if len == 0 {
            return Err(ResidencyError::EmptyFile);
        }

        // SAFETY: read-only mapping, dropped before returning; probe files
        // are immutable once written so the length cannot change under us
        let mmap = unsafe { Mmap::map(file)? };

        let total = len.div_ceil(self.page_size);
        let mut residency_vec = vec![0u8; total];

        // The vector element type is c_uchar on Linux and c_char on macOS;
        // the pointer cast covers both
        let rc = unsafe {
            libc::mincore(
                mmap.as_ptr() as *mut libc::c_void,
                len,
                residency_vec.as_mut_ptr() as *mut _,
            )
        };
        if rc != 0 {
            return Err(ResidencyError::Io(Box::new(std::io::Error::last_os_error())));
        }

        // Bit 0 is the in-core flag; the remaining bits are reserved
        let cached = residency_vec.iter().filter(|&&page| page & 1 == 1).count();
        debug!(cached, total, "mincore residency");

        Ok(PageResidency { cached, total })
    }
}
