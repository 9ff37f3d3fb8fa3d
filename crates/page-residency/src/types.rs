//! Residency result types

use serde::{Deserialize, Serialize};

/// Page-cache residency of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResidency {
    /// Pages currently resident in the page cache
    pub cached: usize,
    /// Total pages backing the file
    pub total: usize,
}

impl PageResidency {
    /// Whether any page is still resident.
    pub fn is_resident(&self) -> bool {
        self.cached > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_resident() {
        assert!(PageResidency { cached: 1, total: 1 }.is_resident());
        assert!(!PageResidency { cached: 0, total: 1 }.is_resident());
    }

    #[test]
    fn test_residency_serialization() {
        let residency = PageResidency { cached: 3, total: 4 };

        let json = serde_json::to_string(&residency).unwrap();
        assert!(json.contains("\"cached\":3"));
        assert!(json.contains("\"total\":4"));

        let deserialized: PageResidency = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, residency);
    }
}
