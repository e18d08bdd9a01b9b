//! Cache configuration.

/// Initial settings for a [`DocumentCache`](crate::DocumentCache).
///
/// Both settings can be changed later through the cache's toggle methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Notify the conflict handler when a fragment name is registered with a
    /// second, different body.
    pub warn_on_fragment_conflicts: bool,
    /// Accept `fragment F($v: Int) on T { ... }` on cache misses.
    pub allow_legacy_fragment_variables: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            warn_on_fragment_conflicts: true,
            allow_legacy_fragment_variables: false,
        }
    }
}

impl CacheOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fragment_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_fragment_conflicts = enabled;
        self
    }

    #[must_use]
    pub fn with_legacy_fragment_variables(mut self, enabled: bool) -> Self {
        self.allow_legacy_fragment_variables = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CacheOptions::default();
        assert!(options.warn_on_fragment_conflicts);
        assert!(!options.allow_legacy_fragment_variables);
    }

    #[test]
    fn test_builder() {
        let options = CacheOptions::new()
            .with_fragment_warnings(false)
            .with_legacy_fragment_variables(true);
        assert_eq!(
            options,
            CacheOptions {
                warn_on_fragment_conflicts: false,
                allow_legacy_fragment_variables: true,
            }
        );
    }
}
