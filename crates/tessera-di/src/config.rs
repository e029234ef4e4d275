//! Resolver configuration

use crate::error::DiResult;
use serde::Deserialize;

/// Default maximum resolution depth
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 100;

/// Tunables of the resolution engine.
///
/// # Examples
///
/// ```
/// use tessera_di::ResolverConfig;
///
/// let config = ResolverConfig::from_toml_str("max_resolution_depth = 16").unwrap();
/// assert_eq!(config.max_resolution_depth, 16);
/// assert!(config.detect_cycles);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
	/// Fail when a binding is entered again while it is still being built
	pub detect_cycles: bool,
	/// Deepest request nesting accepted before failing
	pub max_resolution_depth: usize,
}

impl Default for ResolverConfig {
	fn default() -> Self {
		Self {
			detect_cycles: true,
			max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
		}
	}
}

impl ResolverConfig {
	pub fn from_toml_str(source: &str) -> DiResult<Self> {
		Ok(toml::from_str(source)?)
	}

	pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
		self.detect_cycles = enabled;
		self
	}

	pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
		self.max_resolution_depth = depth;
		self
	}
}
