use std::{env, path::PathBuf};

use tracing::debug;

/// `"1"` enables building and running the tests. Anything else, or nothing, disables them.
pub const BUILD_TESTING_VAR: &str = "CONAN_BUILD_TESTING";
/// Directory test reports are written to. Unset or empty means the build tool's default.
pub const TESTING_REPORT_DIR_VAR: &str = "CONAN_TESTING_REPORT_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
	pub build_testing: bool,
	pub testing_report_dir: Option<PathBuf>,
}

impl BuildOptions {
	/// Reads the options from the process environment.
	#[must_use]
	pub fn from_env() -> Self {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Reads the options through `lookup`, which returns a variable's value if it is set.
	#[must_use]
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
		let build_testing = lookup(BUILD_TESTING_VAR).unwrap_or_else(|| "0".to_owned()) == "1";
		let testing_report_dir = lookup(TESTING_REPORT_DIR_VAR)
			.filter(|dir| !dir.is_empty())
			.map(PathBuf::from);

		let options = Self {
			build_testing,
			testing_report_dir,
		};
		debug!(?options, "read build options");
		options
	}
}
