use std::num::ParseFloatError;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
	/// The toolset is too old. There is no way to recover; the build must abort.
	#[error("{compiler} {version} is not supported: {compiler} {minimum} ({release}) or higher is required")]
	UnsupportedCompiler {
		compiler: String,
		version: String,
		minimum: u32,
		release: u32,
	},

	#[error("invalid {compiler} version {version:?}")]
	InvalidCompilerVersion {
		compiler: String,
		version: String,
		#[source]
		source: ParseFloatError,
	},
}

pub type Result<T, E = RecipeError> = core::result::Result<T, E>;
