use tracing::{debug, error, info};

use crate::{
	error::{RecipeError, Result},
	manifest::EXPORTS,
	settings::VISUAL_STUDIO,
	BuildOptions, ExportRule, PackageId, PackageManifest, Requirement, Settings,
};

/// Oldest supported Visual Studio toolset, with its release year.
const MIN_VISUAL_STUDIO: (u32, u32) = (12, 2013);

/// Test framework linked into the test binaries only.
const TEST_FRAMEWORK: Requirement = Requirement {
	reference: "gtest/1.8.0@bincrafters/stable",
	private: true,
};

#[derive(Debug, Clone)]
pub struct Recipe {
	manifest: PackageManifest,
}

impl Default for Recipe {
	fn default() -> Self {
		Self::new(PackageManifest::sts_signals())
	}
}

impl Recipe {
	#[must_use]
	pub fn new(manifest: PackageManifest) -> Self {
		Self { manifest }
	}

	#[must_use]
	pub fn manifest(&self) -> &PackageManifest {
		&self.manifest
	}

	/// Rejects toolsets that can't build the package.
	///
	/// # Errors
	///
	/// [`RecipeError::UnsupportedCompiler`] for Visual Studio older than 12 (2013), and
	/// [`RecipeError::InvalidCompilerVersion`] if a Visual Studio version isn't a number.
	pub fn configure(&self, settings: &Settings) -> Result<()> {
		let compiler = &settings.compiler;
		if compiler.name == VISUAL_STUDIO {
			let version: f64 = compiler.version.trim().parse().map_err(|source| {
				RecipeError::InvalidCompilerVersion {
					compiler: compiler.name.clone(),
					version: compiler.version.clone(),
					source,
				}
			})?;

			let (minimum, release) = MIN_VISUAL_STUDIO;
			if version < f64::from(minimum) {
				error!(version = %compiler.version, minimum, "unsupported compiler");
				return Err(RecipeError::UnsupportedCompiler {
					compiler: compiler.name.clone(),
					version: compiler.version.clone(),
					minimum,
					release,
				});
			}
		}

		debug!(
			package = self.manifest.name,
			compiler = %compiler.name,
			version = %compiler.version,
			"configured"
		);
		Ok(())
	}

	/// The test framework is required only while the tests are built.
	#[must_use]
	pub fn requirements(&self, options: &BuildOptions) -> Vec<Requirement> {
		if options.build_testing {
			info!(requirement = TEST_FRAMEWORK.reference, "testing enabled");
			vec![TEST_FRAMEWORK]
		} else {
			Vec::new()
		}
	}

	/// The package is header-only, so settings don't affect its identity.
	#[must_use]
	pub fn package_id(&self, _settings: &Settings) -> PackageId {
		PackageId::header_only(&self.manifest)
	}

	#[must_use]
	pub fn exports(&self) -> &'static [ExportRule] {
		EXPORTS
	}
}
