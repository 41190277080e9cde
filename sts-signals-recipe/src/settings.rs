/// Name under which the Microsoft toolset is reported.
pub const VISUAL_STUDIO: &str = "Visual Studio";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compiler {
	pub name: String,
	/// Kept as reported. Only checked where a compiler has a minimum version.
	pub version: String,
}

impl Compiler {
	#[must_use]
	pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			version: version.into(),
		}
	}

	#[must_use]
	pub fn visual_studio(version: impl Into<String>) -> Self {
		Self::new(VISUAL_STUDIO, version)
	}
}

/// The build configuration a package is requested for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Settings {
	pub os: String,
	pub compiler: Compiler,
	pub build_type: String,
	pub arch: String,
}
