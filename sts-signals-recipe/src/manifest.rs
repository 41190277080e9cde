use std::fmt::{self, Display, Formatter};

use glob::{MatchOptions, Pattern};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
	pub name: &'static str,
	pub version: &'static str,
	pub url: &'static str,
	pub license: &'static str,
	pub description: &'static str,
	pub author: &'static str,
}

impl PackageManifest {
	#[must_use]
	pub const fn sts_signals() -> Self {
		Self {
			name: "sts-signals",
			version: "0.1.2",
			url: "https://github.com/steptosky/sts-signals",
			license: "BSD 3-Clause",
			description: "Cross-platform headers only C++ library for working with signals-slots pattern.",
			author: "StepToSky <info@steptosky.com>",
		}
	}
}

/// A package this one depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
	pub reference: &'static str,
	/// Needed to build this package only, not by its consumers.
	pub private: bool,
}

/// Identity of a built package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(String);

impl PackageId {
	/// Identity of a header-only package, which doesn't vary with settings.
	#[must_use]
	pub fn header_only(manifest: &PackageManifest) -> Self {
		Self(format!("{}/{}", manifest.name, manifest.version))
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for PackageId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Files selected into the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRule {
	pub pattern: &'static str,
	/// Relative to the package root. Empty means the root.
	pub destination: &'static str,
	pub ignore_case: bool,
	/// Whether matches keep their directories or are flattened into `destination`.
	pub keep_path: bool,
}

impl ExportRule {
	/// Whether `file_name` is selected by this rule.
	#[must_use]
	pub fn matches(&self, file_name: &str) -> bool {
		Pattern::new(self.pattern).is_ok_and(|pattern| {
			pattern.matches_with(
				file_name,
				MatchOptions {
					case_sensitive: !self.ignore_case,
					..MatchOptions::new()
				},
			)
		})
	}
}

pub(crate) const EXPORTS: &[ExportRule] = &[
	ExportRule {
		pattern: "license*",
		destination: "licenses",
		ignore_case: true,
		keep_path: false,
	},
	ExportRule {
		pattern: "*.h",
		destination: "",
		ignore_case: false,
		keep_path: true,
	},
];
