#![warn(clippy::pedantic)]
#![warn(unreachable_pub)]
#![doc = include_str!("../README.md")]

mod error;
mod manifest;
mod options;
mod recipe;
mod settings;

pub use error::{RecipeError, Result};
pub use manifest::{ExportRule, PackageId, PackageManifest, Requirement};
pub use options::{BuildOptions, BUILD_TESTING_VAR, TESTING_REPORT_DIR_VAR};
pub use recipe::Recipe;
pub use settings::{Compiler, Settings, VISUAL_STUDIO};
