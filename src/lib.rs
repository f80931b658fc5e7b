#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod asset_paths;
pub mod builder;
pub mod bundle;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod runtime;

pub use builder::{BuildArtifacts, BuildResult, MetaBuilder};
pub use config::{BuildOptions, ProjectConfig};
pub use error::{ExtractError, RetrievalError};
pub use manifest::{ExtractionContext, fill_asset_list};
pub use models::{AssetEntry, AssetManifest, AssetTag, ExtractMode, ParseOptions, ReplacementDirective};
pub use runtime::{FetchGuard, FetchState, RemoteModuleLoader};
