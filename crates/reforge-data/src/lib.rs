//! Data loading for the enhancement widget.
//!
//! Rate tables and widget tuning live in external data files (RON, TOML, or
//! JSON, detected by extension). This crate finds them, parses them, validates
//! them, and hands back ready-to-tick runtime types:
//!
//! - [`loader`]: file discovery, format detection, deserialization, and the
//!   [`DataLoadError`](loader::DataLoadError) taxonomy
//! - [`schema`]: the on-disk [`RateTableSpec`](schema::RateTableSpec) and
//!   [`WidgetSpec`](schema::WidgetSpec) shapes, plus builders into
//!   `reforge-core`/`reforge-burst` types

pub mod loader;
pub mod schema;

use std::path::Path;

use reforge_burst::bridge::EnhanceSession;
use reforge_core::table::RateTable;

use crate::loader::{DataLoadError, deserialize_file, require_data_file};
use crate::schema::{RateTableSpec, WidgetSpec};

/// Load a rate table from `{dir}/{base_name}.{ron,toml,json}`.
pub fn load_rate_table(dir: &Path, base_name: &str) -> Result<RateTable, DataLoadError> {
    let path = require_data_file(dir, base_name)?;
    let spec: RateTableSpec = deserialize_file(&path)?;
    schema::build_rate_table(&spec)
}

/// Load a widget spec from `{dir}/{base_name}.{ron,toml,json}`.
pub fn load_widget_spec(dir: &Path, base_name: &str) -> Result<WidgetSpec, DataLoadError> {
    let path = require_data_file(dir, base_name)?;
    deserialize_file(&path)
}

/// Load a widget spec and build the full session in one step.
pub fn load_session(dir: &Path, base_name: &str) -> Result<EnhanceSession, DataLoadError> {
    let spec = load_widget_spec(dir, base_name)?;
    schema::build_session(&spec)
}
