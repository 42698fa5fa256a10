//! `mapd-output` — result exporters for a finished (or truncated) run.
//!
//! All text outputs are space-delimited, headerless, written through the
//! `csv` crate with a flexible record length (a per-agent count line has
//! one field, a coordinate line two).  Coordinates are interior `x y`
//! pairs with the sentinel border removed, so they match the map file the
//! instance was loaded from.
//!
//! | Exporter                  | Content                                        |
//! |---------------------------|------------------------------------------------|
//! | [`write_paths_until`]     | per agent: count line, then `x y` per tick     |
//! | [`write_tasks_until`]     | one record per completed delivery              |
//! | [`write_throughput`]      | windowed delivery/release rates, one tick/line |
//! | [`write_debug_snapshot`]  | input backups plus initial agent positions     |

pub mod error;
pub mod paths;
pub mod snapshot;
pub mod tasks;
pub mod throughput;

#[cfg(test)]
mod tests;

pub use error::{OutputError, OutputResult};
pub use paths::write_paths_until;
pub use snapshot::write_debug_snapshot;
pub use tasks::write_tasks_until;
pub use throughput::write_throughput;

use std::path::Path;

/// Space-delimited headerless writer with per-row field counts allowed to
/// vary.  Shared by every exporter in this crate.
pub(crate) fn open_writer(path: &Path) -> OutputResult<csv::Writer<std::fs::File>> {
    Ok(csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?)
}
