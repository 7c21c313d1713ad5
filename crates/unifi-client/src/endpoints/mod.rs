// Endpoint modules
//
// Inherent methods on `UnifiClient`, one file per controller area. Each
// method formats a path and payload and hands it to the dispatcher; none of
// them perform I/O directly.

pub mod clients;
pub mod devices;
pub mod hotspot;
pub mod sites;
pub mod stats;
pub mod system;
pub mod wlan;

pub use stats::{ReportInterval, ReportKind};
