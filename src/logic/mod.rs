//! Logic Module - Simulation Core
//!
//! The demo's sequencing and aggregation engines:
//! - `engine` - owned state container, scenario runner
//! - `simulator` - background live feed
//! - `metrics` - rolling performance aggregates
//! - `detection` - records and the bounded log
//!
//! Collaborator seams: `session`, `report`, `audio`, `notify`.

pub mod audio;
pub mod detection;
pub mod engine;
pub mod metrics;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod simulator;
pub mod threat;
