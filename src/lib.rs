//! Launch a ChemShell job through Longbow and stream the energies it
//! reports while it runs.

pub mod config;
pub mod consts;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod logs;
pub mod output;
pub mod poller;
pub mod series;
