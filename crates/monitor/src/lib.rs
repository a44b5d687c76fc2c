//! Per-instrument monitoring loops and their supervisor.

pub mod alert;
pub mod supervisor;
pub mod worker;

pub use supervisor::{Supervisor, SupervisorHandle};
pub use worker::MonitorWorker;
