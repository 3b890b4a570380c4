//! Monitoring session facade.

pub mod service;


pub use service::MonitorSession;
