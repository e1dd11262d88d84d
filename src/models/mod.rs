//! Data models for gauges, users and the transition log

pub mod gauge;
pub mod log;
pub mod timestamp;
pub mod user;

pub use gauge::{CreateGauge, Gauge, GaugeStatus, GaugeView};
pub use log::{LogAction, LogEntry, LogKind};
pub use user::{CreateUser, User};
