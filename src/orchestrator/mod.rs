//! 编排层（Orchestration Layer）
//!
//! 负责参数校验、流程分发与两条会话的生命周期管理。

pub mod exporter;

pub use exporter::{requested_work, validate, Exporter};
