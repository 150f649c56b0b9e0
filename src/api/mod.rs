//! API 模块
//!
//! 负责所有与 Metabase REST API 的交互

pub mod metabase;

pub use metabase::MetabaseClient;
