pub mod logging;
pub mod naming;
