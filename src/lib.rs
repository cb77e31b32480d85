pub mod config;
pub mod logging;

pub mod retry;
pub mod transport;
pub mod worker;
