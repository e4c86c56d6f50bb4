pub mod config;
pub mod logging;

pub mod fetch;
pub mod layout;
pub mod manifest;
pub mod reconcile;
pub mod report;
pub mod resume;
pub mod retry;
pub mod scan;
pub mod scheduler;
pub mod storage;
pub mod transport;
