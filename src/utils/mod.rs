pub mod logging;
pub mod tracing_setup;
pub mod url;
