//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```
/// mapedit::core::logging::init();
/// log::info!("Editor started");
/// ```
pub fn init() {
    // A second init (tests, embedding apps) is not an error.
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
