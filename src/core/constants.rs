//! Shared constants used across the application

/// Base URL used when neither the CLI, the environment, nor the config file
/// names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV_VAR: &str = "PARLEY_BASE_URL";

/// Shown when the service answers 404, whatever the body says.
pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The chat service is not available. Make sure the server is running.";

/// Shown when the service answers 500.
pub const SERVER_ERROR_MESSAGE: &str =
    "The chat service hit an internal error. Please try again later.";

/// Used when a transport failure carries no message of its own.
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "Failed to reach the chat service";

/// Marks bot entries synthesized from a failed submission.
pub const ERROR_ENTRY_PREFIX: &str = "❌ Error: ";
