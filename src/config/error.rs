use thiserror::Error;

///
/// All errors emitted while loading or validating a solver configuration.
///
/// - `Io`: When the configuration file could not be read
///     Parameters:
///     - `path`: The path which was read
///     - `source`: The underlying IO error
/// - `Parse`: When the file was not valid configuration JSON
/// - `Invalid`: When a field holds a value the solver cannot work with
///     Parameters:
///     - `field`: The offending field
///     - `reason`: What was expected
///
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read the solver configuration at {}: {}", .path, .source)]
    Io { path: String, source: std::io::Error },

    #[error("The solver configuration is not valid JSON: {}", .0)]
    Parse(#[from] serde_json::Error),

    #[error("Invalid solver configuration, `{}` {}", .field, .reason)]
    Invalid { field: &'static str, reason: &'static str },
}
