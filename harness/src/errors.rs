use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("error parsing JSON response: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("error reading configuration file: {0}")]
    IniError(#[from] ini::Error),
    #[error("failed to launch `{0}`: {1}")]
    CommandLaunch(String, #[source] std::io::Error),
    #[error("`{command}` exited with status {code}\n{stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },
    #[error("initial project build failed")]
    BuildFailed,
    #[error("{0}")]
    IllegalArguments(String),
}
