use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GrabberError>;

#[derive(Debug, Error)]
pub enum GrabberError {
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read '{path}': {source}", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write energies: {0}")]
    Output(#[source] io::Error),

    #[error("failed to encode energies: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid value for {key}: '{value}'")]
    Config { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_path() {
        let err = GrabberError::Read {
            path: PathBuf::from("jobname.log"),
            source: io::Error::other("disk on fire"),
        };
        let msg = err.to_string();
        assert!(msg.contains("jobname.log"));
        assert!(msg.contains("disk on fire"));
    }

    #[test]
    fn launch_error_names_the_program() {
        let err = GrabberError::Launch {
            program: "longbow".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("failed to launch 'longbow'"));
    }

    #[test]
    fn config_error_shows_key_and_value() {
        let err = GrabberError::Config {
            key: "GRABBER_SCAN",
            value: "sideways".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for GRABBER_SCAN: 'sideways'");
    }
}
