use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] pricecast_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(
            CliError::from(pricecast_core::ValidationError::EmptySymbol).exit_code(),
            2
        );
        assert_eq!(CliError::Command(String::from("bad")).exit_code(), 2);
        assert_eq!(
            CliError::StrictModeViolation {
                warning_count: 1,
                error_count: 0
            }
            .exit_code(),
            5
        );
        assert_eq!(
            CliError::from(std::io::Error::other("closed pipe")).exit_code(),
            10
        );
    }
}
