//! Error types for the clouduct CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for clouduct operations.
///
/// Each variant maps to one pipeline stage and its exit code, so wrapper
/// scripts can tell where a generation run died.
#[derive(Error, Debug)]
pub enum CloudError {
    /// User provided invalid arguments, an unknown template, or an
    /// unreadable templates config.
    #[error("{0}")]
    UserError(String),

    /// A precondition for generation is not met (missing SSH identity,
    /// missing bundled asset).
    #[error("Precondition failed: {0}")]
    PreconditionError(String),

    /// Cloning or materializing a template repository failed.
    #[error("Fetch failed: {0}")]
    FetchError(String),

    /// Rewriting placeholders in the fetched skeleton failed.
    #[error("Substitution failed: {0}")]
    SubstitutionError(String),

    /// Copying a bundled asset into a generated directory failed.
    #[error("Staging failed: {0}")]
    StageError(String),

    /// Writing the provisioning config file failed.
    #[error("Config write failed: {0}")]
    ConfigWriteError(String),

    /// Handing off to the provisioning tool failed.
    #[error("Provisioning failed: {0}")]
    ProvisionError(String),
}

impl CloudError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CloudError::UserError(_) => exit_codes::USER_ERROR,
            CloudError::PreconditionError(_) => exit_codes::PRECONDITION_FAILURE,
            CloudError::FetchError(_) => exit_codes::FETCH_FAILURE,
            CloudError::SubstitutionError(_) => exit_codes::SUBSTITUTION_FAILURE,
            CloudError::StageError(_) => exit_codes::STAGE_FAILURE,
            CloudError::ConfigWriteError(_) => exit_codes::CONFIG_WRITE_FAILURE,
            CloudError::ProvisionError(_) => exit_codes::PROVISION_FAILURE,
        }
    }
}

/// Result type alias for clouduct operations.
pub type Result<T> = std::result::Result<T, CloudError>;
