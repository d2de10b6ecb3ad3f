//! Shared store access, error types, and exit codes for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use poolctl_data::AttributeStore;

/// CLI-level error type distinguishing empty matches, validation failures,
/// and operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    NotFound(String),
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => 1,
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::NotFound(message) | Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<poolctl_attr::AttrError> for CliError {
    fn from(err: poolctl_attr::AttrError) -> Self {
        Self::Validation(crate::output::describe_attr_error(&err))
    }
}

impl From<poolctl_data::StoreError> for CliError {
    fn from(err: poolctl_data::StoreError) -> Self {
        Self::Failure(err.into())
    }
}

/// Open the attribute store backed by the database at `path`.
pub(crate) async fn open_store(path: &Path) -> CliResult<AttributeStore> {
    let pool = poolctl_data::connect(path).await.map_err(|err| {
        CliError::failure(
            anyhow::Error::new(err)
                .context(format!("failed to open pool database '{}'", path.display())),
        )
    })?;
    AttributeStore::new(pool).await.map_err(|err| {
        CliError::failure(anyhow::Error::new(err).context(format!(
            "failed to initialise pool database '{}'",
            path.display()
        )))
    })
}
