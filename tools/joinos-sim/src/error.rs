use std::path::PathBuf;
use std::process::ExitCode;

/// All errors produced by joinos-sim.
///
/// Variants are split into two categories:
/// - **Infrastructure errors** (exit code 2): unreadable or invalid configuration, I/O failures
/// - **Operational errors** (exit code 1): the machine could not run the requested program
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    // ── Infrastructure errors (exit code 2) ──────────────────────────

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Operational errors (exit code 1) ─────────────────────────────

    #[error("Unknown program: {name} (installed: {installed})")]
    UnknownProgram { name: String, installed: String },

    #[error("Boot of {name} failed: {reason}")]
    BootFailed { name: String, reason: String },
}

impl SimError {
    /// Map each error variant to its process exit code.
    ///
    /// - `2`: infrastructure error (bad config, I/O)
    /// - `1`: operational failure (the program could not be booted)
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_code_num())
    }

    /// Numeric form of [`exit_code`](Self::exit_code).
    pub fn exit_code_num(&self) -> u8 {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParse(_)
            | Self::InvalidConfig { .. }
            | Self::Io(_)
            | Self::Json(_) => 2,

            Self::UnknownProgram { .. } | Self::BootFailed { .. } => 1,
        }
    }
}
