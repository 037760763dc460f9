//! Process exit codes shared by text and JSON output.

/// Exit code of a CLI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    /// The command ran but found nothing (empty search, unknown topic)
    NotFound = 1,
    /// Bad input, configuration or catalog data
    Error = 2,
}

impl ExitCode {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::NotFound,
            _ => Self::Error,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
