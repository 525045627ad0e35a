use crate::code::ErrorCode;
use std::fmt;

/// The concrete kind of a [`QuillError`](crate::QuillError).
///
/// The kind fixes the default retryability; the code fixes the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    SessionExpired,
    Credential,
    Publish,
    Network,
    ElementNotFound,
    Browser,
    Validation,
    Analytics,
    Config,
    System,
    FileSystem,
    Crypto,
    Timeout,
}

impl ErrorKind {
    /// Transient kinds are retried by default.
    #[must_use]
    pub const fn default_retryable(self) -> bool {
        matches!(self, Self::Network | Self::ElementNotFound | Self::Timeout)
    }

    /// Configuration failures are permanent regardless of any override.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Config)
    }

    /// The kind an error gets when it is built from a bare code.
    #[must_use]
    pub const fn for_code(code: ErrorCode) -> Self {
        match code {
            ErrorCode::AuthSessionExpired => Self::SessionExpired,
            ErrorCode::AuthCookieInvalid
            | ErrorCode::AuthCookieLoadFailed
            | ErrorCode::AuthCookieSaveFailed => Self::Credential,
            ErrorCode::AuthLoginFailed
            | ErrorCode::AuthUserInfoFailed
            | ErrorCode::AuthNotLoggedIn
            | ErrorCode::AuthLoginTimeout => Self::Authentication,
            ErrorCode::PublishNetwork => Self::Network,
            ErrorCode::PublishElementNotFound => Self::ElementNotFound,
            ErrorCode::PublishBrowserInitFailed => Self::Browser,
            ErrorCode::PublishValidationFailed => Self::Validation,
            ErrorCode::PublishUploadFailed
            | ErrorCode::PublishArticleFailed
            | ErrorCode::PublishMicropostFailed
            | ErrorCode::PublishImageCompressFailed
            | ErrorCode::PublishPageTimeout
            | ErrorCode::PublishCookieTransferFailed
            | ErrorCode::PublishListFailed
            | ErrorCode::PublishDeleteFailed => Self::Publish,
            ErrorCode::AnalyticsOverviewFailed
            | ErrorCode::AnalyticsStatsFailed
            | ErrorCode::AnalyticsTrendFailed
            | ErrorCode::AnalyticsReportFailed => Self::Analytics,
            ErrorCode::ConfigLoadFailed
            | ErrorCode::ConfigValidationFailed
            | ErrorCode::ConfigEnvMissing => Self::Config,
            ErrorCode::SystemFile => Self::FileSystem,
            ErrorCode::SystemCrypto => Self::Crypto,
            ErrorCode::SystemTimeout => Self::Timeout,
            ErrorCode::SystemUnknown => Self::System,
        }
    }

    /// The type-style name used in log records, e.g. `CredentialError`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Authentication => "AuthenticationError",
            Self::SessionExpired => "SessionExpiredError",
            Self::Credential => "CredentialError",
            Self::Publish => "PublishError",
            Self::Network => "NetworkError",
            Self::ElementNotFound => "ElementNotFoundError",
            Self::Browser => "BrowserError",
            Self::Validation => "ValidationError",
            Self::Analytics => "AnalyticsError",
            Self::Config => "ConfigError",
            Self::System => "SystemError",
            Self::FileSystem => "FileSystemError",
            Self::Crypto => "CryptoError",
            Self::Timeout => "TimeoutError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
