use std::fmt;

/// The business area an [`ErrorCode`] belongs to, derived from its thousands digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
    Auth,
    Publish,
    Analytics,
    Config,
    System,
}

impl ErrorDomain {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Publish => "publish",
            Self::Analytics => "analytics",
            Self::Config => "config",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! error_codes {
    ($( $(#[$doc:meta])* $variant:ident = $value:literal, $name:literal, $message:literal; )+) => {
        /// Stable numeric error identity.
        ///
        /// Values are part of the operator-facing contract and never change meaning.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$doc])* $variant = $value, )+
        }

        impl ErrorCode {
            /// Every code, in ascending numeric order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            #[must_use]
            pub const fn as_u16(self) -> u16 {
                self as u16
            }

            /// Looks a code up by its numeric value.
            #[must_use]
            pub const fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// The screaming-case identifier, e.g. `AUTH_COOKIE_INVALID`.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }

            /// The fixed message used when an error is created without one.
            #[must_use]
            pub const fn default_message(self) -> &'static str {
                match self {
                    $( Self::$variant => $message, )+
                }
            }
        }
    };
}

error_codes! {
    AuthLoginFailed = 1001, "AUTH_LOGIN_FAILED", "Login failed, check the credentials or the network connection";
    AuthSessionExpired = 1002, "AUTH_SESSION_EXPIRED", "Session expired, please log in again";
    /// Stored credentials are unreadable or corrupted.
    AuthCookieInvalid = 1003, "AUTH_COOKIE_INVALID", "Credentials are invalid or corrupted";
    AuthCookieLoadFailed = 1004, "AUTH_COOKIE_LOAD_FAILED", "Failed to load credentials";
    AuthCookieSaveFailed = 1005, "AUTH_COOKIE_SAVE_FAILED", "Failed to save credentials";
    AuthUserInfoFailed = 1006, "AUTH_USER_INFO_FAILED", "Failed to fetch user information";
    AuthNotLoggedIn = 1007, "AUTH_NOT_LOGGED_IN", "Not logged in, please log in first";
    AuthLoginTimeout = 1008, "AUTH_LOGIN_TIMEOUT", "Login timed out, please try again";

    PublishNetwork = 2001, "PUBLISH_NETWORK_ERROR", "Network request failed, check the connection";
    PublishElementNotFound = 2002, "PUBLISH_ELEMENT_NOT_FOUND", "Page element not found, the page layout may have changed";
    PublishUploadFailed = 2003, "PUBLISH_UPLOAD_FAILED", "Image upload failed";
    PublishArticleFailed = 2004, "PUBLISH_ARTICLE_FAILED", "Article publishing failed";
    PublishMicropostFailed = 2005, "PUBLISH_MICROPOST_FAILED", "Micropost publishing failed";
    PublishImageCompressFailed = 2006, "PUBLISH_IMAGE_COMPRESS_FAILED", "Image compression failed";
    PublishBrowserInitFailed = 2007, "PUBLISH_BROWSER_INIT_FAILED", "Browser initialisation failed";
    PublishPageTimeout = 2008, "PUBLISH_PAGE_TIMEOUT", "Page load timed out";
    /// Handing credentials over to the browser session failed.
    PublishCookieTransferFailed = 2009, "PUBLISH_COOKIE_TRANSFER_FAILED", "Failed to transfer credentials to the browser";
    PublishListFailed = 2010, "PUBLISH_LIST_FAILED", "Failed to fetch the article list";
    PublishDeleteFailed = 2011, "PUBLISH_DELETE_FAILED", "Failed to delete the article";
    PublishValidationFailed = 2012, "PUBLISH_VALIDATION_FAILED", "Parameter validation failed";

    AnalyticsOverviewFailed = 3001, "ANALYTICS_OVERVIEW_FAILED", "Failed to fetch the account overview";
    AnalyticsStatsFailed = 3002, "ANALYTICS_STATS_FAILED", "Failed to fetch article statistics";
    AnalyticsTrendFailed = 3003, "ANALYTICS_TREND_FAILED", "Failed to fetch trend data";
    AnalyticsReportFailed = 3004, "ANALYTICS_REPORT_FAILED", "Report generation failed";

    ConfigLoadFailed = 4001, "CONFIG_LOAD_FAILED", "Failed to load configuration";
    ConfigValidationFailed = 4002, "CONFIG_VALIDATION_FAILED", "Configuration validation failed";
    ConfigEnvMissing = 4003, "CONFIG_ENV_MISSING", "Required environment variable is missing";

    SystemFile = 9001, "SYSTEM_FILE_ERROR", "File system operation failed";
    SystemCrypto = 9002, "SYSTEM_CRYPTO_ERROR", "Encryption/decryption failed";
    /// An operation did not finish within its deadline.
    SystemTimeout = 9003, "SYSTEM_TIMEOUT", "Operation timed out";
    SystemUnknown = 9999, "SYSTEM_UNKNOWN_ERROR", "Unknown error";
}

impl ErrorCode {
    #[must_use]
    pub const fn domain(self) -> ErrorDomain {
        match self.as_u16() / 1000 {
            1 => ErrorDomain::Auth,
            2 => ErrorDomain::Publish,
            3 => ErrorDomain::Analytics,
            4 => ErrorDomain::Config,
            _ => ErrorDomain::System,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.as_u16()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_u16(value).ok_or(value)
    }
}
