//! Guard redirect targets.

/// Sign-in page path.
pub const SIGN_IN_PATH: &str = "/auth/sign-in";

/// Sign-up page path.
pub const SIGN_UP_PATH: &str = "/auth/sign-up";

/// Company-info onboarding step path.
pub const COMPANY_INFO_PATH: &str = "/onboarding/company-info";

/// Payment/subscription onboarding step path.
pub const PAYMENT_PATH: &str = "/onboarding/payment";

/// Dashboard path.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Where a guard sends the user. The embedding UI performs the navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Sign-in, optionally carrying the path to return to afterwards.
    SignIn { return_url: Option<String> },
    SignUp,
    CompanyInfo,
    Payment,
    Dashboard,
}

impl Route {
    /// The navigable path, with the `returnUrl` parameter URL-encoded.
    pub fn path(&self) -> String {
        match self {
            Self::SignIn { return_url: None } => SIGN_IN_PATH.to_string(),
            Self::SignIn {
                return_url: Some(url),
            } => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
                format!("{SIGN_IN_PATH}?returnUrl={encoded}")
            }
            Self::SignUp => SIGN_UP_PATH.to_string(),
            Self::CompanyInfo => COMPANY_INFO_PATH.to_string(),
            Self::Payment => PAYMENT_PATH.to_string(),
            Self::Dashboard => DASHBOARD_PATH.to_string(),
        }
    }
}
