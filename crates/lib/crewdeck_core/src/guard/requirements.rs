//! Declarative guard requirements.

/// What a page demands of the session before it may render.
///
/// The flags are checked in a fixed order by the guard engine; pages
/// typically use one of the presets and flip individual flags as needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardRequirements {
    pub require_auth: bool,
    pub require_no_auth: bool,
    pub require_email_verified: bool,
    pub require_company_info: bool,
    pub require_no_company_info: bool,
    pub require_subscription: bool,
    pub require_no_subscription: bool,
}

impl GuardRequirements {
    /// A page that needs a signed-in user and nothing more.
    pub fn auth() -> Self {
        Self {
            require_auth: true,
            ..Self::default()
        }
    }

    /// A page for signed-out visitors (sign-in, sign-up).
    pub fn guest() -> Self {
        Self {
            require_no_auth: true,
            ..Self::default()
        }
    }

    /// The dashboard preset: signed in, onboarding fully complete.
    pub fn dashboard() -> Self {
        Self {
            require_auth: true,
            require_company_info: true,
            require_subscription: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_preset_requires_full_onboarding() {
        let req = GuardRequirements::dashboard();
        assert!(req.require_auth);
        assert!(req.require_company_info);
        assert!(req.require_subscription);
        assert!(!req.require_no_auth);
    }
}
