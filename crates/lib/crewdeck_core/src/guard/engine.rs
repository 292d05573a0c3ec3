//! The onboarding guard state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crewdeck_types::User;

use crate::error::GuardError;
use crate::guard::requirements::GuardRequirements;
use crate::guard::route::{self, Route};
use crate::session::SessionService;

/// How many forced validation attempts a guard makes before redirecting an
/// unauthenticated visitor to sign-in.
const MAX_VALIDATION_ATTEMPTS: u32 = 2;

/// Where the guard is evaluating, supplied by the embedding router.
#[derive(Debug, Clone, Default)]
pub struct GuardContext {
    /// The path being guarded, used as the sign-in `returnUrl`.
    pub current_path: String,
    /// Set when the navigation came from an invitation link.
    pub from_invitation: bool,
}

impl GuardContext {
    pub fn at(path: impl Into<String>) -> Self {
        Self {
            current_path: path.into(),
            from_invitation: false,
        }
    }
}

/// Outcome of one guard pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// A pass is already in flight, or this one was cancelled mid-way.
    /// The UI shows its loading state.
    Checking,
    /// Render the guarded page.
    Allow,
    /// Navigate away.
    Redirect(Route),
}

/// One guard instance, bound to a page while it is shown.
///
/// [`Self::evaluate`] runs the decision steps in order; at most one pass per
/// instance is in flight at a time, and a pass whose guard was unmounted
/// discards its result instead of reporting a stale decision.
pub struct Guard {
    session: Arc<SessionService>,
    requirements: GuardRequirements,
    checking: AtomicBool,
    mounted: AtomicBool,
    holds_refresh: AtomicBool,
}

/// Onboarding flags computed from the freshest user snapshot.
#[derive(Debug, Clone, Copy, Default)]
struct UserFlags {
    is_verified: bool,
    is_invited: bool,
    has_company_info: bool,
    needs_company_info: bool,
    needs_subscription: bool,
}

impl UserFlags {
    fn of(user: Option<&User>) -> Self {
        match user {
            Some(user) => Self {
                is_verified: user.is_verified,
                is_invited: user.is_invited,
                has_company_info: user.has_company_info,
                needs_company_info: user.needs_company_info(),
                needs_subscription: user.needs_subscription(),
            },
            None => Self::default(),
        }
    }
}

impl Guard {
    pub fn new(session: Arc<SessionService>, requirements: GuardRequirements) -> Self {
        Self {
            session,
            requirements,
            checking: AtomicBool::new(false),
            mounted: AtomicBool::new(true),
            holds_refresh: AtomicBool::new(false),
        }
    }

    /// The dashboard guard: signed in with onboarding complete.
    pub fn dashboard(session: Arc<SessionService>) -> Self {
        Self::new(session, GuardRequirements::dashboard())
    }

    pub fn requirements(&self) -> GuardRequirements {
        self.requirements
    }

    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Tear the guard down: later passes discard their results, and the
    /// refresh task retain (if any) is released.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        if self.holds_refresh.swap(false, Ordering::SeqCst) {
            self.session.release_refresh();
        }
    }

    /// Run one guard pass.
    ///
    /// Re-entrant calls on the same instance report [`GuardDecision::Checking`]
    /// instead of starting a second pass. Internal errors fail open: a
    /// transient fault must never lock a user out of a page.
    pub async fn evaluate(&self, ctx: &GuardContext) -> GuardDecision {
        if self.checking.swap(true, Ordering::SeqCst) {
            debug!("guard pass already in flight");
            return GuardDecision::Checking;
        }
        let result = self.run_checks(ctx).await;
        self.checking.store(false, Ordering::SeqCst);
        match result {
            Ok(decision) => decision,
            Err(e) => {
                warn!(error = %e, "guard check failed; allowing");
                GuardDecision::Allow
            }
        }
    }

    async fn run_checks(&self, ctx: &GuardContext) -> Result<GuardDecision, GuardError> {
        let req = self.requirements;

        // Invitation links land on sign-up with a session-less token flow;
        // let them through before any auth checks.
        if ctx.from_invitation && ctx.current_path == route::SIGN_UP_PATH {
            return Ok(GuardDecision::Allow);
        }

        if req.require_auth && !self.session.is_authenticated() {
            if !self.session.has_tokens() {
                // Nothing to validate with; go straight to sign-in.
                return Ok(GuardDecision::Redirect(Route::SignIn {
                    return_url: Some(ctx.current_path.clone()),
                }));
            }
            for attempt in 1..=MAX_VALIDATION_ATTEMPTS {
                if self.session.validate_auth(true).await {
                    break;
                }
                debug!(attempt, "session validation attempt failed");
            }
            if !self.is_mounted() {
                return Ok(GuardDecision::Checking);
            }
            if !self.session.is_authenticated() {
                return Ok(GuardDecision::Redirect(Route::SignIn {
                    return_url: Some(ctx.current_path.clone()),
                }));
            }
        } else if req.require_auth {
            // Already authenticated: revalidate only when stale.
            self.session.validate_auth(false).await;
            if !self.is_mounted() {
                return Ok(GuardDecision::Checking);
            }
            if !self.session.is_authenticated() {
                // Validation just discovered the session is gone.
                return Ok(GuardDecision::Redirect(Route::SignIn {
                    return_url: Some(ctx.current_path.clone()),
                }));
            }
        }

        // Re-read the store: validation above may have replaced the user.
        let user = self.session.current_user();
        let flags = UserFlags::of(user.as_ref());
        let authenticated = self.session.is_authenticated();

        if req.require_auth && authenticated && !self.holds_refresh.swap(true, Ordering::SeqCst) {
            Arc::clone(&self.session).retain_refresh();
        }

        if req.require_email_verified && authenticated && !flags.is_verified {
            return Ok(GuardDecision::Redirect(Route::SignUp));
        }

        if req.require_no_auth && authenticated {
            if !flags.is_verified {
                // Unverified users finish verification on sign-up; anywhere
                // else they are sent back there.
                return Ok(if ctx.current_path == route::SIGN_UP_PATH {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Redirect(Route::SignUp)
                });
            }
            if !flags.is_invited && flags.needs_company_info {
                return Ok(GuardDecision::Redirect(Route::CompanyInfo));
            }
            if !flags.is_invited && flags.needs_subscription {
                return Ok(GuardDecision::Redirect(Route::Payment));
            }
            return Ok(GuardDecision::Redirect(Route::Dashboard));
        }

        if req.require_company_info && flags.needs_company_info {
            return Ok(GuardDecision::Redirect(Route::CompanyInfo));
        }

        if req.require_no_company_info && !flags.needs_company_info {
            return Ok(GuardDecision::Redirect(if flags.needs_subscription {
                Route::Payment
            } else {
                Route::Dashboard
            }));
        }

        if req.require_subscription && flags.needs_subscription {
            return Ok(GuardDecision::Redirect(Route::Payment));
        }

        if req.require_no_subscription && !flags.needs_subscription && flags.has_company_info {
            return Ok(GuardDecision::Redirect(Route::Dashboard));
        }

        Ok(GuardDecision::Allow)
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        if self.holds_refresh.swap(false, Ordering::SeqCst) {
            self.session.release_refresh();
        }
    }
}
