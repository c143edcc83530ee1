//! Signing in and out, and who is signed in.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Serialize;

use super::render::{heading, Notice, Style, View};
use super::{AppContext, Page};
use crate::auth::guard::{admin_links, nav_links, NavLink, Route};
use crate::auth::session::AuthOutcome;
use crate::auth::token::decode_google_credential;
use crate::error::Result;
use crate::models::{Credentials, Registration, Role, User};
use crate::rules::validation::validate_registration;

const REGISTERED: &str = "Registration successful! Please log in.";
const LOGGED_OUT: &str = "You have been logged out.";

/// The login and register pages. There is no form to fill in here; the view
/// says who is signed in and which command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInPage {
    route: Route,
}

impl SignInPage {
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self { route }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInView {
    pub signed_in_as: Option<String>,
    pub command: &'static str,
}

#[async_trait]
impl Page for SignInPage {
    type View = SignInView;

    fn route(&self) -> Route {
        self.route.clone()
    }

    async fn load(&self, ctx: &AppContext) -> Result<SignInView> {
        let command = if self.route == Route::Register {
            "rentctl register"
        } else {
            "rentctl login"
        };
        Ok(SignInView {
            signed_in_as: ctx.session().current_user().map(User::display_name),
            command,
        })
    }
}

impl View for SignInView {
    fn plain(&self, _style: &Style) -> String {
        match &self.signed_in_as {
            Some(name) => format!("Already signed in as {name}.\n"),
            None => format!("Not signed in. Run `{}`.\n", self.command),
        }
    }
}

/// Who is signed in, and the navigation they get.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhoAmIPage;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmIView {
    pub authenticated: bool,
    pub user: Option<User>,
    pub role: Option<Role>,
    pub navigation: Vec<NavLink>,
    pub admin_navigation: Vec<NavLink>,
}

#[async_trait]
impl Page for WhoAmIPage {
    type View = WhoAmIView;

    fn route(&self) -> Route {
        Route::Home
    }

    async fn load(&self, ctx: &AppContext) -> Result<WhoAmIView> {
        let session = ctx.session();
        let is_staff = session.effective_role().is_some_and(Role::is_staff);
        Ok(WhoAmIView {
            authenticated: session.is_authenticated(),
            user: session.current_user().cloned(),
            role: session.effective_role().cloned(),
            navigation: nav_links(session),
            admin_navigation: if is_staff { admin_links() } else { Vec::new() },
        })
    }
}

impl View for WhoAmIView {
    fn plain(&self, _style: &Style) -> String {
        let mut out = String::new();
        match &self.user {
            Some(user) if self.authenticated => {
                out.push_str(&heading(&user.display_name()));
                let _ = writeln!(out, "Email:  {}", user.email);
                if let Some(role) = &self.role {
                    let _ = writeln!(out, "Role:   {role}");
                }
                if let Some(tier) = user.loyalty_tier {
                    let _ = writeln!(
                        out,
                        "Tier:   {tier} ({} points)",
                        user.loyalty_points.unwrap_or_default()
                    );
                }
            }
            _ => out.push_str("Not signed in.\n"),
        }

        out.push_str("\nNavigation:\n");
        for link in self.navigation.iter().chain(&self.admin_navigation) {
            let _ = writeln!(out, "  {:<14} {}", link.label, link.path);
        }
        out
    }
}

fn auth_notice(outcome: AuthOutcome, success: String) -> Notice {
    match outcome {
        AuthOutcome::Success => Notice::success(success),
        AuthOutcome::Failed { message } => Notice::failure(message),
    }
}

fn signed_in_message(ctx: &AppContext) -> String {
    ctx.session()
        .current_user()
        .map_or_else(|| "Logged in.".to_string(), |u| format!("Logged in as {}.", u.display_name()))
}

/// Log in with email and password.
pub async fn login(ctx: &mut AppContext, credentials: &Credentials) -> Notice {
    let outcome = ctx.session_mut().login(credentials).await;
    auth_notice(outcome, signed_in_message(ctx))
}

/// Create an account after checking the form. Does not log in.
pub async fn register(ctx: &mut AppContext, registration: &Registration) -> Notice {
    if let Err(e) = validate_registration(registration).into_result() {
        return Notice::failure(e.user_message(""));
    }
    let outcome = ctx.session_mut().register(registration).await;
    auth_notice(outcome, REGISTERED.to_string())
}

/// Log in with a Google ID token.
pub async fn google_login(ctx: &mut AppContext, credential: &str) -> Notice {
    let profile = match decode_google_credential(credential) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Unreadable Google credential: {}", e);
            return Notice::failure("Google login failed. Please try again.");
        }
    };
    let outcome = ctx.session_mut().google_login(&profile).await;
    auth_notice(outcome, signed_in_message(ctx))
}

/// Forget the stored token.
///
/// # Errors
///
/// Returns an error if the token store cannot be written.
pub fn logout(ctx: &mut AppContext) -> Result<Notice> {
    ctx.session_mut().logout()?;
    Ok(Notice::success(LOGGED_OUT))
}
