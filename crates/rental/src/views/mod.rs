//! Page controllers.
//!
//! Each page names its [`Route`], loads what it shows through the API and
//! hands back a [`View`]. [`AppContext::show`] runs the route guard first, so
//! a page never fetches data its user may not see. Actions that change
//! something return a [`Notice`] describing the outcome.

pub mod account;
pub mod admin;
pub mod booking;
pub mod documents;
pub mod home;
pub mod my_bookings;
pub mod not_found;
pub mod profile;
pub mod render;
pub mod vehicles;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::auth::guard::{guard, GuardDecision, Route};
use crate::auth::Session;
use crate::config::Config;
use crate::error::{Error, Result};

pub use render::{render, Notice, OutputFormat, Style, Table, View};

/// A page of the application.
#[async_trait]
pub trait Page {
    /// What the page shows once loaded.
    type View: View + Send;

    /// The route this page answers.
    fn route(&self) -> Route;

    /// Fetch everything the page shows.
    async fn load(&self, ctx: &AppContext) -> Result<Self::View>;
}

/// Everything a page needs: configuration, the session and the clock.
#[derive(Debug)]
pub struct AppContext {
    config: Config,
    session: Session,
    format: OutputFormat,
    style: Style,
    now: DateTime<Utc>,
}

impl AppContext {
    #[must_use]
    pub fn new(config: Config, session: Session, format: OutputFormat) -> Self {
        let style = Style::new(&config.display);
        Self {
            config,
            session,
            format,
            style,
            now: Utc::now(),
        }
    }

    /// Pin the clock, so "today" is the same for every check.
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        self.session.client()
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// The date range offered when the user gives none: today plus the
    /// configured rental length.
    #[must_use]
    pub fn default_range(&self) -> DateRange {
        DateRange::starting(self.today(), self.config.booking.default_rental_days)
    }

    /// Check that the session may open `route`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] when a login is needed and
    /// [`Error::Forbidden`] when the user lacks the role.
    pub fn enter(&self, route: &Route) -> Result<()> {
        match guard(route, &self.session) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Loading => Err(Error::internal("session has not been restored yet")),
            GuardDecision::RedirectLogin { from } => {
                debug!("{} requires login", from);
                Err(Error::Unauthorized)
            }
            GuardDecision::RedirectHome => Err(Error::Forbidden {
                route: route.path(),
                required: route.access().describe(),
            }),
        }
    }

    /// Guard, load and render a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the guard refuses the page or loading fails.
    pub async fn show<P>(&self, page: &P) -> Result<String>
    where
        P: Page + Sync + ?Sized,
    {
        self.enter(&page.route())?;
        let view = page.load(self).await?;
        self.render(&view)
    }

    /// Render a view in the session's output format.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render<V: View + ?Sized>(&self, view: &V) -> Result<String> {
        render(view, self.format, &self.style)
    }
}

/// An inclusive pickup-to-return date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// `days` days from `start`.
    #[must_use]
    pub fn starting(start: NaiveDate, days: u32) -> Self {
        let end = start
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(start);
        Self::new(start, end)
    }

    /// Fill in whichever end the user left out.
    #[must_use]
    pub fn or_default(start: Option<NaiveDate>, end: Option<NaiveDate>, fallback: Self) -> Self {
        let start_date = start.unwrap_or(fallback.start_date);
        let days = u32::try_from((fallback.end_date - fallback.start_date).num_days()).unwrap_or(0);
        let end_date = end.unwrap_or_else(|| Self::starting(start_date, days).end_date);
        Self::new(start_date, end_date)
    }
}

/// Turn the result of an action into a notice.
///
/// Authentication and permission failures propagate; everything else becomes
/// a failure notice with the backend's message, or `fallback` when it gave
/// none.
pub(crate) fn outcome(result: Result<()>, success: &str, fallback: &str) -> Result<Notice> {
    match result {
        Ok(()) => Ok(Notice::success(success)),
        Err(err) if err.is_unauthorized() || err.is_forbidden() => Err(err),
        Err(err) => {
            warn!("{}", err);
            Ok(Notice::failure(err.user_message(fallback)))
        }
    }
}

/// Open the page at a URL path, with default parameters.
///
/// # Errors
///
/// Returns an error if the guard refuses the page or loading fails.
pub async fn open(ctx: &AppContext, path: &str) -> Result<String> {
    let route = Route::parse(path);
    debug!("Opening {} as {:?}", path, route);

    match route {
        Route::Home => ctx.show(&home::HomePage).await,
        Route::Vehicles => {
            ctx.show(&vehicles::VehicleListPage::available(ctx.default_range()))
                .await
        }
        Route::VehicleDetails(id) => ctx.show(&vehicles::VehicleDetailsPage::new(id, None)).await,
        Route::Login | Route::Register => ctx.show(&account::SignInPage::new(route)).await,
        Route::Booking(id) => {
            ctx.show(&booking::BookingFormPage::new(id, ctx.default_range()))
                .await
        }
        Route::Profile => ctx.show(&profile::ProfilePage).await,
        Route::MyBookings => ctx.show(&my_bookings::MyBookingsPage).await,
        Route::DocumentUpload => ctx.show(&documents::DocumentUploadPage).await,
        Route::AdminDashboard => ctx.show(&admin::DashboardPage).await,
        Route::AdminVehicles => {
            ctx.show(&admin::AdminVehiclesPage::first(ctx.config().display.page_size))
                .await
        }
        Route::AdminBookings => {
            ctx.show(&admin::AdminBookingsPage::first(ctx.config().display.page_size))
                .await
        }
        Route::AdminUsers => {
            ctx.show(&admin::AdminUsersPage::first(ctx.config().display.page_size))
                .await
        }
        Route::NotFound => ctx.show(&not_found::NotFoundPage::new(path)).await,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use chrono::TimeZone;
    use wiremock::MockServer;

    use super::*;
    use crate::models::{Role, User};
    use crate::storage::MemoryStore;

    /// Noon on 10 June 2024.
    pub(crate) fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    pub(crate) fn context(session: Session) -> AppContext {
        AppContext::new(Config::default(), session, OutputFormat::Plain).with_now(noon())
    }

    pub(crate) fn anonymous() -> AppContext {
        context(Session::anonymous_for_tests())
    }

    pub(crate) fn signed_in(role: Role) -> AppContext {
        context(Session::signed_in_for_tests(role))
    }

    /// A context talking to `server`, signed in with `role` when given.
    pub(crate) fn served(server: &MockServer, role: Option<Role>) -> AppContext {
        let store = match role {
            Some(_) => MemoryStore::with_token("test-token"),
            None => MemoryStore::new(),
        };
        let client =
            ApiClient::with_http_client(reqwest::Client::new(), &server.uri(), Arc::new(store));
        let mut session = Session::anonymous_with_client_for_tests(client);
        if let Some(role) = role {
            let mut user = User::provisional("u-1", "ann@example.com");
            user.first_name = "Ann".to_string();
            user.last_name = "Lee".to_string();
            user.role = Some(role.clone());
            session.set_signed_in_for_tests(Some(role), user);
        }
        context(session)
    }
}
