//! Pages, who may open them, and the navigation shown to each user.

use std::fmt;

use serde::Serialize;

use super::session::Session;
pub use crate::models::Role;

/// Staff roles allowed into the back office.
const STAFF: &[Role] = &[Role::Administrator, Role::Manager];
const ADMINISTRATORS: &[Role] = &[Role::Administrator];

/// Every page of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Vehicles,
    VehicleDetails(i64),
    Login,
    Register,
    /// Booking form for a vehicle.
    Booking(i64),
    Profile,
    MyBookings,
    DocumentUpload,
    AdminDashboard,
    AdminVehicles,
    AdminBookings,
    AdminUsers,
    NotFound,
}

/// Who may open a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    /// Authenticated with one of these roles.
    Roles(&'static [Role]),
}

/// Outcome of checking a route against the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// The session has not finished restoring.
    Loading,
    /// Not logged in; `from` is the page to return to afterwards.
    RedirectLogin { from: Route },
    /// Logged in without a required role.
    RedirectHome,
}

impl Route {
    /// Map a URL path (query string and trailing slash ignored) to a page.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["vehicles"] => Self::Vehicles,
            ["vehicles", id] => id.parse().map_or(Self::NotFound, Self::VehicleDetails),
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["booking", id] => id.parse().map_or(Self::NotFound, Self::Booking),
            ["profile"] => Self::Profile,
            ["bookings", "my"] => Self::MyBookings,
            ["documents", "upload"] => Self::DocumentUpload,
            ["admin"] => Self::AdminDashboard,
            ["admin", "vehicles"] => Self::AdminVehicles,
            ["admin", "bookings"] => Self::AdminBookings,
            ["admin", "users"] => Self::AdminUsers,
            _ => Self::NotFound,
        }
    }

    /// The URL path of this page. `NotFound` has no path of its own.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Vehicles => "/vehicles".to_string(),
            Self::VehicleDetails(id) => format!("/vehicles/{id}"),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Booking(id) => format!("/booking/{id}"),
            Self::Profile => "/profile".to_string(),
            Self::MyBookings => "/bookings/my".to_string(),
            Self::DocumentUpload => "/documents/upload".to_string(),
            Self::AdminDashboard => "/admin".to_string(),
            Self::AdminVehicles => "/admin/vehicles".to_string(),
            Self::AdminBookings => "/admin/bookings".to_string(),
            Self::AdminUsers => "/admin/users".to_string(),
            Self::NotFound => "*".to_string(),
        }
    }

    #[must_use]
    pub fn access(&self) -> Access {
        match self {
            Self::Home
            | Self::Vehicles
            | Self::VehicleDetails(_)
            | Self::Login
            | Self::Register
            | Self::NotFound => Access::Public,
            Self::Booking(_) | Self::Profile | Self::MyBookings | Self::DocumentUpload => {
                Access::Authenticated
            }
            Self::AdminDashboard | Self::AdminVehicles | Self::AdminBookings => {
                Access::Roles(STAFF)
            }
            Self::AdminUsers => Access::Roles(ADMINISTRATORS),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Access {
    /// Description used in access-denied messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Public => "nothing".to_string(),
            Self::Authenticated => "a logged-in user".to_string(),
            Self::Roles(roles) => {
                let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
                format!("role {}", names.join(" or "))
            }
        }
    }
}

/// Decide whether the session may open `route`.
#[must_use]
pub fn guard(route: &Route, session: &Session) -> GuardDecision {
    let access = route.access();
    if access == Access::Public {
        return GuardDecision::Allow;
    }
    if session.is_loading() {
        return GuardDecision::Loading;
    }
    if !session.is_authenticated() {
        return GuardDecision::RedirectLogin {
            from: route.clone(),
        };
    }
    match access {
        Access::Roles(allowed) if !session.role().is_some_and(|role| allowed.contains(role)) => {
            GuardDecision::RedirectHome
        }
        _ => GuardDecision::Allow,
    }
}

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub path: String,
}

impl NavLink {
    fn new(label: &'static str, route: &Route) -> Self {
        Self {
            label,
            path: route.path(),
        }
    }
}

/// Navigation shown to the current user.
#[must_use]
pub fn nav_links(session: &Session) -> Vec<NavLink> {
    let mut links = vec![
        NavLink::new("Home", &Route::Home),
        NavLink::new("Vehicles", &Route::Vehicles),
    ];

    if session.is_authenticated() {
        links.push(NavLink::new("My Bookings", &Route::MyBookings));
        if session.effective_role().is_some_and(Role::is_staff) {
            links.push(NavLink::new("Admin", &Route::AdminDashboard));
        }
        links.push(NavLink::new("Your Profile", &Route::Profile));
    } else {
        links.push(NavLink::new("Sign in", &Route::Login));
        links.push(NavLink::new("Register", &Route::Register));
    }

    links
}

/// Back-office sidebar entries.
#[must_use]
pub fn admin_links() -> Vec<NavLink> {
    vec![
        NavLink::new("Dashboard", &Route::AdminDashboard),
        NavLink::new("Bookings", &Route::AdminBookings),
        NavLink::new("Vehicles", &Route::AdminVehicles),
        NavLink::new("Users", &Route::AdminUsers),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/vehicles"), Route::Vehicles);
        assert_eq!(Route::parse("/vehicles/42"), Route::VehicleDetails(42));
        assert_eq!(Route::parse("/booking/7?start=2024-01-01&end=2024-01-03"), Route::Booking(7));
        assert_eq!(Route::parse("/bookings/my/"), Route::MyBookings);
        assert_eq!(Route::parse("/documents/upload"), Route::DocumentUpload);
        assert_eq!(Route::parse("/admin"), Route::AdminDashboard);
        assert_eq!(Route::parse("/admin/users"), Route::AdminUsers);
    }

    #[test]
    fn test_parse_unknown_paths() {
        assert_eq!(Route::parse("/vehicles/abc"), Route::NotFound);
        assert_eq!(Route::parse("/admin/categories"), Route::NotFound);
        assert_eq!(Route::parse("/nope"), Route::NotFound);
    }

    #[test]
    fn test_path_round_trip() {
        for route in [
            Route::Home,
            Route::Vehicles,
            Route::VehicleDetails(3),
            Route::Login,
            Route::Register,
            Route::Booking(9),
            Route::Profile,
            Route::MyBookings,
            Route::DocumentUpload,
            Route::AdminDashboard,
            Route::AdminVehicles,
            Route::AdminBookings,
            Route::AdminUsers,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_access_levels() {
        assert_eq!(Route::Vehicles.access(), Access::Public);
        assert_eq!(Route::Profile.access(), Access::Authenticated);
        assert_eq!(Route::AdminBookings.access(), Access::Roles(STAFF));
        assert_eq!(Route::AdminUsers.access(), Access::Roles(ADMINISTRATORS));
        assert_eq!(
            Route::AdminUsers.access().describe(),
            "role Administrator"
        );
    }

    #[test]
    fn test_guard_public_while_loading() {
        let session = Session::loading_for_tests();
        assert_eq!(guard(&Route::Home, &session), GuardDecision::Allow);
        assert_eq!(guard(&Route::Profile, &session), GuardDecision::Loading);
    }

    #[test]
    fn test_guard_anonymous() {
        let session = Session::anonymous_for_tests();
        assert_eq!(
            guard(&Route::MyBookings, &session),
            GuardDecision::RedirectLogin {
                from: Route::MyBookings
            }
        );
    }

    #[test]
    fn test_guard_roles() {
        let customer = Session::signed_in_for_tests(Role::Customer);
        assert_eq!(guard(&Route::Profile, &customer), GuardDecision::Allow);
        assert_eq!(guard(&Route::AdminDashboard, &customer), GuardDecision::RedirectHome);

        let manager = Session::signed_in_for_tests(Role::Manager);
        assert_eq!(guard(&Route::AdminBookings, &manager), GuardDecision::Allow);
        assert_eq!(guard(&Route::AdminUsers, &manager), GuardDecision::RedirectHome);

        let admin = Session::signed_in_for_tests(Role::Administrator);
        assert_eq!(guard(&Route::AdminUsers, &admin), GuardDecision::Allow);
    }

    #[test]
    fn test_nav_links() {
        let labels = |session: &Session| -> Vec<&'static str> {
            nav_links(session).into_iter().map(|l| l.label).collect()
        };

        assert_eq!(
            labels(&Session::anonymous_for_tests()),
            vec!["Home", "Vehicles", "Sign in", "Register"]
        );
        assert_eq!(
            labels(&Session::signed_in_for_tests(Role::Customer)),
            vec!["Home", "Vehicles", "My Bookings", "Your Profile"]
        );
        assert!(labels(&Session::signed_in_for_tests(Role::Manager)).contains(&"Admin"));
    }

    #[test]
    fn test_nav_uses_profile_role_when_token_has_none() {
        let mut session = Session::anonymous_for_tests();
        let mut user = User::provisional("1", "a@example.com");
        user.role = Some(Role::Administrator);
        session.set_signed_in_for_tests(None, user);

        assert!(nav_links(&session).iter().any(|l| l.path == "/admin"));
    }

    #[test]
    fn test_admin_links() {
        let paths: Vec<String> = admin_links().into_iter().map(|l| l.path).collect();
        assert_eq!(paths, vec!["/admin", "/admin/bookings", "/admin/vehicles", "/admin/users"]);
    }
}
