//! Back-office user accounts. Administrators only.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::auth::guard::Route;
use crate::error::{Error, Result};
use crate::models::{Paged, Role, User, UserInput, UserQuery};
use crate::rules::validation::validate_user_form;
use crate::views::render::{heading, Notice, Style, Table, View};
use crate::views::{outcome, AppContext, Page};

const FETCH_FAILED: &str = "Failed to fetch users. Please try again.";
const DETAILS_FAILED: &str = "Failed to fetch user details. Please try again.";
const SAVE_FAILED: &str = "Failed to save user. Please try again.";
const ROLE_FAILED: &str = "Failed to update user role. Please try again.";
const VERIFY_FAILED: &str = "Failed to verify document. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUsersPage {
    query: UserQuery,
}

impl AdminUsersPage {
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self::new(UserQuery {
            page_number: 1,
            page_size,
            ..UserQuery::default()
        })
    }

    /// Blank filters are dropped.
    #[must_use]
    pub fn new(mut query: UserQuery) -> Self {
        query.page_number = query.page_number.max(1);
        query.role = query.role.filter(|r| !r.trim().is_empty());
        query.search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { query }
    }

    #[must_use]
    pub fn query(&self) -> &UserQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUsersView {
    pub role: Option<String>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: Paged<User>,
}

#[async_trait]
impl Page for AdminUsersPage {
    type View = AdminUsersView;

    fn route(&self) -> Route {
        Route::AdminUsers
    }

    async fn load(&self, ctx: &AppContext) -> Result<AdminUsersView> {
        let page = ctx
            .client()
            .users()
            .list(&self.query)
            .await
            .map_err(|e| e.page_load(FETCH_FAILED))?;
        Ok(AdminUsersView {
            role: self.query.role.clone(),
            search: self.query.search.clone(),
            page,
        })
    }
}

fn role_label(user: &User) -> String {
    user.role.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl View for AdminUsersView {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading("Manage Users");
        if let Some(role) = &self.role {
            let _ = writeln!(out, "Role: {role}");
        }
        if let Some(search) = &self.search {
            let _ = writeln!(out, "Search: {search}");
        }
        if self.page.items.is_empty() {
            out.push_str("No users found.\n");
            return out;
        }
        out.push_str(&self.table(style));
        let _ = writeln!(out, "Page {} of {}", self.page.page_number, self.page.total_pages);
        out
    }

    fn table(&self, style: &Style) -> String {
        let mut table = Table::new(&["ID", "Name", "Email", "Role", "Registered"]);
        for user in &self.page.items {
            table.row(vec![
                user.id.clone(),
                user.display_name(),
                user.email.clone(),
                role_label(user),
                user.registration_date
                    .map(|d| style.datetime(d))
                    .unwrap_or_default(),
            ]);
        }
        table.render()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetailsPage {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsView {
    pub user: User,
}

#[async_trait]
impl Page for UserDetailsPage {
    type View = UserDetailsView;

    fn route(&self) -> Route {
        Route::AdminUsers
    }

    async fn load(&self, ctx: &AppContext) -> Result<UserDetailsView> {
        let user = ctx
            .client()
            .users()
            .get(&self.id)
            .await
            .map_err(|e| e.page_load(DETAILS_FAILED))?;
        Ok(UserDetailsView { user })
    }
}

impl View for UserDetailsView {
    fn plain(&self, style: &Style) -> String {
        let user = &self.user;
        let mut out = heading(&user.display_name());
        let _ = writeln!(out, "ID:       {}", user.id);
        let _ = writeln!(out, "Email:    {}", user.email);
        let _ = writeln!(out, "Role:     {}", role_label(user));
        let _ = writeln!(out, "Phone:    {}", user.phone_number.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "Address:  {}", user.address.as_deref().unwrap_or("-"));
        if let Some(verified) = user.is_email_verified {
            let _ = writeln!(out, "Email verified: {}", if verified { "yes" } else { "no" });
        }
        if let Some(since) = user.registration_date {
            let _ = writeln!(out, "Registered {}", style.datetime(since));
        }
        if let Some(tier) = user.loyalty_tier {
            let _ = writeln!(
                out,
                "Loyalty: {tier}, {} points",
                user.loyalty_points.unwrap_or_default()
            );
        }
        out
    }
}

/// Create an account from the back office.
///
/// # Errors
///
/// Returns an error when the session is not an administrator; other failures
/// are reported in the notice.
pub async fn create_user(ctx: &AppContext, user: &UserInput, confirm_password: &str) -> Result<Notice> {
    ctx.enter(&Route::AdminUsers)?;
    let result = async {
        validate_user_form(user, confirm_password, true).into_result()?;
        info!("Creating {} account", user.role);
        ctx.client().users().create(user).await
    }
    .await;
    let email = user.email.as_deref().unwrap_or_default();
    outcome(result, &format!("Created account for {email}."), SAVE_FAILED)
}

/// Update an account. The email cannot change, and the password is only sent
/// when a new one is given.
///
/// # Errors
///
/// Returns an error when the session is not an administrator; other failures
/// are reported in the notice.
pub async fn update_user(
    ctx: &AppContext,
    id: &str,
    user: &UserInput,
    confirm_password: &str,
) -> Result<Notice> {
    ctx.enter(&Route::AdminUsers)?;
    let result = async {
        validate_user_form(user, confirm_password, false).into_result()?;
        let update = UserInput {
            email: None,
            password: user.password.clone().filter(|p| !p.is_empty()),
            ..user.clone()
        };
        info!("Updating user {}", id);
        ctx.client().users().update(id, &update).await
    }
    .await;
    outcome(result, &format!("User {id} updated."), SAVE_FAILED)
}

/// Change a user's role. Only the assignable roles are accepted.
///
/// # Errors
///
/// Returns an error when the session is not an administrator; other failures
/// are reported in the notice.
pub async fn change_role(ctx: &AppContext, id: &str, role: &Role) -> Result<Notice> {
    ctx.enter(&Route::AdminUsers)?;
    let result = async {
        if !Role::ASSIGNABLE.contains(role) {
            return Err(Error::not_allowed(format!("'{role}' is not an assignable role")));
        }
        info!("Setting role of {} to {}", id, role);
        ctx.client().users().update_role(id, role).await
    }
    .await;
    outcome(result, &format!("User {id} is now {role}."), ROLE_FAILED)
}

/// Mark an uploaded identity document as checked.
///
/// # Errors
///
/// Returns an error when the session is not an administrator; other failures
/// are reported in the notice.
pub async fn verify_document(ctx: &AppContext, document_id: i64) -> Result<Notice> {
    ctx.enter(&Route::AdminUsers)?;
    info!("Verifying document {}", document_id);
    let result = ctx.client().users().verify_document(document_id).await;
    outcome(
        result,
        &format!("Document #{document_id} verified."),
        VERIFY_FAILED,
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::views::testing;

    fn user_json(id: &str, role: &str) -> serde_json::Value {
        json!({
            "id": id,
            "email": format!("{id}@example.com"),
            "firstName": "Sam",
            "lastName": "Park",
            "role": role,
            "registrationDate": "2024-01-05T09:00:00"
        })
    }

    fn form() -> UserInput {
        UserInput {
            email: Some("sam@example.com".to_string()),
            password: Some("secret1".to_string()),
            first_name: "Sam".to_string(),
            last_name: "Park".to_string(),
            role: "Manager".to_string(),
            ..UserInput::default()
        }
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let page = AdminUsersPage::new(UserQuery {
            page_number: 1,
            page_size: 10,
            role: Some(String::new()),
            search: Some("  ".to_string()),
        });
        assert_eq!(page.query().role, None);
        assert_eq!(page.query().search, None);
    }

    #[tokio::test]
    async fn test_list_plain_array_is_paged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("role", "Manager"))
            .and(query_param("search", "park"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                user_json("u-1", "Manager"),
                user_json("u-2", "Manager"),
                user_json("u-3", "Manager")
            ])))
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Administrator));
        let page = AdminUsersPage::new(UserQuery {
            page_number: 1,
            page_size: 2,
            role: Some("Manager".to_string()),
            search: Some("park".to_string()),
        });
        let view = page.load(&ctx).await.unwrap();
        assert_eq!(view.page.items.len(), 2);
        assert_eq!(view.page.total_pages, 2);
        assert!(ctx.render(&view).unwrap().contains("u-2@example.com"));
    }

    #[tokio::test]
    async fn test_managers_cannot_open_users() {
        let ctx = testing::signed_in(Role::Manager);
        let err = ctx.show(&AdminUsersPage::first(10)).await.unwrap_err();
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn test_details_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/u-9"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Administrator));
        let page = UserDetailsPage { id: "u-9".to_string() };
        let err = ctx.show(&page).await.unwrap_err();
        assert_eq!(err.to_string(), DETAILS_FAILED);
    }

    #[tokio::test]
    async fn test_create_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users"))
            .and(body_json(json!({
                "email": "sam@example.com",
                "password": "secret1",
                "firstName": "Sam",
                "lastName": "Park",
                "phoneNumber": "",
                "address": "",
                "role": "Manager"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Administrator));
        let notice = create_user(&ctx, &form(), "secret1").await.unwrap();
        assert_eq!(notice, Notice::success("Created account for sam@example.com."));

        let mismatch = create_user(&ctx, &form(), "secret2").await.unwrap();
        assert_eq!(mismatch, Notice::failure("Passwords do not match"));
    }

    #[tokio::test]
    async fn test_update_omits_email_and_blank_password() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/u-1"))
            .and(body_json(json!({
                "firstName": "Sam",
                "lastName": "Park",
                "phoneNumber": "",
                "address": "",
                "role": "Manager"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Administrator));
        let mut user = form();
        user.password = Some(String::new());
        let notice = update_user(&ctx, "u-1", &user, "").await.unwrap();
        assert_eq!(notice, Notice::success("User u-1 updated."));
    }

    #[tokio::test]
    async fn test_change_role() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/u-1/role"))
            .and(body_json(json!("Administrator")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Administrator));
        let notice = change_role(&ctx, "u-1", &Role::Administrator).await.unwrap();
        assert_eq!(notice, Notice::success("User u-1 is now Administrator."));

        let odd = change_role(&ctx, "u-1", &Role::Other("Owner".to_string()))
            .await
            .unwrap();
        assert_eq!(odd, Notice::failure("'Owner' is not an assignable role"));
    }

    #[tokio::test]
    async fn test_verify_document() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/users/documents/4/verify"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let ctx = testing::served(&server, Some(Role::Administrator));
        let notice = verify_document(&ctx, 4).await.unwrap();
        assert_eq!(notice, Notice::failure(VERIFY_FAILED));
    }
}
