//! The page for paths that match no route.

use async_trait::async_trait;
use serde::Serialize;

use super::render::{heading, Style, View};
use super::{AppContext, Page};
use crate::auth::guard::Route;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundPage {
    path: String,
}

impl NotFoundPage {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundView {
    pub status: u16,
    pub path: String,
    pub title: &'static str,
    pub message: &'static str,
    pub home: String,
}

#[async_trait]
impl Page for NotFoundPage {
    type View = NotFoundView;

    fn route(&self) -> Route {
        Route::NotFound
    }

    async fn load(&self, _ctx: &AppContext) -> Result<NotFoundView> {
        Ok(NotFoundView {
            status: 404,
            path: self.path.clone(),
            title: "Page Not Found",
            message: "The page you are looking for doesn't exist or has been moved.",
            home: Route::Home.path(),
        })
    }
}

impl View for NotFoundView {
    fn plain(&self, _style: &Style) -> String {
        format!(
            "{}{}\n{}\n\nBack to Home: rentctl open {}\nIf you believe this is an error, please contact our support team or try again later.\n",
            heading(&format!("{} {}", self.status, self.title)),
            self.path,
            self.message,
            self.home
        )
    }
}
