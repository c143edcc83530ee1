//! Landing page: featured vehicles, categories and a search form.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Serialize;

use super::render::{heading, money, Style, Table, View};
use super::{AppContext, DateRange, Page};
use crate::auth::guard::Route;
use crate::error::Result;
use crate::models::{Category, Vehicle, VehicleQuery};

/// How many featured vehicles the landing page shows.
pub const FEATURED_LIMIT: u32 = 6;

#[derive(Debug, Clone, Copy, Default)]
pub struct HomePage;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub featured: Vec<Vehicle>,
    pub categories: Vec<Category>,
    /// Dates prefilled in the search form.
    pub search: DateRange,
}

#[async_trait]
impl Page for HomePage {
    type View = HomeView;

    fn route(&self) -> Route {
        Route::Home
    }

    async fn load(&self, ctx: &AppContext) -> Result<HomeView> {
        let client = ctx.client();
        let query = VehicleQuery {
            limit: Some(FEATURED_LIMIT),
            featured: Some(true),
            ..VehicleQuery::default()
        };

        let (mut featured, categories) =
            tokio::try_join!(client.vehicles().list(&query), client.categories().list())?;
        // The backend may ignore `limit`.
        featured.truncate(FEATURED_LIMIT as usize);

        Ok(HomeView {
            featured,
            categories,
            search: ctx.default_range(),
        })
    }
}

impl View for HomeView {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading("Featured Vehicles");
        if self.featured.is_empty() {
            out.push_str("No featured vehicles right now.\n");
        }
        for vehicle in &self.featured {
            let _ = writeln!(
                out,
                "  #{:<4} {}  {}/day",
                vehicle.id,
                vehicle.title(),
                money(vehicle.daily_rate)
            );
        }

        out.push('\n');
        out.push_str(&heading("Browse by Category"));
        for category in &self.categories {
            let _ = writeln!(out, "  {:<4} {}", category.id, category.name);
        }

        let _ = write!(
            out,
            "\nFind a vehicle from {} to {}:\n  rentctl vehicles list --from {} --to {}\n",
            style.date(self.search.start_date),
            style.date(self.search.end_date),
            self.search.start_date,
            self.search.end_date
        );
        out
    }

    fn table(&self, _style: &Style) -> String {
        let mut table = Table::new(&["ID", "Vehicle", "Category", "Daily Rate"]);
        for vehicle in &self.featured {
            table.row(vec![
                vehicle.id.to_string(),
                vehicle.title(),
                vehicle.category_name.clone().unwrap_or_default(),
                money(vehicle.daily_rate),
            ]);
        }
        table.render()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::views::testing;

    fn vehicle(id: i64) -> serde_json::Value {
        json!({ "id": id, "make": "Toyota", "model": "Camry", "year": 2022, "dailyRate": 45.0 })
    }

    #[tokio::test]
    async fn test_home_loads_featured_and_categories() {
        let server = MockServer::start().await;
        let seven: Vec<_> = (1..=7).map(vehicle).collect();
        Mock::given(method("GET"))
            .and(path("/api/vehicles"))
            .and(query_param("limit", "6"))
            .and(query_param("featured", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seven))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "name": "SUV" }])),
            )
            .mount(&server)
            .await;

        let ctx = testing::served(&server, None);

        let view = HomePage.load(&ctx).await.unwrap();
        assert_eq!(view.featured.len(), 6);
        assert_eq!(view.categories[0].name, "SUV");
        assert_eq!(view.search, ctx.default_range());

        let text = ctx.show(&HomePage).await.unwrap();
        assert!(text.contains("2022 Toyota Camry"));
        assert!(text.contains("--from 2024-06-10 --to 2024-06-17"));
    }
}
