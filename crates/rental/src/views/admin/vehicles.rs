//! Back-office fleet management.

use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::Datelike;
use serde::Serialize;
use tracing::info;

use crate::auth::guard::Route;
use crate::error::Result;
use crate::models::{Category, Paged, Vehicle, VehicleInput};
use crate::rules::validation::validate_vehicle;
use crate::views::render::{heading, money, Notice, Style, Table, View};
use crate::views::{outcome, AppContext, Page};

const FETCH_FAILED: &str = "Failed to fetch data. Please try again.";
const SAVE_FAILED: &str = "Failed to save vehicle. Please try again.";
const DELETE_FAILED: &str = "Failed to delete vehicle. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminVehiclesPage {
    pub page_number: u32,
    pub page_size: u32,
}

impl AdminVehiclesPage {
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self::new(1, page_size)
    }

    #[must_use]
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminVehiclesView {
    /// For the category picker of the vehicle form.
    pub categories: Vec<Category>,
    #[serde(flatten)]
    pub page: Paged<Vehicle>,
}

#[async_trait]
impl Page for AdminVehiclesPage {
    type View = AdminVehiclesView;

    fn route(&self) -> Route {
        Route::AdminVehicles
    }

    async fn load(&self, ctx: &AppContext) -> Result<AdminVehiclesView> {
        let client = ctx.client();
        let (categories, page) = tokio::try_join!(
            client.categories().list(),
            client.vehicles().paginated(self.page_number, self.page_size)
        )
        .map_err(|e| e.page_load(FETCH_FAILED))?;
        Ok(AdminVehiclesView { categories, page })
    }
}

impl View for AdminVehiclesView {
    fn plain(&self, style: &Style) -> String {
        let mut out = heading("Manage Vehicles");
        if self.page.items.is_empty() {
            out.push_str("No vehicles found.\n");
        } else {
            out.push_str(&self.table(style));
            let _ = writeln!(out, "Page {} of {}", self.page.page_number, self.page.total_pages);
        }
        if !self.categories.is_empty() {
            let names: Vec<String> = self
                .categories
                .iter()
                .map(|c| format!("{} ({})", c.name, c.id))
                .collect();
            let _ = writeln!(out, "Categories: {}", names.join(", "));
        }
        out
    }

    fn table(&self, _style: &Style) -> String {
        let mut table = Table::new(&["ID", "Vehicle", "Plate", "Category", "Rate", "Status"]);
        for v in &self.page.items {
            table.row(vec![
                v.id.to_string(),
                v.title(),
                v.license_plate.clone(),
                v.category_name.clone().unwrap_or_default(),
                money(v.daily_rate),
                v.status.to_string(),
            ]);
        }
        table.render()
    }
}

async fn save(ctx: &AppContext, id: Option<i64>, vehicle: &VehicleInput) -> Result<Notice> {
    ctx.enter(&Route::AdminVehicles)?;
    let result = async {
        validate_vehicle(vehicle, ctx.now().year()).into_result()?;
        let vehicles = ctx.client().vehicles();
        match id {
            Some(id) => {
                info!("Updating vehicle {}", id);
                vehicles.update(id, vehicle).await
            }
            None => {
                info!("Adding {} {} {}", vehicle.year, vehicle.make, vehicle.model);
                vehicles.create(vehicle).await
            }
        }
    }
    .await;

    let saved = match id {
        Some(id) => format!("Vehicle #{id} updated."),
        None => format!("{} {} added to the fleet.", vehicle.make, vehicle.model),
    };
    outcome(result, &saved, SAVE_FAILED)
}

/// Add a vehicle to the fleet.
///
/// # Errors
///
/// Returns an error when the session may not manage vehicles; other failures
/// are reported in the notice.
pub async fn create_vehicle(ctx: &AppContext, vehicle: &VehicleInput) -> Result<Notice> {
    save(ctx, None, vehicle).await
}

/// Replace a vehicle's details.
///
/// # Errors
///
/// Returns an error when the session may not manage vehicles; other failures
/// are reported in the notice.
pub async fn update_vehicle(ctx: &AppContext, id: i64, vehicle: &VehicleInput) -> Result<Notice> {
    save(ctx, Some(id), vehicle).await
}

/// The current details of a vehicle as an editable form.
///
/// # Errors
///
/// Returns an error if the vehicle cannot be fetched.
pub async fn edit_form(ctx: &AppContext, id: i64) -> Result<VehicleInput> {
    ctx.enter(&Route::AdminVehicles)?;
    let vehicle = ctx.client().vehicles().get(id).await?;
    Ok(VehicleInput::from(&vehicle))
}

/// Remove a vehicle from the fleet.
///
/// # Errors
///
/// Returns an error when the session may not manage vehicles; other failures
/// are reported in the notice.
pub async fn delete_vehicle(ctx: &AppContext, id: i64) -> Result<Notice> {
    ctx.enter(&Route::AdminVehicles)?;
    info!("Deleting vehicle {}", id);
    let result = ctx.client().vehicles().delete(id).await;
    outcome(result, &format!("Vehicle #{id} deleted."), DELETE_FAILED)
}
