//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

use crate::models::{
    BookingStatus, DocumentType, FuelType, PaymentMethod, Role, Transmission, VehicleInput,
    VehicleStatus,
};

/// Dates for a rental. Either end may be left out.
#[derive(Debug, Clone, Default, Args)]
pub struct DateArgs {
    /// Pickup date (YYYY-MM-DD), default today
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Return date (YYYY-MM-DD), default the configured rental length after pickup
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,
}

impl DateArgs {
    /// Whether any date was given.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

/// Page selection for back-office listings.
#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page (default from configuration)
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Browse the fleet.
#[derive(Debug, Subcommand)]
pub enum VehiclesCommand {
    /// List vehicles available for the given dates
    List {
        #[command(flatten)]
        dates: DateArgs,

        /// Only vehicles in this category
        #[arg(long, value_name = "ID")]
        category: Option<i64>,

        /// Free-text search instead of availability
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one vehicle with reviews and a price for the dates
    Show {
        /// Vehicle ID
        id: i64,

        #[command(flatten)]
        dates: DateArgs,
    },

    /// Search vehicles by make, model or description
    Search {
        /// The search query
        query: String,
    },

    /// List reviews of a vehicle
    Reviews {
        /// Vehicle ID
        id: i64,
    },
}

/// Book a vehicle.
#[derive(Debug, Args)]
pub struct BookCommand {
    /// Vehicle ID
    pub vehicle_id: i64,

    #[command(flatten)]
    pub dates: DateArgs,

    /// Where to collect the vehicle
    #[arg(long, value_name = "PLACE")]
    pub pickup_location: Option<String>,

    /// Where to return the vehicle (default: pickup location)
    #[arg(long, value_name = "PLACE")]
    pub return_location: Option<String>,

    /// PayNow or PayAtPickup (default from configuration)
    #[arg(long, value_name = "METHOD")]
    pub payment: Option<PaymentMethod>,

    /// Send the booking; without this only the price and checks are shown
    #[arg(long)]
    pub confirm: bool,
}

/// Log in with email and password.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Account email
    pub email: String,

    /// Account password
    #[arg(short, long)]
    pub password: String,
}

/// Create an account.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Repeat the password
    #[arg(long)]
    pub confirm_password: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub address: String,

    /// Accept the terms and conditions
    #[arg(long)]
    pub accept_terms: bool,
}

/// Profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show profile, loyalty standing and documents
    Show,

    /// Change name, phone or address; omitted fields keep their value
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },
}

/// The customer's own bookings.
#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List bookings and what can be done with them
    List,

    /// Move the return date of an approved booking
    Extend {
        /// Booking ID
        id: i64,

        /// New return date (default: a few days after the current one)
        #[arg(long, value_name = "DATE")]
        until: Option<NaiveDate>,
    },

    /// Cancel a booking that has not started
    Cancel {
        /// Booking ID
        id: i64,
    },
}

/// Identity documents.
#[derive(Debug, Subcommand)]
pub enum DocumentsCommand {
    /// Show uploaded documents and what is still needed
    List,

    /// Upload a document
    Upload {
        /// DriversLicense, ID, Insurance or Other
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        document_type: DocumentType,

        /// Number printed on the document
        #[arg(short, long, default_value = "")]
        number: String,

        /// File to upload
        file: PathBuf,
    },
}

/// Review a vehicle.
#[derive(Debug, Args)]
pub struct ReviewCommand {
    /// Vehicle ID
    pub vehicle_id: i64,

    /// Rating from 1 to 5
    #[arg(short, long, default_value_t = crate::views::vehicles::DEFAULT_RATING)]
    pub rating: u8,

    /// What you thought of it
    #[arg(long, default_value = "")]
    pub comment: String,
}

/// Back-office commands.
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Booking and fleet statistics
    Dashboard,

    /// Manage bookings
    #[command(subcommand)]
    Bookings(AdminBookingsCommand),

    /// Manage the fleet
    #[command(subcommand)]
    Vehicles(AdminVehiclesCommand),

    /// Manage user accounts (administrators only)
    #[command(subcommand)]
    Users(AdminUsersCommand),
}

#[derive(Debug, Subcommand)]
pub enum AdminBookingsCommand {
    /// List bookings
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Only bookings with this status
        #[arg(short, long)]
        status: Option<BookingStatus>,

        /// Start of a date filter; needs --to
        #[arg(long, value_name = "DATE")]
        from: Option<NaiveDate>,

        /// End of a date filter; needs --from
        #[arg(long, value_name = "DATE")]
        to: Option<NaiveDate>,
    },

    /// Show a booking with its damage report
    Show {
        /// Booking ID
        id: i64,
    },

    /// Change a booking's status
    Status {
        /// Booking ID
        id: i64,

        /// Approved, Completed or Cancelled
        status: BookingStatus,
    },

    /// Report damage on a completed booking
    Damage {
        /// Booking ID
        id: i64,

        #[arg(short, long)]
        description: String,

        /// Repair cost
        #[arg(long, default_value = "0")]
        cost: f64,

        /// The company pays, not the customer
        #[arg(long)]
        not_customer_responsible: bool,

        /// Photo of the damage
        #[arg(long, default_value = "")]
        image_url: String,
    },
}

/// Vehicle fields. On update, omitted fields keep their value.
#[derive(Debug, Clone, Default, Args)]
pub struct VehicleFields {
    #[arg(long)]
    pub make: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub license_plate: Option<String>,

    #[arg(long)]
    pub vin: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub mileage: Option<u32>,

    #[arg(long)]
    pub daily_rate: Option<f64>,

    #[arg(long)]
    pub image_url: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub seats: Option<u32>,

    /// Automatic or Manual
    #[arg(long)]
    pub transmission: Option<Transmission>,

    /// Gasoline, Diesel, Electric or Hybrid
    #[arg(long)]
    pub fuel_type: Option<FuelType>,

    #[arg(long, value_name = "ID")]
    pub category: Option<i64>,

    /// Available, Reserved, Maintenance or OutOfService
    #[arg(long)]
    pub status: Option<VehicleStatus>,
}

impl VehicleFields {
    /// Overwrite the fields of `vehicle` that were given.
    pub fn apply(self, vehicle: &mut VehicleInput) {
        set(&mut vehicle.make, self.make);
        set(&mut vehicle.model, self.model);
        set(&mut vehicle.year, self.year);
        set(&mut vehicle.license_plate, self.license_plate);
        set(&mut vehicle.vin, self.vin);
        set(&mut vehicle.color, self.color);
        set(&mut vehicle.mileage, self.mileage);
        set(&mut vehicle.daily_rate, self.daily_rate);
        set(&mut vehicle.image_url, self.image_url);
        set(&mut vehicle.description, self.description);
        set(&mut vehicle.seats, self.seats);
        set(&mut vehicle.transmission, self.transmission);
        set(&mut vehicle.fuel_type, self.fuel_type);
        set(&mut vehicle.status, self.status);
        if self.category.is_some() {
            vehicle.category_id = self.category;
        }
    }

    /// A new vehicle from the given fields and the form defaults.
    #[must_use]
    pub fn into_new(self) -> VehicleInput {
        let mut vehicle = VehicleInput::new("", "", 0);
        self.apply(&mut vehicle);
        vehicle
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[derive(Debug, Subcommand)]
pub enum AdminVehiclesCommand {
    /// List the fleet
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Add a vehicle
    Add {
        #[command(flatten)]
        fields: VehicleFields,
    },

    /// Change a vehicle
    Update {
        /// Vehicle ID
        id: i64,

        #[command(flatten)]
        fields: VehicleFields,
    },

    /// Remove a vehicle
    Delete {
        /// Vehicle ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Account fields for the back-office user form.
#[derive(Debug, Clone, Args)]
pub struct UserFields {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub password: Option<String>,

    #[arg(long, default_value = "")]
    pub confirm_password: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub address: String,

    #[arg(long, default_value = "Customer")]
    pub role: Role,
}

#[derive(Debug, Subcommand)]
pub enum AdminUsersCommand {
    /// List users
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Only users with this role
        #[arg(short, long)]
        role: Option<String>,

        /// Match name or email
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a user
    Show {
        /// User ID
        id: String,
    },

    /// Create an account
    Add {
        #[arg(long)]
        email: String,

        #[command(flatten)]
        fields: UserFields,
    },

    /// Change an account; the password changes only when given
    Update {
        /// User ID
        id: String,

        #[command(flatten)]
        fields: UserFields,
    },

    /// Change a user's role
    Role {
        /// User ID
        id: String,

        /// Customer, Manager or Administrator
        role: Role,
    },

    /// Mark an uploaded document as verified
    VerifyDocument {
        /// Document ID
        id: i64,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_fields_apply() {
        let mut vehicle = VehicleInput::new("Kia", "Niro", 2023);
        let fields = VehicleFields {
            daily_rate: Some(60.0),
            status: Some(VehicleStatus::Maintenance),
            category: Some(4),
            ..VehicleFields::default()
        };
        fields.apply(&mut vehicle);
        assert_eq!(vehicle.make, "Kia");
        assert!((vehicle.daily_rate - 60.0).abs() < 1e-9);
        assert_eq!(vehicle.status, VehicleStatus::Maintenance);
        assert_eq!(vehicle.category_id, Some(4));
    }

    #[test]
    fn test_vehicle_fields_into_new_keeps_defaults() {
        let vehicle = VehicleFields {
            make: Some("Ford".to_string()),
            model: Some("Focus".to_string()),
            year: Some(2021),
            ..VehicleFields::default()
        }
        .into_new();
        assert_eq!(vehicle.seats, 5);
        assert_eq!(vehicle.transmission, Transmission::Automatic);
        assert_eq!(vehicle.category_id, None);
    }

    #[test]
    fn test_date_args_is_set() {
        assert!(!DateArgs::default().is_set());
        let dates = DateArgs {
            from: NaiveDate::from_ymd_opt(2024, 6, 1),
            to: None,
        };
        assert!(dates.is_set());
    }

    #[test]
    fn test_delete_debug() {
        let cmd = AdminVehiclesCommand::Delete { id: 3, yes: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Delete"));
    }
}
