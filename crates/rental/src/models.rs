//! Wire types exchanged with the rental API.
//!
//! Field names follow the backend's camelCase JSON. Enumerations carry a
//! catch-all variant so a value added on the server does not break listing
//! pages in an older client.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Declares a string enumeration as the backend spells it.
///
/// Generates `as_str`, `ALL`, `Display`, case-insensitive `FromStr`, and serde
/// impls that map unrecognised strings to `Unknown`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
            /// A value this client does not recognise.
            #[serde(other)]
            Unknown,
        }

        impl $name {
            /// Every known value, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The backend's spelling of this value.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unknown => "Unknown",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| {
                        let known: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        Error::validation(
                            stringify!($name),
                            format!("unknown value '{s}' (expected one of: {})", known.join(", ")),
                        )
                    })
            }
        }
    };
}

wire_enum! {
    /// Fleet status of a vehicle.
    pub enum VehicleStatus {
        Available => "Available",
        Reserved => "Reserved",
        Maintenance => "Maintenance",
        OutOfService => "OutOfService",
    }
}

wire_enum! {
    pub enum Transmission {
        Automatic => "Automatic",
        Manual => "Manual",
    }
}

wire_enum! {
    pub enum FuelType {
        Gasoline => "Gasoline",
        Diesel => "Diesel",
        Electric => "Electric",
        Hybrid => "Hybrid",
    }
}

wire_enum! {
    /// Lifecycle of a booking. Transitions are decided by the backend.
    pub enum BookingStatus {
        Requested => "Requested",
        Approved => "Approved",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

wire_enum! {
    pub enum PaymentStatus {
        Pending => "Pending",
        Completed => "Completed",
        Refunded => "Refunded",
    }
}

wire_enum! {
    pub enum PaymentMethod {
        /// Charged when the booking is made.
        PayNow => "PayNow",
        PayAtPickup => "PayAtPickup",
    }
}

wire_enum! {
    /// Kind of identity document a customer uploads.
    pub enum DocumentType {
        DriversLicense => "DriversLicense",
        Id => "ID",
        Insurance => "Insurance",
        Other => "Other",
    }
}

wire_enum! {
    pub enum LoyaltyTier {
        Bronze => "Bronze",
        Silver => "Silver",
        Gold => "Gold",
        Platinum => "Platinum",
    }
}

wire_enum! {
    pub enum TransactionType {
        Earned => "Earned",
        Redeemed => "Redeemed",
    }
}

impl DocumentType {
    /// Label shown to users.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::DriversLicense => "Driver's License",
            Self::Id => "ID Card",
            Self::Insurance => "Insurance",
            Self::Other => "Other",
            Self::Unknown => "Unknown",
        }
    }
}

impl PaymentMethod {
    /// Label shown to users.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::PayNow => "Pay Now",
            Self::PayAtPickup => "Pay at Pickup",
            Self::Unknown => "Unknown",
        }
    }
}

/// Account role. Unrecognised roles are kept verbatim in [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Customer,
    Manager,
    Administrator,
    Other(String),
}

impl Role {
    /// Every role the back-office can assign.
    pub const ASSIGNABLE: [Role; 3] = [Role::Customer, Role::Manager, Role::Administrator];

    /// Parse the backend's spelling. Never fails.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            v if v.eq_ignore_ascii_case("Customer") => Self::Customer,
            v if v.eq_ignore_ascii_case("Manager") => Self::Manager,
            v if v.eq_ignore_ascii_case("Administrator") => Self::Administrator,
            v => Self::Other(v.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Customer => "Customer",
            Self::Manager => "Manager",
            Self::Administrator => "Administrator",
            Self::Other(value) => value,
        }
    }

    /// Whether the role may open back-office pages.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Manager | Self::Administrator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match Self::from_wire(s) {
            Self::Other(value) => Err(Error::validation(
                "role",
                format!("unknown role '{value}' (expected Customer, Manager or Administrator)"),
            )),
            role => Ok(role),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&value))
    }
}

/// Timestamps as the backend writes them.
///
/// ASP.NET serialises `DateTime` without an offset
/// (`2024-03-01T10:00:00` or with fractional seconds); those are read as UTC.
/// Plain dates (`2024-03-01`) are read as midnight UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parse any timestamp form the backend produces.
    #[must_use]
    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{value}'")))
    }

    /// The same format for optional fields.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(value) if value.trim().is_empty() => Ok(None),
                Some(value) => super::parse(&value)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{value}'"))),
            }
        }
    }
}

// === Vehicles ===

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub license_plate: String,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub seats: Option<u32>,
    #[serde(default)]
    pub mileage: Option<u32>,
    pub daily_rate: f64,
    #[serde(default = "unknown_vehicle_status")]
    pub status: VehicleStatus,
    #[serde(default)]
    pub transmission: Option<Transmission>,
    #[serde(default)]
    pub fuel_type: Option<FuelType>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
}

fn unknown_vehicle_status() -> VehicleStatus {
    VehicleStatus::Unknown
}

impl Vehicle {
    /// "2022 Toyota Camry"
    #[must_use]
    pub fn title(&self) -> String {
        if self.year > 0 {
            format!("{} {} {}", self.year, self.make, self.model)
        } else {
            format!("{} {}", self.make, self.model)
        }
    }
}

/// Body of vehicle create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub color: String,
    pub mileage: u32,
    pub daily_rate: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    pub seats: u32,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub category_id: Option<i64>,
    pub status: VehicleStatus,
}

impl VehicleInput {
    /// A blank form for a new vehicle, with the back-office defaults.
    #[must_use]
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            license_plate: String::new(),
            vin: String::new(),
            color: String::new(),
            mileage: 0,
            daily_rate: 0.0,
            image_url: String::new(),
            description: String::new(),
            seats: 5,
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Gasoline,
            category_id: None,
            status: VehicleStatus::Available,
        }
    }
}

impl From<&Vehicle> for VehicleInput {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            license_plate: vehicle.license_plate.clone(),
            vin: vehicle.vin.clone().unwrap_or_default(),
            color: vehicle.color.clone().unwrap_or_default(),
            mileage: vehicle.mileage.unwrap_or_default(),
            daily_rate: vehicle.daily_rate,
            image_url: vehicle.image_url.clone().unwrap_or_default(),
            description: vehicle.description.clone().unwrap_or_default(),
            seats: vehicle.seats.unwrap_or(5),
            transmission: vehicle.transmission.unwrap_or(Transmission::Automatic),
            fuel_type: vehicle.fuel_type.unwrap_or(FuelType::Gasoline),
            category_id: vehicle.category_id,
            status: vehicle.status,
        }
    }
}

/// Query parameters for the general vehicle listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VehicleStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of category create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// === Bookings ===

/// The customer attached to a booking in back-office listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCustomer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl BookingCustomer {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub vehicle: Option<Vehicle>,
    #[serde(default)]
    pub user: Option<BookingCustomer>,
    #[serde(with = "timestamp")]
    pub pickup_date: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub return_date: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub booking_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub return_location: Option<String>,
    pub status: BookingStatus,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub damage_report: Option<DamageReport>,
}

impl Booking {
    /// Vehicle title, or `Vehicle #id` when the listing omits the vehicle.
    #[must_use]
    pub fn vehicle_title(&self) -> String {
        match (&self.vehicle, self.vehicle_id) {
            (Some(vehicle), _) => vehicle.title(),
            (None, Some(id)) => format!("Vehicle #{id}"),
            (None, None) => "Unknown vehicle".to_string(),
        }
    }
}

/// Body of `POST /api/bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub vehicle_id: i64,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub pickup_location: String,
    pub return_location: String,
    pub payment_method: PaymentMethod,
}

/// Filters for the back-office booking listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

// === Users ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, with = "timestamp::option")]
    pub registration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_email_verified: Option<bool>,
    #[serde(default)]
    pub loyalty_points: Option<i64>,
    #[serde(default)]
    pub loyalty_tier: Option<LoyaltyTier>,
}

impl User {
    /// A user known only from token claims.
    #[must_use]
    pub fn provisional(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            address: None,
            role: None,
            registration_date: None,
            is_email_verified: None,
            loyalty_points: None,
            loyalty_tier: None,
        }
    }

    /// Full name, or the email when no name is known.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Body of back-office user create and update requests.
///
/// `email` is only sent on create; `password` only when set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    pub role: String,
}

/// Filters for the back-office user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Body of `PUT /api/users/profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
}

impl From<&User> for ProfileUpdate {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            address: user.address.clone().unwrap_or_default(),
        }
    }
}

// === Auth ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`.
///
/// `confirm_password` and `accept_terms` are checked client-side and not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(skip)]
    pub accept_terms: bool,
}

/// Body of `POST /api/auth/google-login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLogin {
    pub google_id: String,
    pub email: String,
    pub name: String,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

// === Documents ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: i64,
    pub document_type: DocumentType,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Body of `POST /api/users/documents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInput {
    pub document_type: DocumentType,
    pub document_number: String,
    pub file_url: String,
}

// === Loyalty ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyTransaction {
    #[serde(default)]
    pub id: i64,
    pub points: i64,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "timestamp::option")]
    pub transaction_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyInfo {
    pub points: i64,
    pub tier: LoyaltyTier,
    #[serde(default)]
    pub transactions: Vec<LoyaltyTransaction>,
}

// === Reviews ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub review_date: Option<DateTime<Utc>>,
}

/// Body of `POST /api/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub vehicle_id: i64,
    pub rating: u8,
    pub comment: String,
}

/// Response of `GET /api/reviews/can-review/{vehicleId}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanReview {
    pub can_review: bool,
}

// === Damages ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageReport {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub booking_id: Option<i64>,
    pub description: String,
    #[serde(default)]
    pub repair_cost: f64,
    #[serde(default)]
    pub is_customer_responsible: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub report_date: Option<DateTime<Utc>>,
}

/// Body of damage report create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageInput {
    pub booking_id: i64,
    pub description: String,
    pub repair_cost: f64,
    pub is_customer_responsible: bool,
    #[serde(default)]
    pub image_url: String,
}

// === Paging ===

/// One page of a server-side paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    #[serde(default = "one")]
    pub total_pages: u32,
    #[serde(default = "one")]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_count: u64,
}

fn one() -> u32 {
    1
}

impl<T> Paged<T> {
    /// Wrap a complete list as a single page.
    #[must_use]
    pub fn single(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            total_pages: 1,
            page_number: 1,
            page_size: u32::try_from(count).unwrap_or(u32::MAX),
            total_count: count as u64,
            items,
        }
    }

    /// Page a complete list client-side, for endpoints that ignore paging
    /// parameters. `page_number` is 1-based.
    #[must_use]
    pub fn from_full_list(items: Vec<T>, page_number: u32, page_size: u32) -> Self {
        let total_count = items.len() as u64;
        let page_size = page_size.max(1);
        let total_pages = u32::try_from(total_count.div_ceil(u64::from(page_size)))
            .unwrap_or(u32::MAX)
            .max(1);
        let page_number = page_number.clamp(1, total_pages);
        let skip = (page_number as usize - 1) * page_size as usize;
        let items = items.into_iter().skip(skip).take(page_size as usize).collect();

        Self {
            items,
            total_pages,
            page_number,
            page_size,
            total_count,
        }
    }
}

/// A listing that may come back paged or as a plain array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MaybePaged<T> {
    Paged(Paged<T>),
    List(Vec<T>),
}

impl<T> MaybePaged<T> {
    /// Normalise to a page, paging plain arrays client-side.
    #[must_use]
    pub fn into_page(self, page_number: u32, page_size: u32) -> Paged<T> {
        match self {
            Self::Paged(page) => page,
            Self::List(items) => Paged::from_full_list(items, page_number, page_size),
        }
    }
}
