//! Form validation.
//!
//! Each form check collects every problem at once, keyed by the field it
//! concerns, so a front end can show them all together.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{DamageInput, Registration, ReviewInput, UserInput, VehicleInput};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex pattern"));

/// The looser check used by the back-office user form.
static LOOSE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid regex pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("Invalid regex pattern"));

/// Oldest model year accepted for a vehicle.
pub const MIN_VEHICLE_YEAR: i32 = 1900;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Problems found in a form, in the order the fields appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

/// One problem with one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem. Only the first problem per field is kept.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok` when no problems were found.
    ///
    /// # Errors
    ///
    /// Returns the first problem as [`Error::Validation`]; its message lists
    /// the others too when there are several.
    pub fn into_result(self) -> Result<()> {
        let Some(first) = self.errors.first() else {
            return Ok(());
        };
        if self.errors.len() == 1 {
            return Err(Error::validation(first.field, first.message.clone()));
        }
        let all: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        Err(Error::validation(first.field, all.join("; ")))
    }
}

/// Strip the separators people type into phone numbers.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '-' | '(' | ')'))
        .collect()
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE.is_match(&normalize_phone(phone))
}

fn has_mixed_case_and_digit(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

fn check_name(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{label} is required"));
    } else if value.chars().count() < 2 {
        errors.add(field, format!("{label} must be at least 2 characters"));
    }
}

/// Check the sign-up form.
#[must_use]
pub fn validate_registration(form: &Registration) -> FieldErrors {
    let mut errors = FieldErrors::new();

    check_name(&mut errors, "firstName", "First name", &form.first_name);
    check_name(&mut errors, "lastName", "Last name", &form.last_name);

    if form.email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(&form.email) {
        errors.add("email", "Email is invalid");
    }

    if form.password.is_empty() {
        errors.add("password", "Password is required");
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "Password must be at least 6 characters");
    } else if !has_mixed_case_and_digit(&form.password) {
        errors.add(
            "password",
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        );
    }

    if form.password != form.confirm_password {
        errors.add("confirmPassword", "Passwords do not match");
    }

    if !form.phone_number.is_empty() && !is_valid_phone(&form.phone_number) {
        errors.add("phoneNumber", "Phone number format is invalid");
    }

    if !form.accept_terms {
        errors.add("terms", "You must accept the terms and conditions");
    }

    errors
}

/// Check the back-office user form. Editing leaves the password alone
/// unless one is typed; creating requires one.
#[must_use]
pub fn validate_user_form(form: &UserInput, confirm_password: &str, is_new: bool) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let password = form.password.as_deref().unwrap_or_default();

    if is_new || !password.is_empty() || !confirm_password.is_empty() {
        if password != confirm_password {
            errors.add("password", "Passwords do not match");
        } else if is_new && password.chars().count() < MIN_PASSWORD_LEN {
            errors.add("password", "Password must be at least 6 characters long");
        }
    }

    if is_new && !LOOSE_EMAIL.is_match(form.email.as_deref().unwrap_or_default()) {
        errors.add("email", "Please enter a valid email address");
    }

    errors
}

/// Check the back-office vehicle form against `current_year`.
#[must_use]
pub fn validate_vehicle(form: &VehicleInput, current_year: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.make.trim().is_empty() {
        errors.add("make", "Make is required");
    }
    if form.model.trim().is_empty() {
        errors.add("model", "Model is required");
    }
    if !(MIN_VEHICLE_YEAR..=current_year + 1).contains(&form.year) {
        errors.add(
            "year",
            format!("Year must be between {MIN_VEHICLE_YEAR} and {}", current_year + 1),
        );
    }
    if form.license_plate.trim().is_empty() {
        errors.add("licensePlate", "License plate is required");
    }
    if !(form.daily_rate > 0.0) {
        errors.add("dailyRate", "Daily rate must be greater than 0");
    }
    if form.seats == 0 {
        errors.add("seats", "Seats must be at least 1");
    }

    errors
}

/// Check a damage report before filing it.
#[must_use]
pub fn validate_damage(form: &DamageInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if form.description.trim().is_empty() {
        errors.add("description", "Description of damage is required");
    }
    if !(form.repair_cost >= 0.0) {
        errors.add("repairCost", "Repair cost cannot be negative");
    }
    errors
}

/// Check a review before posting it.
#[must_use]
pub fn validate_review(form: &ReviewInput) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !(1..=5).contains(&form.rating) {
        errors.add("rating", "Rating must be between 1 and 5");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FuelType, Transmission, VehicleStatus};

    fn registration() -> Registration {
        Registration {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@example.com".to_string(),
            password: "Secret1".to_string(),
            confirm_password: "Secret1".to_string(),
            phone_number: String::new(),
            address: String::new(),
            accept_terms: true,
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&registration()).is_empty());
    }

    #[test]
    fn test_registration_names() {
        let mut form = registration();
        form.first_name = "  ".to_string();
        form.last_name = " L ".to_string();

        let errors = validate_registration(&form);
        assert_eq!(errors.get("firstName"), Some("First name is required"));
        assert_eq!(errors.get("lastName"), Some("Last name must be at least 2 characters"));
    }

    #[test]
    fn test_registration_email() {
        let mut form = registration();
        form.email = "ann@example".to_string();
        assert_eq!(validate_registration(&form).get("email"), Some("Email is invalid"));

        form.email = String::new();
        assert_eq!(validate_registration(&form).get("email"), Some("Email is required"));
    }

    #[test]
    fn test_registration_password_rules() {
        let mut form = registration();
        form.password = "Ab1".to_string();
        form.confirm_password = "Ab1".to_string();
        assert_eq!(
            validate_registration(&form).get("password"),
            Some("Password must be at least 6 characters")
        );

        form.password = "secret1".to_string();
        form.confirm_password = "secret1".to_string();
        assert!(validate_registration(&form)
            .get("password")
            .unwrap()
            .contains("uppercase"));

        form.password = "Secret1".to_string();
        form.confirm_password = "Secret2".to_string();
        assert_eq!(
            validate_registration(&form).get("confirmPassword"),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_registration_phone() {
        let mut form = registration();
        form.phone_number = "+1 (555) 123-4567".to_string();
        assert!(validate_registration(&form).is_empty());

        form.phone_number = "12345".to_string();
        assert_eq!(
            validate_registration(&form).get("phoneNumber"),
            Some("Phone number format is invalid")
        );
    }

    #[test]
    fn test_registration_terms() {
        let mut form = registration();
        form.accept_terms = false;
        assert_eq!(
            validate_registration(&form).get("terms"),
            Some("You must accept the terms and conditions")
        );
    }

    #[test]
    fn test_into_result_lists_all_problems() {
        let mut form = registration();
        form.first_name = String::new();
        form.accept_terms = false;

        let errors = validate_registration(&form);
        assert_eq!(errors.len(), 2);
        let message = errors.into_result().unwrap_err().to_string();
        assert!(message.contains("firstName: First name is required"));
        assert!(message.contains("terms: You must accept"));
    }

    #[test]
    fn test_user_form_new() {
        let form = UserInput {
            email: Some("bo@example.com".to_string()),
            password: Some("abc".to_string()),
            first_name: "Bo".to_string(),
            last_name: "Ek".to_string(),
            role: "Customer".to_string(),
            ..UserInput::default()
        };
        assert_eq!(
            validate_user_form(&form, "abc", true).get("password"),
            Some("Password must be at least 6 characters long")
        );
        assert_eq!(
            validate_user_form(&form, "abd", true).get("password"),
            Some("Passwords do not match")
        );

        let mut bad_email = form.clone();
        bad_email.password = Some("abcdef".to_string());
        bad_email.email = Some("nope".to_string());
        assert_eq!(
            validate_user_form(&bad_email, "abcdef", true).get("email"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_user_form_edit_without_password() {
        let form = UserInput {
            first_name: "Bo".to_string(),
            last_name: "Ek".to_string(),
            role: "Manager".to_string(),
            ..UserInput::default()
        };
        assert!(validate_user_form(&form, "", false).is_empty());

        // Short passwords are accepted on edit; only a mismatch is refused.
        let mut with_password = form;
        with_password.password = Some("abc".to_string());
        assert!(validate_user_form(&with_password, "abc", false).is_empty());
        assert!(!validate_user_form(&with_password, "abd", false).is_empty());
    }

    #[test]
    fn test_vehicle_form() {
        let mut form = VehicleInput::new("Toyota", "Corolla", 2023);
        form.license_plate = "XYZ-1".to_string();
        form.daily_rate = 45.0;
        assert!(validate_vehicle(&form, 2024).is_empty());
        assert_eq!(form.transmission, Transmission::Automatic);
        assert_eq!(form.fuel_type, FuelType::Gasoline);
        assert_eq!(form.status, VehicleStatus::Available);

        form.year = 2030;
        form.daily_rate = 0.0;
        form.make = String::new();
        let errors = validate_vehicle(&form, 2024);
        assert!(errors.get("year").is_some());
        assert!(errors.get("dailyRate").is_some());
        assert!(errors.get("make").is_some());
    }

    #[test]
    fn test_damage_form() {
        let mut form = DamageInput {
            booking_id: 1,
            description: "Dent on rear door".to_string(),
            repair_cost: 0.0,
            is_customer_responsible: true,
            image_url: String::new(),
        };
        assert!(validate_damage(&form).is_empty());

        form.repair_cost = -5.0;
        form.description = " ".to_string();
        assert_eq!(validate_damage(&form).len(), 2);
    }

    #[test]
    fn test_review_rating() {
        let mut review = ReviewInput {
            vehicle_id: 1,
            rating: 5,
            comment: String::new(),
        };
        assert!(validate_review(&review).is_empty());
        review.rating = 0;
        assert!(!validate_review(&review).is_empty());
        review.rating = 6;
        assert!(!validate_review(&review).is_empty());
    }

    #[test]
    fn test_add_keeps_first_message_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("first"));
    }
}
