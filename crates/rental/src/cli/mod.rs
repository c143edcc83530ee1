//! Command-line interface for the rental client.
//!
//! This module provides the CLI structure for the `rentctl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;
use crate::views::OutputFormat;

pub use commands::{
    AdminBookingsCommand, AdminCommand, AdminUsersCommand, AdminVehiclesCommand, BookCommand,
    BookingsCommand, ConfigCommand, DateArgs, DocumentsCommand, LoginCommand, PageArgs,
    ProfileCommand, RegisterCommand, ReviewCommand, UserFields, VehicleFields, VehiclesCommand,
};

/// rentctl - Rent a vehicle from the terminal
///
/// Browse the fleet, book vehicles, manage documents and bookings, and run
/// the back office of the rental service.
#[derive(Debug, Parser)]
#[command(name = "rentctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'o', long, value_enum, global = true, default_value = "plain")]
    pub format: OutputFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Featured vehicles and categories
    Home,

    /// Browse vehicles
    #[command(subcommand)]
    Vehicles(VehiclesCommand),

    /// Price and book a vehicle
    Book(BookCommand),

    /// Log in with email and password
    Login(LoginCommand),

    /// Create an account
    Register(RegisterCommand),

    /// Log in with a Google ID token
    GoogleLogin {
        /// The ID token issued by Google sign-in
        credential: String,
    },

    /// Log out
    Logout,

    /// Show who is logged in and where they can go
    Whoami,

    /// View or change your profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Your bookings
    #[command(subcommand)]
    Bookings(BookingsCommand),

    /// Your identity documents
    #[command(subcommand)]
    Documents(DocumentsCommand),

    /// Review a vehicle you rented
    Review(ReviewCommand),

    /// Back office
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Open a page by its URL path, e.g. /vehicles/3 or /admin/bookings
    Open {
        /// The path to open
        path: String,
    },

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
