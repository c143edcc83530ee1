//! `rentctl` - CLI for the vehicle rental service
//!
//! This binary browses the fleet, books vehicles and runs the back office
//! against the rental API.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use rental::cli::{
    AdminBookingsCommand, AdminCommand, AdminUsersCommand, AdminVehiclesCommand, BookCommand,
    BookingsCommand, Cli, Command, ConfigCommand, DocumentsCommand, PageArgs, ProfileCommand,
    UserFields, VehiclesCommand,
};
use rental::models::{
    BookingQuery, BookingRequest, Credentials, DamageInput, ProfileUpdate, Registration,
    ReviewInput, UserInput, UserQuery,
};
use rental::views::{
    account, admin, booking, documents, home, my_bookings, profile, vehicles, AppContext,
    DateRange, Notice,
};
use rental::{init_logging, ApiClient, Config, Session, Storage};

/// What a command produced.
#[derive(Debug)]
enum Output {
    Page(String),
    Notice(Notice),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if e
                .downcast_ref::<rental::Error>()
                .is_some_and(rental::Error::is_unauthorized)
            {
                eprintln!("Run `rentctl login` to sign in.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load_from(cli.config.clone()).context("could not load configuration")?;

    if let Command::Config(cmd) = cli.command {
        handle_config(&config, cmd)?;
        return Ok(ExitCode::SUCCESS);
    }

    let database = config.database_path();
    let store = Storage::open(&database)
        .with_context(|| format!("could not open session store {}", database.display()))?;
    let client = ApiClient::new(&config, Arc::new(store))?;
    let session = Session::restored(client).await?;
    let mut ctx = AppContext::new(config, session, cli.format);

    match dispatch(&mut ctx, cli.command).await? {
        Output::Page(text) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Output::Notice(notice) => {
            let text = ctx.render(&notice)?;
            if notice.success {
                print!("{text}");
                Ok(ExitCode::SUCCESS)
            } else {
                eprint!("{text}");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn page_size(ctx: &AppContext, page: &PageArgs) -> u32 {
    page.page_size.unwrap_or(ctx.config().display.page_size)
}

async fn dispatch(ctx: &mut AppContext, command: Command) -> rental::Result<Output> {
    use Output::{Notice as Done, Page};

    Ok(match command {
        Command::Home => Page(ctx.show(&home::HomePage).await?),
        Command::Vehicles(cmd) => Page(handle_vehicles(ctx, cmd).await?),
        Command::Book(cmd) => handle_book(ctx, cmd).await?,
        Command::Login(cmd) => {
            let credentials = Credentials {
                email: cmd.email,
                password: cmd.password,
            };
            Done(account::login(ctx, &credentials).await)
        }
        Command::Register(cmd) => {
            let registration = Registration {
                first_name: cmd.first_name,
                last_name: cmd.last_name,
                email: cmd.email,
                password: cmd.password,
                confirm_password: cmd.confirm_password,
                phone_number: cmd.phone,
                address: cmd.address,
                accept_terms: cmd.accept_terms,
            };
            Done(account::register(ctx, &registration).await)
        }
        Command::GoogleLogin { credential } => Done(account::google_login(ctx, &credential).await),
        Command::Logout => Done(account::logout(ctx)?),
        Command::Whoami => Page(ctx.show(&account::WhoAmIPage).await?),
        Command::Profile(ProfileCommand::Show) => Page(ctx.show(&profile::ProfilePage).await?),
        Command::Profile(ProfileCommand::Update {
            first_name,
            last_name,
            phone,
            address,
        }) => {
            let mut update = ctx
                .session()
                .current_user()
                .map(ProfileUpdate::from)
                .unwrap_or_default();
            update.first_name = first_name.unwrap_or(update.first_name);
            update.last_name = last_name.unwrap_or(update.last_name);
            update.phone_number = phone.unwrap_or(update.phone_number);
            update.address = address.unwrap_or(update.address);
            Done(profile::update(ctx, &update).await?)
        }
        Command::Bookings(BookingsCommand::List) => {
            Page(ctx.show(&my_bookings::MyBookingsPage).await?)
        }
        Command::Bookings(BookingsCommand::Extend { id, until }) => {
            Done(my_bookings::extend(ctx, id, until).await?)
        }
        Command::Bookings(BookingsCommand::Cancel { id }) => {
            Done(my_bookings::cancel(ctx, id).await?)
        }
        Command::Documents(DocumentsCommand::List) => {
            Page(ctx.show(&documents::DocumentUploadPage).await?)
        }
        Command::Documents(DocumentsCommand::Upload {
            document_type,
            number,
            file,
        }) => {
            let request = documents::UploadRequest {
                document_type,
                document_number: number,
                file,
            };
            Done(documents::upload(ctx, &request).await?)
        }
        Command::Review(cmd) => {
            let review = ReviewInput {
                vehicle_id: cmd.vehicle_id,
                rating: cmd.rating,
                comment: cmd.comment,
            };
            Done(vehicles::submit_review(ctx, &review).await?)
        }
        Command::Admin(cmd) => handle_admin(ctx, cmd).await?,
        Command::Open { path } => Page(rental::views::open(ctx, &path).await?),
        Command::Config(_) => unreachable!("configuration commands run before the session opens"),
    })
}

async fn handle_vehicles(ctx: &AppContext, cmd: VehiclesCommand) -> rental::Result<String> {
    match cmd {
        VehiclesCommand::List {
            dates,
            category,
            search,
        } => {
            let mut page = vehicles::VehicleListPage::available(DateRange::or_default(
                dates.from,
                dates.to,
                ctx.default_range(),
            ));
            page.category_id = category;
            page.query = search;
            ctx.show(&page).await
        }
        VehiclesCommand::Show { id, dates } => {
            let range = dates
                .is_set()
                .then(|| DateRange::or_default(dates.from, dates.to, ctx.default_range()));
            ctx.show(&vehicles::VehicleDetailsPage::new(id, range)).await
        }
        VehiclesCommand::Search { query } => {
            let mut page = vehicles::VehicleListPage::available(ctx.default_range());
            page.query = Some(query);
            ctx.show(&page).await
        }
        VehiclesCommand::Reviews { id } => {
            ctx.show(&vehicles::ReviewsPage { vehicle_id: id }).await
        }
    }
}

async fn handle_book(ctx: &AppContext, cmd: BookCommand) -> rental::Result<Output> {
    let dates = DateRange::or_default(cmd.dates.from, cmd.dates.to, ctx.default_range());
    if !cmd.confirm {
        let page = booking::BookingFormPage::new(cmd.vehicle_id, dates);
        let mut text = ctx.show(&page).await?;
        text.push_str("Add --confirm to send the booking.\n");
        return Ok(Output::Page(text));
    }

    let pickup_location = cmd.pickup_location.unwrap_or_default();
    let request = BookingRequest {
        vehicle_id: cmd.vehicle_id,
        pickup_date: dates.start_date,
        return_date: dates.end_date,
        return_location: cmd
            .return_location
            .unwrap_or_else(|| pickup_location.clone()),
        pickup_location,
        payment_method: cmd
            .payment
            .unwrap_or_else(|| ctx.config().default_payment_method()),
    };
    Ok(Output::Notice(booking::submit(ctx, &request).await?))
}

fn user_input(fields: UserFields, email: Option<String>) -> (UserInput, String) {
    let input = UserInput {
        email,
        password: fields.password,
        first_name: fields.first_name,
        last_name: fields.last_name,
        phone_number: fields.phone,
        address: fields.address,
        role: fields.role.to_string(),
    };
    (input, fields.confirm_password)
}

async fn handle_admin(ctx: &AppContext, cmd: AdminCommand) -> rental::Result<Output> {
    use Output::{Notice as Done, Page};

    Ok(match cmd {
        AdminCommand::Dashboard => Page(ctx.show(&admin::DashboardPage).await?),

        AdminCommand::Bookings(AdminBookingsCommand::List {
            page,
            status,
            from,
            to,
        }) => {
            let listing = admin::AdminBookingsPage::new(BookingQuery {
                page_number: page.page,
                page_size: page_size(ctx, &page),
                status,
                start_date: from,
                end_date: to,
            });
            Page(ctx.show(&listing).await?)
        }
        AdminCommand::Bookings(AdminBookingsCommand::Show { id }) => {
            Page(ctx.show(&admin::BookingDetailsPage { id }).await?)
        }
        AdminCommand::Bookings(AdminBookingsCommand::Status { id, status }) => {
            Done(admin::bookings::set_status(ctx, id, status).await?)
        }
        AdminCommand::Bookings(AdminBookingsCommand::Damage {
            id,
            description,
            cost,
            not_customer_responsible,
            image_url,
        }) => {
            let damage = DamageInput {
                booking_id: id,
                description,
                repair_cost: cost,
                is_customer_responsible: !not_customer_responsible,
                image_url,
            };
            Done(admin::bookings::report_damage(ctx, &damage).await?)
        }

        AdminCommand::Vehicles(AdminVehiclesCommand::List { page }) => {
            let listing = admin::AdminVehiclesPage::new(page.page, page_size(ctx, &page));
            Page(ctx.show(&listing).await?)
        }
        AdminCommand::Vehicles(AdminVehiclesCommand::Add { fields }) => {
            Done(admin::vehicles::create_vehicle(ctx, &fields.into_new()).await?)
        }
        AdminCommand::Vehicles(AdminVehiclesCommand::Update { id, fields }) => {
            let mut vehicle = admin::vehicles::edit_form(ctx, id).await?;
            fields.apply(&mut vehicle);
            Done(admin::vehicles::update_vehicle(ctx, id, &vehicle).await?)
        }
        AdminCommand::Vehicles(AdminVehiclesCommand::Delete { id, yes }) => {
            if yes {
                Done(admin::vehicles::delete_vehicle(ctx, id).await?)
            } else {
                Done(Notice::failure(format!(
                    "Deleting vehicle #{id} cannot be undone. Use --yes to confirm."
                )))
            }
        }

        AdminCommand::Users(AdminUsersCommand::List { page, role, search }) => {
            let listing = admin::AdminUsersPage::new(UserQuery {
                page_number: page.page,
                page_size: page_size(ctx, &page),
                role,
                search,
            });
            Page(ctx.show(&listing).await?)
        }
        AdminCommand::Users(AdminUsersCommand::Show { id }) => {
            Page(ctx.show(&admin::UserDetailsPage { id }).await?)
        }
        AdminCommand::Users(AdminUsersCommand::Add { email, fields }) => {
            let (user, confirm) = user_input(fields, Some(email));
            Done(admin::users::create_user(ctx, &user, &confirm).await?)
        }
        AdminCommand::Users(AdminUsersCommand::Update { id, fields }) => {
            let (user, confirm) = user_input(fields, None);
            Done(admin::users::update_user(ctx, &id, &user, &confirm).await?)
        }
        AdminCommand::Users(AdminUsersCommand::Role { id, role }) => {
            Done(admin::users::change_role(ctx, &id, &role).await?)
        }
        AdminCommand::Users(AdminUsersCommand::VerifyDocument { id }) => {
            Done(admin::users::verify_document(ctx, id).await?)
        }
    })
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                println!("  Timeout (secs):     {}", config.api.timeout_secs);
                println!("  Connect (secs):     {}", config.api.connect_timeout_secs);
                println!();
                let database = config.database_path();
                println!("[Storage]");
                println!("  Database path:      {}", database.display());
                if database.exists() {
                    let stats = Storage::open(&database)?.stats()?;
                    println!("  Stored items:       {}", stats.total_items);
                    println!("  Database size:      {} bytes", stats.db_size_bytes);
                    if let Some(updated) = stats.last_updated {
                        println!("  Last updated:       {}", updated.to_rfc3339());
                    }
                }
                println!();
                println!("[Booking]");
                println!("  Rental days:        {}", config.booking.default_rental_days);
                println!("  Extension days:     {}", config.booking.default_extension_days);
                println!("  Payment method:     {}", config.default_payment_method());
                println!("  Upload folder:      {}", config.booking.upload_folder);
                println!();
                println!("[Display]");
                println!("  Page size:          {}", config.display.page_size);
                println!("  Date format:        {}", config.display.date_format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
