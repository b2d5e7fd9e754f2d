use std::path::PathBuf;

use anyhow::bail;
use chrono::Local;
use clap::{Parser, Subcommand};
use lasambus_cli::context::{init_tracing, AppContext};
use lasambus_cli::prompt::Prompt;
use lasambus_cli::render::{error_notice, hospital_line, listing_page, user_line};
use lasambus_cli::report::{complete_report, TransferAnswer};
use lasambus_core::constants::{
    EXPORT_SUCCESS_NOTICE, INCIDENTS_FETCH_FAILED_NOTICE, INCIDENT_SAVED_NOTICE,
    LOGIN_SUCCESS_NOTICE, REGISTER_SUCCESS_NOTICE,
};
use lasambus_core::csv_export::{export_csv, write_export};
use lasambus_core::incident_listing::{fetch_all_incidents, IncidentFilter, IncidentListing};
use lasambus_core::report_flow::{IncidentForm, ReportFlow};
use lasambus_core::{auth, HospitalsBackend, ReportError};

#[derive(Parser)]
#[command(name = "lasambus")]
#[command(about = "LASAMBUS ambulance incident reporting CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login { email: String, password: String },
    /// Register a personnel account
    Register {
        email: String,
        full_name: String,
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Submit an incident report
    Report {
        #[arg(long)]
        patient_name: String,
        /// Whole years; anything else is sent as unknown
        #[arg(long)]
        age: Option<String>,
        /// Male or Female
        #[arg(long)]
        sex: String,
        #[arg(long)]
        location: String,
        /// Lagos Local Government Area
        #[arg(long)]
        lga: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        action_taken: String,
        /// Transfer to this hospital id
        #[arg(long, conflicts_with = "no_transfer")]
        transfer: Option<String>,
        /// Patient was treated on site
        #[arg(long)]
        no_transfer: bool,
    },
    /// List incidents, 10 per page
    Incidents {
        /// all, transferred or not_transferred
        #[arg(long, default_value = "all")]
        filter: IncidentFilter,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Export incidents to CSV
    Export {
        /// all, transferred or not_transferred
        #[arg(long, default_value = "all")]
        filter: IncidentFilter,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List hospitals with available beds
    Hospitals {
        /// Include hospitals with no free beds
        #[arg(long)]
        all: bool,
    },
    /// Hospitals nearest to a location
    Nearby {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        /// Required expertise, for example Trauma
        #[arg(long)]
        condition: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    let ctx = AppContext::from_env()?;

    let result = run(cli.command, &ctx).await;
    if let Some(notice) = ctx.navigator.take_notice() {
        eprintln!("{notice}");
    }
    result
}

async fn run(command: Option<Commands>, ctx: &AppContext) -> anyhow::Result<()> {
    match command {
        Some(Commands::Login { email, password }) => {
            let user = auth::login(&ctx.api, &ctx.session, &email, &password)
                .await
                .map_err(notice)?;
            println!("{LOGIN_SUCCESS_NOTICE}");
            println!("{}", user_line(&user));
        }
        Some(Commands::Register {
            email,
            full_name,
            password,
        }) => {
            auth::register(&ctx.api, &email, &full_name, &password)
                .await
                .map_err(notice)?;
            println!("{REGISTER_SUCCESS_NOTICE}");
        }
        Some(Commands::Logout) => {
            auth::logout(&ctx.session)?;
            println!("Logged out.");
        }
        Some(Commands::Whoami) => match ctx.session.user() {
            Some(user) => println!("{}", user_line(&user)),
            None => println!("Not logged in."),
        },
        Some(Commands::Report {
            patient_name,
            age,
            sex,
            location,
            lga,
            description,
            action_taken,
            transfer,
            no_transfer,
        }) => {
            let form = IncidentForm {
                patient_name,
                patient_age: age.unwrap_or_default(),
                patient_sex: sex,
                location,
                lga,
                description,
                action_taken,
            };
            let awaiting = match ReportFlow::with_form(form).submit(&ctx.api).await {
                Ok(awaiting) => awaiting,
                Err(rejected) => return Err(notice(rejected.error)),
            };
            println!("{INCIDENT_SAVED_NOTICE} ({})", awaiting.incident().id);

            let answer = match (transfer, no_transfer) {
                (Some(id), _) => TransferAnswer::To(id),
                (None, true) => TransferAnswer::No,
                (None, false) => TransferAnswer::Ask,
            };
            complete_report(&ctx.api, awaiting, answer, &mut Prompt::stdio()).await?;
        }
        Some(Commands::Incidents { filter, page }) => {
            let mut listing = load_listing(ctx).await?;
            listing.set_filter(filter);
            if !listing.go_to_page(page) {
                bail!("page {page} is out of range (1 to {})", listing.total_pages());
            }
            println!("{}", listing_page(&listing, &Local));
        }
        Some(Commands::Export { filter, out }) => {
            let mut listing = load_listing(ctx).await?;
            listing.set_filter(filter);
            let csv = export_csv(listing.filtered(), &Local);
            let path = write_export(&out, Local::now().date_naive(), &csv)?;
            println!("{EXPORT_SUCCESS_NOTICE} {}", path.display());
        }
        Some(Commands::Hospitals { all }) => {
            let hospitals = ctx
                .api
                .list_hospitals()
                .await
                .map_err(ReportError::from)
                .map_err(notice)?;
            let shown: Vec<_> = hospitals
                .iter()
                .filter(|h| all || h.has_available_beds())
                .collect();
            if shown.is_empty() {
                println!("No hospitals found.");
            }
            for hospital in shown {
                println!("{}", hospital_line(hospital));
            }
        }
        Some(Commands::Nearby {
            lat,
            lon,
            condition,
        }) => {
            let hospitals = ctx
                .api
                .nearby_hospitals(lat, lon, condition.as_deref())
                .await
                .map_err(ReportError::from)
                .map_err(notice)?;
            if hospitals.is_empty() {
                println!("No hospitals found.");
            }
            for hospital in &hospitals {
                println!("{}", hospital_line(hospital));
            }
        }
        None => {
            println!("No command given. Run with --help for usage.");
        }
    }

    Ok(())
}

async fn load_listing(ctx: &AppContext) -> anyhow::Result<IncidentListing> {
    match fetch_all_incidents(&ctx.api).await {
        Ok(incidents) => Ok(IncidentListing::new(incidents)),
        Err(e) => bail!("{INCIDENTS_FETCH_FAILED_NOTICE}: {}", error_notice(&e)),
    }
}

/// Turns a failed action into the error `main` reports.
fn notice(error: ReportError) -> anyhow::Error {
    anyhow::anyhow!(error_notice(&error))
}
