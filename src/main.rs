use clap::{Parser, Subcommand};
use patientor_client::{HttpClient, PatientorApi};
use patientor_core::{
    config::client_config_from_env_value, constants::API_BASE_URL_ENV, EntryType,
    StateContainer,
};
use patientor_view::{
    create_patient, fetch_patient_list, EntryFormValues, PatientFormValues, PatientListPage,
    PatientView, Rendered,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "patientor")]
#[command(about = "Patientor patient records client")]
struct Cli {
    /// Backend base URL (overrides PATIENTOR_API_BASE_URL)
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a patient's page
    Show {
        /// Patient id
        id: String,
    },
    /// List all patients
    List,
    /// Print the diagnosis catalog
    Diagnoses,
    /// Add an entry to a patient
    AddEntry {
        /// Patient id
        id: String,
        /// HealthCheck, Hospital or OccupationalHealthcare
        #[arg(long = "type")]
        entry_type: EntryType,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        specialist: String,
        /// Diagnosis code (repeatable)
        #[arg(long = "code")]
        codes: Vec<String>,
        /// Health check rating, 0 (healthy) to 3 (critical risk)
        #[arg(long)]
        rating: Option<u8>,
        #[arg(long, default_value = "")]
        discharge_date: String,
        #[arg(long, default_value = "")]
        discharge_criteria: String,
        #[arg(long, default_value = "")]
        employer: String,
        #[arg(long, default_value = "")]
        sick_leave_start: String,
        #[arg(long, default_value = "")]
        sick_leave_end: String,
    },
    /// Add a patient
    AddPatient {
        #[arg(long)]
        name: String,
        #[arg(long)]
        occupation: String,
        /// male, female or other
        #[arg(long)]
        gender: String,
        #[arg(long, default_value = "")]
        ssn: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        date_of_birth: String,
    },
}

/// Entry point for the Patientor client.
///
/// # Environment Variables
/// - `PATIENTOR_API_BASE_URL`: backend base URL (default: "http://localhost:3001/api")
/// - `RUST_LOG`: log filter (default directive: "patientor=info")
///
/// The store lives for the duration of one command and all work runs on a single thread.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patientor=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = client_config_from_env_value(
        cli.api_base_url
            .or_else(|| std::env::var(API_BASE_URL_ENV).ok()),
    )?;
    tracing::debug!(api_base_url = cfg.api_base_url(), "resolved configuration");
    let api = HttpClient::new(cfg)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cli.command, &api))
}

async fn run(command: Option<Commands>, api: &HttpClient) -> anyhow::Result<()> {
    let mut store = StateContainer::new();

    match command {
        Some(Commands::Show { id }) => {
            let mut view = PatientView::for_patient(id);
            view.load(api, &mut store).await;
            match view.render(store.state()) {
                Rendered::Page(page) => print!("{page}"),
                Rendered::Error(reason) => anyhow::bail!(reason),
                Rendered::Loading | Rendered::Nothing => {}
            }
        }
        Some(Commands::List) => {
            fetch_patient_list(api, &mut store).await?;
            print!("{}", PatientListPage::build(store.state()));
        }
        Some(Commands::Diagnoses) => {
            let diagnoses = api.get_diagnoses().await?;
            if diagnoses.is_empty() {
                println!("No diagnoses found.");
            }
            for d in diagnoses {
                match d.latin {
                    Some(latin) => println!("{}  {} ({})", d.code, d.name, latin),
                    None => println!("{}  {}", d.code, d.name),
                }
            }
        }
        Some(Commands::AddEntry {
            id,
            entry_type,
            date,
            description,
            specialist,
            codes,
            rating,
            discharge_date,
            discharge_criteria,
            employer,
            sick_leave_start,
            sick_leave_end,
        }) => {
            let values = EntryFormValues {
                entry_type,
                description,
                date,
                specialist,
                diagnosis_codes: codes,
                health_check_rating: rating,
                discharge_date,
                discharge_criteria,
                employer_name: employer,
                sick_leave_start,
                sick_leave_end,
            };
            let new_entry = values.validate()?;

            let mut view = PatientView::for_patient(id);
            view.load(api, &mut store).await;
            if let Rendered::Error(reason) = view.render(store.state()) {
                anyhow::bail!(reason);
            }

            view.open_modal();
            match view.submit_new_entry(api, &mut store, &new_entry).await {
                Ok(created) => {
                    println!("Added entry {}", created.id);
                    if let Some(page) = view.page(store.state()) {
                        print!("\n{page}");
                    }
                }
                Err(_) => {
                    let message = view.modal().error.clone().unwrap_or_default();
                    anyhow::bail!("Error adding entry: {message}");
                }
            }
        }
        Some(Commands::AddPatient {
            name,
            occupation,
            gender,
            ssn,
            date_of_birth,
        }) => {
            let values = PatientFormValues {
                name,
                occupation,
                gender,
                ssn,
                date_of_birth,
            };
            let new_patient = values.validate()?;
            let created = create_patient(api, &mut store, &new_patient).await?;
            println!("Added patient {} with id {}", created.name, created.id);
        }
        None => {
            println!("Use 'patientor --help' for commands");
        }
    }

    Ok(())
}
