mod display;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use desaparecidos_client::config::{BASE_URL_VAR, DEFAULT_BASE_URL, TIMEOUT_VAR};
use desaparecidos_client::{ApiClient, ClientConfig, TipTransport};
use desaparecidos_core::model::DEFAULT_PAGE_SIZE;
use desaparecidos_core::{Person, PersonSearch, Photo, SearchFilter, Sex, Status};
use desaparecidos_state::{
    DetailController, Notice, NoticeLevel, Notifier, PersonsApi, SearchController, TipError,
    TipForm, parse_person_id,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "desaparecidos", version)]
#[command(about = "Consulta ao cadastro de pessoas desaparecidas")]
struct Cli {
    /// Registry base URL.
    #[arg(long, global = true, env = BASE_URL_VAR, default_value = DEFAULT_BASE_URL)]
    api_base_url: String,
    /// Request timeout in milliseconds.
    #[arg(long, global = true, env = TIMEOUT_VAR)]
    api_timeout_ms: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cases, optionally filtered.
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        sex: Option<SexArg>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        min_age: Option<u32>,
        #[arg(long)]
        max_age: Option<u32>,
        /// Zero-based page index.
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: u32,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show one case.
    Show {
        id: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Send information about a case.
    Tip {
        id: String,
        #[arg(long)]
        observations: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long = "photo")]
        photos: Vec<PathBuf>,
        /// Send as a multipart form instead of query parameters.
        #[arg(long, default_value_t = false)]
        multipart: bool,
    },
    /// Registry totals.
    Stats {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    Desaparecida,
    Localizada,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Desaparecida => Status::Desaparecida,
            StatusArg::Localizada => Status::Localizada,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SexArg {
    Masculino,
    Feminino,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Masculino => Sex::Masculino,
            SexArg::Feminino => Sex::Feminino,
        }
    }
}

/// Writes notices to stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => eprintln!("✓ {}", notice.message),
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = client_config(&cli.api_base_url, cli.api_timeout_ms.as_deref())?;
    tracing::debug!(
        base_url = %config.base_url,
        timeout_ms = config.timeout_ms() as u64,
        "desaparecidos v{}",
        env!("CARGO_PKG_VERSION")
    );

    let notifier: Arc<dyn Notifier> = Arc::new(StderrNotifier);

    match cli.command {
        Commands::Search {
            name,
            status,
            sex,
            location,
            min_age,
            max_age,
            page,
            size,
            json,
        } => {
            let api = Arc::new(ApiClient::new(config)?);
            let filter = SearchFilter {
                name,
                status: status.map(Status::from),
                location,
                sex: sex.map(Sex::from),
                min_age,
                max_age,
            };
            let query = PersonSearch::new(0, size).with_filter(filter).with_page(page);
            cmd_search(api, notifier, query, json).await
        }
        Commands::Show { id, json } => {
            let api = Arc::new(ApiClient::new(config)?);
            cmd_show(api, notifier, &id, json).await
        }
        Commands::Tip {
            id,
            observations,
            location,
            phone,
            photos,
            multipart,
        } => {
            let transport = if multipart {
                TipTransport::Multipart
            } else {
                TipTransport::QueryParams
            };
            let Some(person_id) = parse_person_id(&id) else {
                eprintln!("Identificador inválido: {id}");
                return Ok(ExitCode::FAILURE);
            };
            if let Some(message) = unsent_fields(transport, phone.is_some(), !photos.is_empty()) {
                eprintln!("✗ {message}");
                return Ok(ExitCode::FAILURE);
            }
            let api = ApiClient::new(config)?.with_tip_transport(transport);
            let photos = photos
                .iter()
                .map(|path| load_photo(path))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let mut form = TipForm::new(person_id, notifier);
            form.set_observations(observations);
            if let Some(location) = location {
                form.set_sighting_location(location);
            }
            if let Some(phone) = phone {
                form.set_phone_input(&phone);
            }
            form.add_photos(photos);
            cmd_tip(&api, &mut form).await
        }
        Commands::Stats { json } => {
            let api = ApiClient::new(config)?;
            cmd_stats(&api, json).await
        }
    }
}

/// Build the client configuration from the two CLI options, applying the
/// same validation as the environment reader.
fn client_config(base_url: &str, timeout_ms: Option<&str>) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::from_lookup(|var| match var {
        BASE_URL_VAR => Some(base_url.to_string()),
        TIMEOUT_VAR => timeout_ms.map(str::to_string),
        _ => None,
    })?;
    Ok(config)
}

/// Reject tip fields the chosen transport would silently leave out.
fn unsent_fields(transport: TipTransport, phone: bool, photos: bool) -> Option<&'static str> {
    if transport.carries_contact_details() {
        return None;
    }
    match (phone, photos) {
        (false, false) => None,
        (true, false) => Some("--phone requires --multipart"),
        (false, true) => Some("--photo requires --multipart"),
        (true, true) => Some("--phone and --photo require --multipart"),
    }
}

async fn cmd_search<A: PersonsApi + ?Sized>(
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    query: PersonSearch,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let controller = SearchController::open(api, notifier, query).await;
    let state = controller.state();
    if state.error.is_some() {
        return Ok(ExitCode::FAILURE);
    }

    if json {
        let p = &state.pagination;
        let out = serde_json::json!({
            "content": state.persons,
            "totalElements": p.total_elements,
            "totalPages": p.total_pages,
            "number": p.current_page,
            "size": p.size,
            "first": p.first,
            "last": p.last,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        display::print_person_list(&state.persons, &state.pagination);
    }
    Ok(ExitCode::SUCCESS)
}

async fn cmd_show<A: PersonsApi + ?Sized>(
    api: Arc<A>,
    notifier: Arc<dyn Notifier>,
    raw_id: &str,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let Some(id) = parse_person_id(raw_id) else {
        eprintln!("Identificador inválido: {raw_id}");
        return Ok(ExitCode::FAILURE);
    };
    let mut controller = DetailController::new(api, notifier);
    controller.show(Some(id)).await;

    let Some(person) = controller.state().person.as_ref() else {
        return Ok(ExitCode::FAILURE);
    };
    print_person(person, json)?;
    Ok(ExitCode::SUCCESS)
}

fn print_person(person: &Person, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(person)?);
    } else {
        display::print_person_card(person);
    }
    Ok(())
}

async fn cmd_tip<A: PersonsApi + ?Sized>(api: &A, form: &mut TipForm) -> anyhow::Result<ExitCode> {
    match form.submit(api).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(TipError::Validation(errors)) => {
            for error in &errors.errors {
                eprintln!("✗ {}", error.message);
            }
            Ok(ExitCode::FAILURE)
        }
        // Already reported through the notifier.
        Err(TipError::Api(_)) => Ok(ExitCode::FAILURE),
    }
}

async fn cmd_stats<A: PersonsApi + ?Sized>(api: &A, json: bool) -> anyhow::Result<ExitCode> {
    let stats = api
        .get_statistics()
        .await
        .map_err(|e| anyhow::anyhow!("{} (status {})", e.message, e.status))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        display::print_statistics(&stats);
    }
    Ok(ExitCode::SUCCESS)
}

fn load_photo(path: &Path) -> anyhow::Result<Photo> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(photo_from_bytes(path, data))
}

/// Name the photo after the file and guess its type from the extension.
fn photo_from_bytes(path: &Path, data: Vec<u8>) -> Photo {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();
    Photo::new(file_name, mime_type.essence_str(), data)
}
