use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};

use storage_console::helpers::{REDACTED_PASSWORD, parse_server, validate_resource_id};
use storage_console::models::{Application, StorageResource};
use storage_console::state::{ConfigManager, ConsoleSettings, NavigationHistory, Notifier};
use storage_console::store::HttpStorageStore;
use storage_console::views::{ConsoleServices, StorageEditor, StorageListView};

const BASE_URL_ENV: &str = "STORAGE_CONSOLE_URL";

#[derive(Parser)]
#[command(name = "storage-console")]
#[command(about = "View, create and edit application storage resources")]
#[command(version)]
struct Cli {
    /// Admin API root (overrides settings and STORAGE_CONSOLE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Application owning the storage resources
    #[arg(long, global = true)]
    app: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List storage resources of an application
    List,
    /// Print one storage resource
    Show { id: String },
    /// Create a new storage resource
    Create(ResourceArgs),
    /// Update an existing storage resource
    Update(ResourceArgs),
    /// Persist console settings
    Configure {
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        default_app: Option<String>,
    },
}

#[derive(Args)]
struct ResourceArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    db: Option<String>,
    /// host[:port], repeatable; replaces the server list when given
    #[arg(long = "server")]
    servers: Vec<String>,
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    password: Option<String>,
    /// Password confirmation; must match the password
    #[arg(long)]
    confirm: Option<String>,
}

/// Prints notifications for the operator.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// Resolved application plus the collaborators every command needs.
struct Session {
    app: Application,
    store: Arc<HttpStorageStore>,
    navigator: Arc<NavigationHistory>,
}

impl Session {
    fn open(settings: &ConsoleSettings, app: Option<String>) -> Result<Self> {
        let app_id = app
            .or_else(|| settings.default_application.clone())
            .context("No application given (use --app or configure a default)")?;

        Ok(Self {
            app: Application::new(app_id, ""),
            store: Arc::new(HttpStorageStore::from_settings(settings)?),
            navigator: Arc::new(NavigationHistory::new()),
        })
    }

    fn services(&self) -> ConsoleServices<HttpStorageStore> {
        ConsoleServices::new(self.store.clone(), Arc::new(TerminalNotifier), self.navigator.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Cli { base_url, app, command } = Cli::parse();
    let config = ConfigManager::new()?;
    let mut settings = config.load_settings().unwrap_or_else(|err| {
        log::warn!("Failed to load settings, using defaults: {err:#}");
        ConsoleSettings::default()
    });
    let base_url_override = base_url.clone().or_else(|| std::env::var(BASE_URL_ENV).ok());

    match command {
        Command::Configure { timeout_secs, default_app } => {
            if let Some(base_url) = base_url {
                settings.base_url = base_url;
            }
            if let Some(timeout_secs) = timeout_secs {
                settings.request_timeout_secs = timeout_secs;
            }
            if default_app.is_some() {
                settings.default_application = default_app;
            }
            config.save_settings(&settings)?;
            println!("Saved settings to {}", config.config_dir().display());
        }
        Command::List => {
            let session = Session::open(&with_base_url(settings, base_url_override), app)?;
            let store = session.store.as_ref();
            let view =
                StorageListView::load(session.app, store, store, None, &TerminalNotifier).await?;
            for row in view.rows() {
                println!(
                    "{:<20} {:<10} {:<28} {}",
                    row.path,
                    row.provider,
                    row.endpoint(),
                    row.database
                );
            }
        }
        Command::Show { id } => {
            let session = Session::open(&with_base_url(settings, base_url_override), app)?;
            let editor = StorageEditor::load(
                session.app.clone(),
                Some(id.as_str()),
                session.services(),
                session.store.as_ref(),
            )
            .await?;
            let resource = redacted(editor.working());
            println!("{}", serde_json::to_string_pretty(&resource)?);
        }
        Command::Create(args) => {
            let session = Session::open(&with_base_url(settings, base_url_override), app)?;
            validate_resource_id(&args.id).map_err(|e| anyhow!(e))?;
            let editor = StorageEditor::open(session.app.clone(), None, session.services());
            let id = args.id.trim().to_string();
            editor.edit(|resource| resource.id = id);
            apply_args(&editor, args)?;
            editor.submit().await?;
            if let Some(location) = session.navigator.current() {
                println!("{}", location.to_url());
            }
        }
        Command::Update(args) => {
            let session = Session::open(&with_base_url(settings, base_url_override), app)?;
            let editor = StorageEditor::load(
                session.app.clone(),
                Some(args.id.trim()),
                session.services(),
                session.store.as_ref(),
            )
            .await?;
            apply_args(&editor, args)?;
            if !editor.is_dirty() {
                println!("Nothing to update");
                return Ok(());
            }
            editor.submit().await?;
        }
    }

    Ok(())
}

fn with_base_url(mut settings: ConsoleSettings, base_url: Option<String>) -> ConsoleSettings {
    if let Some(base_url) = base_url {
        settings.base_url = base_url;
    }
    settings
}

fn apply_args(editor: &StorageEditor<HttpStorageStore>, args: ResourceArgs) -> Result<()> {
    let servers = args
        .servers
        .iter()
        .map(|spec| parse_server(spec))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| anyhow!(e))?;
    if args.password.is_some() && args.confirm.is_none() {
        bail!("--password requires --confirm");
    }

    editor.edit(|resource| {
        if let Some(db) = args.db {
            resource.db = db;
        }
        if !servers.is_empty() {
            resource.servers = servers;
        }
        if args.username.is_none() && args.password.is_none() {
            return;
        }
        let credential = resource.credential_mut();
        if let Some(username) = args.username {
            credential.username = username;
        }
        if let Some(password) = args.password {
            credential.password = password;
        }
    });

    let confirmation = args.confirm.unwrap_or_else(|| editor.working().password().to_string());
    editor.set_password_confirmation(confirmation);
    Ok(())
}

fn redacted(mut resource: StorageResource) -> StorageResource {
    for credential in &mut resource.credentials {
        if !credential.password.is_empty() {
            credential.password = REDACTED_PASSWORD.to_string();
        }
    }
    resource
}
