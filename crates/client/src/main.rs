use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use resourcehub_client::{
    ClientConfig, DocumentType, ListOptions, NewSavedFolder, ResourceHub, ResourceKind, Role,
    SaveOutcome, SavedFolderId, UploadRequest,
};

#[derive(Parser)]
#[command(author, version, about = "Resource hub command-line client")]
struct Cli {
    /// Backend base URL (overrides RESOURCE_HUB_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides RESOURCE_HUB_STORAGE)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup { email: String, password: String },
    /// Sign in with an existing account
    Login { email: String, password: String },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List departments
    Departments,
    /// List records of one kind
    List {
        kind: ResourceKind,
        /// Department slug
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Document type (pdf, word, excel, powerpoint, image, archive)
        #[arg(long = "type")]
        document_type: Option<DocumentType>,
    },
    /// Upload a file into a department folder
    Upload {
        kind: ResourceKind,
        department: String,
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    /// Manage saved folders
    Library {
        #[command(subcommand)]
        action: Option<LibraryAction>,
    },
}

#[derive(Subcommand)]
enum LibraryAction {
    List,
    Save { department: String, kind: ResourceKind },
    Remove { id: String },
    Refresh { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    resourcehub_observability::init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(path) = cli.storage {
        config = config.with_storage_path(path);
    }

    let hub = ResourceHub::new(config).context("failed to initialise client")?;
    hub.session().hydrate();

    run(&hub, cli.command).await
}

async fn run(hub: &ResourceHub, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Signup { email, password } => {
            let user = hub.session().signup(&email, &password).await?;
            println!("Signed up as {}", user.email);
        }
        Commands::Login { email, password } => {
            let user = hub.session().login(&email, &password).await?;
            println!("Signed in as {}", user.email);
        }
        Commands::Logout => {
            hub.session().logout().await;
            println!("Signed out");
        }
        Commands::Whoami => match hub.session().user() {
            Some(user) => {
                let role = user.role.as_deref().unwrap_or(Role::Visitor.as_str());
                println!("{} ({role})", user.email);
            }
            None => println!("Not signed in"),
        },
        Commands::Departments => {
            for department in hub.departments().list().await? {
                println!("{:<16} {}", department.slug, department.name);
            }
        }
        Commands::List {
            kind,
            department,
            search,
            page,
            limit,
            document_type,
        } => {
            let options = ListOptions {
                search,
                page,
                limit,
                document_type,
                ..ListOptions::default()
            };
            let service = hub.resources(kind);
            let page = match department {
                Some(slug) => {
                    let department = hub.departments().by_slug(&slug).await?;
                    service.list_by_department(&department.id, options).await?
                }
                None => service.list(&options).await?,
            };

            for record in &page.records {
                let doc = record
                    .document_type()
                    .map(|t| t.as_str())
                    .unwrap_or("-");
                println!("{:<26} {:<10} {}", record.id.as_str(), doc, record.title);
            }
            match &page.pagination {
                Some(p) => println!("page {}/{} ({} total)", p.page, p.pages, p.total),
                None => println!("{} record(s)", page.count),
            }
        }
        Commands::Upload {
            kind,
            department,
            file,
            title,
        } => {
            hub.guard().require(Role::Member, "upload a file")?;
            let department = hub.departments().by_slug(&department).await?;
            let request = UploadRequest::from_path(department.id, &file, title).await?;
            let record = hub.uploads().upload(kind, request).await?;
            println!("Uploaded {} ({})", record.title, record.id);
        }
        Commands::Library { action } => library(hub, action.unwrap_or(LibraryAction::List)).await?,
    }
    Ok(())
}

async fn library(hub: &ResourceHub, action: LibraryAction) -> anyhow::Result<()> {
    hub.guard().require(Role::Visitor, "use your library")?;
    let registry = hub.saved_folders();

    match action {
        LibraryAction::List => {
            let folders = registry.list().await?;
            if folders.is_empty() {
                println!("Your library is empty");
            }
            for folder in folders {
                println!(
                    "{:<26} {:<20} {:<10} {} item(s)",
                    folder.id.as_str(),
                    folder.department_name,
                    folder.folder_kind.as_str(),
                    folder.item_count
                );
            }
        }
        LibraryAction::Save { department, kind } => {
            let department = hub.departments().by_slug(&department).await?;
            let folder = NewSavedFolder::for_department(&department, kind);
            match registry.save_if_absent(&folder).await? {
                SaveOutcome::Saved(saved) => println!("Saved {} {} ({})", department.name, kind, saved.id),
                SaveOutcome::AlreadySaved(_) => println!("{} {} is already in your library", department.name, kind),
            }
        }
        LibraryAction::Remove { id } => {
            registry.remove(&SavedFolderId::new(id)).await?;
            println!("Removed");
        }
        LibraryAction::Refresh { id } => {
            let folder = registry.refresh_count(&SavedFolderId::new(id)).await?;
            println!("{} item(s)", folder.item_count);
        }
    }
    Ok(())
}
