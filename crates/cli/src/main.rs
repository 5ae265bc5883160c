//! Bookshelf CLI - back office for the bookstore from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the token is kept in BOOKSHELF_SESSION_FILE)
//! BOOKSHELF_PASSWORD=... bookshelf login -u admin
//!
//! # Browse the catalog
//! bookshelf books list --search "petit prince" --page 0 --size 20
//! bookshelf sections list --main
//!
//! # Work the order queue
//! bookshelf orders list --status pending
//! bookshelf orders status 42 shipped
//! bookshelf orders export -o orders.csv
//!
//! # Figures
//! bookshelf dashboard --period week
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKSHELF_API_URL` - Backend base URL (default `http://localhost:8080`)
//! - `BOOKSHELF_SESSION_FILE` - Where the session is stored
//! - `BOOKSHELF_LOG_JSON` - `1` for JSON logs
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use bookshelf_admin::{ApiClient, BookshelfConfig, Location, Session};
use bookshelf_core::{AuthorId, BookId, DeliveryType, OrderId, OrderStatus, PackId, SalesPeriod};
use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Context, Output};

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(author, version, about = "Bookshelf back office")]
struct Cli {
    /// Print records as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        username: String,

        /// Read from the environment so it stays out of shell history
        #[arg(long, env = "BOOKSHELF_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in administrator
    Whoami,
    /// Manage authors
    Authors {
        #[command(subcommand)]
        action: AuthorAction,
    },
    /// Manage books
    Books {
        #[command(subcommand)]
        action: BookAction,
    },
    /// Manage book packs
    Packs {
        #[command(subcommand)]
        action: PackAction,
    },
    /// Manage home page sections
    Sections {
        #[command(subcommand)]
        action: SectionAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Show dashboard figures
    Dashboard {
        /// Sales aggregation window (`week`, `month`, `year`)
        #[arg(short, long, default_value = "month")]
        period: SalesPeriod,
    },
}

/// Paging and search options shared by list commands.
#[derive(Args)]
struct ListArgs {
    /// Free-text search
    #[arg(short, long)]
    search: Option<String>,

    /// 0-indexed page
    #[arg(long)]
    page: Option<u32>,

    /// Page size
    #[arg(long)]
    size: Option<u32>,
}

#[derive(Subcommand)]
enum AuthorAction {
    /// List authors
    List(ListArgs),
    /// Delete an author
    Delete { id: AuthorId },
}

#[derive(Subcommand)]
enum BookAction {
    /// List books
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only books by this author
        #[arg(long)]
        author: Option<AuthorId>,
    },
    /// Show one book
    Show { id: BookId },
    /// Delete a book
    Delete { id: BookId },
}

#[derive(Subcommand)]
enum PackAction {
    /// List packs
    List(ListArgs),
    /// Show one pack
    Show { id: PackId },
    /// Delete a pack
    Delete { id: PackId },
}

#[derive(Subcommand)]
enum SectionAction {
    /// List sections
    List {
        /// Only the sections shown on the home page, in display order
        #[arg(long)]
        main: bool,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Show one order
    Show { id: OrderId },
    /// Move an order to a new status
    Status { id: OrderId, status: OrderStatus },
    /// Delete an order
    Delete { id: OrderId },
    /// Export orders as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Quote the delivery fee for a wilaya
    Fee {
        #[arg(short, long)]
        wilaya: String,

        /// `home` or `desk`
        #[arg(short, long, default_value = "home")]
        delivery: DeliveryType,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match BookshelfConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    init_tracing(config.log_json);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Defaults to info for our crates if `RUST_LOG` is not set.
fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookshelf_cli=info,bookshelf_admin=info".into());

    // Logs go to stderr; stdout carries command output
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli, config: BookshelfConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = Arc::new(Session::open(&config.session_file)?);

    // Login runs "from" the login page so bad credentials are reported, not
    // turned into a redirect.
    let start = match cli.command {
        Commands::Login { .. } => config.api.login_path.clone(),
        _ => "/admin".to_string(),
    };
    let location = Arc::new(Location::new(start));
    let client = ApiClient::new(config.api, session, location)?;
    let ctx = Context::new(client, Output::new(cli.json));

    match cli.command {
        Commands::Login { username, password } => {
            let password = SecretString::from(password);
            commands::auth::login(&ctx, &username, &password).await?;
        }
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Whoami => commands::auth::whoami(&ctx).await?,
        Commands::Authors { action } => match action {
            AuthorAction::List(list) => commands::catalog::list_authors(&ctx, &list.into()).await?,
            AuthorAction::Delete { id } => commands::catalog::delete_author(&ctx, id).await?,
        },
        Commands::Books { action } => match action {
            BookAction::List { list, author } => {
                let mut query: bookshelf_admin::ListQuery = list.into();
                query.author_id = author;
                commands::catalog::list_books(&ctx, &query).await?;
            }
            BookAction::Show { id } => commands::catalog::show_book(&ctx, id).await?,
            BookAction::Delete { id } => commands::catalog::delete_book(&ctx, id).await?,
        },
        Commands::Packs { action } => match action {
            PackAction::List(list) => commands::catalog::list_packs(&ctx, &list.into()).await?,
            PackAction::Show { id } => commands::catalog::show_pack(&ctx, id).await?,
            PackAction::Delete { id } => commands::catalog::delete_pack(&ctx, id).await?,
        },
        Commands::Sections { action } => match action {
            SectionAction::List { main } => commands::catalog::list_sections(&ctx, main).await?,
        },
        Commands::Orders { action } => match action {
            OrderAction::List { list, status } => {
                let mut query: bookshelf_admin::ListQuery = list.into();
                query.status = status;
                commands::orders::list(&ctx, &query).await?;
            }
            OrderAction::Show { id } => commands::orders::show(&ctx, id).await?,
            OrderAction::Status { id, status } => {
                commands::orders::set_status(&ctx, id, status).await?;
            }
            OrderAction::Delete { id } => commands::orders::delete(&ctx, id).await?,
            OrderAction::Export { output, status } => {
                let mut query = bookshelf_admin::ListQuery::new();
                query.status = status;
                commands::orders::export(&ctx, &query, output.as_deref()).await?;
            }
            OrderAction::Fee { wilaya, delivery } => {
                commands::orders::fee(&ctx, &wilaya, delivery).await?;
            }
        },
        Commands::Dashboard { period } => commands::dashboard::show(&ctx, period).await?,
    }
    Ok(())
}

impl From<ListArgs> for bookshelf_admin::ListQuery {
    fn from(args: ListArgs) -> Self {
        let mut query = Self::new();
        query.page = args.page;
        query.size = args.size;
        if let Some(search) = args.search {
            query = query.search(search);
        }
        query
    }
}
