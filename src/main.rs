//! lending - command-line client for the book lending API

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lending_client::{
    config::AppConfig,
    models::{Availability, BookFilter, LoanAction, RegisterRequest},
    services::reviews::ReviewOutcome,
    view, App, AuthPage, Page,
};

#[derive(Parser)]
#[command(name = "lending")]
#[command(about = "Book Lending System - browse, borrow and return books", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Forget the current session
    Logout,
    /// Browse all books
    Books {
        /// Author name fragment
        #[arg(long, default_value = "")]
        author: String,
        /// Genre name fragment
        #[arg(long, default_value = "")]
        genre: String,
        /// Only available (true) or only borrowed (false) books
        #[arg(long)]
        available: Option<bool>,
    },
    /// Books you currently hold
    MyBooks,
    /// Books recommended for you
    Recommendations,
    /// Borrow a book
    Borrow { book_id: i64 },
    /// Return a borrowed book
    Return { book_id: i64 },
    /// List reviews of a book
    Reviews { book_id: i64 },
    /// Review a book
    Review {
        book_id: i64,
        #[arg(short, long)]
        rating: i32,
        #[arg(short, long)]
        comment: Option<String>,
    },
}

fn init_tracing(config: &AppConfig) {
    let level = &config.logging.level;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lending_client={level},lending={level}").into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn require_session(app: &App) -> Result<()> {
    if !app.authenticated() {
        bail!("Not logged in. Run `lending login` first.");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);

    tracing::debug!("Using API at {}", config.api.base_url);

    let cli = Cli::parse();
    let mut app = App::from_config(config).context("Failed to initialize client")?;

    match cli.command {
        Commands::Login { username, password } => {
            let outcome = app.login(&username, &password).await;
            match outcome.message() {
                None => println!("Logged in as {}", username),
                Some(message) => bail!("{}", message),
            }
        }
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let request = RegisterRequest {
                username,
                email,
                password,
                first_name,
                last_name,
            };
            app.switch_auth_page(AuthPage::Register);
            println!("Creating account...");
            let outcome = app.register(&request).await;
            if let Some(message) = outcome.message() {
                bail!("{}", message);
            }
            if let Some(notice) = app.auth_message() {
                println!("{}", view::notice(notice));
            }
            app.finish_registration().await;
            println!("Run `lending login` to sign in.");
        }
        Commands::Logout => {
            app.logout().await;
            println!("Logged out");
        }
        Commands::Books {
            author,
            genre,
            available,
        } => {
            require_session(&app)?;
            let filter = BookFilter::default()
                .with_author(author)
                .with_genre(genre)
                .with_availability(Availability::from(available));
            app.set_filter(filter).await;
            app.start(Page::Books).await;
            print!(
                "{}",
                view::book_page(
                    "Browse All Books",
                    &app.services().catalog.snapshot(),
                    &app.borrowed_index(),
                    true,
                    "No books found.",
                )
            );
        }
        Commands::MyBooks => {
            require_session(&app)?;
            app.start(Page::MyBooks).await;
            let state = app.services().borrowed.snapshot();
            if let Some(error) = state.error {
                bail!("{}", error);
            }
            print!("{}", view::my_books(&state.data));
        }
        Commands::Recommendations => {
            require_session(&app)?;
            app.start(Page::Recommendations).await;
            print!(
                "{}",
                view::book_page(
                    "Recommended For You",
                    &app.services().recommendations.snapshot(),
                    &app.borrowed_index(),
                    true,
                    "No recommendations available. Try borrowing some books first!",
                )
            );
        }
        Commands::Borrow { book_id } => {
            require_session(&app)?;
            app.start(Page::MyBooks).await;
            let notice = app.perform(LoanAction::Borrow, book_id).await;
            println!("{}", view::notice(&notice));
        }
        Commands::Return { book_id } => {
            require_session(&app)?;
            app.start(Page::MyBooks).await;
            let notice = app.perform(LoanAction::Return, book_id).await;
            println!("{}", view::notice(&notice));
        }
        Commands::Reviews { book_id } => {
            require_session(&app)?;
            let reviews = app.services().reviews.list(book_id).await?;
            print!("{}", view::reviews(book_id, &reviews));
        }
        Commands::Review {
            book_id,
            rating,
            comment,
        } => {
            require_session(&app)?;
            match app.services().reviews.create(book_id, rating, comment).await? {
                ReviewOutcome::Created(review) => {
                    println!("Review #{} saved", review.id)
                }
                ReviewOutcome::Rejected(message) => bail!("{}", message),
            }
        }
    }

    Ok(())
}
