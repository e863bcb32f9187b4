//! ticketbooth: box office command line
//!
//! Runs box office operations against the configured stores. The operator
//! running the binary acts as a logged-in administrator.
//!
//! ## Configuration
//! - TICKETBOOTH_CONFIG: YAML configuration file (optional)
//! - TICKETBOOTH_LOG: tracing filter (default: info)
//! - TICKETBOOTH__<SECTION>__<KEY>: overrides, e.g. TICKETBOOTH__TMDB__API_KEY

use clap::{Parser, Subcommand};
use tracing::info;

use ticketbooth::box_office::{BoxOffice, RefreshOutcome};
use ticketbooth::catalog::Catalog;
use ticketbooth::config::Config;
use ticketbooth::purchase::PurchaseRequest;
use ticketbooth::refresh::TmdbCatalogSource;
use ticketbooth::utils::bootstrap::init_tracing;
use ticketbooth::Principal;

#[derive(Parser)]
#[command(name = "ticketbooth", version, about = "Movie ticket sales")]
struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the movies on sale
    List {
        /// Only titles containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Buy tickets for a movie
    Buy {
        title: String,
        #[arg(long)]
        age: String,
        /// "sim" for a student
        #[arg(long, default_value = "nao")]
        student: String,
        #[arg(short, long, default_value = "1")]
        quantity: String,
    },
    /// Show every sale recorded
    History,
    /// Show sales statistics
    Stats,
    /// Fetch a fresh catalog from TMDB
    Refresh {
        /// Reset stock of existing titles to the configured default
        #[arg(long)]
        replace_stock: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    info!(
        storage = %config.storage.storage_type,
        data_dir = %config.storage.data_dir,
        "ticketbooth started"
    );

    let office = BoxOffice::from_config(&config.storage).await?;
    let operator = Principal::admin();

    match cli.command {
        Command::List { search } => {
            let catalog = match search {
                Some(term) => office.search(&term).await,
                None => office.catalog().await,
            };
            print_catalog(&catalog);
        }
        Command::Buy {
            title,
            age,
            student,
            quantity,
        } => {
            let request = PurchaseRequest::new(&age, &student, &quantity);
            let receipt = office.purchase(&operator, &title, &request).await?;
            println!(
                "{} x {} ({}) - total R$ {}",
                receipt.quantity,
                receipt.movie_title,
                receipt.ticket_type,
                receipt.total_display()
            );
            println!("{} tickets left", receipt.remaining_stock);
        }
        Command::History => {
            let history = office.history().await;
            for record in history.ledger.records() {
                println!(
                    "{}  {}  {} x{}  R$ {:.2}",
                    record.timestamp,
                    record.movie_title,
                    record.ticket_type,
                    record.quantity,
                    record.total
                );
            }
            let unreadable = history.ledger.unrecognized();
            if unreadable > 0 {
                println!("({} unreadable records kept)", unreadable);
            }
            println!("Total: R$ {:.2}", history.total_revenue);
        }
        Command::Stats => {
            let view = office.summary(&operator).await?;
            println!("Sales: {}", view.sales.total_sales);
            println!("Revenue: R$ {:.2}", view.sales.total_revenue);
            for (title, entry) in view.catalog.iter() {
                let sold = view.sales.sold_by_movie.get(title).copied().unwrap_or(0);
                println!("{}: {} sold, {} left", title, sold, stock_label(entry.stock));
            }
        }
        Command::Refresh { replace_stock } => {
            let source = TmdbCatalogSource::new(config.tmdb.clone(), config.catalog.clone())?;
            match office
                .refresh_catalog(&operator, &source, !replace_stock)
                .await?
            {
                RefreshOutcome::Updated { titles } => println!("Catalog updated: {} movies", titles),
                RefreshOutcome::NoUpdate => println!("No update available"),
            }
        }
    }

    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    for (title, entry) in catalog.iter() {
        let price = entry
            .price
            .map(|price| format!("R$ {:.2}", price))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} ({}) [{}] {} - {} left",
            title,
            entry.year,
            entry.genre,
            price,
            stock_label(entry.stock)
        );
    }
}

fn stock_label(stock: Option<i64>) -> String {
    stock.map_or_else(|| "?".to_string(), |stock| stock.to_string())
}
