//! Fitting Room CLI - shopper shell for the try-on storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! fitting-room products
//!
//! # Build a cart and upload a photo
//! fitting-room cart add shirt_check
//! fitting-room photo set ./me.jpg
//!
//! # Try on everything in the cart and keep the results
//! fitting-room try-on --save
//!
//! # Review saved results
//! fitting-room gallery list
//! ```
//!
//! # Environment Variables
//!
//! - `FITTING_ROOM_API_URL` - Storefront API base URL
//! - `FITTING_ROOM_DATA_DIR` - Directory for the persisted cart, photo and gallery
//! - `RUST_LOG` - Log filter (default `fitting_room=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use fitting_room_core::SavedFitId;
use fitting_room_storefront::{ClientConfig, Session, TracingNotifier};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "fitting-room")]
#[command(author, version, about = "Fitting Room virtual try-on shell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog
    Products,
    /// Show one catalog product
    Product {
        /// Product ID
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the photo used for try-ons
    Photo {
        #[command(subcommand)]
        action: PhotoAction,
    },
    /// Try cart products on the stored photo
    TryOn {
        /// Product IDs to try on (default: every product in the cart)
        ids: Vec<String>,

        /// Save successful results to the gallery
        #[arg(short, long)]
        save: bool,
    },
    /// Manage saved try-on results
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart contents and subtotal
    List,
    /// Add a catalog product to the cart
    Add {
        /// Product ID
        id: String,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum PhotoAction {
    /// Use an image file (png, jpeg or webp) as the photo
    Set {
        /// Path to the image
        path: PathBuf,
    },
    /// Remove the stored photo
    Clear,
    /// Show the stored photo
    Show,
}

#[derive(Subcommand)]
enum GalleryAction {
    /// List saved results, newest first
    List,
    /// Delete a saved result
    Delete {
        /// Gallery entry ID
        id: SavedFitId,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fitting_room=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        // Notices already told the shopper what went wrong.
        if !e.already_notified() {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let mut session = Session::open(config, Arc::new(TracingNotifier))?;

    match cli.command {
        Commands::Products => commands::products::list(&session).await,
        Commands::Product { id } => commands::products::show(&session, &id.into()).await?,
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&session),
            CartAction::Add { id } => commands::cart::add(&mut session, &id.into()).await?,
            CartAction::Remove { id } => commands::cart::remove(&mut session, &id.into()),
        },
        Commands::Photo { action } => match action {
            PhotoAction::Set { path } => commands::photo::set(&mut session, &path).await?,
            PhotoAction::Clear => commands::photo::clear(&mut session),
            PhotoAction::Show => commands::photo::show(&session),
        },
        Commands::TryOn { ids, save } => {
            let ids: Vec<_> = ids.into_iter().map(Into::into).collect();
            commands::try_on::run(&mut session, ids, save).await?;
        }
        Commands::Gallery { action } => match action {
            GalleryAction::List => commands::gallery::list(&session),
            GalleryAction::Delete { id } => commands::gallery::delete(&mut session, id),
        },
    }
    Ok(())
}
