//! storefront - drive a live storefront's widgets from the terminal
//!
//! Each subcommand builds one page session against the configured backend,
//! performs a single interaction and prints what the page would show.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use storefront_sync::{
    ActionButton, ActionOutcome, DomEvent, Entity, FilterForm, HttpBackend, MemoryPage,
    NavigationOutcome, Settings, Storefront, TerminalRenderer,
};

/// Storefront widget driver
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Storefront base URL (overrides the config file)
    #[arg(long, global = true, env = "STOREFRONT_BASE_URL")]
    base_url: Option<String>,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSRF token to expose through the page's meta tag
    #[arg(long, global = true, env = "STOREFRONT_CSRF_TOKEN")]
    csrf_token: Option<String>,

    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long, global = true)]
    debug: bool,

    /// Enable verbose logging (equivalent to RUST_LOG=trace)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Type a query into the search box and list the suggestions
    Suggest { query: String },

    /// Open the quick-view modal for a product
    QuickView { product_id: String },

    /// Click a cart, wishlist or comparison button
    Action {
        entity: Entity,
        /// Backend verb, e.g. add, remove, toggle
        verb: String,
        product_id: String,
        #[arg(long)]
        quantity: Option<u32>,
    },

    /// Submit the catalog filter form
    Browse {
        /// Catalog path the form lives on (defaults to the search path)
        #[arg(long)]
        path: Option<String>,
        /// Form fields as key=value, in form order
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Determine log level from args or env
    let default_filter = if args.verbose {
        "trace"
    } else if args.debug {
        "debug"
    } else {
        "warn" // Quiet by default for normal use
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load_default().context("loading settings")?,
    };
    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let succeeded = runtime.block_on(run(args, settings))?;
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: Args, settings: Settings) -> anyhow::Result<bool> {
    let backend = Arc::new(HttpBackend::new(&settings)?);
    tracing::debug!(base = %backend.base_url(), "backend ready");

    let start_path = match &args.command {
        Command::Browse { path: Some(path), .. } => path.clone(),
        _ => settings.search_path.clone(),
    };
    let mut page = MemoryPage::new(start_path).with_container(&settings.content_container_id, "");
    if let Some(token) = &args.csrf_token {
        page = page.with_meta(&settings.csrf_meta_name, token);
    }
    let page = Arc::new(page);

    let storefront = Storefront::new(backend, page.clone(), &settings);
    let renderer = TerminalRenderer::new();
    let mut tap = storefront.bus().tap();

    let succeeded = match args.command {
        Command::Suggest { query } => {
            let search = storefront.search();
            search.set_query(query).await;
            for suggestion in search.suggestions() {
                match &suggestion.price {
                    Some(price) => println!("{}\t{}", suggestion.name, price),
                    None => println!("{}", suggestion.name),
                }
            }
            true
        }
        Command::QuickView { product_id } => {
            let loader = storefront.quick_view();
            loader.on_selection_changed(Some(product_id.as_str())).await;
            match loader.product() {
                Some(product) => {
                    println!("{}", product.name);
                    if let Some(label) = product.price.as_ref().and_then(|p| p.label()) {
                        println!("{label}");
                    }
                    for image in &product.images {
                        println!("{image}");
                    }
                    true
                }
                None => false,
            }
        }
        Command::Action {
            entity,
            verb,
            product_id,
            quantity,
        } => {
            let mut extra = Map::new();
            if let Some(quantity) = quantity {
                extra.insert("quantity".to_string(), Value::from(quantity));
            }
            let button = ActionButton::new(product_id);
            let outcome = storefront
                .actions()
                .perform_action(&button, entity, &verb, extra)
                .await;
            tracing::debug!(?outcome, "action finished");
            matches!(outcome, ActionOutcome::Applied { .. })
        }
        Command::Browse { fields, .. } => {
            let form = fields
                .into_iter()
                .fold(FilterForm::new(), |form, (k, v)| form.field(k, v));
            let mut submit = DomEvent::new();
            match storefront.catalog().apply_filters(&mut submit, &form).await {
                NavigationOutcome::Swapped => {
                    if let Some(html) = page.container(&settings.content_container_id) {
                        println!("{html}");
                    }
                    true
                }
                NavigationOutcome::Reloaded => {
                    for url in page.navigations() {
                        eprintln!("full reload: {url}");
                    }
                    false
                }
                NavigationOutcome::Superseded => false,
            }
        }
    };

    renderer.drain(&mut std::io::stderr(), &mut tap)?;
    Ok(succeeded)
}
