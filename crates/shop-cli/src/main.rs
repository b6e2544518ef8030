//! # shop
//!
//! Terminal storefront with a persistent cart.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: where the cart and token live, and which catalog to use
//! export SHOP_DATA_DIR=~/.shop
//! export SHOP_CATALOG=config/products.toml
//!
//! shop login eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...
//! shop products --category electronics
//! shop add 9 --quantity 2
//! shop cart
//! shop checkout
//! ```

use clap::Parser;
use shop_cli::{App, Cli, ShopConfig};
use shop_core::{FileStorage, Session};
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ShopConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(path) = cli.catalog {
        config = config.with_catalog_path(path);
    }
    debug!(?config, "configuration loaded");

    let catalog = config.load_catalog()?;
    let storage = FileStorage::open(&config.data_dir)?;
    let mut app = App::new(Session::open(storage), catalog);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.execute(cli.command, &mut out)
}
