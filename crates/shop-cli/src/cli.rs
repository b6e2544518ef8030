//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Terminal storefront with a persistent cart")]
pub struct Cli {
    /// Directory holding the cart snapshot and session token
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Product catalog file (.json or .toml)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List products, optionally filtered
    Products {
        /// Match against title or description
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category ("all" for every category)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List product categories
    Categories,
    /// Show one product
    Show {
        /// Product ID
        id: u64,
    },
    /// Add a product to the cart
    Add {
        /// Product ID
        id: u64,

        /// How many to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Set the quantity of a cart line
    Update {
        /// Product ID
        id: u64,

        /// New quantity (must be positive)
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: u64,
    },
    /// Show the cart
    Cart {
        /// Print the cart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Empty the cart
    Clear,
    /// Place the order and empty the cart
    Checkout,
    /// Store the token issued by the auth service
    Login {
        /// Opaque session token
        token: String,
    },
    /// Forget the token and the cart
    Logout,
}

impl Command {
    /// Commands that work without a session token
    pub fn is_public(&self) -> bool {
        matches!(self, Command::Login { .. } | Command::Logout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_defaults_to_one() {
        let cli = Cli::try_parse_from(["shop", "add", "3"]).unwrap();
        assert_eq!(cli.command, Command::Add { id: 3, quantity: 1 });
    }

    #[test]
    fn test_parse_negative_update() {
        let cli = Cli::try_parse_from(["shop", "update", "3", "-1"]).unwrap();
        assert_eq!(cli.command, Command::Update { id: 3, quantity: -1 });
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "shop",
            "products",
            "--category",
            "electronics",
            "--data-dir",
            "/tmp/shop",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/shop")));
        assert_eq!(
            cli.command,
            Command::Products {
                search: None,
                category: Some("electronics".to_string())
            }
        );
    }

    #[test]
    fn test_public_commands() {
        assert!(Command::Logout.is_public());
        assert!(Command::Login { token: "t".into() }.is_public());
        assert!(!Command::Checkout.is_public());
    }
}
