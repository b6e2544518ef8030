//! # shop-cli
//!
//! Terminal storefront over a file-backed cart.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `shop login <token>` | Store the auth token |
//! | `shop products [-s TERM] [-c CATEGORY]` | List products |
//! | `shop categories` | List categories |
//! | `shop show <id>` | Product details |
//! | `shop add <id> [-q N]` | Add to cart |
//! | `shop update <id> <qty>` | Set quantity |
//! | `shop remove <id>` | Remove from cart |
//! | `shop cart [--json]` | Show cart and total |
//! | `shop clear` | Empty the cart |
//! | `shop checkout` | Place the order |
//! | `shop logout` | Drop token and cart |

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Command};
pub use commands::App;
pub use config::ShopConfig;
