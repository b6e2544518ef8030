//! # Product Types
//!
//! Catalog records as served by the product service, plus the search and
//! category filters the listing page applies to them.
//! A catalog can be parsed from the service's JSON payload or from
//! `config/products.toml`.

use crate::error::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Titles longer than this are shortened for cards and listings
const TITLE_DISPLAY_LIMIT: usize = 60;

/// Slack allowed when a decimal amount is scaled to cents (`109.95 * 100`
/// is not exactly `10995.0` in binary floating point)
const CENT_TOLERANCE: f64 = 1e-6;

/// Highest star rating
const MAX_STARS: usize = 5;

/// Non-negative USD price held in cents.
///
/// On the wire a price is a plain decimal number (`109.95`), which is what
/// the catalog service returns and what cart snapshots store. Amounts
/// finer than a cent are rejected rather than rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price {
    cents: u64,
}

impl Price {
    /// Zero price
    pub const ZERO: Price = Price { cents: 0 };

    /// Create a price from a decimal dollar amount
    pub fn from_decimal(amount: f64) -> ShopResult<Self> {
        if !amount.is_finite() {
            return Err(ShopError::InvalidPrice {
                message: format!("{amount} is not a finite number"),
            });
        }
        if amount < 0.0 {
            return Err(ShopError::InvalidPrice {
                message: format!("{amount} is negative"),
            });
        }
        let scaled = amount * 100.0;
        let cents = scaled.round();
        if (scaled - cents).abs() > CENT_TOLERANCE {
            return Err(ShopError::InvalidPrice {
                message: format!("{amount} is not a whole number of cents"),
            });
        }
        if cents > u64::MAX as f64 {
            return Err(ShopError::InvalidPrice {
                message: format!("{amount} is out of range"),
            });
        }
        Ok(Self {
            cents: cents as u64,
        })
    }

    /// Nearest whole-cent price for display of arbitrary amounts;
    /// negative and non-finite amounts become zero
    pub fn rounded(amount: f64) -> Self {
        if amount.is_finite() && amount > 0.0 {
            Self {
                cents: (amount * 100.0).round() as u64,
            }
        } else {
            Self::ZERO
        }
    }

    /// Create a price from cents
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Amount in cents
    pub fn cents(&self) -> u64 {
        self.cents
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Price of `quantity` units
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            cents: self.cents.saturating_mul(u64::from(quantity)),
        }
    }

    /// Format for display (e.g., "$10.00")
    pub fn display(&self) -> String {
        format!("${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl TryFrom<f64> for Price {
    type Error = ShopError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Price::from_decimal(amount)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.as_decimal()
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Self {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Customer rating summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating, 0 to 5
    #[serde(default)]
    pub rate: f64,
    /// Number of reviews
    #[serde(default)]
    pub count: u32,
}

impl Rating {
    /// Render as five stars, e.g. "★★★★☆" for 3.9
    pub fn stars(&self) -> String {
        let filled = if self.rate.is_finite() {
            self.rate.round().clamp(0.0, MAX_STARS as f64) as usize
        } else {
            0
        };
        let mut out = "★".repeat(filled);
        out.push_str(&"☆".repeat(MAX_STARS - filled));
        out
    }
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier
    pub id: u64,

    /// Display name
    pub title: String,

    /// Unit price; missing prices read as zero
    #[serde(default)]
    pub price: Price,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// Category name (e.g., "electronics")
    #[serde(default)]
    pub category: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Rating; missing ratings read as zero
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// Create a product with the fields the cart needs
    pub fn new(id: u64, title: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            rating: Rating::default(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = url.into();
        self
    }

    /// Builder: set rating
    pub fn with_rating(mut self, rate: f64, count: u32) -> Self {
        self.rating = Rating { rate, count };
        self
    }

    /// Title shortened for cards: long titles keep 57 units plus "...".
    ///
    /// Lengths are UTF-16 code units, as a browser measures `title.length`.
    /// A character that would straddle the cut is dropped whole.
    pub fn display_title(&self) -> String {
        if self.title.encode_utf16().count() <= TITLE_DISPLAY_LIMIT {
            return self.title.clone();
        }
        let budget = TITLE_DISPLAY_LIMIT - 3;
        let mut used = 0;
        let head: String = self
            .title
            .chars()
            .take_while(|c| {
                used += c.len_utf16();
                used <= budget
            })
            .collect();
        format!("{head}...")
    }
}

/// Listing filters: free-text search plus an optional category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ProductFilter {
    /// Filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the search term
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Builder: set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn category_name(&self) -> Option<&str> {
        // "" and "all" both mean every category
        self.category
            .as_deref()
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }

    /// Check whether a product passes both filters
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category_name() {
            if product.category != category {
                return false;
            }
        }
        match self.search_term() {
            Some(term) => {
                product.title.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

/// Product catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Find a product by ID or fail with `ProductNotFound`
    pub fn require(&self, id: u64) -> ShopResult<&Product> {
        self.get(id)
            .ok_or(ShopError::ProductNotFound { product_id: id })
    }

    /// Distinct categories, in the order they first appear
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            let category = product.category.as_str();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Products passing `filter`, in catalog order
    pub fn filter<'a>(&'a self, filter: &'a ProductFilter) -> impl Iterator<Item = &'a Product> {
        self.products.iter().filter(move |p| filter.matches(p))
    }

    /// Number of products
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Parse the catalog service's JSON product array
    pub fn from_json(json: &str) -> ShopResult<Self> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| ShopError::CatalogParse(e.to_string()))?;
        Ok(Self { products })
    }

    /// Load catalog from TOML string (`[[products]]` tables)
    pub fn from_toml(toml_str: &str) -> ShopResult<Self> {
        toml::from_str(toml_str).map_err(|e| ShopError::CatalogParse(e.to_string()))
    }
}
