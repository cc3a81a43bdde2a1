//! Laundry care product catalog.
//!
//! Prices are display strings (`"$10.46"`) as imported from the retailer
//! feed; sorting and cart totals parse them on the fly.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::record::{RecordError, key_or_generate, required};
use crate::csv::parse::parse_float_prefix;

/// Catalog entry as shown in the store grid and carried into carts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub api_product_id: String,
    pub product_title: String,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub description_snippet: Option<String>,
    pub main_image_url: Option<String>,
    pub product_page_url: Option<String>,
    pub stock: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewProduct {
    pub api_product_id: Option<String>,
    pub product_title: String,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub description_snippet: Option<String>,
    pub main_image_url: Option<String>,
    pub product_page_url: Option<String>,
    pub stock: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    #[default]
    NameAsc,
    NameDesc,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub sort: Option<ProductSort>,
}

const PRODUCT_COLUMNS: &str = "api_product_id, product_title, brand, price, description_snippet, \
     main_image_url, product_page_url, stock";

/// Numeric value of a display price: everything but digits, `.` and `-` is
/// dropped before parsing, so `"$1,299.00"` is 1299.
#[must_use]
pub fn parse_display_price(price: &str) -> Option<f64> {
    let cleaned: String = price.chars().filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-')).collect();
    parse_float_prefix(&cleaned)
}

fn price_of(product: &Product) -> f64 {
    product.price.as_deref().and_then(parse_display_price).unwrap_or(0.0)
}

fn compare_titles(a: &Product, b: &Product) -> Ordering {
    a.product_title
        .to_lowercase()
        .cmp(&b.product_title.to_lowercase())
        .then_with(|| a.product_title.cmp(&b.product_title))
}

impl ProductQuery {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return true;
        };
        let needle = search.to_lowercase();
        [Some(product.product_title.as_str()), product.brand.as_deref(), product.description_snippet.as_deref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Filter then sort. Unparseable prices sort as zero.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let mut result: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        match self.sort.unwrap_or_default() {
            ProductSort::PriceAsc => result.sort_by(|a, b| price_of(a).total_cmp(&price_of(b))),
            ProductSort::PriceDesc => result.sort_by(|a, b| price_of(b).total_cmp(&price_of(a))),
            ProductSort::NameAsc => result.sort_by(compare_titles),
            ProductSort::NameDesc => result.sort_by(|a, b| compare_titles(b, a)),
        }
        result
    }
}

/// Stand-in catalog served while the products table is empty.
#[must_use]
pub fn demo_products() -> Vec<Product> {
    vec![
        Product {
            api_product_id: "demo-1".into(),
            product_title: "Ajax Powder Cleanser with Bleach".into(),
            brand: Some("Ajax".into()),
            price: Some("$10.46".into()),
            description_snippet: Some("Cleans and deodorizes sinks, toilets, and more.".into()),
            main_image_url: Some("https://images.heb.com/is/image/HEBGrocery/000123456".into()),
            product_page_url: Some("#".into()),
            stock: None,
        },
        Product {
            api_product_id: "demo-2".into(),
            product_title: "Tide Liquid Laundry Detergent".into(),
            brand: Some("Tide".into()),
            price: Some("$15.99".into()),
            description_snippet: Some("Powerful clean, fresh scent.".into()),
            main_image_url: Some("https://images.heb.com/is/image/HEBGrocery/000654321".into()),
            product_page_url: Some("#".into()),
            stock: None,
        },
    ]
}

/// Whole catalog, or the demo catalog when the table has no rows.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>, RecordError> {
    let rows = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM laundry_care_products ORDER BY product_title"
    ))
    .fetch_all(pool)
    .await?;

    if rows.is_empty() {
        tracing::debug!("product catalog empty; serving demo products");
        return Ok(demo_products());
    }
    Ok(rows)
}

/// Catalog lookup used by carts. Demo products resolve while the table is
/// empty so the demo catalog stays purchasable.
///
/// # Errors
///
/// Returns [`RecordError::NotFound`] for an unknown product.
pub async fn get_product(pool: &PgPool, api_product_id: &str) -> Result<Product, RecordError> {
    let row = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM laundry_care_products WHERE api_product_id = $1"
    ))
    .bind(api_product_id)
    .fetch_optional(pool)
    .await?;

    if let Some(row) = row {
        return Ok(row);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM laundry_care_products").fetch_one(pool).await?;
    if count == 0 {
        if let Some(demo) = demo_products().into_iter().find(|p| p.api_product_id == api_product_id) {
            return Ok(demo);
        }
    }
    Err(RecordError::NotFound(format!("product {api_product_id}")))
}

/// # Errors
///
/// Returns [`RecordError::Invalid`] for a blank title, or a database error.
pub async fn create_product(pool: &PgPool, new: NewProduct) -> Result<Product, RecordError> {
    let product_title = required("product_title", &new.product_title)?;
    let api_product_id = key_or_generate(new.api_product_id);

    let row = sqlx::query_as::<_, Product>(&format!(
        r"INSERT INTO laundry_care_products (
              api_product_id, product_title, brand, price, description_snippet,
              main_image_url, product_page_url, stock
          ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
          RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&api_product_id)
    .bind(&product_title)
    .bind(new.brand)
    .bind(new.price)
    .bind(new.description_snippet)
    .bind(new.main_image_url)
    .bind(new.product_page_url)
    .bind(new.stock)
    .fetch_one(pool)
    .await?;

    tracing::info!(%api_product_id, "product created");
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;

    fn titles(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.product_title.as_str()).collect()
    }

    #[test]
    fn display_prices_parse_past_currency_symbols() {
        assert_eq!(parse_display_price("$10.46"), Some(10.46));
        assert_eq!(parse_display_price("USD 1,299.00"), Some(1299.0));
        assert_eq!(parse_display_price("free"), None);
    }

    #[test]
    fn default_sort_is_name_ascending() {
        let products = vec![fixtures::product("p2", "tide pods", "$5"), fixtures::product("p1", "Ajax", "$9")];
        let sorted = ProductQuery::default().apply(products);
        assert_eq!(titles(&sorted), ["Ajax", "tide pods"]);
    }

    #[test]
    fn price_sorts_treat_unparseable_as_zero() {
        let products = vec![
            fixtures::product("a", "A", "$15.99"),
            fixtures::product("b", "B", "call us"),
            fixtures::product("c", "C", "$10.46"),
        ];
        let asc = ProductQuery { sort: Some(ProductSort::PriceAsc), ..ProductQuery::default() }.apply(products.clone());
        assert_eq!(titles(&asc), ["B", "C", "A"]);
        let desc = ProductQuery { sort: Some(ProductSort::PriceDesc), ..ProductQuery::default() }.apply(products);
        assert_eq!(titles(&desc), ["A", "C", "B"]);
    }

    #[test]
    fn search_covers_title_brand_and_description() {
        let query = ProductQuery { search: Some("DEODOR".into()), ..ProductQuery::default() };
        let hits = query.apply(demo_products());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].api_product_id, "demo-1");

        let query = ProductQuery { search: Some("tide".into()), ..ProductQuery::default() };
        assert_eq!(query.apply(demo_products())[0].api_product_id, "demo-2");
    }

    #[test]
    fn sort_names_deserialize_from_query_strings() {
        let sort: ProductSort = serde_json::from_str("\"price-desc\"").unwrap();
        assert_eq!(sort, ProductSort::PriceDesc);
        assert!(serde_json::from_str::<ProductSort>("\"cheapest\"").is_err());
    }
}
