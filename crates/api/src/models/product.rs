//! Product domain types.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use minishop_core::{Price, ProductId};

/// Largest stock count a product can hold (the `INTEGER` column range).
pub const MAX_STOCK: u32 = i32::MAX.unsigned_abs();

fn bounded_stock(stock: u32) -> Result<u32, String> {
    if stock > MAX_STOCK {
        return Err(format!("stock cannot exceed {MAX_STOCK} (got {stock})"));
    }
    Ok(stock)
}

fn deserialize_stock<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    bounded_stock(u32::deserialize(deserializer)?).map_err(D::Error::custom)
}

fn deserialize_stock_change<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    Option::<u32>::deserialize(deserializer)?
        .map(bounded_stock)
        .transpose()
        .map_err(D::Error::custom)
}

/// A catalog product (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Sequential product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Free-form description.
    pub description: String,
    /// Uploaded image, as a path relative to the media root.
    pub image: Option<String>,
    /// External image URL; empty when not set.
    pub image_url: String,
    /// Units available.
    pub stock: u32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Public URL of the uploaded image, if one was uploaded.
    #[must_use]
    pub fn uploaded_image_url(&self, media_url: &str) -> Option<String> {
        self.image
            .as_deref()
            .map(|path| format!("{media_url}{path}"))
    }

    /// The image to display: the uploaded file if present, otherwise the
    /// external URL, otherwise none.
    #[must_use]
    pub fn display_image_url(&self, media_url: &str) -> Option<String> {
        self.uploaded_image_url(media_url).or_else(|| {
            if self.image_url.is_empty() {
                None
            } else {
                Some(self.image_url.clone())
            }
        })
    }

    /// Whether any units are available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Fields for a new product. Omitted fields take the catalog defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image_url: String,
    #[serde(deserialize_with = "deserialize_stock")]
    pub stock: u32,
}

impl Default for NewProduct {
    fn default() -> Self {
        Self {
            name: "New Product".to_owned(),
            price: Price::ZERO,
            description: String::new(),
            image_url: String::new(),
            stock: 0,
        }
    }
}

/// Partial product update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(deserialize_with = "deserialize_stock_change")]
    pub stock: Option<u32>,
}

impl ProductChanges {
    /// Apply the present fields to `product`.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Mouse".to_owned(),
            price: Price::ZERO,
            description: String::new(),
            image: None,
            image_url: String::new(),
            stock: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_image_prefers_upload() {
        let mut p = product();
        p.image_url = "https://cdn.example.com/mouse.png".to_owned();
        assert_eq!(
            p.display_image_url("/media/").as_deref(),
            Some("https://cdn.example.com/mouse.png")
        );

        p.image = Some("products/abc-mouse.png".to_owned());
        assert_eq!(
            p.display_image_url("/media/").as_deref(),
            Some("/media/products/abc-mouse.png")
        );
        // External URL is retained underneath.
        assert_eq!(p.image_url, "https://cdn.example.com/mouse.png");
    }

    #[test]
    fn test_display_image_none_when_unset() {
        assert_eq!(product().display_image_url("/media/"), None);
    }

    #[test]
    fn test_new_product_defaults() {
        let new: NewProduct = serde_json::from_str("{}").unwrap();
        assert_eq!(new, NewProduct::default());
        assert_eq!(new.name, "New Product");
    }

    #[test]
    fn test_changes_apply_only_present_fields() {
        let mut p = product();
        let changes: ProductChanges = serde_json::from_str(r#"{"stock": 4}"#).unwrap();
        changes.apply_to(&mut p);
        assert_eq!(p.stock, 4);
        assert_eq!(p.name, "Mouse");
    }

    #[test]
    fn test_negative_stock_is_rejected_on_input() {
        assert!(serde_json::from_str::<ProductChanges>(r#"{"stock": -1}"#).is_err());
    }

    #[test]
    fn test_stock_must_fit_storage() {
        let at_limit = format!(r#"{{"stock": {MAX_STOCK}}}"#);
        let new: NewProduct = serde_json::from_str(&at_limit).unwrap();
        assert_eq!(new.stock, MAX_STOCK);
        assert!(serde_json::from_str::<ProductChanges>(&at_limit).is_ok());

        let err = serde_json::from_str::<NewProduct>(r#"{"stock": 3000000000}"#).unwrap_err();
        assert!(err.to_string().contains("stock cannot exceed"));
        assert!(serde_json::from_str::<ProductChanges>(r#"{"stock": 3000000000}"#).is_err());

        let cleared: ProductChanges = serde_json::from_str(r#"{"stock": null}"#).unwrap();
        assert_eq!(cleared.stock, None);
    }
}
