//! Categories, products and product images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoop_core::{CategoryId, ImageId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Editable category fields.
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub sort_order: i64,
    pub is_active: bool,
}

/// An image attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    pub alt_text: String,
    pub sort_order: i64,
    pub is_primary: bool,
}

/// A stored upload to attach to a product.
///
/// Position and primary flag are assigned when the image is attached.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub url: String,
    pub alt_text: String,
}

/// A catalog product with its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub original_price: Price,
    pub sale_price: Price,
    /// Empty when the product has no SKU.
    pub sku: String,
    pub stock: i64,
    pub category_id: Option<CategoryId>,
    /// Name of the category, when it still exists.
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub is_active: bool,
    pub is_featured: bool,
    /// Live images ordered by `sort_order`.
    pub images: Vec<ProductImage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The price a customer pays.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        Price::effective(self.original_price, self.sale_price)
    }

    /// Truncated discount percent of the sale price against the original.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        Price::discount_percent(self.original_price, self.sale_price)
    }

    /// Whether a real discount applies.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_percent() > 0
    }

    /// The primary image, falling back to the first one.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|image| image.is_primary)
            .or_else(|| self.images.first())
    }
}

/// Editable product fields.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub original_price: Price,
    pub sale_price: Price,
    pub sku: String,
    pub stock: i64,
    pub category_id: Option<CategoryId>,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Storefront catalog filters.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub category_id: Option<CategoryId>,
    /// Substring matched against name and description.
    pub search: Option<String>,
    /// 1-based page number; zero is treated as one.
    pub page: u32,
    pub per_page: u32,
}

impl CatalogQuery {
    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(self.per_page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn image(id: &str, sort_order: i64, is_primary: bool) -> ProductImage {
        ProductImage {
            id: ImageId::new(id),
            product_id: ProductId::new("p"),
            url: format!("/uploads/products/{id}.jpg"),
            alt_text: String::new(),
            sort_order,
            is_primary,
        }
    }

    fn product(original: i64, sale: i64, images: Vec<ProductImage>) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new("p"),
            name: "Vòng tay Thạch Anh".to_owned(),
            slug: "v-ng-tay-th-ch-anh".to_owned(),
            description: String::new(),
            content: String::new(),
            original_price: Price::from_dong(original),
            sale_price: Price::from_dong(sale),
            sku: String::new(),
            stock: 0,
            category_id: None,
            category_name: None,
            category_slug: None,
            is_active: true,
            is_featured: false,
            images,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_effective_price_and_discount() {
        let p = product(2_500_000, 1_990_000, Vec::new());
        assert_eq!(p.effective_price(), Price::from_dong(1_990_000));
        assert_eq!(p.discount_percent(), 20);
        assert!(p.has_discount());

        let full = product(150_000, 0, Vec::new());
        assert_eq!(full.effective_price(), Price::from_dong(150_000));
        assert!(!full.has_discount());
    }

    #[test]
    fn test_primary_image_falls_back_to_first() {
        let p = product(1, 0, vec![image("a", 0, false), image("b", 1, true)]);
        assert_eq!(p.primary_image().unwrap().id.as_str(), "b");

        let p = product(1, 0, vec![image("a", 0, false), image("b", 1, false)]);
        assert_eq!(p.primary_image().unwrap().id.as_str(), "a");

        assert!(product(1, 0, Vec::new()).primary_image().is_none());
    }

    #[test]
    fn test_catalog_offset() {
        let q = |page| CatalogQuery {
            page,
            per_page: 12,
            ..CatalogQuery::default()
        };
        assert_eq!(q(0).offset(), 0);
        assert_eq!(q(1).offset(), 0);
        assert_eq!(q(3).offset(), 24);
    }
}
