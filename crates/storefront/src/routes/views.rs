//! Display structs shared by storefront templates.

use shoop_db::models::{Banner, Product};

/// Image used when a product has no uploads.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.jpg";

/// Product card / detail data with prices already formatted.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub content: String,
    /// Effective price, formatted.
    pub price: String,
    /// Original price, formatted, when a discount applies.
    pub original_price: Option<String>,
    /// Rounded discount for the badge; zero hides it.
    pub discount_percent: u32,
    pub image: String,
    pub images: Vec<ImageView>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub sku: String,
    pub stock: i64,
}

/// Image display data for templates.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let has_discount = product.has_discount();
        Self {
            id: product.id.to_string(),
            slug: product.slug.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            content: product.content.clone(),
            price: product.effective_price().display_vnd(),
            original_price: has_discount.then(|| product.original_price.display_vnd()),
            discount_percent: if has_discount {
                shoop_core::Price::discount_percent_rounded(
                    product.original_price,
                    product.sale_price,
                )
            } else {
                0
            },
            image: cover_image(product),
            images: product
                .images
                .iter()
                .map(|image| ImageView {
                    url: image.url.clone(),
                    alt: if image.alt_text.is_empty() {
                        product.name.clone()
                    } else {
                        image.alt_text.clone()
                    },
                })
                .collect(),
            category_name: product.category_name.clone(),
            category_slug: product.category_slug.clone(),
            sku: product.sku.clone(),
            stock: product.stock,
        }
    }
}

impl ProductView {
    /// Map a list of products.
    #[must_use]
    pub fn list(products: &[Product]) -> Vec<Self> {
        products.iter().map(Self::from).collect()
    }
}

/// Primary image URL, else the first image, else the placeholder.
#[must_use]
pub fn cover_image(product: &Product) -> String {
    product
        .primary_image()
        .map_or_else(|| PLACEHOLDER_IMAGE.to_owned(), |image| image.url.clone())
}

/// Home carousel slide.
#[derive(Debug, Clone)]
pub struct BannerView {
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub link: String,
}

impl From<&Banner> for BannerView {
    fn from(banner: &Banner) -> Self {
        Self {
            title: banner.title.clone(),
            subtitle: banner.subtitle.clone(),
            image: banner.image.clone(),
            link: banner.link.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shoop_core::{ImageId, Price, ProductId};
    use shoop_db::models::ProductImage;

    use super::*;

    fn product(original: i64, sale: i64, images: Vec<ProductImage>) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new("p1"),
            name: "Tượng Di Lặc".to_owned(),
            slug: "tuong-di-lac".to_owned(),
            description: String::new(),
            content: String::new(),
            original_price: Price::from_dong(original),
            sale_price: Price::from_dong(sale),
            sku: String::new(),
            stock: 1,
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

    fn image(url: &str, is_primary: bool) -> ProductImage {
        ProductImage {
            id: ImageId::generate(),
            product_id: ProductId::new("p1"),
            url: url.to_owned(),
            alt_text: String::new(),
            sort_order: 0,
            is_primary,
        }
    }

    #[test]
    fn test_discounted_product_view() {
        let view = ProductView::from(&product(3_000_000, 2_450_000, Vec::new()));
        assert_eq!(view.price, "2.450.000₫");
        assert_eq!(view.original_price.as_deref(), Some("3.000.000₫"));
        assert_eq!(view.discount_percent, 18);
        assert_eq!(view.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_undiscounted_product_view() {
        let view = ProductView::from(&product(150_000, 0, Vec::new()));
        assert_eq!(view.price, "150.000₫");
        assert!(view.original_price.is_none());
        assert_eq!(view.discount_percent, 0);
    }

    #[test]
    fn test_cover_image_prefers_primary() {
        let p = product(1, 0, vec![image("/a.jpg", false), image("/b.jpg", true)]);
        assert_eq!(cover_image(&p), "/b.jpg");

        let p = product(1, 0, vec![image("/a.jpg", false)]);
        assert_eq!(cover_image(&p), "/a.jpg");
        assert_eq!(ProductView::from(&p).images.first().unwrap().alt, "Tượng Di Lặc");
    }
}
