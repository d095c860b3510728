//! Product and product image repository.
//!
//! Products are always returned with their live images attached, ordered by
//! `sort_order`. Category name and slug come from a join that ignores
//! soft-deleted categories.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::instrument;

use shoop_core::{CategoryId, ImageId, Price, ProductId};

use crate::models::{CatalogQuery, NewImage, Product, ProductImage, ProductInput};
use crate::{Deleted, Page, RepositoryError};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    slug: String,
    description: String,
    content: String,
    original_price: String,
    sale_price: String,
    sku: Option<String>,
    stock: i64,
    category_id: Option<String>,
    category_name: Option<String>,
    category_slug: Option<String>,
    is_active: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let original_price = Price::parse(&row.original_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid original price in database: {e}"))
        })?;
        let sale_price = Price::parse(&row.sale_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid sale price in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            content: row.content,
            original_price,
            sale_price,
            sku: row.sku.unwrap_or_default(),
            stock: row.stock,
            category_id: row.category_id.map(CategoryId::new),
            category_name: row.category_name,
            category_slug: row.category_slug,
            is_active: row.is_active,
            is_featured: row.is_featured,
            images: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: String,
    product_id: String,
    url: String,
    alt_text: String,
    sort_order: i64,
    is_primary: bool,
}

impl From<ImageRow> for ProductImage {
    fn from(row: ImageRow) -> Self {
        Self {
            id: ImageId::new(row.id),
            product_id: ProductId::new(row.product_id),
            url: row.url,
            alt_text: row.alt_text,
            sort_order: row.sort_order,
            is_primary: row.is_primary,
        }
    }
}

const SELECT_PRODUCT: &str = "
    SELECT p.id, p.name, p.slug, p.description, p.content,
           p.original_price, p.sale_price, p.sku, p.stock, p.category_id,
           c.name AS category_name, c.slug AS category_slug,
           p.is_active, p.is_featured, p.created_at, p.updated_at, p.deleted_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id AND c.deleted_at IS NULL";

const NEWEST_FIRST: &str = "ORDER BY p.created_at DESC, p.rowid DESC";

const CATALOG_FILTER: &str = "
    WHERE p.deleted_at IS NULL AND p.is_active = 1
      AND (?1 IS NULL OR p.category_id = ?1)
      AND (?2 IS NULL OR p.name LIKE ?2 OR p.description LIKE ?2)";

fn empty_to_null(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for products and their images.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List products newest first, active or not, for the back-office.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list(&self, deleted: Deleted) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE (? OR p.deleted_at IS NULL) {NEWEST_FIRST}"
        ))
        .bind(deleted.included())
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// Active featured products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn featured(&self, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT}
             WHERE p.deleted_at IS NULL AND p.is_active = 1 AND p.is_featured = 1
             {NEWEST_FIRST} LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// Most recently created active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn latest(&self, limit: u32) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE p.deleted_at IS NULL AND p.is_active = 1 {NEWEST_FIRST} LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// One page of the storefront catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    #[instrument(skip(self))]
    pub async fn catalog(&self, query: &CatalogQuery) -> Result<Page<Product>, RepositoryError> {
        let category = query.category_id.as_ref().map(CategoryId::as_str);
        let pattern = query
            .search
            .as_deref()
            .and_then(empty_to_null)
            .map(|s| format!("%{s}%"));

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM products p {CATALOG_FILTER}"
        ))
        .bind(category)
        .bind(pattern.as_deref())
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} {CATALOG_FILTER} {NEWEST_FIRST} LIMIT ?3 OFFSET ?4"
        ))
        .bind(category)
        .bind(pattern.as_deref())
        .bind(i64::from(query.per_page))
        .bind(query.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(Page {
            items: self.hydrate(rows).await?,
            total,
            page: query.page.max(1),
            per_page: query.per_page,
        })
    }

    /// Get a product by ID, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn get_by_id(
        &self,
        id: &ProductId,
        deleted: Deleted,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE p.id = ? AND (? OR p.deleted_at IS NULL)"
        ))
        .bind(id.as_str())
        .bind(deleted.included())
        .fetch_optional(self.pool)
        .await?;

        Ok(self.hydrate(row.into_iter().collect()).await?.pop())
    }

    /// Get a live active product by ID, for adding to the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn get_active_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .get_by_id(id, Deleted::Exclude)
            .await?
            .filter(|product| product.is_active))
    }

    /// Get a live active product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn get_active_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT} WHERE p.slug = ? AND p.is_active = 1 AND p.deleted_at IS NULL"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(self.hydrate(row.into_iter().collect()).await?.pop())
    }

    /// Other active products from the same category.
    ///
    /// Products without a category have no related products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn related(
        &self,
        product: &Product,
        limit: u32,
    ) -> Result<Vec<Product>, RepositoryError> {
        let Some(category_id) = &product.category_id else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{SELECT_PRODUCT}
             WHERE p.category_id = ? AND p.id != ? AND p.is_active = 1 AND p.deleted_at IS NULL
             {NEWEST_FIRST} LIMIT ?"
        ))
        .bind(category_id.as_str())
        .bind(product.id.as_str())
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug or SKU is taken.
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(slug = %input.slug))]
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let id = ProductId::generate();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO products
                (id, name, slug, description, content, original_price, sale_price, sku, stock,
                 category_id, is_active, is_featured, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.content)
        .bind(input.original_price.amount().to_string())
        .bind(input.sale_price.amount().to_string())
        .bind(empty_to_null(&input.sku))
        .bind(input.stock)
        .bind(input.category_id.as_ref().map(CategoryId::as_str))
        .bind(input.is_active)
        .bind(input.is_featured)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "product slug or SKU"))?;

        self.get_by_id(&id, Deleted::Exclude)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update a live product. Images are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the slug or SKU is taken.
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products
             SET name = ?, slug = ?, description = ?, content = ?, original_price = ?,
                 sale_price = ?, sku = ?, stock = ?, category_id = ?, is_active = ?,
                 is_featured = ?, updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(&input.content)
        .bind(input.original_price.amount().to_string())
        .bind(input.sale_price.amount().to_string())
        .bind(empty_to_null(&input.sku))
        .bind(input.stock)
        .bind(input.category_id.as_ref().map(CategoryId::as_str))
        .bind(input.is_active)
        .bind(input.is_featured)
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "product slug or SKU"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_id(id, Deleted::Exclude)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a product together with its images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn soft_delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        sqlx::query(
            "UPDATE images SET deleted_at = ?, updated_at = ?
             WHERE product_id = ? AND deleted_at IS NULL",
        )
        .bind(now)
        .bind(now)
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

        crate::soft_delete(&mut *tx, "products", id.as_str()).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Attach uploaded images to a product.
    ///
    /// New images are appended after the existing ones. The first new image
    /// becomes primary when the product has no primary image yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, images), fields(product_id = %product_id, count = images.len()))]
    pub async fn add_images(
        &self,
        product_id: &ProductId,
        images: &[NewImage],
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM products WHERE id = ? AND deleted_at IS NULL")
                .bind(product_id.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let (existing, primaries): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(is_primary), 0) FROM images
             WHERE product_id = ? AND deleted_at IS NULL",
        )
        .bind(product_id.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let now = Utc::now();
        let mut created = Vec::with_capacity(images.len());
        for (position, image) in (existing..).zip(images) {
            let saved = ProductImage {
                id: ImageId::generate(),
                product_id: product_id.clone(),
                url: image.url.clone(),
                alt_text: image.alt_text.clone(),
                sort_order: position,
                is_primary: primaries == 0 && created.is_empty(),
            };

            sqlx::query(
                "INSERT INTO images
                    (id, product_id, url, alt_text, sort_order, is_primary, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(saved.id.as_str())
            .bind(saved.product_id.as_str())
            .bind(&saved.url)
            .bind(&saved.alt_text)
            .bind(saved.sort_order)
            .bind(saved.is_primary)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            created.push(saved);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Soft-delete a single product image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image does not exist.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_image(&self, id: &ImageId) -> Result<(), RepositoryError> {
        crate::soft_delete(self.pool, "images", id.as_str()).await
    }

    /// Count live products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Convert rows and attach each product's live images.
    async fn hydrate(&self, rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
        let mut products = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        if products.is_empty() {
            return Ok(products);
        }

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, product_id, url, alt_text, sort_order, is_primary FROM images
             WHERE deleted_at IS NULL AND product_id IN (",
        );
        let mut ids = builder.separated(", ");
        for product in &products {
            ids.push_bind(product.id.as_str().to_owned());
        }
        ids.push_unseparated(") ORDER BY sort_order ASC, created_at ASC");

        let rows = builder
            .build_query_as::<ImageRow>()
            .fetch_all(self.pool)
            .await?;

        let mut by_product: HashMap<String, Vec<ProductImage>> = HashMap::new();
        for row in rows {
            by_product
                .entry(row.product_id.clone())
                .or_default()
                .push(row.into());
        }
        for product in &mut products {
            product.images = by_product.remove(product.id.as_str()).unwrap_or_default();
        }

        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::CategoryRepository;
    use crate::models::CategoryInput;
    use crate::pool::in_memory;

    fn input(name: &str, original: i64, sale: i64) -> ProductInput {
        ProductInput {
            name: name.to_owned(),
            slug: shoop_core::slugify(name),
            description: format!("Mô tả {name}"),
            original_price: Price::from_dong(original),
            sale_price: Price::from_dong(sale),
            stock: 10,
            is_active: true,
            ..ProductInput::default()
        }
    }

    fn upload(name: &str) -> NewImage {
        NewImage {
            url: format!("/uploads/products/{name}"),
            alt_text: name.to_owned(),
        }
    }

    async fn category(pool: &SqlitePool, name: &str) -> CategoryId {
        CategoryRepository::new(pool)
            .create(&CategoryInput {
                name: name.to_owned(),
                slug: shoop_core::slugify(name),
                is_active: true,
                ..CategoryInput::default()
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_roundtrips_prices_and_category() {
        let pool = in_memory().await.unwrap();
        let cat = category(&pool, "Tuong").await;
        let repo = ProductRepository::new(&pool);

        let mut new = input("Tuong Di Lac", 2_500_000, 1_990_000);
        new.category_id = Some(cat.clone());
        new.sku = "TDL-001".to_owned();
        let product = repo.create(&new).await.unwrap();

        assert_eq!(product.original_price, Price::from_dong(2_500_000));
        assert_eq!(product.effective_price(), Price::from_dong(1_990_000));
        assert_eq!(product.category_id, Some(cat));
        assert_eq!(product.category_name.as_deref(), Some("Tuong"));
        assert_eq!(product.sku, "TDL-001");
    }

    #[tokio::test]
    async fn test_empty_sku_does_not_conflict() {
        let pool = in_memory().await.unwrap();
        let repo = ProductRepository::new(&pool);

        repo.create(&input("A", 1000, 0)).await.unwrap();
        repo.create(&input("B", 1000, 0)).await.unwrap();

        let mut dup = input("C", 1000, 0);
        dup.sku = "SKU-1".to_owned();
        repo.create(&dup).await.unwrap();
        dup.name = "D".to_owned();
        dup.slug = "d".to_owned();
        assert!(matches!(
            repo.create(&dup).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_images_attach_in_order_with_single_primary() {
        let pool = in_memory().await.unwrap();
        let repo = ProductRepository::new(&pool);
        let product = repo.create(&input("Vong Tay", 500_000, 0)).await.unwrap();

        let first = repo
            .add_images(&product.id, &[upload("a.jpg"), upload("b.jpg")])
            .await
            .unwrap();
        assert!(first.first().unwrap().is_primary);
        assert!(!first.get(1).unwrap().is_primary);

        let more = repo.add_images(&product.id, &[upload("c.jpg")]).await.unwrap();
        assert_eq!(more.first().unwrap().sort_order, 2);
        assert!(!more.first().unwrap().is_primary);

        let loaded = repo
            .get_by_id(&product.id, Deleted::Exclude)
            .await
            .unwrap()
            .unwrap();
        let urls: Vec<_> = loaded.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "/uploads/products/a.jpg",
                "/uploads/products/b.jpg",
                "/uploads/products/c.jpg"
            ]
        );
        assert_eq!(loaded.primary_image().unwrap().alt_text, "a.jpg");

        repo.delete_image(&first.first().unwrap().id).await.unwrap();
        let loaded = repo
            .get_by_id(&product.id, Deleted::Exclude)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.images.len(), 2);
        assert_eq!(loaded.primary_image().unwrap().alt_text, "b.jpg");
    }

    #[tokio::test]
    async fn test_soft_delete_product_and_images() {
        let pool = in_memory().await.unwrap();
        let repo = ProductRepository::new(&pool);
        let keep = repo.create(&input("Keep", 1000, 0)).await.unwrap();
        let gone = repo.create(&input("Gone", 1000, 0)).await.unwrap();
        repo.add_images(&gone.id, &[upload("g.jpg")]).await.unwrap();

        repo.soft_delete(&gone.id).await.unwrap();

        let live = repo.list(Deleted::Exclude).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live.first().unwrap().id, keep.id);
        assert_eq!(repo.list(Deleted::Include).await.unwrap().len(), 2);

        let deleted = repo
            .get_by_id(&gone.id, Deleted::Include)
            .await
            .unwrap()
            .unwrap();
        assert!(deleted.deleted_at.is_some());
        assert!(deleted.images.is_empty());

        let images: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM images WHERE product_id = ? AND deleted_at IS NOT NULL",
        )
        .bind(gone.id.as_str())
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(images, 1);
    }

    #[tokio::test]
    async fn test_catalog_filters_and_pages() {
        let pool = in_memory().await.unwrap();
        let tuong = category(&pool, "Tuong").await;
        let repo = ProductRepository::new(&pool);

        for i in 0..14 {
            let mut new = input(&format!("Tuong {i}"), 1000, 0);
            new.category_id = Some(tuong.clone());
            repo.create(&new).await.unwrap();
        }
        repo.create(&input("Vong Thach Anh", 1000, 0)).await.unwrap();
        let mut hidden = input("Tuong An", 1000, 0);
        hidden.is_active = false;
        repo.create(&hidden).await.unwrap();

        let page = |page, category_id: Option<CategoryId>, search: Option<&str>| CatalogQuery {
            category_id,
            search: search.map(str::to_owned),
            page,
            per_page: 12,
        };

        let all = repo.catalog(&page(1, None, None)).await.unwrap();
        assert_eq!(all.total, 15);
        assert_eq!(all.items.len(), 12);
        assert_eq!(all.total_pages(), 2);
        assert_eq!(all.items.first().unwrap().name, "Vong Thach Anh");

        let second = repo.catalog(&page(2, None, None)).await.unwrap();
        assert_eq!(second.items.len(), 3);

        let by_cat = repo.catalog(&page(1, Some(tuong), None)).await.unwrap();
        assert_eq!(by_cat.total, 14);

        let search = repo.catalog(&page(1, None, Some("thach"))).await.unwrap();
        assert_eq!(search.total, 1);

        let blank = repo.catalog(&page(1, None, Some("  "))).await.unwrap();
        assert_eq!(blank.total, 15);
    }

    #[tokio::test]
    async fn test_home_lists_and_related() {
        let pool = in_memory().await.unwrap();
        let cat = category(&pool, "Da Quy").await;
        let repo = ProductRepository::new(&pool);

        let mut ids = Vec::new();
        for i in 0..6 {
            let mut new = input(&format!("Da {i}"), 1000, 0);
            new.category_id = Some(cat.clone());
            new.is_featured = i % 2 == 0;
            ids.push(repo.create(&new).await.unwrap());
        }

        assert_eq!(repo.featured(8).await.unwrap().len(), 3);
        assert_eq!(repo.latest(4).await.unwrap().len(), 4);

        let first = ids.first().unwrap();
        let related = repo.related(first, 4).await.unwrap();
        assert_eq!(related.len(), 4);
        assert!(related.iter().all(|p| p.id != first.id));

        let found = repo.get_active_by_slug(&first.slug).await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(repo.get_active_by_slug("khong-co").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inactive_product_hidden_from_cart_lookup() {
        let pool = in_memory().await.unwrap();
        let repo = ProductRepository::new(&pool);
        let mut new = input("An", 1000, 0);
        new.is_active = false;
        let product = repo.create(&new).await.unwrap();

        assert!(repo.get_active_by_id(&product.id).await.unwrap().is_none());
        assert!(
            repo.get_by_id(&product.id, Deleted::Exclude)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let pool = in_memory().await.unwrap();
        let repo = ProductRepository::new(&pool);
        assert!(matches!(
            repo.update(&ProductId::new("missing"), &input("X", 1, 0)).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.add_images(&ProductId::new("missing"), &[upload("x.jpg")]).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
