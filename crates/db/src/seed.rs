//! Demo data for a fresh database.
//!
//! Each group is only inserted when its table has no live rows, so running
//! the seeder again is a no-op.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, instrument};

use shoop_core::{AdminRole, Email, PasswordError, Price, hash_password};

use crate::models::{
    AboutPageInput, BannerInput, CategoryInput, CompanyInfoInput, NewAdminUser, ProductInput,
};
use crate::{
    AboutPageRepository, AdminUserRepository, BannerRepository, CategoryRepository,
    CompanyInfoRepository, Deleted, ProductRepository, RepositoryError,
};

/// Login of the seeded back-office account.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@occ.io.vn";
/// Password of the seeded back-office account.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Errors from seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to hash seed password: {0}")]
    Password(#[from] PasswordError),

    #[error("invalid seed email: {0}")]
    Email(#[from] shoop_core::EmailError),
}

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub admin: bool,
    pub company: bool,
    pub about: bool,
    pub categories: usize,
    pub products: usize,
    pub banners: usize,
}

impl SeedSummary {
    /// Whether anything was inserted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.admin
            && !self.company
            && !self.about
            && self.categories == 0
            && self.products == 0
            && self.banners == 0
    }
}

struct SeedCategory {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
}

const CATEGORIES: [SeedCategory; 5] = [
    SeedCategory {
        name: "Tượng Phong Thủy",
        slug: "tuong-phong-thuy",
        description: "Các loại tượng phong thủy mang lại may mắn",
    },
    SeedCategory {
        name: "Vòng Tay Phong Thủy",
        slug: "vong-tay-phong-thuy",
        description: "Vòng tay đá phong thủy hợp mệnh",
    },
    SeedCategory {
        name: "Đá Phong Thủy",
        slug: "da-phong-thuy",
        description: "Đá quý phong thủy tự nhiên",
    },
    SeedCategory {
        name: "Cây Phong Thủy",
        slug: "cay-phong-thuy",
        description: "Cây cảnh phong thủy cho không gian sống",
    },
    SeedCategory {
        name: "Tranh Phong Thủy",
        slug: "tranh-phong-thuy",
        description: "Tranh phong thủy trang trí nội thất",
    },
];

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    original: i64,
    sale: i64,
    sku: &'static str,
    stock: i64,
    /// Index into `CATEGORIES`.
    category: usize,
    featured: bool,
}

const PRODUCTS: [SeedProduct; 10] = [
    SeedProduct {
        name: "Tượng Phật Di Lặc Ngọc Bích",
        slug: "tuong-phat-di-lac-ngoc-bich",
        description: "Tượng Phật Di Lặc bằng ngọc bích tự nhiên, mang lại may mắn và tài lộc",
        original: 2_500_000,
        sale: 1_990_000,
        sku: "TPT-001",
        stock: 15,
        category: 0,
        featured: true,
    },
    SeedProduct {
        name: "Tượng Tỳ Hưu Vàng",
        slug: "tuong-ty-huu-vang",
        description: "Tỳ Hưu vàng phong thủy chiêu tài lộc",
        original: 3_200_000,
        sale: 2_690_000,
        sku: "TPT-002",
        stock: 10,
        category: 0,
        featured: true,
    },
    SeedProduct {
        name: "Vòng Tay Thạch Anh Hồng",
        slug: "vong-tay-thach-anh-hong",
        description: "Vòng tay thạch anh hồng tự nhiên, hợp mệnh Hỏa",
        original: 850_000,
        sale: 650_000,
        sku: "VT-001",
        stock: 30,
        category: 1,
        featured: true,
    },
    SeedProduct {
        name: "Vòng Tay Mắt Hổ",
        slug: "vong-tay-mat-ho",
        description: "Vòng tay đá mắt hổ mang lại sức mạnh và bảo vệ",
        original: 750_000,
        sale: 590_000,
        sku: "VT-002",
        stock: 25,
        category: 1,
        featured: false,
    },
    SeedProduct {
        name: "Thạch Anh Tím Tự Nhiên",
        slug: "thach-anh-tim-tu-nhien",
        description: "Khối thạch anh tím tự nhiên, thanh lọc năng lượng",
        original: 4_500_000,
        sale: 3_800_000,
        sku: "DA-001",
        stock: 5,
        category: 2,
        featured: true,
    },
    SeedProduct {
        name: "Đá Fluorite Cầu Vồng",
        slug: "da-fluorite-cau-vong",
        description: "Đá Fluorite nhiều màu sắc, tăng cường trí tuệ",
        original: 1_200_000,
        sale: 980_000,
        sku: "DA-002",
        stock: 12,
        category: 2,
        featured: false,
    },
    SeedProduct {
        name: "Cây Kim Tiền Phong Thủy",
        slug: "cay-kim-tien-phong-thuy",
        description: "Cây kim tiền mang lại tài lộc cho gia chủ",
        original: 500_000,
        sale: 420_000,
        sku: "CT-001",
        stock: 20,
        category: 3,
        featured: true,
    },
    SeedProduct {
        name: "Cây Lưỡi Hổ",
        slug: "cay-luoi-ho",
        description: "Cây lưỡi hổ thanh lọc không khí, hút tài lộc",
        original: 350_000,
        sale: 0,
        sku: "CT-002",
        stock: 18,
        category: 3,
        featured: false,
    },
    SeedProduct {
        name: "Tranh Mã Đáo Thành Công",
        slug: "tranh-ma-dao-thanh-cong",
        description: "Tranh ngựa phong thủy mang lại thành công",
        original: 1_800_000,
        sale: 1_500_000,
        sku: "TR-001",
        stock: 8,
        category: 4,
        featured: true,
    },
    SeedProduct {
        name: "Tranh Cửu Ngư Quần Hội",
        slug: "tranh-cuu-ngu-quan-hoi",
        description: "Tranh 9 con cá phong thủy, biểu tượng thịnh vượng",
        original: 2_200_000,
        sale: 1_850_000,
        sku: "TR-002",
        stock: 6,
        category: 4,
        featured: false,
    },
];

const BANNERS: [(&str, &str, &str, &str); 3] = [
    (
        "Phong Thủy Cho Mọi Nhà",
        "Khám phá bộ sưu tập phong thủy độc đáo",
        "/static/images/banners/banner1.jpg",
        "/products",
    ),
    (
        "Giảm Giá Đến 30%",
        "Ưu đãi đặc biệt cho sản phẩm phong thủy",
        "/static/images/banners/banner2.jpg",
        "/products",
    ),
    (
        "Vòng Tay Phong Thủy",
        "Bộ sưu tập vòng tay đá quý mới nhất",
        "/static/images/banners/banner3.jpg",
        "/products?category=vong-tay-phong-thuy",
    ),
];

const ABOUT_CONTENT: &str = "<p>OCC.IO.VN chuyên cung cấp các sản phẩm phong thủy chất lượng \
cao, mang đến sự hài hòa và may mắn cho không gian sống của bạn.</p><p>Với hơn 10 năm kinh \
nghiệm, chúng tôi tự hào là địa chỉ uy tín hàng đầu trong lĩnh vực phong thủy.</p>";

/// Insert demo data into every empty table.
///
/// # Errors
///
/// Returns `SeedError` if a write fails. Groups seeded before the failure
/// are kept.
#[instrument(skip(pool))]
pub async fn seed(pool: &SqlitePool) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary {
        admin: seed_admin(pool).await?,
        ..SeedSummary::default()
    };

    let company = CompanyInfoRepository::new(pool);
    if company.get().await?.is_none() {
        company
            .save(&CompanyInfoInput {
                name: "OCC.IO.VN".to_owned(),
                tagline: "Phong Thủy - Hài Hòa Năng Lượng".to_owned(),
                email: "contact@occ.io.vn".to_owned(),
                phone: "0909 123 456".to_owned(),
                address: "123 Nguyễn Huệ, Quận 1, TP.HCM".to_owned(),
                copyright: "© 2026 OCC.IO.VN. All rights reserved.".to_owned(),
                ..CompanyInfoInput::default()
            })
            .await?;
        summary.company = true;
    }

    let about = AboutPageRepository::new(pool);
    if about.get().await?.is_none() {
        about
            .save(&AboutPageInput {
                title: "Về Chúng Tôi".to_owned(),
                content: ABOUT_CONTENT.to_owned(),
                image: String::new(),
            })
            .await?;
        summary.about = true;
    }

    summary.categories = seed_categories(pool).await?;
    summary.products = seed_products(pool).await?;
    summary.banners = seed_banners(pool).await?;

    if summary.is_empty() {
        info!("Database already seeded");
    } else {
        info!(?summary, "Seeding completed");
    }
    Ok(summary)
}

async fn seed_admin(pool: &SqlitePool) -> Result<bool, SeedError> {
    let admins = AdminUserRepository::new(pool);
    if admins.count().await? > 0 {
        return Ok(false);
    }

    admins
        .create(&NewAdminUser {
            email: Email::parse(DEFAULT_ADMIN_EMAIL)?,
            password_hash: hash_password(DEFAULT_ADMIN_PASSWORD)?,
            name: "Super Admin".to_owned(),
            role: AdminRole::SuperAdmin,
            is_active: true,
        })
        .await?;
    info!(email = DEFAULT_ADMIN_EMAIL, "Seeded admin user");
    Ok(true)
}

async fn seed_categories(pool: &SqlitePool) -> Result<usize, SeedError> {
    let categories = CategoryRepository::new(pool);
    if categories.count().await? > 0 {
        return Ok(0);
    }

    for (sort_order, category) in (1..).zip(&CATEGORIES) {
        categories
            .create(&CategoryInput {
                name: category.name.to_owned(),
                slug: category.slug.to_owned(),
                description: category.description.to_owned(),
                image: String::new(),
                sort_order,
                is_active: true,
            })
            .await?;
    }
    Ok(CATEGORIES.len())
}

async fn seed_products(pool: &SqlitePool) -> Result<usize, SeedError> {
    let products = ProductRepository::new(pool);
    if products.count().await? > 0 {
        return Ok(0);
    }

    let categories = CategoryRepository::new(pool).list(Deleted::Exclude).await?;
    if categories.is_empty() {
        return Ok(0);
    }

    for product in &PRODUCTS {
        let category_id = CATEGORIES
            .get(product.category)
            .and_then(|seed| categories.iter().find(|c| c.slug == seed.slug))
            .map(|c| c.id.clone());

        products
            .create(&ProductInput {
                name: product.name.to_owned(),
                slug: product.slug.to_owned(),
                description: product.description.to_owned(),
                content: String::new(),
                original_price: Price::from_dong(product.original),
                sale_price: Price::from_dong(product.sale),
                sku: product.sku.to_owned(),
                stock: product.stock,
                category_id,
                is_active: true,
                is_featured: product.featured,
            })
            .await?;
    }
    Ok(PRODUCTS.len())
}

async fn seed_banners(pool: &SqlitePool) -> Result<usize, SeedError> {
    let banners = BannerRepository::new(pool);
    if !banners.list(Deleted::Exclude).await?.is_empty() {
        return Ok(0);
    }

    for (sort_order, (title, subtitle, image, link)) in (1..).zip(BANNERS) {
        banners
            .create(&BannerInput {
                title: title.to_owned(),
                subtitle: subtitle.to_owned(),
                image: image.to_owned(),
                link: link.to_owned(),
                sort_order,
                is_active: true,
            })
            .await?;
    }
    Ok(BANNERS.len())
}
