//! Domain models returned by the repositories.
//!
//! Row types stay private to each repository module; these are the
//! validated shapes handed to the web crates.

pub mod account;
pub mod catalog;
pub mod content;
pub mod order;

pub use account::{AdminUser, NewAdminUser, NewUser, User};
pub use catalog::{
    CatalogQuery, Category, CategoryInput, NewImage, Product, ProductImage, ProductInput,
};
pub use content::{
    AboutPage, AboutPageInput, Banner, BannerInput, CompanyInfo, CompanyInfoInput, SeoBanner,
    SeoBannerInput,
};
pub use order::{NewOrder, NewOrderItem, Order, OrderDetail, OrderItem, OrderSummary};
