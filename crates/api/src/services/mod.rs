//! Business logic services.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod media;
pub mod orders;
pub mod policy;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService, CartStore, CartView};
pub use catalog::{CatalogError, CatalogService};
pub use checkout::{CheckoutError, CheckoutReceipt, CheckoutService};
pub use media::{MediaError, MediaStorage};
pub use orders::OrderService;
pub use policy::{MissingProductPolicy, StockPolicy};
