//! Domain models for the Minishop API.
//!
//! These types represent validated domain objects separate from database row
//! types and from the JSON shapes returned by the routes.

pub mod account;
pub mod order;
pub mod product;
pub mod session;

pub use account::{Account, NewAccount, StoredCredential};
pub use order::{DailyOrderCount, NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems};
pub use product::{MAX_STOCK, NewProduct, Product, ProductChanges};
pub use session::keys as session_keys;
