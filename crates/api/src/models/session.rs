//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for the shopping cart (`{"<product id>": quantity}`).
    pub const CART: &str = "cart";
}
