//! In-process storage backend.
//!
//! A single [`MemoryDatabase`] implements every repository trait so that
//! cross-table effects (deleting a product detaches its order items) behave
//! the same as in `PostgreSQL`. Data lives only as long as the process.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use minishop_core::{AccountId, Email, OrderId, OrderItemId, PrincipalKind, ProductId};

use super::{CatalogRepository, CredentialRepository, OrderRepository, RepositoryError};
use crate::models::{
    Account, DailyOrderCount, NewAccount, NewOrder, NewOrderItem, NewProduct, Order, OrderItem,
    OrderWithItems, Product, ProductChanges, StoredCredential,
};

/// Sequential ID allocator matching `SERIAL` semantics.
#[derive(Debug, Default)]
struct Sequence(i32);

impl Sequence {
    fn next(&mut self) -> i32 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
struct AccountTable {
    seq: Sequence,
    rows: BTreeMap<AccountId, StoredCredential>,
}

#[derive(Debug, Default)]
struct Tables {
    product_seq: Sequence,
    products: BTreeMap<ProductId, Product>,
    order_seq: Sequence,
    orders: BTreeMap<OrderId, Order>,
    item_seq: Sequence,
    items: BTreeMap<OrderItemId, OrderItem>,
    accounts: HashMap<PrincipalKind, AccountTable>,
}

impl Tables {
    fn items_for(&self, order_id: OrderId) -> Vec<OrderItem> {
        self.items
            .values()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect()
    }
}

/// Thread-safe in-memory database.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

impl MemoryDatabase {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CatalogRepository for MemoryDatabase {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.lock().products.values().cloned().collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.lock().products.get(&id).cloned())
    }

    async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.lock();
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(tables.product_seq.next()),
            name: new.name,
            price: new.price,
            description: new.description,
            image: None,
            image_url: new.image_url,
            stock: new.stock,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.lock();
        let product = tables
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        changes.apply_to(product);
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn set_uploaded_image(
        &self,
        id: ProductId,
        path: &str,
    ) -> Result<Product, RepositoryError> {
        let mut tables = self.lock();
        let product = tables
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        product.image = Some(path.to_owned());
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock();
        if tables.products.remove(&id).is_none() {
            return Ok(false);
        }
        for item in tables.items.values_mut() {
            if item.product_id == Some(id) {
                item.product_id = None;
            }
        }
        Ok(true)
    }

    async fn decrement_stock(
        &self,
        id: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        if let Some(product) = self.lock().products.get_mut(&id) {
            product.stock = product.stock.saturating_sub(quantity);
            product.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryDatabase {
    async fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.lock();
        let order = Order {
            id: OrderId::new(tables.order_seq.next()),
            public_id: new.public_id,
            customer_name: new.customer_name,
            customer_email: new.customer_email,
            status: new.status,
            estimated_delivery: new.estimated_delivery,
            created_at: Utc::now(),
        };
        tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn add_item(
        &self,
        order_id: OrderId,
        item: NewOrderItem,
    ) -> Result<OrderItem, RepositoryError> {
        let mut tables = self.lock();
        if !tables.orders.contains_key(&order_id) {
            return Err(RepositoryError::NotFound);
        }
        let item = OrderItem {
            id: OrderItemId::new(tables.item_seq.next()),
            order_id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            price_per_unit: item.price_per_unit,
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn list(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let tables = self.lock();
        let mut orders: Vec<&Order> = tables.orders.values().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(orders
            .into_iter()
            .map(|order| OrderWithItems {
                order: order.clone(),
                items: tables.items_for(order.id),
            })
            .collect())
    }

    async fn get_by_public_id(
        &self,
        public_id: Uuid,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let tables = self.lock();
        Ok(tables
            .orders
            .values()
            .find(|order| order.public_id == public_id)
            .map(|order| OrderWithItems {
                order: order.clone(),
                items: tables.items_for(order.id),
            }))
    }

    async fn daily_counts(&self) -> Result<Vec<DailyOrderCount>, RepositoryError> {
        let tables = self.lock();
        let mut counts = BTreeMap::new();
        for order in tables.orders.values() {
            *counts.entry(order.created_at.date_naive()).or_insert(0_i64) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(date, orders)| DailyOrderCount { date, orders })
            .collect())
    }
}

#[async_trait]
impl CredentialRepository for MemoryDatabase {
    async fn find_by_username(
        &self,
        kind: PrincipalKind,
        username: &str,
    ) -> Result<Option<StoredCredential>, RepositoryError> {
        Ok(self.lock().accounts.get(&kind).and_then(|table| {
            table
                .rows
                .values()
                .find(|c| c.account.username == username)
                .cloned()
        }))
    }

    async fn email_exists(
        &self,
        kind: PrincipalKind,
        email: &Email,
    ) -> Result<bool, RepositoryError> {
        Ok(self.lock().accounts.get(&kind).is_some_and(|table| {
            table
                .rows
                .values()
                .any(|c| c.account.email.as_ref() == Some(email))
        }))
    }

    async fn insert(
        &self,
        kind: PrincipalKind,
        new: NewAccount,
    ) -> Result<Account, RepositoryError> {
        let mut tables = self.lock();
        let table = tables.accounts.entry(kind).or_default();
        let prefix = match kind {
            PrincipalKind::Customer => "customer",
            PrincipalKind::Admin => "admin_user",
        };

        if table
            .rows
            .values()
            .any(|c| c.account.username == new.username)
        {
            return Err(RepositoryError::Conflict(format!("{prefix}_username_key")));
        }
        if new.email.is_some()
            && table
                .rows
                .values()
                .any(|c| c.account.email == new.email)
        {
            return Err(RepositoryError::Conflict(format!("{prefix}_email_key")));
        }

        let account = Account {
            kind,
            id: AccountId::new(table.seq.next()),
            username: new.username,
            email: new.email,
            created_at: Utc::now(),
        };
        table.rows.insert(
            account.id,
            StoredCredential {
                account: account.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(account)
    }

    async fn list(&self, kind: PrincipalKind) -> Result<Vec<Account>, RepositoryError> {
        Ok(self
            .lock()
            .accounts
            .get(&kind)
            .map(|table| table.rows.values().map(|c| c.account.clone()).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minishop_core::{OrderStatus, Price};
    use rust_decimal::Decimal;

    use super::*;

    fn new_item(product_id: ProductId, quantity: u32) -> NewOrderItem {
        NewOrderItem {
            product_id: Some(product_id),
            product_name: "Mouse".to_owned(),
            quantity,
            price_per_unit: Price::new(Decimal::new(2999, 2)).unwrap(),
        }
    }

    fn new_order() -> NewOrder {
        NewOrder {
            public_id: Uuid::new_v4(),
            customer_name: "Ada".to_owned(),
            customer_email: "ada@example.com".to_owned(),
            status: OrderStatus::Placed,
            estimated_delivery: None,
        }
    }

    #[tokio::test]
    async fn test_product_ids_are_sequential() {
        let db = MemoryDatabase::default();
        let a = CatalogRepository::create(&db, NewProduct::default()).await.unwrap();
        let b = CatalogRepository::create(&db, NewProduct::default()).await.unwrap();
        assert_eq!(a.id.as_i32(), 1);
        assert_eq!(b.id.as_i32(), 2);

        let listed = CatalogRepository::list(&db).await.unwrap();
        assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_decrement_stock_floors_at_zero() {
        let db = MemoryDatabase::default();
        let product = CatalogRepository::create(
            &db,
            NewProduct {
                stock: 2,
                ..NewProduct::default()
            },
        )
        .await
        .unwrap();

        db.decrement_stock(product.id, 5).await.unwrap();
        let product = CatalogRepository::get(&db, product.id).await.unwrap().unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_delete_product_detaches_order_items() {
        let db = MemoryDatabase::default();
        let product = CatalogRepository::create(&db, NewProduct::default()).await.unwrap();
        let order = db.create_order(new_order()).await.unwrap();
        db.add_item(order.id, new_item(product.id, 2)).await.unwrap();

        assert!(CatalogRepository::delete(&db, product.id).await.unwrap());
        assert!(!CatalogRepository::delete(&db, product.id).await.unwrap());

        let found = db.get_by_public_id(order.public_id).await.unwrap().unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].product_id, None);
        assert_eq!(found.items[0].product_name, "Mouse");
    }

    #[tokio::test]
    async fn test_orders_listed_newest_first() {
        let db = MemoryDatabase::default();
        let first = db.create_order(new_order()).await.unwrap();
        let second = db.create_order(new_order()).await.unwrap();

        let listed = OrderRepository::list(&db).await.unwrap();
        assert_eq!(listed[0].order.id, second.id);
        assert_eq!(listed[1].order.id, first.id);
    }

    #[tokio::test]
    async fn test_daily_counts_groups_by_day() {
        let db = MemoryDatabase::default();
        db.create_order(new_order()).await.unwrap();
        db.create_order(new_order()).await.unwrap();

        let counts = db.daily_counts().await.unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].orders, 2);
        assert_eq!(counts[0].date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_account_namespaces_are_independent() {
        let db = MemoryDatabase::default();
        let new = || NewAccount {
            username: "sam".to_owned(),
            email: Some(Email::parse("sam@example.com").unwrap()),
            password_hash: "hash".to_owned(),
        };

        db.insert(PrincipalKind::Customer, new()).await.unwrap();
        db.insert(PrincipalKind::Admin, new()).await.unwrap();

        let err = db.insert(PrincipalKind::Customer, new()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(c) if c == "customer_username_key"));

        let mut other = new();
        other.username = "alex".to_owned();
        let err = db.insert(PrincipalKind::Admin, other).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(c) if c == "admin_user_email_key"));
    }
}
