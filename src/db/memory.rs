// src/db/memory.rs

//! Store em memória para os testes. Mesma semântica do Postgres, sem
//! persistência, com falhas de escrita programáveis.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        auth::User,
        inventory::{Item, NewItem},
        kits::{Kit, NewKit},
        sales::{NewSale, Sale},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    items: Vec<Item>,
    kits: Vec<Kit>,
    // Mais recente primeiro, como o ORDER BY created_at DESC
    sales: Vec<Sale>,
    users: Vec<User>,
    failing_items: HashSet<Uuid>,
    fail_writes: bool,
    fail_sales: bool,
}

fn injected(what: &str) -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("falha simulada em {what}"))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Faz toda atualização de quantidade deste item falhar.
    pub fn fail_updates_for(&self, id: Uuid) {
        self.inner.write().unwrap().failing_items.insert(id);
    }

    /// Liga/desliga falha em todas as escritas.
    pub fn fail_writes(&self, on: bool) {
        self.inner.write().unwrap().fail_writes = on;
    }

    /// Faz só a gravação de vendas falhar.
    pub fn fail_sales(&self, on: bool) {
        self.inner.write().unwrap().fail_sales = on;
    }

    pub fn item(&self, id: Uuid) -> Option<Item> {
        self.inner.read().unwrap().items.iter().find(|i| i.id == id).cloned()
    }

    pub fn sales(&self) -> Vec<Sale> {
        self.inner.read().unwrap().sales.clone()
    }

    pub fn kits(&self) -> Vec<Kit> {
        self.inner.read().unwrap().kits.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        let mut items = self.inner.read().unwrap().items.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    async fn insert_item(&self, item: &NewItem) -> Result<Item, AppError> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_writes {
            return Err(injected("insert_item"));
        }
        let created = Item {
            id: Uuid::new_v4(),
            name: item.name.clone(),
            category: item.category,
            quantity: item.quantity,
            min_stock: item.min_stock,
            price: item.price,
        };
        inner.items.push(created.clone());
        Ok(created)
    }

    async fn update_item_quantity(&self, id: Uuid, quantity: i32) -> Result<(), AppError> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_writes || inner.failing_items.contains(&id) {
            return Err(injected("update_item_quantity"));
        }
        let item = inner
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(AppError::ItemNotFound(id))?;
        item.quantity = quantity;
        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_writes {
            return Err(injected("delete_item"));
        }
        let before = inner.items.len();
        inner.items.retain(|i| i.id != id);
        if inner.items.len() == before {
            return Err(AppError::ItemNotFound(id));
        }
        Ok(())
    }

    async fn list_kits(&self) -> Result<Vec<Kit>, AppError> {
        let mut kits = self.inner.read().unwrap().kits.clone();
        kits.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(kits)
    }

    async fn insert_kit(&self, kit: &NewKit) -> Result<Kit, AppError> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_writes {
            return Err(injected("insert_kit"));
        }
        let created = Kit {
            id: Uuid::new_v4(),
            name: kit.name.clone(),
            price: kit.price,
            contents: kit.contents.clone(),
        };
        inner.kits.push(created.clone());
        Ok(created)
    }

    async fn delete_kit(&self, id: Uuid) -> Result<(), AppError> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_writes {
            return Err(injected("delete_kit"));
        }
        let before = inner.kits.len();
        inner.kits.retain(|k| k.id != id);
        if inner.kits.len() == before {
            return Err(AppError::KitNotFound(id));
        }
        Ok(())
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        Ok(self.inner.read().unwrap().sales.clone())
    }

    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale, AppError> {
        let mut inner = self.inner.write().unwrap();
        if inner.fail_writes || inner.fail_sales {
            return Err(injected("insert_sale"));
        }
        let created = Sale {
            id: Uuid::new_v4(),
            item_id: sale.item_id,
            item_name: sale.item_name.clone(),
            price: sale.price,
            date: sale.date,
            created_at: Utc::now(),
        };
        inner.sales.insert(0, created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut inner = self.inner.write().unwrap();
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}
