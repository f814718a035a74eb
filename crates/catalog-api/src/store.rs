//! In-memory catalog storage.
//!
//! Persistence proper is outside this service's trust-boundary concerns;
//! the store still honors the envelope contract's failure semantics
//! (expected misses surface as errors, never as corrupted state).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: u32,
    pub coupon_code: String,
    pub discount_amount: f64,
    pub min_amount: f64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("record not found")]
    NotFound,

    #[error("a coupon with this code already exists")]
    DuplicateCode,

    #[error("store fault: {0}")]
    StoreFault(String),
}

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<u32, Product>,
    coupons: HashMap<u32, Coupon>,
    next_product_id: u32,
    next_coupon_id: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<Inner>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, CatalogError> {
        self.inner
            .write()
            .map_err(|_| CatalogError::StoreFault("store lock poisoned".to_string()))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, CatalogError> {
        self.inner
            .read()
            .map_err(|_| CatalogError::StoreFault("store lock poisoned".to_string()))
    }

    pub fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let inner = self.read()?;
        let mut products: Vec<Product> = inner.products.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    pub fn get_product(&self, id: u32) -> Result<Product, CatalogError> {
        self.read()?
            .products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    pub fn create_product(
        &self,
        name: String,
        price: f64,
        description: String,
        category_name: String,
    ) -> Result<Product, CatalogError> {
        let mut inner = self.write()?;
        inner.next_product_id += 1;
        let product = Product {
            id: inner.next_product_id,
            name,
            price,
            description,
            category_name,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn update_product(&self, product: Product) -> Result<Product, CatalogError> {
        let mut inner = self.write()?;
        if !inner.products.contains_key(&product.id) {
            return Err(CatalogError::NotFound);
        }
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn delete_product(&self, id: u32) -> Result<(), CatalogError> {
        let mut inner = self.write()?;
        inner
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::NotFound)
    }

    pub fn list_coupons(&self) -> Result<Vec<Coupon>, CatalogError> {
        let inner = self.read()?;
        let mut coupons: Vec<Coupon> = inner.coupons.values().cloned().collect();
        coupons.sort_by_key(|c| c.id);
        Ok(coupons)
    }

    pub fn get_coupon(&self, id: u32) -> Result<Coupon, CatalogError> {
        self.read()?
            .coupons
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    /// Case-insensitive lookup by coupon code.
    pub fn coupon_by_code(&self, code: &str) -> Result<Coupon, CatalogError> {
        let inner = self.read()?;
        inner
            .coupons
            .values()
            .find(|c| c.coupon_code.eq_ignore_ascii_case(code))
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    pub fn create_coupon(
        &self,
        coupon_code: String,
        discount_amount: f64,
        min_amount: f64,
    ) -> Result<Coupon, CatalogError> {
        let mut inner = self.write()?;
        if inner
            .coupons
            .values()
            .any(|c| c.coupon_code.eq_ignore_ascii_case(&coupon_code))
        {
            return Err(CatalogError::DuplicateCode);
        }
        inner.next_coupon_id += 1;
        let coupon = Coupon {
            id: inner.next_coupon_id,
            coupon_code,
            discount_amount,
            min_amount,
        };
        inner.coupons.insert(coupon.id, coupon.clone());
        Ok(coupon)
    }

    pub fn update_coupon(&self, coupon: Coupon) -> Result<Coupon, CatalogError> {
        let mut inner = self.write()?;
        if !inner.coupons.contains_key(&coupon.id) {
            return Err(CatalogError::NotFound);
        }
        if inner
            .coupons
            .values()
            .any(|c| c.id != coupon.id && c.coupon_code.eq_ignore_ascii_case(&coupon.coupon_code))
        {
            return Err(CatalogError::DuplicateCode);
        }
        inner.coupons.insert(coupon.id, coupon.clone());
        Ok(coupon)
    }

    pub fn delete_coupon(&self, id: u32) -> Result<(), CatalogError> {
        let mut inner = self.write()?;
        inner
            .coupons
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::NotFound)
    }
}
