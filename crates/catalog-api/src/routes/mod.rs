pub mod coupons;
pub mod products;
