pub mod access;
pub mod product_guard;
