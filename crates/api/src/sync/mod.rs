//! Mapping of storefront entities onto local rows.
//!
//! - [`customer`] -- customers to users, plus login-time user resolution.
//! - [`catalog`] -- products to courses.
//! - [`order`] -- orders to enrollments with paired progress records.
//!
//! Every write here is idempotent so webhook redelivery is always safe.

pub mod catalog;
pub mod customer;
pub mod order;
