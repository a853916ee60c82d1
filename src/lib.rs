//! Floradose library
//!
//! Persistence and reminder scheduling for plant watering care: plants
//! and dose history live in a durable key-value store, and daily
//! reminder triggers are kept in sync with each plant's configured
//! watering times.

pub mod config;
pub mod error;
pub mod ledger;
pub mod notifications;
pub mod records;
pub mod services;
pub mod storage;
