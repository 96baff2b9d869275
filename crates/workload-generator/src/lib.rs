//! Request generator for the order-workload driver.
//!
//! This crate provides the [`OrderGenerator`], which draws synthetic
//! [`OrderRequest`](workload_core::OrderRequest) values from bounded ranges.
//!
//! # Architecture
//!
//! ```text
//!  OrderBounds + seed
//!        │
//!        ▼
//! ┌──────────────────┐
//! │  OrderGenerator  │
//! │                  │
//! │  - bounds        │
//! │  - rng (StdRng)  │
//! │  - issued        │
//! └────────┬─────────┘
//!          │
//!          ▼
//!    OrderRequest { customer_id, product_id, quantity }
//! ```
//!
//! Every execution context owns its own generator. Contexts never share an
//! RNG, so draws are uncontended and, given a base seed, reproducible:
//! context `i` is seeded with `base_seed + i`.
//!
//! # Example
//!
//! ```rust
//! use workload_core::OrderBounds;
//! use workload_generator::OrderGenerator;
//!
//! let bounds = OrderBounds::new(10, 10).unwrap();
//! let mut generator = OrderGenerator::for_context(bounds, Some(42), 0);
//! let request = generator.next_request();
//! assert!(request.is_within(&bounds));
//! ```

pub mod generator;

pub use generator::OrderGenerator;
