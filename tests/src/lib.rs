//! # Action-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Full message flows through the keeper
//!     ├── cascade.rs
//!     ├── sense.rs
//!     ├── expiration.rs
//!     └── queries.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ac-tests
//!
//! # One scenario group
//! cargo test -p ac-tests integration::sense::
//!
//! # Benchmarks
//! cargo bench -p ac-tests
//! ```

pub mod integration;
