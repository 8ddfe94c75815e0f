// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # ADI Integration Tests
//!
//! Integration tests for the ADI node model, with shared fixtures,
//! builders, assertions and mocks.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Schemas and configuration documents
//!   - `builders`: Fluent configuration builders
//!   - `assertions`: Node and state-machine assertions
//!   - `mocks`: Counting method handlers
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p adi-tests
//!
//! # Run specific test suite
//! cargo test -p adi-tests --test integration_core
//! cargo test -p adi-tests --test integration_model
//! cargo test -p adi-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Core Tests (`integration_core.rs`)
//! - Lazy materialization and slot identity
//! - Variable type safety and change masks
//! - Method argument checking
//! - State-machine state sets
//!
//! ### Model Tests (`integration_model.rs`)
//! - ADI object types and typed wrappers
//! - Channel commands and acquisitions
//!
//! ### Config Tests (`integration_config.rs`)
//! - Configuration files to address spaces
//! - External schema files
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use adi_tests::prelude::*;
//!
//! #[test]
//! fn test_something() {
//!     let space = SchemaFixtures::space(SchemaFixtures::machine());
//!     let machine = space.instantiate("MachineStateType", "Machine1", None).unwrap();
//!     // ... test logic
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, temp_test_dir, write_temp_file};
}
