// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # IOS Reconcile
//!
//! Declarative, idempotent configuration of Cisco IOS L2VPN and VLAN
//! features.
//!
//! ## Overview
//!
//! A task document names a resource, a state and the wanted configuration.
//! The engine compares that wanted tree with the configuration parsed from
//! the device and produces the ordered list of CLI commands that moves the
//! device to the wanted state:
//!
//! - `merged` adds and changes without removing anything else
//! - `replaced` makes each listed block match exactly
//! - `deleted` removes what was asked for (or everything)
//! - `rendered` emits commands without looking at a device
//! - `gathered` and `parsed` turn device text into structured config
//!
//! ## Architecture
//!
//! 1. **Want**: validated and normalized from the task document
//! 2. **Have**: parsed from device text by a line grammar
//! 3. **Reconciler**: walks a static field table per resource and renders
//!    command templates from the per-field decisions
//!
//! ## Modules
//!
//! - [`config`]: Task documents, parameter schemas and validation
//! - [`device`]: Device text grammar and parser
//! - [`planner`]: Field tables, decisions, templates and command plans
//! - [`reconciler`]: The mode-driven comparison engine
//! - [`resources`]: The five resource declarations
//! - [`tree`]: Configuration values and keyed entities
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! resource: l2vpn_evpn_ptp
//! state: merged
//! config:
//!   - instance: 10
//!     rd: "1:1"
//!     route_target_import: ["10:10"]
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod planner;
pub mod reconciler;
pub mod resources;
pub mod tree;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigValidator, DocumentParser, Mode, TaskDocument};
pub use device::DeviceParser;
pub use error::{ReconError, Result};
pub use planner::{Command, CommandPlan};
pub use reconciler::{Reconciler, RunOutcome};
pub use resources::{Resource, ResourceKind};
pub use tree::{ConfigTree, EntityKey, Value};
