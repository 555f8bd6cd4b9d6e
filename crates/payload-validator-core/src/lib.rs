//! Payload Validator Core
//!
//! Schema-driven validation of request payloads. A schema is supplied with
//! every request as a JSON object mapping field names to rule sets:
//!
//! ```json
//! {
//!     "name":  {"type": "string", "required": true, "min_length": 2, "max_length": 40},
//!     "age":   {"type": "number", "min": "18", "range_message": "Adults only"},
//!     "email": {"type": "email", "required": true},
//!     "tags":  {"type": "array"}
//! }
//! ```
//!
//! ## Architecture
//!
//! 1. **Rules** (`rules`): typed view of a rule set, numeric bound coercion,
//!    and the closed set of field types.
//!
//! 2. **Engine** (`engine`): the rule compiler turns a schema into one check
//!    plan per field; the evaluator runs every plan against a payload and
//!    collects every failure.
//!
//! 3. **Report** (`report`): verdict, per-field messages in schema order, and
//!    the normalized payload.
//!
//! 4. **Cache** (`cache`): optional append-only store of compiled schemas
//!    keyed by fingerprint.
//!
//! Schema misconfiguration is the only error ([`SchemaError`]); anything wrong
//! with the payload is reported, never raised.
//!
//! ## Example
//!
//! ```rust
//! use payload_validator_core::compile;
//! use serde_json::json;
//!
//! let compiled = compile(&json!({
//!     "age": {"type": "number", "min": 5, "max": 10},
//!     "active": {"type": "boolean"}
//! }))
//! .unwrap();
//!
//! let payload = json!({"age": 12, "active": "1"});
//! let report = compiled.evaluate(payload.as_object().unwrap());
//!
//! assert!(!report.valid);
//! assert_eq!(report.errors.get("age").unwrap(), &["age must be between 5 and 10!"]);
//! assert_eq!(report.normalized["active"], json!(true));
//! ```

pub mod cache;
pub mod engine;
pub mod error;
pub mod report;
pub mod rules;

pub use cache::{fingerprint, SchemaCache};
pub use engine::{compile, evaluate, validate, Check, CheckPlan, CompiledSchema};
pub use error::SchemaError;
pub use report::{FieldError, FieldErrors, ValidationReport};
pub use rules::{Bound, FieldType, RuleSet};
