//! Binding Module - named resources exposed to worker scripts
//!
//! - `model`: config types (Binding, BindingKind, BindingsMap)
//! - `resolve`: provider-backed resolution (BindingValue, WorkerEnv)
//! - `validate`: binding name checks
//!
//! Data flow:
//! ```text
//! config `bindings:` block → BindingsMap (model)
//!                                ↓
//!                  resolve(binding, providers)
//!                                ↓
//!                    WorkerEnv (name → value)
//!                                ↓
//!              module `env` object / script globals
//! ```

mod model;
mod resolve;
mod validate;

pub use model::{Binding, BindingKind, BindingsMap};
pub use resolve::{resolve, resolve_raw, BindingValue, ResolvedValue, WorkerEnv};
pub use validate::validate_binding_name;
