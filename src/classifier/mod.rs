//! Emotion classifier — pre-trained SVM artifact + shared lazy handle.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  SharedModel (OnceCell<SvmModel>)               │
//! │    - loads the JSON artifact at most once       │
//! │    - read-only after load, shared via &         │
//! │                    │                            │
//! │                    ▼                            │
//! │  SvmModel::predict(features)                    │
//! │    - validates feature length                   │
//! │    - one-vs-one RBF decision + majority vote    │
//! │    - returns the winning class index            │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! The artifact is opaque to the rest of the crate: the pipeline only sees
//! `predict(features) -> class index`.  No online learning, no model update —
//! classifier state is read-only after load.

pub mod shared;
pub mod svm;

pub use shared::SharedModel;
pub use svm::{ModelError, SvmModel};
