//! `Clearword` Core — accessibility preferences, users, text operations, and request validation.
//!
//! This crate holds the domain model shared by the server: typed payloads for
//! each text operation, the validation rules that turn untyped JSON bodies into
//! those payloads, and the preference/user records kept by the store. It does
//! no I/O.

pub mod operation;
pub mod preferences;
pub mod user;
pub mod validation;

pub use operation::{OperationKind, TextOperation, TranslateRequest};
pub use preferences::{PreferencesPatch, UserId, UserPreferences};
pub use user::User;
pub use validation::{validate_operation, ValidationError};
