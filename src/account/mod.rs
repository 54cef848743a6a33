//! The user account resource: model, serializer and traced view.

pub mod models;
pub mod serializers;
pub mod views;

pub use models::User;
pub use serializers::USER_SERIALIZER;
pub use views::{UserView, UserViewContext, ViewHandler, USER_VIEW_HOOKS};
