//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access.
//! - Pure validation and policy functions, repository traits at the DB seam.
//! - Provides clear error types and documented interfaces.

pub mod article;
pub mod category_service;
pub mod errors;
pub mod policy;
pub mod validation;
#[cfg(test)]
pub mod test_support;
