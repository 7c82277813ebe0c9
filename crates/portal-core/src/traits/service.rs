//! Service marker trait.

/// Marker trait for business logic services.
///
/// All services in `portal-service` implement this trait so they can be
/// held behind `Arc` and shared across tasks.
pub trait Service: Send + Sync + 'static {}
