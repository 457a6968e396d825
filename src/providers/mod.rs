//! Remote data source implementations.
//!
//! The panel core talks to the outside world only through the
//! [`RemoteSource`] trait. The [`graph`] module provides the shipped
//! adapter, a thin binding onto a Microsoft Graph-style REST surface.

pub mod graph;
mod traits;

pub use graph::GraphSource;
pub use traits::{ItemPatch, ProviderError, RemoteSource, Result};
