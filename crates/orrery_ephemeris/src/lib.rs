//! Ephemeris data sources and the routing layer in front of them.
//!
//! - [`EphemerisProvider`]: the contract every data source implements
//! - [`AnalyticProvider`]: mean-element Keplerian provider for the Sun,
//!   planets, Pluto and the Moon
//! - [`EphemerisStrategy`]: provider registry plus per-body priorities
//! - [`EphemerisRouter`]: stateless dispatcher answering state queries
//! - [`conformance`]: contract checks runnable against any provider

pub mod analytic;
pub mod bodies;
pub mod conformance;
pub mod provider;
pub mod router;
pub mod state;
pub mod strategy;

pub use analytic::{ANALYTIC_PROVIDER_ID, AnalyticProvider};
pub use bodies::{BodyDefinition, solar_system};
pub use conformance::{ConformanceReport, check_conformance};
pub use provider::{EphemerisProvider, validate_provider};
pub use router::EphemerisRouter;
pub use state::{StateMetadata, StateVector, TimeRange};
pub use strategy::EphemerisStrategy;

pub use orrery_orbit::Vector3;
