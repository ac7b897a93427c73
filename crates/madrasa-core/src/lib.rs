//! Service plumbing shared by the registry binaries: configuration, health
//! probes, HTTP layers, query helpers, serializers and tracing.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
