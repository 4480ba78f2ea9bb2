//! Presentation components for the PropertyHub rental portal.
//!
//! Each component is a plain state holder that owns its editable fields and hands
//! results to collaborator traits (search handler, account registrar, navigator).
//! Rendering is left to the host; components expose view-models instead.

pub mod config;
pub mod navigation;
pub mod not_found;
pub mod registration;
pub mod search;
pub mod telemetry;
