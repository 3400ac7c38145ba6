//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod detection;
pub mod divergence;
pub mod phonogram;
pub mod project;
pub mod release;
pub mod society_report;
pub mod work;
