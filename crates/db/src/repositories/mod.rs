//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod detection_repo;
pub mod divergence_repo;
pub mod phonogram_repo;
pub mod project_repo;
pub mod release_repo;
pub mod society_report_repo;
pub mod work_repo;

pub use detection_repo::DetectionRepo;
pub use divergence_repo::DivergenceRepo;
pub use phonogram_repo::PhonogramRepo;
pub use project_repo::ProjectRepo;
pub use release_repo::ReleaseRepo;
pub use society_report_repo::SocietyReportRepo;
pub use work_repo::{WorkAuthorRepo, WorkRepo};
