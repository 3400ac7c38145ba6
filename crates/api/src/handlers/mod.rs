pub mod phonogram;
pub mod project;
pub mod reconciliation;
pub mod release;
pub mod shares;
pub mod work;
