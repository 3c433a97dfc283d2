pub mod link;
pub mod scan_log;

pub use link::Entity as LinkEntity;
pub use scan_log::Entity as ScanLogEntity;
