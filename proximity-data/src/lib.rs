pub mod device_info;
pub mod health;
pub mod navigation;
pub mod scan;
pub mod sector;

pub use device_info::DeviceInfo;
pub use health::{DeviceHealth, HealthStatus};
pub use navigation::{NavigationDecision, NavigationHint, SeverityColor};
pub use scan::{Scan, ScanSample};
pub use sector::{Sector, SectorDistances};
