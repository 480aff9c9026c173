mod report;
mod report_location;

pub use report::{NewReport, Report, ReportRow, ReportStatus};
pub use report_location::{GeoJsonPoint, GeoPoint};
