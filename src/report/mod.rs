//! Monthly attendance reporting: aggregation of attendee demographics and
//! rendering of the result as a PDF.

pub mod aggregator;
pub mod buckets;
pub mod canvas;
pub mod demographics;
pub mod pdf;
pub mod period;
pub mod pie;
pub mod postcode;
pub mod renderer;
pub mod source;

pub use aggregator::{
    aggregate, generate_monthly_report, generate_monthly_report_at, AggregationReport, Category,
    ReportStats,
};
pub use buckets::BucketMap;
pub use period::ReportPeriod;
pub use renderer::{draw_report, render_report, report_filename, RenderOptions, ReportStyle};
pub use source::{AttendanceSource, AttendingMember};
