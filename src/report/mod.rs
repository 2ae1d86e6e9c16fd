// src/report/mod.rs
mod aggregator;
mod render;

pub use aggregator::{summarize, DistributionSummary, ReportError, TargetShare};
pub use render::{details, render_details, render_summary, DetailListing, DetailRecord, RunReport, SummaryView};
