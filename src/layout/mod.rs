//! Layout planning shared by every output backend.
//!
//! [`plan_resume`] and [`plan_cover_letter`] turn a document into a
//! [`LayoutPlan`]: an ordered stream of [`Block`]s grouped into regions.
//! Backends never decide what to show or in what order; they only draw the
//! blocks they are given.

pub mod metrics;
mod plan;

pub use metrics::{metrics, FontMetrics, FontStyle};
pub use plan::{
    plan_cover_letter, plan_resume, Block, EntryBlock, HeaderBlock, InlineList, LayoutPlan,
    LineStyle, LinkRef, PlanMetadata, Region, RegionKind, SectionHeading, SectionKind, TextLine,
    CONTACT_SEPARATOR,
};
