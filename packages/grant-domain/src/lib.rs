pub mod context;
pub mod eligibility;
pub mod extract;
pub mod geography;
pub mod query;
pub mod status;
pub mod text;
