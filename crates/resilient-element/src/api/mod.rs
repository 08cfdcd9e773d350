// Configuration for resilient element handles

pub mod staleness_policy;

pub use staleness_policy::{STALENESS_POLICY_ENV, StalenessPolicy};
