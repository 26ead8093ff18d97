//! Metrics definitions for the PRS service.
//!
//! This module defines all metrics keys used by the service and provides a
//! helper [`describe_metrics`] to set metadata for each metric using the
//! `metrics` crate.

/// Metrics key for successful direct pseudonym exchanges.
pub const METRICS_ID_EXCHANGE_DIRECT_SUCCESS: &str = "prs.exchange.direct.success";
/// Metrics key for RID issuances.
pub const METRICS_ID_RID_ISSUED: &str = "prs.rid.issued";
/// Metrics key for RID redemptions.
pub const METRICS_ID_RID_REDEEMED: &str = "prs.rid.redeemed";
/// Metrics key for successful OPRF evaluations.
pub const METRICS_ID_OPRF_SUCCESS: &str = "prs.oprf.success";
/// Metrics key for requests rejected by policy (usage tier/origination rules).
pub const METRICS_ID_POLICY_DENIED: &str = "prs.policy.denied";
/// Metrics key for organisations currently registered.
pub const METRICS_ID_REGISTRY_ORGANISATIONS: &str = "prs.registry.organisations";
/// Metrics key for the duration of `KeyRegistry::resolve` lookups.
pub const METRICS_ID_REGISTRY_RESOLVE_DURATION: &str = "prs.registry.resolve.duration";

/// Describe all metrics used by the service.
///
/// Calls the `describe_*` functions from the `metrics` crate to set
/// metadata on each metric.
pub fn describe_metrics() {
    metrics::describe_counter!(
        METRICS_ID_EXCHANGE_DIRECT_SUCCESS,
        metrics::Unit::Count,
        "Number of successful direct pseudonym exchanges"
    );

    metrics::describe_counter!(
        METRICS_ID_RID_ISSUED,
        metrics::Unit::Count,
        "Number of RIDs issued"
    );

    metrics::describe_counter!(
        METRICS_ID_RID_REDEEMED,
        metrics::Unit::Count,
        "Number of RIDs successfully redeemed"
    );

    metrics::describe_counter!(
        METRICS_ID_OPRF_SUCCESS,
        metrics::Unit::Count,
        "Number of successful OPRF evaluations"
    );

    metrics::describe_counter!(
        METRICS_ID_POLICY_DENIED,
        metrics::Unit::Count,
        "Number of requests rejected by usage-tier or origination policy"
    );

    metrics::describe_gauge!(
        METRICS_ID_REGISTRY_ORGANISATIONS,
        metrics::Unit::Count,
        "Number of organisations currently registered"
    );

    metrics::describe_histogram!(
        METRICS_ID_REGISTRY_RESOLVE_DURATION,
        metrics::Unit::Milliseconds,
        "Duration of KeyRegistry::resolve lookups"
    );
}
