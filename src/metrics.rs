use lazy_static::lazy_static;
use prometheus::{
    core::Collector, opts, Encoder, IntCounter, IntCounterVec, IntGauge, Registry, TextEncoder,
};
use tracing::error;

lazy_static! {
    static ref GLOBAL_REGISTRY: Registry = Registry::new();
    static ref PERMISSION_DECISIONS: IntCounterVec = IntCounterVec::new(
        opts!(
            "docgate_permission_decisions_total",
            "Permission decisions grouped by outcome"
        ),
        &["outcome"]
    )
    .unwrap();
    static ref ALLOCATIONS_TOTAL: IntCounter = IntCounter::new(
        "docgate_allocations_total",
        "Allocations stored, including replacements",
    )
    .unwrap();
    static ref ALLOCATION_ROWS: IntGauge =
        IntGauge::new("docgate_allocation_rows", "Allocation rows currently stored").unwrap();
    static ref APPROVAL_RESOLUTIONS: IntCounterVec = IntCounterVec::new(
        opts!(
            "docgate_approval_resolutions_total",
            "Approval resolutions grouped by status"
        ),
        &["status"]
    )
    .unwrap();
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register docgate metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, PERMISSION_DECISIONS.clone());
    register(registry, ALLOCATIONS_TOTAL.clone());
    register(registry, ALLOCATION_ROWS.clone());
    register(registry, APPROVAL_RESOLUTIONS.clone());
}

pub fn global_registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

pub fn record_decision(allowed: bool) {
    let outcome = if allowed { "allow" } else { "deny" };
    PERMISSION_DECISIONS.with_label_values(&[outcome]).inc();
}

pub fn record_allocation(rows: usize) {
    ALLOCATIONS_TOTAL.inc();
    ALLOCATION_ROWS.set(rows as i64);
}

pub fn set_allocation_rows(rows: usize) {
    ALLOCATION_ROWS.set(rows as i64);
}

pub fn record_resolution(status: &str) {
    APPROVAL_RESOLUTIONS.with_label_values(&[status]).inc();
}

/// Text exposition of everything in the global registry.
pub fn render() -> Result<String, prometheus::Error> {
    register_metrics(global_registry());
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&global_registry().gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_registered_families() {
        record_decision(true);
        record_resolution("pending");
        let body = render().expect("render metrics");
        assert!(body.contains("docgate_permission_decisions_total"));
        assert!(body.contains("docgate_approval_resolutions_total"));
    }

    #[test]
    fn registering_twice_is_harmless() {
        let registry = Registry::new();
        register_metrics(&registry);
        register_metrics(&registry);
        record_allocation(1);
        assert!(registry
            .gather()
            .iter()
            .any(|family| family.get_name() == "docgate_allocations_total"));
    }
}
