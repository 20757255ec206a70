#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use ipset_exporter::obs::ExporterMetrics;

#[test]
fn exposes_only_domain_metrics() {
    let metrics = ExporterMetrics::new().unwrap();
    metrics.register().unwrap();
    metrics.record_set("blocklist", "hash:ip", 3);

    let body = metrics.render().unwrap();
    for line in body.lines().filter(|l| !l.is_empty() && !l.starts_with('#')) {
        assert!(line.starts_with("ipset_"), "unexpected series: {line}");
    }
    assert!(body.contains("# HELP ipset_entries_count The total number of entries in an ipset"));
    assert!(body.contains("# TYPE ipset_entries_count gauge"));
    assert!(body.contains("ipset_entries_count{set=\"blocklist\",type=\"hash:ip\"} 3"));
    assert!(body.contains("# TYPE ipset_update_errors_total counter"));
    assert!(body.contains("ipset_update_errors_total 0"));
}

#[test]
fn register_is_idempotent() {
    let metrics = ExporterMetrics::new().unwrap();
    metrics.register().unwrap();
    metrics.register().unwrap();
    metrics.record_failure();

    let body = metrics.render().unwrap();
    assert_eq!(body.matches("ipset_update_errors_total 1").count(), 1);
}

#[test]
fn unregistered_metrics_are_not_rendered() {
    let metrics = ExporterMetrics::new().unwrap();
    metrics.record_set("blocklist", "hash:ip", 3);
    assert!(!metrics.render().unwrap().contains("ipset_entries_count"));
}

#[test]
fn type_change_keeps_both_series() {
    let metrics = ExporterMetrics::new().unwrap();
    metrics.register().unwrap();
    metrics.record_set("blocklist", "hash:ip", 3);
    metrics.record_set("blocklist", "hash:net", 8);

    assert_eq!(metrics.entries("blocklist", "hash:ip"), Some(3));
    assert_eq!(metrics.entries("blocklist", "hash:net"), Some(8));
    assert_eq!(metrics.series_count(), 2);
}

#[test]
fn record_set_overwrites_value() {
    let metrics = ExporterMetrics::new().unwrap();
    metrics.record_set("blocklist", "hash:ip", 3);
    metrics.record_set("blocklist", "hash:ip", 1);
    assert_eq!(metrics.entries("blocklist", "hash:ip"), Some(1));
    assert_eq!(metrics.entries("blocklist", "hash:net"), None);
    assert_eq!(metrics.series_count(), 1);
}

#[test]
fn failures_only_go_up() {
    let metrics = ExporterMetrics::new().unwrap();
    assert_eq!(metrics.update_errors(), 0);
    metrics.record_failure();
    metrics.record_failure();
    assert_eq!(metrics.update_errors(), 2);
}

#[test]
fn instances_are_isolated() {
    let a = ExporterMetrics::new().unwrap();
    let b = ExporterMetrics::new().unwrap();
    a.register().unwrap();
    b.register().unwrap();
    a.record_failure();
    assert_eq!(a.update_errors(), 1);
    assert_eq!(b.update_errors(), 0);
}

#[test]
fn content_type_is_prometheus_text() {
    let metrics = ExporterMetrics::new().unwrap();
    assert!(metrics.content_type().starts_with("text/plain; version=0.0.4"));
}
