// ── Wire-to-domain conversion ──
//
// The producer serializes through a property tree: every scalar becomes a
// JSON string and an empty list is written as `""`. These helpers accept
// either strings or native JSON values and coerce anything unusable to
// zero/empty, reporting it as `CoreError::MalformedField` at debug level.

use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{
    Channel, Device, DeviceStats, DeviceStatus, LatencyBucket, QpKind, QpStats, QueuePair,
    Snapshot, WqeSizeBucket,
};

// ── Helpers ────────────────────────────────────────────────────────

fn malformed(field: &'static str, value: &Value) {
    let err = CoreError::MalformedField {
        field,
        value: value.to_string(),
    };
    debug!(error = %err, "coercing malformed field");
}

/// Non-negative counter. Missing fields are zero without complaint.
fn counter(obj: &Value, field: &'static str) -> u64 {
    let Some(raw) = obj.get(field) else {
        return 0;
    };
    let parsed = match raw {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        malformed(field, raw);
        0
    })
}

/// Signed integer identifier (channel / queue-pair ids).
fn integer(obj: &Value, field: &'static str) -> i64 {
    let Some(raw) = obj.get(field) else {
        return 0;
    };
    let parsed = match raw {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        malformed(field, raw);
        0
    })
}

/// Free text. Scalars are rendered as their JSON text, null as empty.
fn text(obj: &Value, field: &'static str) -> String {
    match obj.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Bool(_) | Value::Number(_))) => v.to_string(),
        Some(other) => {
            malformed(field, other);
            String::new()
        }
    }
}

/// Ordered child list. The producer writes empty lists as `""`.
fn list<'a>(obj: &'a Value, field: &'static str) -> &'a [Value] {
    match obj.get(field) {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => &[],
        Some(Value::String(s)) if s.is_empty() => &[],
        Some(other) => {
            malformed(field, other);
            &[]
        }
    }
}

fn child<'a>(obj: &'a Value, field: &'static str) -> &'a Value {
    obj.get(field).unwrap_or(&Value::Null)
}

/// Process ids must be positive: zero or negative values would address
/// process groups when signalled.
fn process_id(obj: &Value) -> Option<i32> {
    let pid = integer(obj, "process_id");
    i32::try_from(pid).ok().filter(|pid| *pid > 0)
}

// ── Conversions ────────────────────────────────────────────────────

impl From<&Value> for DeviceStatus {
    fn from(obj: &Value) -> Self {
        Self {
            host_name: text(obj, "host_name"),
            process_name: text(obj, "process_name"),
            process_id: process_id(obj),
            device_id: text(obj, "device_id"),
            eth_device: text(obj, "eth_device"),
            roce_device: text(obj, "roce_device"),
            num_channels: counter(obj, "num_channels"),
        }
    }
}

impl From<&Value> for LatencyBucket {
    fn from(obj: &Value) -> Self {
        Self {
            latency_ns: counter(obj, "latency_in_ns"),
            num_wqe: counter(obj, "num_wqe"),
        }
    }
}

impl From<&Value> for QpStats {
    fn from(obj: &Value) -> Self {
        Self {
            num_wqe_sent: counter(obj, "num_wqe_sent"),
            num_wqe_rcvd: counter(obj, "num_wqe_rcvd"),
            completion_latency: list(obj, "wqe_completion_metrics")
                .iter()
                .map(LatencyBucket::from)
                .collect(),
        }
    }
}

impl From<&Value> for QueuePair {
    fn from(obj: &Value) -> Self {
        // Only the text "false" marks a Cts QP; a JSON boolean does not.
        let flag = match child(child(obj, "status"), "data_qp") {
            Value::String(s) => s.as_str(),
            _ => "",
        };
        Self {
            id: integer(obj, "id"),
            kind: QpKind::from_data_qp_flag(flag),
            stats: QpStats::from(child(obj, "stats")),
        }
    }
}

impl From<&Value> for Channel {
    fn from(obj: &Value) -> Self {
        Self {
            id: integer(obj, "id"),
            queue_pairs: list(obj, "queue_pairs").iter().map(QueuePair::from).collect(),
        }
    }
}

impl From<&Value> for WqeSizeBucket {
    fn from(obj: &Value) -> Self {
        Self {
            wqe_size: counter(obj, "wqe_size"),
            num_wqe: counter(obj, "num_wqe"),
        }
    }
}

impl From<&Value> for DeviceStats {
    fn from(obj: &Value) -> Self {
        Self {
            wqe_sizes: list(obj, "wqe_size_stats")
                .iter()
                .map(WqeSizeBucket::from)
                .collect(),
            num_wqe_sent: counter(obj, "num_wqe_sent"),
            num_wqe_rcvd: counter(obj, "num_wqe_rcvd"),
            num_cts_sent: counter(obj, "num_cts_sent"),
            cq_poll_count: counter(obj, "cq_poll_count"),
        }
    }
}

impl From<&Value> for Device {
    fn from(obj: &Value) -> Self {
        Self {
            status: DeviceStatus::from(child(obj, "status")),
            channels: list(obj, "channels").iter().map(Channel::from).collect(),
            stats: DeviceStats::from(child(obj, "stats")),
        }
    }
}

impl Snapshot {
    /// Build a snapshot from a parsed document. `None` when the document
    /// has no device entries.
    pub fn from_document(doc: &Value) -> Option<Self> {
        Self::new(list(doc, "devices").iter().map(Device::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn counters_accept_strings_and_numbers() {
        let obj = json!({ "a": "42", "b": 7, "c": " 9 " });
        assert_eq!(counter(&obj, "a"), 42);
        assert_eq!(counter(&obj, "b"), 7);
        assert_eq!(counter(&obj, "c"), 9);
    }

    #[test]
    fn unparseable_counters_become_zero() {
        let obj = json!({ "a": "lots", "b": -3, "c": [1], "d": 1.5 });
        assert_eq!(counter(&obj, "a"), 0);
        assert_eq!(counter(&obj, "b"), 0);
        assert_eq!(counter(&obj, "c"), 0);
        assert_eq!(counter(&obj, "d"), 0);
        assert_eq!(counter(&obj, "missing"), 0);
    }

    #[test]
    fn empty_string_list_is_empty() {
        let obj = json!({ "channels": "", "other": 5 });
        assert!(list(&obj, "channels").is_empty());
        assert!(list(&obj, "other").is_empty());
        assert!(list(&obj, "missing").is_empty());
    }

    #[test]
    fn only_literal_false_marks_cts() {
        let qp = |flag: Value| QueuePair::from(&json!({ "id": "1", "status": { "data_qp": flag } }));
        assert_eq!(qp(json!("false")).kind, QpKind::Cts);
        assert_eq!(qp(json!(false)).kind, QpKind::Data);
        assert_eq!(qp(json!(true)).kind, QpKind::Data);
        assert_eq!(qp(json!("true")).kind, QpKind::Data);
        assert_eq!(qp(json!("False")).kind, QpKind::Data);
        assert_eq!(qp(json!("")).kind, QpKind::Data);
        assert_eq!(QueuePair::from(&json!({ "id": "2" })).kind, QpKind::Data);
    }

    #[test]
    fn process_id_must_be_positive() {
        assert_eq!(process_id(&json!({ "process_id": "4242" })), Some(4242));
        assert_eq!(process_id(&json!({ "process_id": "0" })), None);
        assert_eq!(process_id(&json!({ "process_id": "-1" })), None);
        assert_eq!(process_id(&json!({ "process_id": "99999999999" })), None);
        assert_eq!(process_id(&json!({})), None);
    }

    #[test]
    fn document_without_devices_is_rejected() {
        assert!(Snapshot::from_document(&json!({ "devices": [] })).is_none());
        assert!(Snapshot::from_document(&json!({ "devices": "" })).is_none());
        assert!(Snapshot::from_document(&json!({})).is_none());
    }

    #[test]
    fn full_device_converts() {
        let doc = json!({
            "devices": [{
                "status": {
                    "host_name": "node-7",
                    "process_name": "trainer",
                    "process_id": "1234",
                    "device_id": "0",
                    "eth_device": "eth0",
                    "roce_device": "rdmap0",
                    "num_channels": "1"
                },
                "channels": [{
                    "id": "3",
                    "queue_pairs": [{
                        "id": "17",
                        "status": { "data_qp": "false" },
                        "stats": {
                            "num_wqe_sent": "10",
                            "num_wqe_rcvd": "5",
                            "wqe_completion_metrics": [
                                { "latency_in_ns": "1023", "num_wqe": "8" }
                            ]
                        }
                    }]
                }],
                "stats": {
                    "wqe_size_stats": [{ "wqe_size": "4096", "num_wqe": "12" }],
                    "num_wqe_sent": "10",
                    "num_wqe_rcvd": "5",
                    "num_cts_sent": "2",
                    "cq_poll_count": "99"
                }
            }]
        });

        let snapshot = Snapshot::from_document(&doc).unwrap();
        let device = snapshot.primary();
        assert_eq!(device.status.host_name, "node-7");
        assert_eq!(device.status.process_id, Some(1234));
        assert_eq!(device.status.num_channels, 1);
        assert_eq!(device.channels[0].id, 3);
        let qp = &device.channels[0].queue_pairs[0];
        assert_eq!(qp.id, 17);
        assert!(qp.kind.is_cts());
        assert_eq!(qp.stats.num_wqe_sent, 10);
        assert_eq!(
            qp.stats.completion_latency,
            vec![LatencyBucket { latency_ns: 1023, num_wqe: 8 }]
        );
        assert_eq!(
            device.stats.wqe_sizes,
            vec![WqeSizeBucket { wqe_size: 4096, num_wqe: 12 }]
        );
        assert_eq!(device.stats.cq_poll_count, 99);
    }
}
