// ── Snapshot domain types ──
//
// Typed, immutable view of one `device_status_<i>.json` document. Every
// numeric field is already parsed; the stringly-typed wire format never
// leaks past `convert`.

/// One fully parsed telemetry document.
///
/// The producer writes one device per file; only [`Snapshot::primary`] is
/// consulted by the dashboard, any further entries are kept but ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    devices: Vec<Device>,
}

impl Snapshot {
    /// Build a snapshot from its device entries. Returns `None` when the
    /// document carries no devices at all.
    pub fn new(devices: Vec<Device>) -> Option<Self> {
        if devices.is_empty() {
            None
        } else {
            Some(Self { devices })
        }
    }

    /// The device described by this snapshot (`devices[0]`).
    pub fn primary(&self) -> &Device {
        &self.devices[0]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Device {
    pub status: DeviceStatus,
    pub channels: Vec<Channel>,
    pub stats: DeviceStats,
}

impl Device {
    /// Every queue pair on the device, paired with its channel id, in
    /// document order.
    pub fn queue_pairs(&self) -> impl Iterator<Item = (i64, &QueuePair)> {
        self.channels
            .iter()
            .flat_map(|channel| channel.queue_pairs.iter().map(move |qp| (channel.id, qp)))
    }
}

/// Identity of the producing process and the device it drives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceStatus {
    pub host_name: String,
    pub process_name: String,
    /// Owning process, `None` when absent or not a positive integer.
    pub process_id: Option<i32>,
    pub device_id: String,
    pub eth_device: String,
    pub roce_device: String,
    pub num_channels: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub id: i64,
    pub queue_pairs: Vec<QueuePair>,
}

/// Role of a queue pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QpKind {
    #[default]
    Data,
    /// Clear-to-send control queue pair.
    Cts,
}

impl QpKind {
    /// Interpret the producer's `data_qp` flag. Only the exact text
    /// `"false"` marks a control queue pair.
    pub fn from_data_qp_flag(raw: &str) -> Self {
        if raw == "false" { Self::Cts } else { Self::Data }
    }

    pub fn is_cts(self) -> bool {
        matches!(self, Self::Cts)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueuePair {
    pub id: i64,
    pub kind: QpKind,
    pub stats: QpStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QpStats {
    pub num_wqe_sent: u64,
    pub num_wqe_rcvd: u64,
    /// Completion-latency histogram, one entry per bucket.
    pub completion_latency: Vec<LatencyBucket>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyBucket {
    /// Upper bound of the bucket in nanoseconds.
    pub latency_ns: u64,
    pub num_wqe: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub wqe_sizes: Vec<WqeSizeBucket>,
    pub num_wqe_sent: u64,
    pub num_wqe_rcvd: u64,
    pub num_cts_sent: u64,
    pub cq_poll_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WqeSizeBucket {
    /// Work request size in bytes.
    pub wqe_size: u64,
    pub num_wqe: u64,
}
