//! Parameter and response types of the covered API endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use proxmox_client::IndexedFamily;

/// Task identifiers as returned by asynchronous endpoints (`UPID:node:...`).
pub type PveUpid = String;

/// Resource type filter for the cluster resource index.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum ClusterResourceKind {
    #[serde(rename = "vm")]
    Vm,
    #[serde(rename = "storage")]
    Storage,
    #[serde(rename = "node")]
    Node,
    #[serde(rename = "sdn")]
    Sdn,
}
serde_plain::derive_display_from_serialize!(ClusterResourceKind);
serde_plain::derive_fromstr_from_deserialize!(ClusterResourceKind);

/// Resource type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum ClusterResourceType {
    #[serde(rename = "node")]
    Node,
    #[serde(rename = "storage")]
    Storage,
    #[serde(rename = "pool")]
    Pool,
    #[serde(rename = "qemu")]
    Qemu,
    #[serde(rename = "lxc")]
    Lxc,
    #[serde(rename = "openvz")]
    Openvz,
    #[serde(rename = "sdn")]
    Sdn,
}
serde_plain::derive_display_from_serialize!(ClusterResourceType);
serde_plain::derive_fromstr_from_deserialize!(ClusterResourceType);

/// Guest run state.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum IsRunning {
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "stopped")]
    Stopped,
}
serde_plain::derive_display_from_serialize!(IsRunning);
serde_plain::derive_fromstr_from_deserialize!(IsRunning);

/// Node status.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum NodeStatus {
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "online")]
    Online,
    #[serde(rename = "offline")]
    Offline,
}
serde_plain::derive_display_from_serialize!(NodeStatus);
serde_plain::derive_fromstr_from_deserialize!(NodeStatus);

/// The default console viewer to use.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum ConsoleViewer {
    #[serde(rename = "applet")]
    Applet,
    #[serde(rename = "vv")]
    Vv,
    #[serde(rename = "html5")]
    Html5,
    #[serde(rename = "xtermjs")]
    Xtermjs,
}
serde_plain::derive_display_from_serialize!(ConsoleViewer);
serde_plain::derive_fromstr_from_deserialize!(ConsoleViewer);

/// Backup mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub enum BackupMode {
    #[serde(rename = "snapshot")]
    #[default]
    Snapshot,
    #[serde(rename = "suspend")]
    Suspend,
    #[serde(rename = "stop")]
    Stop,
}
serde_plain::derive_display_from_serialize!(BackupMode);
serde_plain::derive_fromstr_from_deserialize!(BackupMode);

/// Plugin type of an external metrics server.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum MetricsServerType {
    #[serde(rename = "graphite")]
    Graphite,
    #[serde(rename = "influxdb")]
    Influxdb,
}
serde_plain::derive_display_from_serialize!(MetricsServerType);
serde_plain::derive_fromstr_from_deserialize!(MetricsServerType);

/// Protocol used to send metrics to an InfluxDB server.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum InfluxDbProto {
    #[serde(rename = "udp")]
    Udp,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "https")]
    Https,
}
serde_plain::derive_display_from_serialize!(InfluxDbProto);
serde_plain::derive_fromstr_from_deserialize!(InfluxDbProto);

/// API version details, including some parts of the global datacenter config.
#[derive(Debug, Deserialize, Serialize)]
pub struct VersionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<ConsoleViewer>,
    /// The current Proxmox VE point release in `x.y` format.
    pub release: String,
    /// The short git revision from which this version was build.
    pub repoid: String,
    /// The full pve-manager package version of this node.
    pub version: String,
}

/// One entry of the cluster wide resource index.
#[derive(Debug, Deserialize, Serialize)]
pub struct ClusterResource {
    /// Resource id.
    pub id: String,

    #[serde(rename = "type")]
    pub ty: ClusterResourceType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxcpu: Option<f64>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxdisk: Option<u64>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<u64>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The cluster node name (when type in node,storage,qemu,lxc).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    /// Resource type dependent status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<i64>,

    /// The numerical vmid (when type in qemu,lxc).
    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_u32")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vmid: Option<u32>,
}

/// Cluster node index entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct ClusterNodeIndexResponse {
    /// The cluster node name.
    pub node: String,

    pub status: NodeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,

    /// Support level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxcpu: Option<i64>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<i64>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem: Option<i64>,

    /// The SSL fingerprint for the node certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_fingerprint: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<i64>,
}

/// Virtual machine index entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct VmEntry {
    /// The (unique) ID of the VM.
    #[serde(deserialize_with = "proxmox_serde::perl::deserialize_u32")]
    pub vmid: u32,

    pub status: IsRunning,

    /// Maximum usable CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<f64>,

    /// The current config lock, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<String>,

    /// Root disk size in bytes.
    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxdisk: Option<i64>,

    /// Maximum memory in bytes.
    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// PID of the running qemu process.
    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,

    /// VM run state from the 'query-status' QMP monitor command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qmpstatus: Option<String>,

    /// The currently running machine type (if running).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "running-machine")]
    pub running_machine: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<i64>,
}

/// Container index entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct LxcEntry {
    #[serde(deserialize_with = "proxmox_serde::perl::deserialize_u32")]
    pub vmid: u32,

    pub status: IsRunning,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxdisk: Option<i64>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxmem: Option<i64>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxswap: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<i64>,
}

/// Status of a worker task.
#[derive(Debug, Deserialize, Serialize)]
pub struct TaskStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exitstatus: Option<String>,
    pub id: String,
    pub node: String,
    #[serde(deserialize_with = "proxmox_serde::perl::deserialize_i64")]
    pub pid: i64,
    pub starttime: f64,
    pub status: IsRunning,
    #[serde(rename = "type")]
    pub ty: String,
    pub upid: PveUpid,
    pub user: String,
}

impl TaskStatus {
    /// Whether the task finished and reported success.
    pub fn is_ok(&self) -> bool {
        self.status == IsRunning::Stopped && self.exitstatus.as_deref() == Some("OK")
    }
}

/// A storage definition from the datacenter storage configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct StorageInfo {
    pub storage: String,

    #[serde(rename = "type")]
    pub ty: String,

    /// Comma separated list of allowed content types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "prune-backups")]
    pub prune_backups: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
}

/// A scheduled backup job.
#[derive(Debug, Deserialize, Serialize)]
pub struct BackupJob {
    pub id: String,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<BackupMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "next-run")]
    pub next_run: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    /// Comma separated list of guest ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmid: Option<String>,
}

/// Virtual machine configuration.
///
/// Only the commonly used scalar options are typed, everything else (including the numbered
/// device families) is kept in [`extra`](Self::extra) and can be extracted with
/// [`family`](Self::family).
#[derive(Debug, Deserialize, Serialize)]
pub struct QemuConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// SHA1 digest of the configuration, used to prevent concurrent modifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Memory size, may carry additional properties (`4096` or `current=4096`).
    #[serde(default, deserialize_with = "memory_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboot: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ostype: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scsihw: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_u64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sockets: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, deserialize_with = "proxmox_serde::perl::deserialize_bool")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QemuConfig {
    /// Collect a numbered device family (`net`, `scsi`, `unused`, ...).
    pub fn family(&self, prefix: &str) -> IndexedFamily {
        IndexedFamily::from_object(&self.extra, prefix)
    }

    pub fn net(&self) -> IndexedFamily {
        self.family("net")
    }

    /// All disk slots across the `ide`, `sata`, `scsi` and `virtio` buses, keyed by their full
    /// configuration name.
    pub fn disks(&self) -> Vec<(String, String)> {
        ["ide", "sata", "scsi", "virtio"]
            .into_iter()
            .flat_map(|bus| {
                self.family(bus)
                    .into_iter()
                    .map(move |(index, value)| (format!("{bus}{index}"), value))
            })
            .collect()
    }
}

fn memory_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Parameters for creating a scheduled backup job.
#[derive(Debug, Default)]
pub struct CreateBackupJob {
    /// Job ID, generated by the server if not set.
    pub id: Option<String>,
    /// Backup all known guest systems on this host.
    pub all: Option<bool>,
    pub comment: Option<String>,
    /// Compress dump file (`0`, `1`, `gzip`, `lzo`, `zstd`).
    pub compress: Option<String>,
    pub enabled: Option<bool>,
    /// Exclude certain files/directories (shell globs).
    pub exclude_path: Option<Vec<String>>,
    pub mailto: Option<String>,
    pub mode: Option<BackupMode>,
    /// Only run on this node.
    pub node: Option<String>,
    /// Template string for generating notes for the backup(s).
    pub notes_template: Option<String>,
    /// Backup all known guest systems included in the specified pool.
    pub pool: Option<String>,
    /// Mark backups as protected.
    pub protected: Option<bool>,
    /// Use these retention options instead of those from the storage configuration.
    pub prune_backups: Option<String>,
    /// Run the job as soon as possible if it was missed while the scheduler was not running.
    pub repeat_missed: Option<bool>,
    /// Backup schedule in the systemd calendar event format.
    pub schedule: Option<String>,
    pub storage: Option<String>,
    /// Comma separated list of guest ids to back up.
    pub vmid: Option<String>,
}

/// Parameters for updating a scheduled backup job.
#[derive(Debug, Default)]
pub struct UpdateBackupJob {
    pub all: Option<bool>,
    pub comment: Option<String>,
    pub compress: Option<String>,
    /// Options to reset to their defaults.
    pub delete: Option<Vec<String>>,
    pub enabled: Option<bool>,
    pub exclude_path: Option<Vec<String>>,
    pub mailto: Option<String>,
    pub mode: Option<BackupMode>,
    pub node: Option<String>,
    pub notes_template: Option<String>,
    pub pool: Option<String>,
    pub protected: Option<bool>,
    pub prune_backups: Option<String>,
    pub repeat_missed: Option<bool>,
    pub schedule: Option<String>,
    pub storage: Option<String>,
    pub vmid: Option<String>,
}

/// Parameters for adding an external metrics server.
#[derive(Debug)]
pub struct CreateMetricsServer {
    /// Plugin type.
    pub ty: MetricsServerType,
    /// Server dns name or IP address.
    pub server: String,
    /// Server network port.
    pub port: u16,
    /// An API path prefix inserted between `<host>:<port>/` and `/api2/`.
    pub api_path_prefix: Option<String>,
    /// The InfluxDB bucket/db. Only necessary when using the http v2 api.
    pub bucket: Option<String>,
    pub disable: Option<bool>,
    pub influxdbproto: Option<InfluxDbProto>,
    /// InfluxDB max-body-size in bytes.
    pub max_body_size: Option<u64>,
    /// MTU for metrics transmission over UDP.
    pub mtu: Option<u16>,
    /// The InfluxDB organization.
    pub organization: Option<String>,
    /// Root graphite path.
    pub path: Option<String>,
    /// Protocol to send graphite data, `udp` or `tcp`.
    pub proto: Option<String>,
    /// Graphite TCP socket timeout.
    pub timeout: Option<u64>,
    /// The InfluxDB access token.
    pub token: Option<String>,
    /// Set to 0 to disable certificate verification for an https endpoint.
    pub verify_certificate: Option<bool>,
}

impl CreateMetricsServer {
    pub fn new(ty: MetricsServerType, server: impl Into<String>, port: u16) -> Self {
        Self {
            ty,
            server: server.into(),
            port,
            api_path_prefix: None,
            bucket: None,
            disable: None,
            influxdbproto: None,
            max_body_size: None,
            mtu: None,
            organization: None,
            path: None,
            proto: None,
            timeout: None,
            token: None,
            verify_certificate: None,
        }
    }
}

/// Parameters for creating a virtual machine.
///
/// Device families are sent as `net0`, `net1`, ... with one entry per slot in use.
#[derive(Debug, Default)]
pub struct CreateQemu {
    /// The (unique) ID of the VM.
    pub vmid: u32,
    pub agent: Option<String>,
    /// Virtual processor architecture, defaults to the host.
    pub arch: Option<String>,
    pub boot: Option<String>,
    pub cores: Option<u64>,
    pub cpu: Option<String>,
    pub description: Option<String>,
    /// Assign a unique random ethernet address.
    pub unique: Option<bool>,
    /// Amount of memory in MiB, may carry additional properties.
    pub memory: Option<String>,
    pub name: Option<String>,
    pub onboot: Option<bool>,
    pub ostype: Option<String>,
    /// Add the VM to the specified pool.
    pub pool: Option<String>,
    pub protection: Option<bool>,
    pub scsihw: Option<String>,
    pub sockets: Option<u64>,
    /// Start the VM after it was created successfully.
    pub start: Option<bool>,
    /// Default storage for disk images created along with the VM.
    pub storage: Option<String>,
    pub tags: Option<String>,
    pub template: Option<bool>,

    pub hostpci: IndexedFamily,
    pub ide: IndexedFamily,
    pub net: IndexedFamily,
    pub numa: IndexedFamily,
    pub sata: IndexedFamily,
    pub scsi: IndexedFamily,
    pub serial: IndexedFamily,
    pub unused: IndexedFamily,
    pub usb: IndexedFamily,
    pub virtio: IndexedFamily,
}

/// Parameters for updating a virtual machine's configuration.
#[derive(Debug, Default)]
pub struct UpdateQemuConfig {
    pub agent: Option<String>,
    pub boot: Option<String>,
    pub cores: Option<u64>,
    pub cpu: Option<String>,
    /// Options to delete from the configuration.
    pub delete: Option<Vec<String>>,
    pub description: Option<String>,
    /// Prevent changes if the current configuration has a different digest.
    pub digest: Option<String>,
    pub memory: Option<String>,
    pub name: Option<String>,
    pub onboot: Option<bool>,
    pub ostype: Option<String>,
    pub protection: Option<bool>,
    /// Revert a pending change.
    pub revert: Option<Vec<String>>,
    pub scsihw: Option<String>,
    /// Ignore locks, only root is allowed to use this option.
    pub skiplock: Option<bool>,
    pub sockets: Option<u64>,
    pub tags: Option<String>,

    pub hostpci: IndexedFamily,
    pub ide: IndexedFamily,
    pub net: IndexedFamily,
    pub numa: IndexedFamily,
    pub sata: IndexedFamily,
    pub scsi: IndexedFamily,
    pub serial: IndexedFamily,
    pub unused: IndexedFamily,
    pub usb: IndexedFamily,
    pub virtio: IndexedFamily,
}

/// Options for destroying a virtual machine.
#[derive(Debug, Default)]
pub struct DeleteQemu {
    /// Also remove disks not referenced in the configuration but carrying the VM's id.
    pub destroy_unreferenced_disks: Option<bool>,
    /// Remove the VM from backup jobs, replication jobs and the HA configuration.
    pub purge: Option<bool>,
    pub skiplock: Option<bool>,
}

/// Parameters for starting a virtual machine.
#[derive(Debug, Default)]
pub struct StartQemu {
    /// Override the QEMU CPU model used when starting a migrated VM.
    pub force_cpu: Option<String>,
    pub machine: Option<String>,
    /// The cluster node name the VM is migrated from.
    pub migratedfrom: Option<String>,
    pub skiplock: Option<bool>,
    /// Wait maximal timeout seconds.
    pub timeout: Option<u64>,
}

/// Parameters for stopping a virtual machine.
#[derive(Debug, Default)]
pub struct StopQemu {
    /// Do not deactivate storage volumes.
    pub keep_active: Option<bool>,
    pub migratedfrom: Option<String>,
    /// Try to abort active 'qmshutdown' tasks before stopping.
    pub overrule_shutdown: Option<bool>,
    pub skiplock: Option<bool>,
    pub timeout: Option<u64>,
}
