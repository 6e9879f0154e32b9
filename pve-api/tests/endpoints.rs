use std::collections::VecDeque;
use std::future::{ready, Ready};
use std::sync::Mutex;

use http::Method;
use serde_json::{json, Value};

use proxmox_client::{Error, ErrorKind, HttpApiClient, HttpApiResponse, ParameterSet, Verb};
use pve_api::types::*;
use pve_api::{IndexedFamily, PveClient};

/// Records every request and answers with queued responses.
#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<(Method, String, ParameterSet)>>,
    responses: Mutex<VecDeque<(u16, Value)>>,
}

impl Recorder {
    fn respond(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back((status, body));
    }

    fn respond_data(&self, data: Value) {
        self.respond(200, json!({ "data": data }));
    }

    fn last_request(&self) -> (Method, String, ParameterSet) {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl HttpApiClient for Recorder {
    type ResponseFuture<'a> = Ready<Result<HttpApiResponse, Error>>;

    fn request<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        params: &'a ParameterSet,
    ) -> Self::ResponseFuture<'a> {
        self.requests
            .lock()
            .unwrap()
            .push((method, path.to_string(), params.clone()));

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((200, json!({ "data": null })));

        ready(Ok(HttpApiResponse {
            status,
            reason: None,
            content_type: Some("application/json;charset=UTF-8".to_string()),
            body: serde_json::to_vec(&body).unwrap(),
        }))
    }
}

fn client() -> PveClient<Recorder> {
    PveClient(Recorder::default())
}

#[tokio::test]
async fn list_without_identifiers() {
    let pve = client();
    pve.0.respond_data(json!([
        { "node": "pve1", "status": "online", "maxcpu": 16, "uptime": "86400" },
        { "node": "pve2", "status": "offline" },
    ]));

    let nodes = pve.list_nodes().await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].uptime, Some(86400));
    assert_eq!(nodes[1].status, NodeStatus::Offline);

    let (method, path, params) = pve.0.last_request();
    assert_eq!(method, Method::GET);
    assert_eq!(path, "/api2/json/nodes");
    assert!(params.is_empty());
}

#[tokio::test]
async fn generic_call_returns_raw_data() {
    let pve = client();
    pve.0.respond(200, json!({ "data": [{ "vmid": 100 }], "total": 1 }));

    let response = pve
        .call(
            Verb::Get,
            "/nodes/{node}/qemu",
            &[("node", "pve1")],
            &ParameterSet::new(),
        )
        .await
        .unwrap();
    assert_eq!(response.data, json!([{ "vmid": 100 }]));
    assert_eq!(response.attribs["total"], 1);
    assert_eq!(pve.0.last_request().1, "/api2/json/nodes/pve1/qemu");
}

#[tokio::test]
async fn optional_arguments_are_omitted() {
    let pve = client();
    pve.0.respond_data(json!([]));
    pve.list_qemu("pve1", None).await.unwrap();
    assert!(pve.0.last_request().2.is_empty());

    pve.0.respond_data(json!([]));
    pve.list_qemu("pve1", Some(false)).await.unwrap();
    assert_eq!(pve.0.last_request().2.get("full"), Some("0"));

    pve.0.respond_data(json!([]));
    pve.cluster_resources(Some(ClusterResourceKind::Vm))
        .await
        .unwrap();
    let (_, path, params) = pve.0.last_request();
    assert_eq!(path, "/api2/json/cluster/resources");
    assert_eq!(params.get("type"), Some("vm"));
}

#[tokio::test]
async fn create_qemu_expands_device_families() {
    let pve = client();
    let upid = "UPID:pve1:00001234:00005678:66F0A1B2:qmcreate:200:root@pam:";
    pve.0.respond_data(json!(upid));

    let mut net = IndexedFamily::new();
    net.insert(0, "model=virtio".to_string());
    net.insert(1, "model=e1000".to_string());

    let mut scsi = IndexedFamily::new();
    scsi.add("local-lvm:32".to_string());

    let upid = pve
        .create_qemu(
            "pve1",
            CreateQemu {
                vmid: 200,
                name: Some("web".to_string()),
                memory: Some("2048".to_string()),
                start: Some(true),
                net,
                scsi,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(upid.starts_with("UPID:pve1:"));

    let (method, path, params) = pve.0.last_request();
    assert_eq!(method, Method::POST);
    assert_eq!(path, "/api2/json/nodes/pve1/qemu");
    assert_eq!(params.get("vmid"), Some("200"));
    assert_eq!(params.get("start"), Some("1"));
    assert_eq!(params.get("net0"), Some("model=virtio"));
    assert_eq!(params.get("net1"), Some("model=e1000"));
    assert_eq!(params.get("scsi0"), Some("local-lvm:32"));
    assert!(!params.contains("net"));
    assert!(!params.contains("ide0"));
    assert!(!params.contains("cores"));
    assert_eq!(params.len(), 7);
}

#[tokio::test]
async fn backup_job_lifecycle() {
    let pve = client();

    pve.create_backup_job(CreateBackupJob {
        id: Some("backup-daily".to_string()),
        schedule: Some("daily".to_string()),
        storage: Some("pbs".to_string()),
        all: Some(true),
        mode: Some(BackupMode::Snapshot),
        exclude_path: Some(vec!["/tmp/?*".to_string(), "/var/cache".to_string()]),
        prune_backups: Some("keep-daily=7".to_string()),
        ..Default::default()
    })
    .await
    .unwrap();
    let (method, path, params) = pve.0.last_request();
    assert_eq!(method, Method::POST);
    assert_eq!(path, "/api2/json/cluster/backup");
    assert_eq!(params.get("all"), Some("1"));
    assert_eq!(params.get("mode"), Some("snapshot"));
    assert_eq!(params.get("exclude-path"), Some("/tmp/?*\0/var/cache"));
    assert_eq!(params.get("prune-backups"), Some("keep-daily=7"));
    assert!(!params.contains("enabled"));

    pve.0.respond_data(json!({
        "id": "backup-daily",
        "schedule": "daily",
        "enabled": 1,
        "all": "1",
        "mode": "snapshot",
    }));
    let job = pve.get_backup_job("backup-daily").await.unwrap();
    assert_eq!(job.enabled, Some(true));
    assert_eq!(job.mode, Some(BackupMode::Snapshot));
    assert_eq!(
        pve.0.last_request().1,
        "/api2/json/cluster/backup/backup-daily"
    );

    pve.update_backup_job(
        "backup-daily",
        UpdateBackupJob {
            enabled: Some(false),
            delete: Some(vec!["comment".to_string(), "mailto".to_string()]),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let (method, _, params) = pve.0.last_request();
    assert_eq!(method, Method::PUT);
    assert_eq!(params.get("enabled"), Some("0"));
    assert_eq!(params.get("delete"), Some("comment,mailto"));

    pve.delete_backup_job("backup-daily").await.unwrap();
    let (method, path, params) = pve.0.last_request();
    assert_eq!(method, Method::DELETE);
    assert_eq!(path, "/api2/json/cluster/backup/backup-daily");
    assert!(params.is_empty());
}

#[tokio::test]
async fn metrics_server_wire_names() {
    let pve = client();
    let mut params = CreateMetricsServer::new(MetricsServerType::Influxdb, "influx.lan", 8086);
    params.api_path_prefix = Some("/influx".to_string());
    params.influxdbproto = Some(InfluxDbProto::Https);
    params.verify_certificate = Some(false);
    params.max_body_size = Some(25_000_000);

    pve.create_metrics_server("influx", params).await.unwrap();

    let (method, path, params) = pve.0.last_request();
    assert_eq!(method, Method::POST);
    assert_eq!(path, "/api2/json/cluster/metrics/server/influx");
    assert_eq!(params.get("type"), Some("influxdb"));
    assert_eq!(params.get("port"), Some("8086"));
    assert_eq!(params.get("api-path-prefix"), Some("/influx"));
    assert_eq!(params.get("influxdbproto"), Some("https"));
    assert_eq!(params.get("verify-certificate"), Some("0"));
    assert_eq!(params.get("max-body-size"), Some("25000000"));
    assert!(!params.contains("api_path_prefix"));
    assert!(!params.contains("bucket"));
}

#[tokio::test]
async fn guest_power_and_removal() {
    let pve = client();

    let upid = "UPID:pve1:0000A1B2:0001C3D4:66F0A1B2:qmstart:100:root@pam:";
    pve.0.respond_data(json!(upid));
    pve.start_qemu_async("pve1", 100, StartQemu::default())
        .await
        .unwrap();
    let (method, path, params) = pve.0.last_request();
    assert_eq!(method, Method::POST);
    assert_eq!(path, "/api2/json/nodes/pve1/qemu/100/status/start");
    assert!(params.is_empty());

    let upid = "UPID:pve1:0000A1B3:0001C3D5:66F0A1B3:qmstop:100:root@pam:";
    pve.0.respond_data(json!(upid));
    pve.stop_qemu_async(
        "pve1",
        100,
        StopQemu {
            keep_active: Some(true),
            overrule_shutdown: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let (_, path, params) = pve.0.last_request();
    assert_eq!(path, "/api2/json/nodes/pve1/qemu/100/status/stop");
    assert_eq!(params.get("keepActive"), Some("1"));
    assert_eq!(params.get("overrule-shutdown"), Some("1"));

    let upid = "UPID:pve1:0000A1B4:0001C3D6:66F0A1B4:qmdestroy:100:root@pam:";
    pve.0.respond_data(json!(upid));
    pve.delete_qemu(
        "pve1",
        100,
        DeleteQemu {
            purge: Some(true),
            destroy_unreferenced_disks: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let (method, path, params) = pve.0.last_request();
    assert_eq!(method, Method::DELETE);
    assert_eq!(path, "/api2/json/nodes/pve1/qemu/100");
    assert_eq!(params.get("purge"), Some("1"));
    assert_eq!(params.get("destroy-unreferenced-disks"), Some("0"));
    assert!(!params.contains("skiplock"));
}

#[tokio::test]
async fn config_roundtrip_through_families() {
    let pve = client();
    pve.0.respond_data(json!({
        "name": "web",
        "memory": "4096",
        "net0": "virtio=BC:24:11:00:00:01,bridge=vmbr0",
        "unused0": "local-lvm:vm-100-disk-1",
        "digest": "0a1b2c3d",
    }));

    let config = pve.qemu_get_config("pve1", 100, None, None).await.unwrap();
    let (_, path, _) = pve.0.last_request();
    assert_eq!(path, "/api2/json/nodes/pve1/qemu/100/config");

    let mut net = config.net();
    net.add("e1000,bridge=vmbr1".to_string());

    pve.0.respond_data(Value::Null);
    let upid = pve
        .qemu_update_config_async(
            "pve1",
            100,
            UpdateQemuConfig {
                digest: config.digest.clone(),
                net,
                delete: Some(vec!["unused0".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(upid, None);

    let (method, _, params) = pve.0.last_request();
    assert_eq!(method, Method::POST);
    assert_eq!(params.get("digest"), Some("0a1b2c3d"));
    assert_eq!(
        params.get("net0"),
        Some("virtio=BC:24:11:00:00:01,bridge=vmbr0")
    );
    assert_eq!(params.get("net1"), Some("e1000,bridge=vmbr1"));
    assert_eq!(params.get("delete"), Some("unused0"));
}

#[tokio::test]
async fn task_and_storage_queries() {
    let pve = client();
    let upid = "UPID:pve1:0000A1B2:0001C3D4:66F0A1B2:qmstart:100:root@pam:";

    pve.0.respond_data(json!({
        "id": "100",
        "node": "pve1",
        "pid": "41394",
        "starttime": 1727045042,
        "status": "stopped",
        "exitstatus": "OK",
        "type": "qmstart",
        "upid": upid,
        "user": "root@pam",
    }));
    let status = pve.get_task_status("pve1", upid).await.unwrap();
    assert!(status.is_ok());
    assert_eq!(status.pid, 41394);
    assert_eq!(
        pve.0.last_request().1,
        format!("/api2/json/nodes/pve1/tasks/{upid}/status")
    );

    pve.0.respond_data(json!([
        { "storage": "local", "type": "dir", "content": "iso,vztmpl,backup", "shared": 0 },
    ]));
    let storages = pve.list_storages(Some("dir")).await.unwrap();
    assert_eq!(storages[0].shared, Some(false));
    let (_, path, params) = pve.0.last_request();
    assert_eq!(path, "/api2/json/storage");
    assert_eq!(params.get("type"), Some("dir"));

    pve.0.respond_data(json!([
        { "vmid": "101", "status": "running", "name": "ct1" },
    ]));
    let containers = pve.list_lxc("pve1").await.unwrap();
    assert_eq!(containers[0].vmid, 101);

    pve.0.respond_data(json!({
        "release": "8.2",
        "repoid": "b2c5b9b6",
        "version": "8.2.4",
    }));
    assert_eq!(pve.version().await.unwrap().release, "8.2");

    pve.0.respond_data(json!([]));
    assert!(pve.list_backup_jobs().await.unwrap().is_empty());
}

#[tokio::test]
async fn next_id_accepts_string_and_integer() {
    let pve = client();

    pve.0.respond_data(json!("105"));
    assert_eq!(pve.cluster_next_id(None).await.unwrap(), 105);

    pve.0.respond_data(json!(106));
    assert_eq!(pve.cluster_next_id(Some(106)).await.unwrap(), 106);
    assert_eq!(pve.0.last_request().2.get("vmid"), Some("106"));

    pve.0.respond_data(json!("abc"));
    let err = pve.cluster_next_id(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn rejections_surface_as_api_errors() {
    let pve = client();
    pve.0.respond(
        400,
        json!({
            "data": null,
            "message": "Parameter verification failed.",
            "errors": { "vmid": "VM 100 already exists" },
        }),
    );

    let err = pve.cluster_next_id(Some(100)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);
    match err {
        Error::Api { status, errors, .. } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(errors["vmid"], "VM 100 already exists");
        }
        other => panic!("expected an api error, got {other:?}"),
    }
    assert_eq!(pve.0.last_request().2.get("vmid"), Some("100"));

    let err = pve
        .call(
            Verb::Get,
            "/nodes/{node}/qemu/{vmid}",
            &[("node", "pve1")],
            &ParameterSet::new(),
        )
        .await
        .unwrap_err();
    let Error::PathParameter(name) = err else {
        panic!("expected a path parameter error, got {err:?}");
    };
    assert_eq!(name, "vmid");
    assert_eq!(pve.0.requests.lock().unwrap().len(), 1);
}
