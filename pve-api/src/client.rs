//! Endpoint functions on top of an [`HttpApiClient`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use proxmox_client::{ApiResponseData, Error, HttpApiClient, HttpApiResponse, ParameterSet, Verb};

use crate::types::*;

/// Prefix of the JSON formatted API.
pub const API_PREFIX: &str = "/api2/json";

/// Substitute the `{name}` placeholders of a resource path template.
///
/// Identifiers are inserted verbatim, no escaping takes place. Identifiers without a matching
/// placeholder are ignored, a placeholder without identifier is an error. The result always
/// starts with a `/`.
pub fn expand_path(template: &str, identifiers: &[(&str, &str)]) -> Result<String, Error> {
    let mut path = String::with_capacity(template.len() + 16);
    if !template.starts_with('/') {
        path.push('/');
    }

    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let name = &rest[(start + 1)..(start + len)];
        let value = identifiers
            .iter()
            .find(|(id, _)| *id == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| Error::PathParameter(name.to_string()))?;

        path.push_str(&rest[..start]);
        path.push_str(value);
        rest = &rest[(start + len + 1)..];
    }
    path.push_str(rest);

    Ok(path)
}

/// The next free id is documented as an integer but sent as a string by most versions.
#[derive(Deserialize)]
struct NextId(#[serde(deserialize_with = "proxmox_serde::perl::deserialize_u32")] u32);

/// Proxmox VE API client.
///
/// Only a representative subset of the API is covered by dedicated functions, everything else
/// is reachable via [`call`](PveClient::call).
pub struct PveClient<T: HttpApiClient>(pub T);

impl<T: HttpApiClient> PveClient<T> {
    /// Perform an arbitrary API call and return the undecoded `data` member.
    ///
    /// `template` is a path below `/api2/json`, for example `/nodes/{node}/qemu/{vmid}/config`.
    pub async fn call(
        &self,
        verb: Verb,
        template: &str,
        identifiers: &[(&str, &str)],
        params: &ParameterSet,
    ) -> Result<ApiResponseData<Value>, Error> {
        self.dispatch(verb, template, identifiers, params)
            .await?
            .expect_json()
    }

    async fn dispatch(
        &self,
        verb: Verb,
        template: &str,
        identifiers: &[(&str, &str)],
        params: &ParameterSet,
    ) -> Result<HttpApiResponse, Error> {
        let path = format!("{API_PREFIX}{}", expand_path(template, identifiers)?);
        self.0.call(verb, &path, params).await
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        verb: Verb,
        template: &str,
        identifiers: &[(&str, &str)],
        params: &ParameterSet,
    ) -> Result<R, Error> {
        Ok(self
            .dispatch(verb, template, identifiers, params)
            .await?
            .expect_json()?
            .data)
    }

    /// API version details, including some parts of the global datacenter config.
    pub async fn version(&self) -> Result<VersionResponse, Error> {
        self.fetch(Verb::Get, "/version", &[], &ParameterSet::new())
            .await
    }

    /// Resources index (cluster wide).
    pub async fn cluster_resources(
        &self,
        ty: Option<ClusterResourceKind>,
    ) -> Result<Vec<ClusterResource>, Error> {
        let mut params = ParameterSet::new();
        params.maybe_arg("type", ty);
        self.fetch(Verb::Get, "/cluster/resources", &[], &params)
            .await
    }

    /// Get the next free VMID, or check whether `vmid` is still available.
    ///
    /// The remote rejects an id which is already in use.
    pub async fn cluster_next_id(&self, vmid: Option<u32>) -> Result<u32, Error> {
        let mut params = ParameterSet::new();
        params.maybe_arg("vmid", vmid);
        let id: NextId = self
            .fetch(Verb::Get, "/cluster/nextid", &[], &params)
            .await?;
        Ok(id.0)
    }

    /// List vzdump backup schedules.
    pub async fn list_backup_jobs(&self) -> Result<Vec<BackupJob>, Error> {
        self.fetch(Verb::Get, "/cluster/backup", &[], &ParameterSet::new())
            .await
    }

    /// Create a new vzdump backup job.
    pub async fn create_backup_job(&self, params: CreateBackupJob) -> Result<(), Error> {
        let CreateBackupJob {
            id: p_id,
            all: p_all,
            comment: p_comment,
            compress: p_compress,
            enabled: p_enabled,
            exclude_path: p_exclude_path,
            mailto: p_mailto,
            mode: p_mode,
            node: p_node,
            notes_template: p_notes_template,
            pool: p_pool,
            protected: p_protected,
            prune_backups: p_prune_backups,
            repeat_missed: p_repeat_missed,
            schedule: p_schedule,
            storage: p_storage,
            vmid: p_vmid,
        } = params;

        let mut params = ParameterSet::new();
        params
            .maybe_arg("id", p_id)
            .maybe_bool_arg("all", p_all)
            .maybe_arg("comment", p_comment)
            .maybe_arg("compress", p_compress)
            .maybe_bool_arg("enabled", p_enabled)
            .maybe_list_arg("exclude-path", p_exclude_path.as_deref())
            .maybe_arg("mailto", p_mailto)
            .maybe_arg("mode", p_mode)
            .maybe_arg("node", p_node)
            .maybe_arg("notes-template", p_notes_template)
            .maybe_arg("pool", p_pool)
            .maybe_bool_arg("protected", p_protected)
            .maybe_arg("prune-backups", p_prune_backups)
            .maybe_bool_arg("repeat-missed", p_repeat_missed)
            .maybe_arg("schedule", p_schedule)
            .maybe_arg("storage", p_storage)
            .maybe_arg("vmid", p_vmid);

        self.dispatch(Verb::Create, "/cluster/backup", &[], &params)
            .await?
            .nodata()
    }

    /// Read vzdump backup job definition.
    pub async fn get_backup_job(&self, id: &str) -> Result<BackupJob, Error> {
        self.fetch(
            Verb::Get,
            "/cluster/backup/{id}",
            &[("id", id)],
            &ParameterSet::new(),
        )
        .await
    }

    /// Update vzdump backup job definition.
    pub async fn update_backup_job(&self, id: &str, params: UpdateBackupJob) -> Result<(), Error> {
        let UpdateBackupJob {
            all: p_all,
            comment: p_comment,
            compress: p_compress,
            delete: p_delete,
            enabled: p_enabled,
            exclude_path: p_exclude_path,
            mailto: p_mailto,
            mode: p_mode,
            node: p_node,
            notes_template: p_notes_template,
            pool: p_pool,
            protected: p_protected,
            prune_backups: p_prune_backups,
            repeat_missed: p_repeat_missed,
            schedule: p_schedule,
            storage: p_storage,
            vmid: p_vmid,
        } = params;

        let mut params = ParameterSet::new();
        params
            .maybe_bool_arg("all", p_all)
            .maybe_arg("comment", p_comment)
            .maybe_arg("compress", p_compress)
            .maybe_arg("delete", p_delete.map(|list| list.join(",")))
            .maybe_bool_arg("enabled", p_enabled)
            .maybe_list_arg("exclude-path", p_exclude_path.as_deref())
            .maybe_arg("mailto", p_mailto)
            .maybe_arg("mode", p_mode)
            .maybe_arg("node", p_node)
            .maybe_arg("notes-template", p_notes_template)
            .maybe_arg("pool", p_pool)
            .maybe_bool_arg("protected", p_protected)
            .maybe_arg("prune-backups", p_prune_backups)
            .maybe_bool_arg("repeat-missed", p_repeat_missed)
            .maybe_arg("schedule", p_schedule)
            .maybe_arg("storage", p_storage)
            .maybe_arg("vmid", p_vmid);

        self.dispatch(Verb::Set, "/cluster/backup/{id}", &[("id", id)], &params)
            .await?
            .nodata()
    }

    /// Delete vzdump backup job definition.
    pub async fn delete_backup_job(&self, id: &str) -> Result<(), Error> {
        self.dispatch(
            Verb::Delete,
            "/cluster/backup/{id}",
            &[("id", id)],
            &ParameterSet::new(),
        )
        .await?
        .nodata()
    }

    /// Create a new external metric server config.
    pub async fn create_metrics_server(
        &self,
        id: &str,
        params: CreateMetricsServer,
    ) -> Result<(), Error> {
        let CreateMetricsServer {
            ty: p_ty,
            server: p_server,
            port: p_port,
            api_path_prefix: p_api_path_prefix,
            bucket: p_bucket,
            disable: p_disable,
            influxdbproto: p_influxdbproto,
            max_body_size: p_max_body_size,
            mtu: p_mtu,
            organization: p_organization,
            path: p_path,
            proto: p_proto,
            timeout: p_timeout,
            token: p_token,
            verify_certificate: p_verify_certificate,
        } = params;

        let mut params = ParameterSet::new();
        params
            .arg("type", p_ty)
            .arg("server", p_server)
            .arg("port", p_port)
            .maybe_arg("api-path-prefix", p_api_path_prefix)
            .maybe_arg("bucket", p_bucket)
            .maybe_bool_arg("disable", p_disable)
            .maybe_arg("influxdbproto", p_influxdbproto)
            .maybe_arg("max-body-size", p_max_body_size)
            .maybe_arg("mtu", p_mtu)
            .maybe_arg("organization", p_organization)
            .maybe_arg("path", p_path)
            .maybe_arg("proto", p_proto)
            .maybe_arg("timeout", p_timeout)
            .maybe_arg("token", p_token)
            .maybe_bool_arg("verify-certificate", p_verify_certificate);

        self.dispatch(
            Verb::Create,
            "/cluster/metrics/server/{id}",
            &[("id", id)],
            &params,
        )
        .await?
        .nodata()
    }

    /// Cluster node index.
    pub async fn list_nodes(&self) -> Result<Vec<ClusterNodeIndexResponse>, Error> {
        self.fetch(Verb::Get, "/nodes", &[], &ParameterSet::new())
            .await
    }

    /// Virtual machine index (per node).
    pub async fn list_qemu(&self, node: &str, full: Option<bool>) -> Result<Vec<VmEntry>, Error> {
        let mut params = ParameterSet::new();
        params.maybe_bool_arg("full", full);
        self.fetch(Verb::Get, "/nodes/{node}/qemu", &[("node", node)], &params)
            .await
    }

    /// Create a virtual machine. Returns the UPID of the creation task.
    pub async fn create_qemu(&self, node: &str, params: CreateQemu) -> Result<PveUpid, Error> {
        let CreateQemu {
            vmid: p_vmid,
            agent: p_agent,
            arch: p_arch,
            boot: p_boot,
            cores: p_cores,
            cpu: p_cpu,
            description: p_description,
            unique: p_unique,
            memory: p_memory,
            name: p_name,
            onboot: p_onboot,
            ostype: p_ostype,
            pool: p_pool,
            protection: p_protection,
            scsihw: p_scsihw,
            sockets: p_sockets,
            start: p_start,
            storage: p_storage,
            tags: p_tags,
            template: p_template,
            hostpci: p_hostpci,
            ide: p_ide,
            net: p_net,
            numa: p_numa,
            sata: p_sata,
            scsi: p_scsi,
            serial: p_serial,
            unused: p_unused,
            usb: p_usb,
            virtio: p_virtio,
        } = params;

        let mut params = ParameterSet::new();
        params
            .arg("vmid", p_vmid)
            .maybe_arg("agent", p_agent)
            .maybe_arg("arch", p_arch)
            .maybe_arg("boot", p_boot)
            .maybe_arg("cores", p_cores)
            .maybe_arg("cpu", p_cpu)
            .maybe_arg("description", p_description)
            .maybe_bool_arg("unique", p_unique)
            .maybe_arg("memory", p_memory)
            .maybe_arg("name", p_name)
            .maybe_bool_arg("onboot", p_onboot)
            .maybe_arg("ostype", p_ostype)
            .maybe_arg("pool", p_pool)
            .maybe_bool_arg("protection", p_protection)
            .maybe_arg("scsihw", p_scsihw)
            .maybe_arg("sockets", p_sockets)
            .maybe_bool_arg("start", p_start)
            .maybe_arg("storage", p_storage)
            .maybe_arg("tags", p_tags)
            .maybe_bool_arg("template", p_template)
            .indexed_args("hostpci", &p_hostpci)
            .indexed_args("ide", &p_ide)
            .indexed_args("net", &p_net)
            .indexed_args("numa", &p_numa)
            .indexed_args("sata", &p_sata)
            .indexed_args("scsi", &p_scsi)
            .indexed_args("serial", &p_serial)
            .indexed_args("unused", &p_unused)
            .indexed_args("usb", &p_usb)
            .indexed_args("virtio", &p_virtio);

        self.fetch(
            Verb::Create,
            "/nodes/{node}/qemu",
            &[("node", node)],
            &params,
        )
        .await
    }

    /// Get the virtual machine configuration with pending configuration changes applied. Set
    /// `current` to get the current configuration instead.
    pub async fn qemu_get_config(
        &self,
        node: &str,
        vmid: u32,
        current: Option<bool>,
        snapshot: Option<String>,
    ) -> Result<QemuConfig, Error> {
        let vmid = vmid.to_string();
        let mut params = ParameterSet::new();
        params
            .maybe_bool_arg("current", current)
            .maybe_arg("snapshot", snapshot);
        self.fetch(
            Verb::Get,
            "/nodes/{node}/qemu/{vmid}/config",
            &[("node", node), ("vmid", vmid.as_str())],
            &params,
        )
        .await
    }

    /// Set virtual machine options (asynchronous API). Returns a task UPID if the change
    /// required one.
    pub async fn qemu_update_config_async(
        &self,
        node: &str,
        vmid: u32,
        params: UpdateQemuConfig,
    ) -> Result<Option<PveUpid>, Error> {
        let vmid = vmid.to_string();
        let UpdateQemuConfig {
            agent: p_agent,
            boot: p_boot,
            cores: p_cores,
            cpu: p_cpu,
            delete: p_delete,
            description: p_description,
            digest: p_digest,
            memory: p_memory,
            name: p_name,
            onboot: p_onboot,
            ostype: p_ostype,
            protection: p_protection,
            revert: p_revert,
            scsihw: p_scsihw,
            skiplock: p_skiplock,
            sockets: p_sockets,
            tags: p_tags,
            hostpci: p_hostpci,
            ide: p_ide,
            net: p_net,
            numa: p_numa,
            sata: p_sata,
            scsi: p_scsi,
            serial: p_serial,
            unused: p_unused,
            usb: p_usb,
            virtio: p_virtio,
        } = params;

        let mut params = ParameterSet::new();
        params
            .maybe_arg("agent", p_agent)
            .maybe_arg("boot", p_boot)
            .maybe_arg("cores", p_cores)
            .maybe_arg("cpu", p_cpu)
            .maybe_arg("delete", p_delete.map(|list| list.join(",")))
            .maybe_arg("description", p_description)
            .maybe_arg("digest", p_digest)
            .maybe_arg("memory", p_memory)
            .maybe_arg("name", p_name)
            .maybe_bool_arg("onboot", p_onboot)
            .maybe_arg("ostype", p_ostype)
            .maybe_bool_arg("protection", p_protection)
            .maybe_arg("revert", p_revert.map(|list| list.join(",")))
            .maybe_arg("scsihw", p_scsihw)
            .maybe_bool_arg("skiplock", p_skiplock)
            .maybe_arg("sockets", p_sockets)
            .maybe_arg("tags", p_tags)
            .indexed_args("hostpci", &p_hostpci)
            .indexed_args("ide", &p_ide)
            .indexed_args("net", &p_net)
            .indexed_args("numa", &p_numa)
            .indexed_args("sata", &p_sata)
            .indexed_args("scsi", &p_scsi)
            .indexed_args("serial", &p_serial)
            .indexed_args("unused", &p_unused)
            .indexed_args("usb", &p_usb)
            .indexed_args("virtio", &p_virtio);

        self.fetch(
            Verb::Create,
            "/nodes/{node}/qemu/{vmid}/config",
            &[("node", node), ("vmid", vmid.as_str())],
            &params,
        )
        .await
    }

    /// Destroy the VM and all used/owned volumes.
    pub async fn delete_qemu(
        &self,
        node: &str,
        vmid: u32,
        params: DeleteQemu,
    ) -> Result<PveUpid, Error> {
        let vmid = vmid.to_string();
        let DeleteQemu {
            destroy_unreferenced_disks: p_destroy_unreferenced_disks,
            purge: p_purge,
            skiplock: p_skiplock,
        } = params;

        let mut params = ParameterSet::new();
        params
            .maybe_bool_arg("destroy-unreferenced-disks", p_destroy_unreferenced_disks)
            .maybe_bool_arg("purge", p_purge)
            .maybe_bool_arg("skiplock", p_skiplock);

        self.fetch(
            Verb::Delete,
            "/nodes/{node}/qemu/{vmid}",
            &[("node", node), ("vmid", vmid.as_str())],
            &params,
        )
        .await
    }

    /// Start virtual machine.
    pub async fn start_qemu_async(
        &self,
        node: &str,
        vmid: u32,
        params: StartQemu,
    ) -> Result<PveUpid, Error> {
        let vmid = vmid.to_string();
        let StartQemu {
            force_cpu: p_force_cpu,
            machine: p_machine,
            migratedfrom: p_migratedfrom,
            skiplock: p_skiplock,
            timeout: p_timeout,
        } = params;

        let mut params = ParameterSet::new();
        params
            .maybe_arg("force-cpu", p_force_cpu)
            .maybe_arg("machine", p_machine)
            .maybe_arg("migratedfrom", p_migratedfrom)
            .maybe_bool_arg("skiplock", p_skiplock)
            .maybe_arg("timeout", p_timeout);

        self.fetch(
            Verb::Create,
            "/nodes/{node}/qemu/{vmid}/status/start",
            &[("node", node), ("vmid", vmid.as_str())],
            &params,
        )
        .await
    }

    /// Stop virtual machine. The qemu process will exit immediately, this is akin to pulling
    /// the power plug of a running computer and may damage the VM data.
    pub async fn stop_qemu_async(
        &self,
        node: &str,
        vmid: u32,
        params: StopQemu,
    ) -> Result<PveUpid, Error> {
        let vmid = vmid.to_string();
        let StopQemu {
            keep_active: p_keep_active,
            migratedfrom: p_migratedfrom,
            overrule_shutdown: p_overrule_shutdown,
            skiplock: p_skiplock,
            timeout: p_timeout,
        } = params;

        let mut params = ParameterSet::new();
        params
            .maybe_bool_arg("keepActive", p_keep_active)
            .maybe_arg("migratedfrom", p_migratedfrom)
            .maybe_bool_arg("overrule-shutdown", p_overrule_shutdown)
            .maybe_bool_arg("skiplock", p_skiplock)
            .maybe_arg("timeout", p_timeout);

        self.fetch(
            Verb::Create,
            "/nodes/{node}/qemu/{vmid}/status/stop",
            &[("node", node), ("vmid", vmid.as_str())],
            &params,
        )
        .await
    }

    /// LXC container index (per node).
    pub async fn list_lxc(&self, node: &str) -> Result<Vec<LxcEntry>, Error> {
        self.fetch(
            Verb::Get,
            "/nodes/{node}/lxc",
            &[("node", node)],
            &ParameterSet::new(),
        )
        .await
    }

    /// Read task status.
    pub async fn get_task_status(&self, node: &str, upid: &str) -> Result<TaskStatus, Error> {
        self.fetch(
            Verb::Get,
            "/nodes/{node}/tasks/{upid}/status",
            &[("node", node), ("upid", upid)],
            &ParameterSet::new(),
        )
        .await
    }

    /// Storage index, optionally filtered by storage type.
    pub async fn list_storages(&self, ty: Option<&str>) -> Result<Vec<StorageInfo>, Error> {
        let mut params = ParameterSet::new();
        params.maybe_arg("type", ty);
        self.fetch(Verb::Get, "/storage", &[], &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_expansion() {
        let ids = [("node", "pve1"), ("vmid", "100")];
        let path = expand_path("/nodes/{node}/qemu/{vmid}", &ids).unwrap();
        assert_eq!(path, "/nodes/pve1/qemu/100");

        let path = expand_path("/cluster/resources", &[]).unwrap();
        assert_eq!(path, "/cluster/resources");
        assert_eq!(expand_path("version", &[]).unwrap(), "/version");

        // verbatim, no escaping
        let upid = "UPID:pve1:0000A1B2:qmstart:100:root@pam:";
        let path = expand_path("/nodes/{node}/tasks/{upid}/status", &[("upid", upid), ids[0]]);
        assert_eq!(
            path.unwrap(),
            "/nodes/pve1/tasks/UPID:pve1:0000A1B2:qmstart:100:root@pam:/status"
        );

        // unused identifiers are ignored
        assert_eq!(expand_path("/nodes/{node}", &ids).unwrap(), "/nodes/pve1");
    }

    #[test]
    fn missing_path_parameter() {
        let err = expand_path("/nodes/{node}/qemu/{vmid}", &[("node", "pve1")]).unwrap_err();
        assert!(matches!(&err, Error::PathParameter(name) if name == "vmid"));
        assert_eq!(err.kind(), proxmox_client::ErrorKind::Local);
    }
}
