//! List the virtual machines of every node in a cluster.
//!
//! ```text
//! PVE_URL=https://pve1.lan:8006 \
//! PVE_TOKEN='root@pam!monitoring=...' \
//! PVE_FINGERPRINT=AA:BB:... \
//!     cargo run --example list_vms --features hyper-client
//! ```

use anyhow::{format_err, Error};

use proxmox_client::{Client, HttpOptions, TlsOptions, Token};
use pve_api::types::IsRunning;
use pve_api::PveClient;

fn env(name: &str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| format_err!("{name} is not set"))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let url = env("PVE_URL")?;
    let token: Token = env("PVE_TOKEN")?.parse()?;
    let tls = match std::env::var("PVE_FINGERPRINT") {
        Ok(fp) => TlsOptions::parse_fingerprint(&fp)?,
        Err(_) => TlsOptions::Verify,
    };

    let client = Client::with_options(url.parse()?, tls, HttpOptions::default())?;
    client.use_api_token(token);
    let pve = PveClient(client);

    let version = pve.version().await?;
    println!("Proxmox VE {} ({})", version.version, version.repoid);

    for node in pve.list_nodes().await? {
        println!("{} ({})", node.node, node.status);
        for vm in pve.list_qemu(&node.node, Some(true)).await? {
            let marker = match vm.status {
                IsRunning::Running => '*',
                IsRunning::Stopped => ' ',
            };
            println!(
                "  {marker} {:>6} {}",
                vm.vmid,
                vm.name.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}
