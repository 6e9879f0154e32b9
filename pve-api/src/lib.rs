//! Proxmox VE API client.
//!
//! A thin layer of typed endpoint functions on top of [`proxmox_client`]. Each function builds
//! a [`ParameterSet`](proxmox_client::ParameterSet) from its arguments, expands the resource
//! path and hands both to the shared [`HttpApiClient`](proxmox_client::HttpApiClient).

mod client;
pub use client::{expand_path, PveClient, API_PREFIX};

pub mod types;

pub use proxmox_client::{ApiResponseData, Error, ErrorKind, IndexedFamily, ParameterSet, Verb};
