//! DigitalOcean provisioner for StackFlow
//!
//! This crate implements the Provisioner trait for DigitalOcean,
//! enabling StackFlow to create droplets and register SSH keys.
//!
//! # Requirements
//!
//! - `doctl` CLI must be installed
//! - Authentication via `doctl auth init` or a template/config token
//!
//! # Example
//!
//! ```ignore
//! use stackflow_cloud::Provisioner;
//! use stackflow_cloud_digitalocean::DigitalOceanProvider;
//!
//! let provider = DigitalOceanProvider::new(Some("do-token".to_string()));
//!
//! let auth = provider.check_auth().await?;
//! if !auth.authenticated {
//!     panic!("Not authenticated: {:?}", auth.error);
//! }
//! ```

pub mod doctl;
pub mod error;
pub mod provider;

pub use doctl::{Doctl, DropletInfo, SshKeyInfo};
pub use error::{DigitalOceanError, Result};
pub use provider::DigitalOceanProvider;
