#![forbid(unsafe_code)]

//! Block device listing and mounting through `lsblk` and `udisksctl`.

use std::path::PathBuf;
use std::process::Command;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::MountEntry;

/// The external programs behind the mount view.
pub trait DeviceTool {
    /// Raw device listing, one `device [mountpoint]` per line.
    fn list(&mut self) -> Result<String>;
    fn mount(&mut self, device: &str) -> Result<()>;
    fn unmount(&mut self, device: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct Udisks;

impl DeviceTool for Udisks {
    fn list(&mut self) -> Result<String> {
        let output = Command::new("lsblk")
            .args(["-nrpo", "NAME,MOUNTPOINT"])
            .output()
            .map_err(|source| Error::Command {
                program: "lsblk".to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(Error::CommandStatus {
                program: "lsblk".to_string(),
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn mount(&mut self, device: &str) -> Result<()> {
        udisksctl("mount", device)
    }

    fn unmount(&mut self, device: &str) -> Result<()> {
        udisksctl("unmount", device)
    }
}

fn udisksctl(verb: &str, device: &str) -> Result<()> {
    let program = format!("udisksctl {verb}");
    let output = Command::new("udisksctl")
        .args([verb, "-b", device])
        .output()
        .map_err(|source| Error::Command {
            program: program.clone(),
            source,
        })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(Error::CommandStatus {
            program,
            status: output.status,
        })
    }
}

pub struct MountController {
    tool: Box<dyn DeviceTool>,
}

impl std::fmt::Debug for MountController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountController").finish_non_exhaustive()
    }
}

impl MountController {
    pub fn new(tool: Box<dyn DeviceTool>) -> Self {
        Self { tool }
    }

    pub fn enumerate(&mut self) -> Result<Vec<MountEntry>> {
        let listing = self.tool.list()?;
        Ok(parse_listing(&listing))
    }

    pub fn mount(&mut self, device: &str) -> Result<()> {
        let result = self.tool.mount(device);
        log_outcome("mount", device, &result);
        result
    }

    pub fn unmount(&mut self, device: &str) -> Result<()> {
        let result = self.tool.unmount(device);
        log_outcome("unmount", device, &result);
        result
    }
}

fn log_outcome(op: &str, device: &str, result: &Result<()>) {
    match result {
        Ok(()) => info!(device, "{op} requested"),
        Err(err) => warn!(device, "{op} failed: {err}"),
    }
}

/// Parses `lsblk -nrpo NAME,MOUNTPOINT` output. Blank lines are skipped and
/// a line without a second field is an unmounted device.
pub fn parse_listing(listing: &str) -> Vec<MountEntry> {
    listing
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = fields.next()?;
            let mount_point = fields
                .next()
                .map(|point| PathBuf::from(decode_escapes(point)));
            Some(MountEntry {
                device: decode_escapes(device),
                mount_point,
            })
        })
        .collect()
}

/// Undoes the `\xHH` escaping lsblk applies in raw mode (spaces in mount
/// points come through as `\x20`).
fn decode_escapes(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'x') {
            let hex = field
                .get(i + 2..i + 4)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(byte) = hex {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
