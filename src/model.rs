#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::fs_ops::{format_time, human_size};

pub const PARENT_LINK_NAME: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_parent_link: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl Entry {
    pub fn parent_link(parent: &Path) -> Self {
        Self {
            name: PARENT_LINK_NAME.to_string(),
            path: parent.to_path_buf(),
            is_dir: true,
            is_parent_link: true,
            size: 0,
            modified: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Mounts,
    Input,
    View,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClipboardMode {
    #[default]
    None,
    Copy,
    Cut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: Option<PathBuf>,
}

/// One row of a list view: a catalog entry or a block device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    File(Entry),
    Mount(MountEntry),
}

impl ListItem {
    pub fn title(&self) -> &str {
        match self {
            ListItem::File(entry) => &entry.name,
            ListItem::Mount(mount) => &mount.device,
        }
    }

    pub fn description(&self, marked: bool) -> String {
        match self {
            ListItem::File(entry) => {
                let mut desc = if entry.is_parent_link {
                    "Parent Directory".to_string()
                } else if entry.is_dir {
                    "Directory".to_string()
                } else {
                    let when = format_time(entry.modified);
                    if when.is_empty() {
                        format!("File  {}", human_size(entry.size))
                    } else {
                        format!("File  {}  {}", human_size(entry.size), when)
                    }
                };
                if marked && !entry.is_parent_link {
                    desc.push_str(" [Marked]");
                }
                desc
            }
            ListItem::Mount(mount) => match &mount.mount_point {
                None => "Unmounted".to_string(),
                Some(point) => format!("Mounted at {}", point.display()),
            },
        }
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            ListItem::File(entry) => Some(entry),
            ListItem::Mount(_) => None,
        }
    }

    pub fn as_mount(&self) -> Option<&MountEntry> {
        match self {
            ListItem::Mount(mount) => Some(mount),
            ListItem::File(_) => None,
        }
    }

    /// Whether both rows stand for the same file or device, ignoring
    /// metadata that may change between refreshes.
    pub fn same_item(&self, other: &ListItem) -> bool {
        match (self, other) {
            (ListItem::File(a), ListItem::File(b)) => {
                a.path == b.path && a.is_parent_link == b.is_parent_link
            }
            (ListItem::Mount(a), ListItem::Mount(b)) => a.device == b.device,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Entry {
        Entry {
            name: name.to_string(),
            path: PathBuf::from("/data").join(name),
            is_dir: false,
            is_parent_link: false,
            size: 2048,
            modified: None,
        }
    }

    #[test]
    fn file_descriptions() {
        let parent = ListItem::File(Entry::parent_link(Path::new("/")));
        assert_eq!(parent.title(), "..");
        assert_eq!(parent.description(true), "Parent Directory");

        let mut dir = file("docs");
        dir.is_dir = true;
        assert_eq!(ListItem::File(dir).description(false), "Directory");

        let plain = ListItem::File(file("a.txt"));
        assert_eq!(plain.description(false), "File  2.0 KB");
        assert_eq!(plain.description(true), "File  2.0 KB [Marked]");
    }

    #[test]
    fn mount_descriptions() {
        let unmounted = ListItem::Mount(MountEntry {
            device: "/dev/sdb1".to_string(),
            mount_point: None,
        });
        assert_eq!(unmounted.title(), "/dev/sdb1");
        assert_eq!(unmounted.description(false), "Unmounted");

        let mounted = ListItem::Mount(MountEntry {
            device: "/dev/sdb1".to_string(),
            mount_point: Some(PathBuf::from("/media/usb")),
        });
        assert_eq!(mounted.description(false), "Mounted at /media/usb");
        assert!(mounted.same_item(&unmounted));
    }
}
