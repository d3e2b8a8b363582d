//! Filesystem type detection from the mount table

use std::path::{Path, PathBuf};

/// One entry of the mount table
#[derive(Debug, Clone, PartialEq)]
pub struct MountEntry {
    pub mount_point: PathBuf,
    pub fs_type: String,
}

/// Parse `/proc/mounts` formatted text
pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return None;
            }
            Some(MountEntry {
                mount_point: PathBuf::from(unescape_octal(parts[1])),
                fs_type: parts[2].to_string(),
            })
        })
        .collect()
}

// /proc/mounts escapes space, tab, newline and backslash as \ooo
fn unescape_octal(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(Ok(v)) = field.get(i + 1..i + 4).map(|d| u8::from_str_radix(d, 8)) {
                out.push(v);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Filesystem type of the longest mount point containing `path`
pub fn fs_type_in(mounts: &[MountEntry], path: &Path) -> Option<String> {
    mounts
        .iter()
        .filter(|m| path.starts_with(&m.mount_point))
        .max_by_key(|m| m.mount_point.components().count())
        .map(|m| m.fs_type.clone())
}

/// Detect the filesystem type holding `path`
#[cfg(target_os = "linux")]
pub fn detect_filesystem(path: &Path) -> Option<String> {
    let path = std::fs::canonicalize(path).ok()?;
    let content = std::fs::read_to_string("/proc/mounts").ok()?;
    fs_type_in(&parse_mounts(&content), &path)
}

#[cfg(not(target_os = "linux"))]
pub fn detect_filesystem(_path: &Path) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOUNTS: &str = "\
sysfs /sys sysfs rw,nosuid 0 0
/dev/sda2 / ext4 rw,relatime 0 0
/dev/sdb1 /mnt/usb vfat rw,fmask=0022 0 0
/dev/sdc1 /mnt/usb/inner xfs rw 0 0
/dev/sdd1 /mnt/my\\040disk f2fs rw 0 0
";

    #[test]
    fn test_parse() {
        let mounts = parse_mounts(MOUNTS);
        assert_eq!(mounts.len(), 5);
        assert_eq!(mounts[1].fs_type, "ext4");
        assert_eq!(mounts[4].mount_point, PathBuf::from("/mnt/my disk"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mounts = parse_mounts(MOUNTS);
        assert_eq!(fs_type_in(&mounts, Path::new("/home/a/file")), Some("ext4".into()));
        assert_eq!(fs_type_in(&mounts, Path::new("/mnt/usb/probe.dat")), Some("vfat".into()));
        assert_eq!(fs_type_in(&mounts, Path::new("/mnt/usb/inner/x")), Some("xfs".into()));
        assert_eq!(fs_type_in(&mounts, Path::new("/mnt/my disk/x")), Some("f2fs".into()));
        // component match, not string prefix
        assert_eq!(fs_type_in(&mounts, Path::new("/mnt/usbx/file")), Some("ext4".into()));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(fs_type_in(&[], Path::new("/x")), None);
    }
}
