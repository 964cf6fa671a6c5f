use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::image_loader::{is_supported_image, SUPPORTED_IMAGE_EXTENSIONS};
use crate::types::{Device, ScreenshotPair, SkipKind, SkippedArtifact};

use super::pages::find_files;

/// Split `<base>.<device>.<ext>` into base name and device.
pub fn parse_screenshot_name(path: &Path) -> Option<(String, Device)> {
    if !is_supported_image(path) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (base, device) = stem.rsplit_once('.')?;
    if base.is_empty() {
        return None;
    }
    let device = device.parse::<Device>().ok()?;
    Some((base.to_string(), device))
}

#[derive(Debug, Default)]
pub struct ScreenshotInventory {
    /// Complete pairs, sorted by base name.
    pub pairs: Vec<ScreenshotPair>,
    pub skipped: Vec<SkippedArtifact>,
}

#[derive(Default)]
struct PartialPair {
    desktop: Option<PathBuf>,
    mobile: Option<PathBuf>,
}

/// Recursively collect desktop/mobile captures and group them by base name.
///
/// A base name with only one device captured is reported, not paired. When the same
/// base name and device appear in several directories the first path (sorted) wins.
pub fn find_screenshot_pairs(screenshot_root: &Path) -> ScreenshotInventory {
    let mut inventory = ScreenshotInventory::default();
    if !screenshot_root.is_dir() {
        ::log::warn!(
            "Screenshot directory {} does not exist",
            screenshot_root.display()
        );
        inventory.skipped.push(SkippedArtifact::new(
            screenshot_root.display().to_string(),
            SkipKind::DiscoveryEmpty,
            "screenshot directory does not exist",
        ));
        return inventory;
    }

    let (files, skipped) = find_files(screenshot_root, SUPPORTED_IMAGE_EXTENSIONS);
    inventory.skipped.extend(skipped);

    let mut grouped: BTreeMap<String, PartialPair> = BTreeMap::new();
    for path in files {
        let Some((base, device)) = parse_screenshot_name(&path) else {
            continue;
        };
        let slot = grouped.entry(base).or_default();
        let target = match device {
            Device::Desktop => &mut slot.desktop,
            Device::Mobile => &mut slot.mobile,
        };
        if let Some(existing) = target.as_ref() {
            ::log::debug!(
                "Ignoring duplicate {} capture {} (keeping {})",
                device,
                path.display(),
                existing.display()
            );
            continue;
        }
        *target = Some(path);
    }

    for (base_name, partial) in grouped {
        match (partial.desktop, partial.mobile) {
            (Some(desktop), Some(mobile)) => inventory.pairs.push(ScreenshotPair {
                base_name,
                desktop,
                mobile,
            }),
            (Some(only), None) => {
                inventory
                    .skipped
                    .push(incomplete(&only, &base_name, Device::Mobile));
            }
            (None, Some(only)) => {
                inventory
                    .skipped
                    .push(incomplete(&only, &base_name, Device::Desktop));
            }
            (None, None) => {}
        }
    }

    inventory
}

fn incomplete(present: &Path, base_name: &str, missing: Device) -> SkippedArtifact {
    SkippedArtifact::new(
        present.display().to_string(),
        SkipKind::DiscoveryEmpty,
        format!("no {missing} capture for '{base_name}'"),
    )
}
