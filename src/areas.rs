//! Pure grouping and filtering over synced data. No network access here.
use std::collections::HashMap;
use tracing::warn;

use crate::model::{AreaGroup, Asset, MachineRecord};

/// One `AreaGroup` per distinct `area_name`, in first-seen order.
///
/// The first occurrence wins; a later record that disagrees on province or
/// block is logged as a data-quality warning and otherwise ignored.
pub fn group_areas(records: &[MachineRecord]) -> Vec<AreaGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<AreaGroup> = Vec::new();
    for record in records {
        match index.get(record.area_name.as_str()) {
            Some(&at) => {
                let first = &groups[at];
                if first.province != record.province || first.block != record.block {
                    warn!(
                        area = %record.area_name,
                        first_province = %first.province,
                        later_province = %record.province,
                        "conflicting duplicate area metadata; keeping first occurrence"
                    );
                }
            }
            None => {
                index.insert(record.area_name.as_str(), groups.len());
                groups.push(AreaGroup {
                    area_name: record.area_name.clone(),
                    province: record.province.clone(),
                    block: record.block.clone(),
                });
            }
        }
    }
    groups
}

/// Assets whose filename contains the province key, case-insensitively.
///
/// This matches on the raw `name`, not the derived `province` field, because
/// upstream province labels are not normalized; the loose substring match is
/// deliberate and kept for compatibility with the published data.
pub fn filter_by_province<'a>(assets: &'a [Asset], province_key: &str) -> Vec<&'a Asset> {
    let needle = province_key.to_ascii_lowercase();
    assets
        .iter()
        .filter(|asset| asset.name.to_ascii_lowercase().contains(&needle))
        .collect()
}

/// Exact lookup by the filename-derived identity or the raw filename.
/// `None` means "no selection yet", never a failure.
pub fn find_by_area_name<'a>(assets: &'a [Asset], area_name: &str) -> Option<&'a Asset> {
    assets
        .iter()
        .find(|asset| asset.name == area_name || identity(asset) == area_name)
}

/// Most-downloaded assets, descending, capped at `limit`. Assets never
/// downloaded are excluded.
pub fn top_downloads<'a>(assets: &'a [Asset], limit: usize) -> Vec<&'a Asset> {
    let mut popular: Vec<&Asset> = assets
        .iter()
        .filter(|asset| asset.download_count > 0)
        .collect();
    popular.sort_by(|a, b| b.download_count.cmp(&a.download_count));
    popular.truncate(limit);
    popular
}

/// Reconstruct the `<province-slug>-<town-or-block>` identity from derived
/// fields. The inverse of the filename heuristic for well-formed names.
fn identity(asset: &Asset) -> String {
    let tail = match (&asset.town, asset.block) {
        (Some(town), _) => town.clone(),
        (None, Some(block)) => block.to_string(),
        (None, None) => String::new(),
    };
    if asset.province.is_empty() {
        tail
    } else {
        format!("{}-{}", asset.province.replace(' ', "-"), tail)
    }
}
