//! Where each server's button sits on the server list screen.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::host::Rect;

/// First ID listed on the "1000+" page.
pub const THOUSANDS_START: u32 = 1000;

/// OCR window covering the active page tab title.
pub const PAGE_CHECK_ROI: Rect = Rect::new(403, 216, 236, 131);

/// Lower list rows on the "1000+" page after scrolling, spanning every
/// calibrated 1000+ button.
pub const THOUSANDS_LIST_ROI: Rect = Rect::new(385, 432, 530, 173);

// Calibrated at 1280x720. Rows for 1000+ are only valid after scrolling down.
const BUILTIN_REGIONS: &[(u32, [i32; 4])] = &[
    (1013, [491, 432, 207, 116]),
    (1012, [600, 432, 206, 117]),
    (1011, [708, 433, 206, 115]),
    (1010, [385, 451, 206, 118]),
    (1009, [492, 452, 206, 115]),
    (1008, [600, 452, 206, 116]),
    (1007, [708, 451, 206, 117]),
    (1006, [385, 470, 204, 116]),
    (1005, [491, 470, 209, 116]),
    (1004, [600, 470, 205, 117]),
    (1003, [708, 470, 207, 117]),
    (1002, [385, 488, 205, 117]),
    (1001, [503, 489, 147, 115]),
    (1000, [610, 488, 146, 117]),
    (999, [383, 271, 205, 116]),
    (998, [491, 272, 207, 118]),
    (997, [601, 271, 205, 118]),
    (996, [708, 272, 207, 116]),
    (995, [384, 290, 207, 118]),
    (994, [491, 290, 209, 118]),
    (993, [601, 290, 204, 115]),
    (992, [709, 291, 205, 115]),
    (991, [385, 310, 203, 116]),
    (990, [493, 309, 205, 116]),
    (989, [601, 310, 203, 115]),
    (988, [708, 309, 207, 117]),
    (987, [384, 328, 206, 117]),
    (986, [493, 328, 206, 116]),
    (985, [600, 328, 206, 116]),
    (984, [708, 329, 207, 116]),
    (983, [385, 347, 206, 115]),
    (982, [492, 346, 208, 117]),
    (981, [602, 346, 206, 117]),
    (980, [708, 345, 205, 118]),
    (979, [384, 366, 207, 117]),
    (978, [492, 365, 207, 117]),
    (977, [610, 365, 143, 115]),
    (976, [719, 365, 141, 115]),
];

/// The two tabs of the server list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerPage {
    #[serde(rename = "1-999")]
    Classic,
    #[serde(rename = "1000+")]
    Thousands,
}

impl ServerPage {
    pub fn for_server(server_id: u32) -> Self {
        if server_id >= THOUSANDS_START {
            ServerPage::Thousands
        } else {
            ServerPage::Classic
        }
    }

    /// OCR pattern confirming this page is the active one.
    pub fn expected_pattern(self) -> &'static str {
        match self {
            ServerPage::Thousands => ".*1000.*",
            ServerPage::Classic => ".*1-999.*",
        }
    }

    pub fn needs_scroll(self) -> bool {
        self == ServerPage::Thousands
    }
}

impl fmt::Display for ServerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerPage::Classic => f.write_str("1-999"),
            ServerPage::Thousands => f.write_str("1000+"),
        }
    }
}

/// A `[[servers]]` entry in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOverride {
    pub id: u32,
    pub roi: Rect,
}

/// Immutable ID → button rectangle table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRegionTable {
    regions: BTreeMap<u32, Rect>,
}

impl ServerRegionTable {
    pub fn builtin() -> Self {
        Self::with_overrides(&[])
    }

    /// Built-in entries, with config entries replacing or adding IDs.
    pub fn with_overrides(overrides: &[RegionOverride]) -> Self {
        let mut regions: BTreeMap<u32, Rect> = BUILTIN_REGIONS
            .iter()
            .map(|&(id, roi)| (id, Rect::from(roi)))
            .collect();
        for o in overrides {
            regions.insert(o.id, o.roi);
        }
        Self { regions }
    }

    pub fn get(&self, server_id: u32) -> Option<Rect> {
        self.regions.get(&server_id).copied()
    }

    /// Where to look for a server's button: its own rectangle when recorded,
    /// otherwise the whole scrolled list for IDs on the "1000+" page.
    pub fn search_roi(&self, server_id: u32) -> Option<Rect> {
        self.get(server_id).or_else(|| {
            ServerPage::for_server(server_id)
                .needs_scroll()
                .then_some(THOUSANDS_LIST_ROI)
        })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, Rect)> + '_ {
        self.regions.iter().map(|(&id, &roi)| (id, roi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_entry_is_returned_exactly() {
        let table = ServerRegionTable::builtin();
        assert_eq!(table.len(), BUILTIN_REGIONS.len());
        for &(id, roi) in BUILTIN_REGIONS {
            assert_eq!(table.get(id), Some(Rect::from(roi)), "server {}", id);
        }
    }

    #[test]
    fn absent_ids_are_none() {
        let table = ServerRegionTable::builtin();
        assert_eq!(table.get(975), None);
        assert_eq!(table.get(1014), None);
        assert_eq!(table.search_roi(975), None);
    }

    #[test]
    fn unrecorded_thousands_fall_back_to_list_roi() {
        let table = ServerRegionTable::builtin();
        assert_eq!(table.search_roi(1015), Some(THOUSANDS_LIST_ROI));
        assert_eq!(table.search_roi(1001), Some(Rect::new(503, 489, 147, 115)));
        assert_eq!(table.search_roi(999), Some(Rect::new(383, 271, 205, 116)));
    }

    #[test]
    fn list_roi_covers_calibrated_thousands() {
        let table = ServerRegionTable::builtin();
        let list = THOUSANDS_LIST_ROI;
        for (id, roi) in table.iter().filter(|&(id, _)| id >= THOUSANDS_START) {
            assert!(roi.x >= list.x && roi.y >= list.y, "server {}", id);
            assert!(roi.x + roi.width <= list.x + list.width, "server {}", id);
            assert!(roi.y + roi.height <= list.y + list.height, "server {}", id);
        }
    }

    #[test]
    fn overrides_replace_and_extend() {
        let table = ServerRegionTable::with_overrides(&[
            RegionOverride { id: 978, roi: Rect::new(1, 2, 3, 4) },
            RegionOverride { id: 1014, roi: Rect::new(5, 6, 7, 8) },
        ]);
        assert_eq!(table.get(978), Some(Rect::new(1, 2, 3, 4)));
        assert_eq!(table.get(1014), Some(Rect::new(5, 6, 7, 8)));
        assert_eq!(table.get(979), Some(Rect::new(384, 366, 207, 117)));
    }

    #[test]
    fn page_split_at_one_thousand() {
        assert_eq!(ServerPage::for_server(999), ServerPage::Classic);
        assert_eq!(ServerPage::for_server(1000), ServerPage::Thousands);
        assert!(ServerPage::Thousands.needs_scroll());
        assert_eq!(ServerPage::Classic.expected_pattern(), ".*1-999.*");
        assert_eq!(ServerPage::Thousands.to_string(), "1000+");
    }
}
