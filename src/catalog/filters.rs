//! Aptitude and category filters over a catalog
//!
//! Every filter returns entry indices in on-screen order. Only available
//! entries are considered unless `include_virtual` is set, in which case
//! unobtained virtual entries are included too.

use crate::catalog::table::Catalog;
use crate::core::types::{RunningStyle, TrackDistance, TrackSurface};
use crate::reference::conditions::ActivationProfile;

impl Catalog {
    fn select(&self, include_virtual: bool, keep: impl Fn(usize) -> bool) -> Vec<usize> {
        (0..self.len())
            .filter(|&idx| {
                let entry = self.entry(idx);
                entry.is_available() || (include_virtual && entry.is_virtual && !entry.obtained)
            })
            .filter(|&idx| keep(idx))
            .collect()
    }

    fn activation(&self, idx: usize) -> &ActivationProfile {
        &self.entry(idx).record.activation
    }

    pub fn available(&self) -> Vec<usize> {
        self.select(false, |_| true)
    }

    pub fn obtained(&self) -> Vec<usize> {
        (0..self.len()).filter(|&idx| self.entry(idx).obtained).collect()
    }

    /// Unobtained entries that exist only by inference
    pub fn virtual_entries(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&idx| {
                let entry = self.entry(idx);
                entry.is_virtual && !entry.obtained
            })
            .collect()
    }

    pub fn unobtained(&self, include_virtual: bool) -> Vec<usize> {
        self.select(include_virtual, |_| true)
    }

    pub fn negative(&self, include_virtual: bool) -> Vec<usize> {
        self.select(include_virtual, |idx| self.entry(idx).record.is_negative())
    }

    pub fn inherited_unique(&self, include_virtual: bool) -> Vec<usize> {
        self.select(include_virtual, |idx| {
            self.entry(idx).record.is_inherited_unique()
        })
    }

    /// Entries restricted to `style`, or to any style when `None`
    pub fn running_style(&self, style: Option<RunningStyle>, include_virtual: bool) -> Vec<usize> {
        self.select(include_virtual, |idx| match (style, self.activation(idx).running_style) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(wanted), Some(actual)) => wanted == actual,
        })
    }

    pub fn track_distance(
        &self,
        distance: Option<TrackDistance>,
        include_virtual: bool,
    ) -> Vec<usize> {
        self.select(include_virtual, |idx| match (distance, self.activation(idx).track_distance) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(wanted), Some(actual)) => wanted == actual,
        })
    }

    pub fn track_surface(&self, surface: Option<TrackSurface>, include_virtual: bool) -> Vec<usize> {
        self.select(include_virtual, |idx| match (surface, self.activation(idx).track_surface) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(wanted), Some(actual)) => wanted == actual,
        })
    }

    /// Positional skills suiting `style` (any inferred style when `None`),
    /// excluding those with an explicit style requirement
    pub fn inferred_running_style(
        &self,
        style: Option<RunningStyle>,
        include_virtual: bool,
    ) -> Vec<usize> {
        let explicit = self.running_style(style, include_virtual);
        self.select(include_virtual, |idx| {
            let inferred = &self.activation(idx).inferred_running_styles;
            let matches = match style {
                None => !inferred.is_empty(),
                Some(wanted) => inferred.contains(&wanted),
            };
            matches && !explicit.contains(&idx)
        })
    }

    /// Entries with no style, distance or surface requirement that are not
    /// positional skills for `style`
    pub fn aptitude_independent(
        &self,
        style: Option<RunningStyle>,
        include_virtual: bool,
    ) -> Vec<usize> {
        let inferred = self.inferred_running_style(style, include_virtual);
        self.select(include_virtual, |idx| {
            self.activation(idx).is_unrestricted() && !inferred.contains(&idx)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::scan::{ScanResult, ScanRow};
    use crate::catalog::table::{Catalog, CatalogContext};
    use crate::core::config::PlannerConfig;
    use crate::core::types::{RunningStyle, TrackDistance, TrackSurface};
    use crate::reference::conditions::ActivationProfile;
    use crate::reference::record::ReferenceRecord;
    use crate::reference::store::ReferenceStore;

    fn profile(condition: &str, description: &str) -> ActivationProfile {
        ActivationProfile::from_sources(condition, "", description)
    }

    fn catalog() -> Catalog {
        let store = ReferenceStore::from_records(vec![
            ReferenceRecord::new(1, "Front Savvy", Some(160), 150)
                .with_activation(profile("running_style==1", "")),
            ReferenceRecord::new(2, "Long Shot", Some(170), 160)
                .with_activation(profile("distance_type==4", "")),
            ReferenceRecord::new(3, "Dirt Master", Some(120), 100)
                .with_activation(profile("ground_type==2", "")),
            ReferenceRecord::new(4, "Leader's Pride", Some(180), 170)
                .with_activation(profile("order==1", "")),
            ReferenceRecord::new(5, "Focus", Some(140), 140),
            ReferenceRecord::new(6, "Gatekept", Some(50), 0).negative().in_place(),
            ReferenceRecord::new(7, "Legacy Burst", Some(200), 340).inherited_unique(),
            ReferenceRecord::new(8, "Warmup", Some(100), 80).in_place().with_upgrade(9),
            ReferenceRecord::new(9, "Warmed Up", Some(180), 200)
                .in_place()
                .with_downgrade(8),
            ReferenceRecord::new(10, "Midpack Surge", Some(130), 120)
                .with_activation(profile("", "when midpack")),
        ]);
        let context = CatalogContext::new(store, PlannerConfig::default());
        let scan = ScanResult::new(vec![
            ScanRow::new("Front Savvy", 160),
            ScanRow::new("Long Shot", 170),
            ScanRow::new("Dirt Master", 120),
            ScanRow::new("Leader's Pride", 180),
            ScanRow::new("Focus", 140),
            ScanRow::new("Gatekept", 50),
            ScanRow::new("Legacy Burst", 200),
            ScanRow::obtained("Warmup"),
            ScanRow::new("Midpack Surge", 130),
        ]);
        Catalog::from_scan(context, &scan, 1000).unwrap()
    }

    fn names(catalog: &Catalog, indices: Vec<usize>) -> Vec<&str> {
        indices.into_iter().map(|idx| catalog.entry(idx).name()).collect()
    }

    #[test]
    fn test_category_filters() {
        let catalog = catalog();
        assert_eq!(names(&catalog, catalog.negative(false)), vec!["Gatekept"]);
        assert_eq!(names(&catalog, catalog.inherited_unique(false)), vec!["Legacy Burst"]);
        assert_eq!(names(&catalog, catalog.obtained()), vec!["Warmup"]);
        assert_eq!(names(&catalog, catalog.virtual_entries()), vec!["Warmed Up"]);
        assert_eq!(catalog.available().len(), 8);
        assert_eq!(catalog.unobtained(true).len(), 9);
    }

    #[test]
    fn test_requirement_filters() {
        let catalog = catalog();
        assert_eq!(
            names(&catalog, catalog.running_style(Some(RunningStyle::FrontRunner), false)),
            vec!["Front Savvy"]
        );
        assert!(catalog
            .running_style(Some(RunningStyle::EndCloser), false)
            .is_empty());
        assert_eq!(names(&catalog, catalog.running_style(None, false)), vec!["Front Savvy"]);
        assert_eq!(
            names(&catalog, catalog.track_distance(Some(TrackDistance::Long), false)),
            vec!["Long Shot"]
        );
        assert_eq!(
            names(&catalog, catalog.track_surface(Some(TrackSurface::Dirt), false)),
            vec!["Dirt Master"]
        );
    }

    #[test]
    fn test_inferred_and_independent_filters() {
        let catalog = catalog();
        assert_eq!(
            names(&catalog, catalog.inferred_running_style(Some(RunningStyle::FrontRunner), false)),
            vec!["Leader's Pride"]
        );
        assert_eq!(
            names(&catalog, catalog.inferred_running_style(None, false)),
            vec!["Leader's Pride", "Midpack Surge"]
        );
        assert_eq!(
            names(&catalog, catalog.aptitude_independent(Some(RunningStyle::FrontRunner), false)),
            vec!["Focus", "Gatekept", "Legacy Burst", "Midpack Surge"]
        );
        assert_eq!(
            names(&catalog, catalog.aptitude_independent(None, false)),
            vec!["Focus", "Gatekept", "Legacy Burst"]
        );
    }

    #[test]
    fn test_virtual_upgrades_included_on_request() {
        let catalog = catalog();
        assert!(!names(&catalog, catalog.available()).contains(&"Warmed Up"));
        assert!(names(&catalog, catalog.unobtained(true)).contains(&"Warmed Up"));
    }
}
