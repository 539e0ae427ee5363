use itertools::Itertools;
use std::collections::HashMap;

use crate::domain::ZipCode;

/// Postal code → plan names offered there
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZipDirectory {
    entries: HashMap<String, Vec<String>>,
}

impl ZipDirectory {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(zip, plans)| (zip.trim().to_string(), plans))
                .collect(),
        }
    }

    /// Build the directory from ZIP → provider assignments.
    ///
    /// Each ZIP gets its provider's plans first, then every default plan not
    /// already listed. Repeated assignment rows are ignored; a ZIP served by
    /// an unknown provider only gets the default plans. When a ZIP appears
    /// with several providers the last row wins.
    pub fn from_provider_assignments<I>(
        assignments: I,
        provider_plans: &HashMap<String, Vec<String>>,
        default_plans: &[String],
    ) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries = assignments
            .into_iter()
            .map(|(zip, provider)| (zip.trim().to_string(), provider.trim().to_string()))
            .unique()
            .map(|(zip, provider)| {
                let plans = provider_plans
                    .get(&provider)
                    .into_iter()
                    .flatten()
                    .chain(default_plans)
                    .unique()
                    .cloned()
                    .collect();
                (zip, plans)
            });
        Self::from_entries(entries)
    }

    /// Plan names for `zip`; empty when the ZIP is not listed
    pub fn lookup(&self, zip: &ZipCode) -> &[String] {
        self.entries
            .get(zip.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn provider_plans() -> HashMap<String, Vec<String>> {
        HashMap::from([
            (
                "Silicon Valley Clean Energy".to_string(),
                strings(&["SVCE GreenStart", "SVCE GreenPrime"]),
            ),
            (
                "Peninsula Clean Energy".to_string(),
                strings(&["SVCE GreenStart", "SVCE GreenStart", "PG&E Base Plan"]),
            ),
        ])
    }

    #[test]
    fn test_provider_plans_come_before_defaults() {
        let defaults = strings(&["PG&E Base Plan", "PG&E 50% Solar Choice"]);
        let dir = ZipDirectory::from_provider_assignments(
            vec![("94301".to_string(), "Silicon Valley Clean Energy".to_string())],
            &provider_plans(),
            &defaults,
        );
        let zip = ZipCode::parse("94301").unwrap();
        assert_eq!(
            dir.lookup(&zip),
            strings(&[
                "SVCE GreenStart",
                "SVCE GreenPrime",
                "PG&E Base Plan",
                "PG&E 50% Solar Choice"
            ])
            .as_slice()
        );
    }

    #[test]
    fn test_duplicates_are_dropped() {
        let defaults = strings(&["PG&E Base Plan", "PG&E 50% Solar Choice"]);
        let dir = ZipDirectory::from_provider_assignments(
            vec![
                ("94002".to_string(), "Peninsula Clean Energy".to_string()),
                ("94002".to_string(), "Peninsula Clean Energy".to_string()),
            ],
            &provider_plans(),
            &defaults,
        );
        assert_eq!(dir.len(), 1);
        let zip = ZipCode::parse("94002").unwrap();
        assert_eq!(
            dir.lookup(&zip),
            strings(&["SVCE GreenStart", "PG&E Base Plan", "PG&E 50% Solar Choice"]).as_slice()
        );
    }

    #[test]
    fn test_unknown_provider_gets_defaults_only() {
        let defaults = strings(&["PG&E Base Plan"]);
        let dir = ZipDirectory::from_provider_assignments(
            vec![("96161".to_string(), "Truckee Donner PUD".to_string())],
            &provider_plans(),
            &defaults,
        );
        let zip = ZipCode::parse("96161").unwrap();
        assert_eq!(dir.lookup(&zip), defaults.as_slice());
    }

    #[test]
    fn test_missing_zip_is_empty_not_error() {
        let dir = ZipDirectory::default();
        assert!(dir.is_empty());
        assert!(dir.lookup(&ZipCode::parse("00000").unwrap()).is_empty());
    }
}
