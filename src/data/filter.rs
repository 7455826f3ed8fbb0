use std::collections::BTreeSet;
use std::fmt;

use super::model::{PenguinDataset, Species};

// ---------------------------------------------------------------------------
// Single-species choice: "All" or one species
// ---------------------------------------------------------------------------

/// Label of the choice that disables species filtering.
pub const ALL_LABEL: &str = "All";

/// Value of the species drop-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeciesChoice {
    #[default]
    All,
    Only(Species),
}

impl SpeciesChoice {
    pub fn label(&self) -> &'static str {
        match self {
            SpeciesChoice::All => ALL_LABEL,
            SpeciesChoice::Only(s) => s.as_str(),
        }
    }

    pub fn matches(&self, species: Species) -> bool {
        match self {
            SpeciesChoice::All => true,
            SpeciesChoice::Only(s) => *s == species,
        }
    }
}

impl fmt::Display for SpeciesChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Drop-down choices: "All" followed by the distinct species in sorted order.
pub fn species_choices(dataset: &PenguinDataset) -> Vec<SpeciesChoice> {
    std::iter::once(SpeciesChoice::All)
        .chain(dataset.distinct_species().map(SpeciesChoice::Only))
        .collect()
}

// ---------------------------------------------------------------------------
// Filters → row indices
// ---------------------------------------------------------------------------

/// Rows whose species equals the choice; every row for [`SpeciesChoice::All`].
pub fn rows_matching_choice(dataset: &PenguinDataset, choice: SpeciesChoice) -> Vec<usize> {
    if choice == SpeciesChoice::All {
        return (0..dataset.len()).collect();
    }
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, p)| choice.matches(p.species))
        .map(|(i, _)| i)
        .collect()
}

/// Rows whose species is a member of `selected`.
///
/// An empty selection yields no rows; it is not treated as "no filter".
pub fn rows_in_species_set(dataset: &PenguinDataset, selected: &BTreeSet<Species>) -> Vec<usize> {
    if selected.is_empty() {
        return Vec::new();
    }
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, p)| selected.contains(&p.species))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::reference_dataset;

    #[test]
    fn test_all_returns_full_dataset() {
        let ds = reference_dataset();
        let rows = rows_matching_choice(&ds, SpeciesChoice::All);
        assert_eq!(rows, (0..344).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_species_choice() {
        let ds = reference_dataset();
        for species in Species::ALL {
            let rows = rows_matching_choice(&ds, SpeciesChoice::Only(species));
            assert_eq!(rows.len(), ds.species_counts[&species]);
            assert!(rows.iter().all(|&i| ds.rows[i].species == species));
        }
        let gentoo = rows_matching_choice(&ds, SpeciesChoice::Only(Species::Gentoo));
        assert_eq!(gentoo.len(), 124);
    }

    #[test]
    fn test_every_species_subset() {
        let ds = reference_dataset();
        for mask in 0u8..8 {
            let selected: BTreeSet<Species> = Species::ALL
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, s)| *s)
                .collect();
            let rows = rows_in_species_set(&ds, &selected);
            let expected: usize = selected.iter().map(|s| ds.species_counts[s]).sum();
            assert_eq!(rows.len(), expected, "subset {selected:?}");
            assert!(rows.iter().all(|&i| selected.contains(&ds.rows[i].species)));
        }
    }

    #[test]
    fn test_empty_and_full_sets() {
        let ds = reference_dataset();
        assert!(rows_in_species_set(&ds, &BTreeSet::new()).is_empty());
        let full: BTreeSet<Species> = Species::ALL.into_iter().collect();
        assert_eq!(rows_in_species_set(&ds, &full).len(), ds.len());
    }

    #[test]
    fn test_species_choices_sorted() {
        let ds = reference_dataset();
        let labels: Vec<&str> = species_choices(&ds).iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["All", "Adelie", "Chinstrap", "Gentoo"]);
    }
}
