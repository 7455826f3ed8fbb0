use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use anyhow::bail;

// ---------------------------------------------------------------------------
// Species / Sex – categorical cells
// ---------------------------------------------------------------------------

/// Penguin species. Declaration order is alphabetical so `Ord` matches the
/// sorted order used by the species drop-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Species {
    Adelie,
    Chinstrap,
    Gentoo,
}

impl Species {
    /// All species in sorted order.
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Chinstrap, Species::Gentoo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Chinstrap => "Chinstrap",
            Species::Gentoo => "Gentoo",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        // The upstream CSV sometimes carries the long form ("Adelie Penguin (Pygoscelis adeliae)").
        let head = s.trim().split_whitespace().next().unwrap_or("");
        match head {
            "Adelie" => Ok(Species::Adelie),
            "Chinstrap" => Ok(Species::Chinstrap),
            "Gentoo" => Ok(Species::Gentoo),
            _ => bail!("unknown species '{s}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }

    /// Parse a sex cell; anything unrecognised (`NA`, `.`, empty) is absent.
    pub fn parse(s: &str) -> Option<Sex> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Some(Sex::Female),
            "male" | "m" => Some(Sex::Male),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NumericColumn – the four measurement columns
// ---------------------------------------------------------------------------

/// The numeric measurement columns selectable for the attribute histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericColumn {
    BillLength,
    BillDepth,
    FlipperLength,
    BodyMass,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 4] = [
        NumericColumn::BillLength,
        NumericColumn::BillDepth,
        NumericColumn::FlipperLength,
        NumericColumn::BodyMass,
    ];

    /// Column name as it appears in the source data.
    pub fn name(&self) -> &'static str {
        match self {
            NumericColumn::BillLength => "bill_length_mm",
            NumericColumn::BillDepth => "bill_depth_mm",
            NumericColumn::FlipperLength => "flipper_length_mm",
            NumericColumn::BodyMass => "body_mass_g",
        }
    }

    /// Resolve a column name; `None` if it does not name a numeric column.
    pub fn from_name(name: &str) -> Option<NumericColumn> {
        NumericColumn::ALL.into_iter().find(|c| c.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Penguin – one row of the dataset
// ---------------------------------------------------------------------------

/// A single observation. Measurements are `None` where the source has `NA`.
#[derive(Debug, Clone, PartialEq)]
pub struct Penguin {
    pub species: Species,
    pub island: String,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<Sex>,
    pub year: Option<i32>,
}

impl Penguin {
    pub fn value(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::BillLength => self.bill_length_mm,
            NumericColumn::BillDepth => self.bill_depth_mm,
            NumericColumn::FlipperLength => self.flipper_length_mm,
            NumericColumn::BodyMass => self.body_mass_g,
        }
        .filter(|v| v.is_finite())
    }
}

/// Column headers shown by the tabular views, in source order.
pub const TABLE_COLUMNS: [&str; 8] = [
    "species",
    "island",
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
    "sex",
    "year",
];

/// Format one cell of the tabular views. Missing values render as `NA`.
pub fn cell_text(p: &Penguin, column: usize) -> String {
    fn opt<T: fmt::Display>(v: Option<T>) -> String {
        v.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string())
    }
    match column {
        0 => p.species.to_string(),
        1 => p.island.clone(),
        2 => opt(p.bill_length_mm),
        3 => opt(p.bill_depth_mm),
        4 => opt(p.flipper_length_mm),
        5 => opt(p.body_mass_g),
        6 => opt(p.sex),
        7 => opt(p.year),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// PenguinDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed species index.
#[derive(Debug, Clone)]
pub struct PenguinDataset {
    /// All observations (rows), in source order.
    pub rows: Vec<Penguin>,
    /// Row count per species present in the data.
    pub species_counts: BTreeMap<Species, usize>,
    /// Sorted set of distinct islands.
    pub islands: BTreeSet<String>,
}

impl PenguinDataset {
    /// Build the species/island indices from the loaded rows.
    pub fn from_rows(rows: Vec<Penguin>) -> Self {
        let mut species_counts = BTreeMap::new();
        let mut islands = BTreeSet::new();
        for p in &rows {
            *species_counts.entry(p.species).or_insert(0) += 1;
            islands.insert(p.island.clone());
        }
        PenguinDataset {
            rows,
            species_counts,
            islands,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct species present, sorted.
    pub fn distinct_species(&self) -> impl Iterator<Item = Species> + '_ {
        self.species_counts.keys().copied()
    }

    /// Non-missing values of a numeric column, in row order.
    pub fn column_values(&self, column: NumericColumn) -> Vec<f64> {
        self.rows.iter().filter_map(|p| p.value(column)).collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A 344-row dataset with the reference species split (152 Adelie,
    /// 124 Gentoo, 68 Chinstrap), two fully unmeasured rows and a handful
    /// of rows with unknown sex.
    pub fn reference_dataset() -> PenguinDataset {
        let mut rows = Vec::with_capacity(344);
        let plan = [
            (Species::Adelie, 152, "Torgersen", 38.8, 18.3, 190.0, 3700.0),
            (Species::Gentoo, 124, "Biscoe", 47.5, 15.0, 217.0, 5076.0),
            (Species::Chinstrap, 68, "Dream", 48.8, 18.4, 196.0, 3733.0),
        ];
        for (species, n, island, bl, bd, fl, bm) in plan {
            for i in 0..n {
                let jitter = (i % 10) as f64 - 4.5;
                let unmeasured = i == 3;
                let measure = |base: f64, scale: f64| {
                    if unmeasured {
                        None
                    } else {
                        Some(base + jitter * scale)
                    }
                };
                rows.push(Penguin {
                    species,
                    island: island.to_string(),
                    bill_length_mm: measure(bl, 0.3),
                    bill_depth_mm: measure(bd, 0.1),
                    flipper_length_mm: measure(fl, 1.0),
                    body_mass_g: measure(bm, 40.0),
                    sex: match i % 7 {
                        0 => None,
                        k if k % 2 == 0 => Some(Sex::Female),
                        _ => Some(Sex::Male),
                    },
                    year: Some(2007 + (i % 3) as i32),
                });
            }
        }
        PenguinDataset::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_parse() {
        assert_eq!("Gentoo".parse::<Species>().unwrap(), Species::Gentoo);
        assert_eq!(
            "Adelie Penguin (Pygoscelis adeliae)".parse::<Species>().unwrap(),
            Species::Adelie
        );
        assert!("Emperor".parse::<Species>().is_err());
    }

    #[test]
    fn test_sex_parse() {
        assert_eq!(Sex::parse("MALE"), Some(Sex::Male));
        assert_eq!(Sex::parse("female"), Some(Sex::Female));
        assert_eq!(Sex::parse("NA"), None);
        assert_eq!(Sex::parse("."), None);
    }

    #[test]
    fn test_numeric_column_names() {
        for col in NumericColumn::ALL {
            assert_eq!(NumericColumn::from_name(col.name()), Some(col));
        }
        assert_eq!(NumericColumn::from_name("island"), None);
        assert_eq!(NumericColumn::from_name("species"), None);
    }

    #[test]
    fn test_reference_counts() {
        let ds = fixtures::reference_dataset();
        assert_eq!(ds.len(), 344);
        assert_eq!(ds.species_counts[&Species::Adelie], 152);
        assert_eq!(ds.species_counts[&Species::Gentoo], 124);
        assert_eq!(ds.species_counts[&Species::Chinstrap], 68);
        assert_eq!(
            ds.distinct_species().collect::<Vec<_>>(),
            vec![Species::Adelie, Species::Chinstrap, Species::Gentoo]
        );
    }

    #[test]
    fn test_column_values_skip_missing() {
        let ds = fixtures::reference_dataset();
        assert_eq!(ds.column_values(NumericColumn::BodyMass).len(), 341);
    }

    #[test]
    fn test_cell_text_missing() {
        let ds = fixtures::reference_dataset();
        let unmeasured = &ds.rows[3];
        assert_eq!(cell_text(unmeasured, 0), "Adelie");
        assert_eq!(cell_text(unmeasured, 2), "NA");
        assert_eq!(cell_text(unmeasured, 7), "2007");
    }
}
