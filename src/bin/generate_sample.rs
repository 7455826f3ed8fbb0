use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-species plan: count, islands, and (mean, sd) of bill length, bill
/// depth, flipper length, body mass.
struct SpeciesPlan {
    name: &'static str,
    count: usize,
    islands: &'static [&'static str],
    measures: [(f64, f64); 4],
}

const PLANS: [SpeciesPlan; 3] = [
    SpeciesPlan {
        name: "Adelie",
        count: 152,
        islands: &["Torgersen", "Biscoe", "Dream"],
        measures: [(38.8, 2.7), (18.3, 1.2), (190.0, 6.5), (3700.0, 460.0)],
    },
    SpeciesPlan {
        name: "Gentoo",
        count: 124,
        islands: &["Biscoe"],
        measures: [(47.5, 3.1), (15.0, 1.0), (217.0, 6.5), (5076.0, 504.0)],
    },
    SpeciesPlan {
        name: "Chinstrap",
        count: 68,
        islands: &["Dream"],
        measures: [(48.8, 3.3), (18.4, 1.1), (196.0, 7.1), (3733.0, 384.0)],
    },
];

const YEARS: [i32; 3] = [2007, 2008, 2009];

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-15);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

#[derive(Default)]
struct Columns {
    species: Vec<&'static str>,
    island: Vec<&'static str>,
    bill_length_mm: Vec<Option<f64>>,
    bill_depth_mm: Vec<Option<f64>>,
    flipper_length_mm: Vec<Option<f64>>,
    body_mass_g: Vec<Option<f64>>,
    sex: Vec<Option<&'static str>>,
    year: Vec<i32>,
}

fn generate(rng: &mut StdRng) -> Columns {
    let mut cols = Columns::default();
    for plan in &PLANS {
        for _ in 0..plan.count {
            // ~0.6% of birds were never measured, ~3% were not sexed
            let measured = rng.gen::<f64>() > 0.006;
            let male = rng.gen_bool(0.5);
            let shift = if male { 0.5 } else { -0.5 };
            let island = plan.islands[rng.gen_range(0..plan.islands.len())];
            let mut draw = |(mean, sd): (f64, f64), decimals: i32| {
                let scale = 10f64.powi(decimals);
                measured.then(|| (gauss(rng, mean + shift * sd, sd * 0.8) * scale).round() / scale)
            };

            cols.species.push(plan.name);
            cols.island.push(island);
            cols.bill_length_mm.push(draw(plan.measures[0], 1));
            cols.bill_depth_mm.push(draw(plan.measures[1], 1));
            cols.flipper_length_mm.push(draw(plan.measures[2], 0));
            cols.body_mass_g.push(draw(plan.measures[3], -1));
            let sexed = measured && rng.gen::<f64>() > 0.03;
            cols.sex.push(sexed.then_some(if male { "male" } else { "female" }));
            cols.year.push(YEARS[rng.gen_range(0..YEARS.len())]);
        }
    }
    cols
}

fn write_csv(path: &str, cols: &Columns) -> Result<()> {
    fn na<T: ToString>(v: Option<T>) -> String {
        v.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string())
    }

    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record([
        "species",
        "island",
        "bill_length_mm",
        "bill_depth_mm",
        "flipper_length_mm",
        "body_mass_g",
        "sex",
        "year",
    ])?;
    for i in 0..cols.species.len() {
        writer.write_record([
            cols.species[i].to_string(),
            cols.island[i].to_string(),
            na(cols.bill_length_mm[i]),
            na(cols.bill_depth_mm[i]),
            na(cols.flipper_length_mm[i]),
            na(cols.body_mass_g[i]),
            na(cols.sex[i]),
            cols.year[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, cols: &Columns) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
        Field::new("bill_length_mm", DataType::Float64, true),
        Field::new("bill_depth_mm", DataType::Float64, true),
        Field::new("flipper_length_mm", DataType::Float64, true),
        Field::new("body_mass_g", DataType::Float64, true),
        Field::new("sex", DataType::Utf8, true),
        Field::new("year", DataType::Int32, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(cols.species.clone())),
            Arc::new(StringArray::from(cols.island.clone())),
            Arc::new(Float64Array::from(cols.bill_length_mm.clone())),
            Arc::new(Float64Array::from(cols.bill_depth_mm.clone())),
            Arc::new(Float64Array::from(cols.flipper_length_mm.clone())),
            Arc::new(Float64Array::from(cols.body_mass_g.clone())),
            Arc::new(StringArray::from(cols.sex.clone())),
            Arc::new(Int32Array::from(cols.year.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>())
        .transpose()
        .context("seed must be an unsigned integer")?
        .unwrap_or(42);
    let mut rng = StdRng::seed_from_u64(seed);
    let cols = generate(&mut rng);

    write_csv("penguins.csv", &cols)?;
    write_parquet("penguins.parquet", &cols)?;

    log::info!("seed {seed}");
    println!(
        "Wrote {} synthetic penguins to penguins.csv and penguins.parquet",
        cols.species.len()
    );
    Ok(())
}
