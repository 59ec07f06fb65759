//! Synthetic Sevilla listings and an illustrative pipeline artifact.
//!
//! `lp demo` uses this to produce a runnable pair of startup inputs when the
//! externally trained model is not at hand. Listings are scattered around
//! real district centres; the artifact weights are fixed constants chosen to
//! give plausible behaviour, not fitted to anything.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::Serialize;

use crate::domain::{
    COL_AVAILABILITY_365, COL_HOST_LISTINGS_COUNT, COL_LATITUDE, COL_LONGITUDE,
    COL_MINIMUM_NIGHTS, COL_NEIGHBOURHOOD, COL_NUMBER_OF_REVIEWS, COL_NUMBER_OF_REVIEWS_LTM,
    COL_REVIEWS_PER_MONTH, COL_ROOM_TYPE,
};
use crate::error::AppError;
use crate::geo::SEVILLA_BOUNDS;
use crate::io::write_artifact;
use crate::models::{ARTIFACT_FORMAT, CategoricalColumn, NumericColumn, PipelineArtifact};

pub const DEMO_DATASET_FILE: &str = "sevilla.listings.csv";
pub const DEMO_ARTIFACT_FILE: &str = "final_model_pipeline.json";

/// District name, centre `(lat, lon)`, spread in degrees, price premium.
const DISTRICTS: [(&str, f64, f64, f64, f64); 11] = [
    ("Bellavista-La Palmera", 37.3480, -5.9820, 0.006, -0.30),
    ("Casco Antiguo", 37.3910, -5.9930, 0.005, 0.90),
    ("Cerro-Amate", 37.3770, -5.9540, 0.006, -0.70),
    ("Este-Alcosa-Torreblanca", 37.4050, -5.9320, 0.007, -0.90),
    ("Los Remedios", 37.3740, -6.0010, 0.003, 0.35),
    ("Macarena", 37.4060, -5.9880, 0.005, -0.10),
    ("Nervión", 37.3830, -5.9720, 0.004, 0.25),
    ("Norte", 37.4190, -5.9780, 0.006, -0.60),
    ("San Pablo-Santa Justa", 37.3960, -5.9640, 0.005, -0.20),
    ("Sur", 37.3640, -5.9860, 0.005, -0.40),
    ("Triana", 37.3830, -6.0040, 0.004, 0.50),
];

/// Room type, share of listings, price premium.
const ROOM_TYPES: [(&str, f64, f64); 4] = [
    ("Entire home/apt", 0.72, 1.20),
    ("Hotel room", 0.03, 0.90),
    ("Private room", 0.23, -1.00),
    ("Shared room", 0.02, -1.80),
];

/// Column, scaler mean, scaler scale, coefficient.
const NUMERIC: [(&str, f64, f64, f64); 8] = [
    (COL_MINIMUM_NIGHTS, 3.5, 8.0, -0.25),
    (COL_AVAILABILITY_365, 190.0, 115.0, 0.30),
    (COL_NUMBER_OF_REVIEWS, 55.0, 80.0, -0.15),
    (COL_REVIEWS_PER_MONTH, 1.6, 1.5, -0.20),
    (COL_NUMBER_OF_REVIEWS_LTM, 14.0, 16.0, 0.10),
    (COL_HOST_LISTINGS_COUNT, 9.0, 18.0, 0.45),
    (COL_LATITUDE, 37.388, 0.018, 0.05),
    (COL_LONGITUDE, -5.985, 0.020, -0.10),
];

const INTERCEPT: f64 = -0.35;

/// Settings for synthetic dataset generation.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub count: usize,
    pub seed: u64,
}

/// One synthetic row, in the reference dataset's column layout.
#[derive(Debug, Clone, Serialize)]
pub struct DemoListing {
    pub id: u64,
    pub neighbourhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub room_type: String,
    pub price: u32,
    pub minimum_nights: u32,
    pub number_of_reviews: u32,
    pub reviews_per_month: Option<f64>,
    pub calculated_host_listings_count: u32,
    pub availability_365: u32,
    pub number_of_reviews_ltm: u32,
}

/// Paths written by `write_demo`.
#[derive(Debug, Clone)]
pub struct DemoOutput {
    pub dataset: PathBuf,
    pub artifact: PathBuf,
    pub rows: usize,
}

/// Generate `config.count` listings deterministically from `config.seed`.
pub fn generate_listings(config: &DemoConfig) -> Result<Vec<DemoListing>, AppError> {
    if config.count == 0 {
        return Err(AppError::startup("Demo listing count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let unit = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::io(format!("Noise distribution error: {e}")))?;

    let mut out = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let (district, c_lat, c_lon, spread, district_premium) =
            DISTRICTS[rng.gen_range(0..DISTRICTS.len())];
        let (room_type, room_premium) = pick_room_type(&mut rng);

        let lat = c_lat + spread * unit.sample(&mut rng);
        let lon = c_lon + spread * unit.sample(&mut rng);
        let (lat, lon) = SEVILLA_BOUNDS.clamp(lat, lon);

        let minimum_nights = if rng.gen_bool(0.8) {
            rng.gen_range(1..=4)
        } else {
            rng.gen_range(5..=60)
        };
        let availability_365 = rng.gen_range(0..=365);
        let number_of_reviews = (rng.gen_range(0.0_f64..1.0).powi(3) * 400.0) as u32;
        let reviews_per_month = if number_of_reviews == 0 {
            None
        } else {
            Some(round_to(rng.gen_range(0.05..4.5), 2))
        };
        let number_of_reviews_ltm = number_of_reviews.min(rng.gen_range(0..=40));
        let calculated_host_listings_count = if rng.gen_bool(0.55) {
            1
        } else {
            rng.gen_range(2..=60)
        };

        let log_price = 4.2 + 0.35 * (district_premium + room_premium) + 0.25 * unit.sample(&mut rng);
        let price = log_price.exp().round().max(10.0) as u32;

        out.push(DemoListing {
            id: 10_000 + i as u64,
            // A few rows without a district mimic the gaps real exports have.
            neighbourhood: if rng.gen_bool(0.01) {
                String::new()
            } else {
                district.to_string()
            },
            latitude: round_to(lat, 5),
            longitude: round_to(lon, 5),
            room_type: room_type.to_string(),
            price,
            minimum_nights,
            number_of_reviews,
            reviews_per_month,
            calculated_host_listings_count,
            availability_365,
            number_of_reviews_ltm,
        });
    }

    Ok(out)
}

/// Illustrative artifact covering every demo district and room type.
pub fn demo_artifact() -> PipelineArtifact {
    let mut rooms: Vec<(&str, f64)> = ROOM_TYPES.iter().map(|r| (r.0, r.2)).collect();
    rooms.sort_by(|a, b| a.0.cmp(b.0));
    let mut districts: Vec<(&str, f64)> = DISTRICTS.iter().map(|d| (d.0, d.4)).collect();
    districts.sort_by(|a, b| a.0.cmp(b.0));

    let mut coefficients = Vec::new();
    coefficients.extend(rooms.iter().map(|r| r.1));
    coefficients.extend(districts.iter().map(|d| d.1));
    coefficients.extend(NUMERIC.iter().map(|n| n.3));

    PipelineArtifact {
        format: ARTIFACT_FORMAT.to_string(),
        categorical: vec![
            CategoricalColumn {
                column: COL_ROOM_TYPE.to_string(),
                categories: rooms.iter().map(|r| r.0.to_string()).collect(),
            },
            CategoricalColumn {
                column: COL_NEIGHBOURHOOD.to_string(),
                categories: districts.iter().map(|d| d.0.to_string()).collect(),
            },
        ],
        numeric: NUMERIC
            .iter()
            .map(|&(column, mean, scale, _)| NumericColumn {
                column: column.to_string(),
                mean,
                scale,
            })
            .collect(),
        coefficients,
        intercept: INTERCEPT,
    }
}

/// Write the demo dataset and artifact into `out_dir`.
pub fn write_demo(out_dir: &Path, config: &DemoConfig, force: bool) -> Result<DemoOutput, AppError> {
    create_dir_all(out_dir).map_err(|e| {
        AppError::io(format!("Failed to create demo dir '{}': {e}", out_dir.display()))
    })?;

    let dataset = out_dir.join(DEMO_DATASET_FILE);
    let artifact = out_dir.join(DEMO_ARTIFACT_FILE);
    if !force {
        for path in [&dataset, &artifact] {
            if path.exists() {
                return Err(AppError::startup(format!(
                    "Refusing to overwrite '{}' (use --force).",
                    path.display()
                )));
            }
        }
    }

    let listings = generate_listings(config)?;
    write_listings_csv(&dataset, &listings)?;
    write_artifact(&artifact, &demo_artifact())?;
    log::info!("demo: wrote {} listings to {}", listings.len(), dataset.display());

    Ok(DemoOutput {
        dataset,
        artifact,
        rows: listings.len(),
    })
}

fn write_listings_csv(path: &Path, listings: &[DemoListing]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in listings {
        writer
            .serialize(row)
            .map_err(|e| AppError::io(format!("Failed to write demo row {}: {e}", row.id)))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush '{}': {e}", path.display())))?;
    Ok(())
}

fn pick_room_type(rng: &mut StdRng) -> (&'static str, f64) {
    let mut u = rng.gen_range(0.0..1.0);
    for (name, share, premium) in ROOM_TYPES {
        if u < share {
            return (name, premium);
        }
        u -= share;
    }
    (ROOM_TYPES[0].0, ROOM_TYPES[0].2)
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (v * f).round() / f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_catalogue;
    use crate::models::LogisticPipeline;

    fn demo_csv(config: &DemoConfig) -> String {
        let listings = generate_listings(config).unwrap();
        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            for row in &listings {
                writer.serialize(row).unwrap();
            }
            writer.flush().unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let config = DemoConfig { count: 50, seed: 7 };
        assert_eq!(demo_csv(&config), demo_csv(&config));
        let other = DemoConfig { count: 50, seed: 8 };
        assert_ne!(demo_csv(&config), demo_csv(&other));
    }

    #[test]
    fn listings_stay_in_bounds_and_ranges() {
        let listings = generate_listings(&DemoConfig { count: 300, seed: 1 }).unwrap();
        for l in &listings {
            assert!(SEVILLA_BOUNDS.contains(l.latitude, l.longitude), "{l:?}");
            assert!((1..=365).contains(&l.minimum_nights));
            assert!(l.availability_365 <= 365);
            assert!(l.calculated_host_listings_count >= 1);
            assert!(l.number_of_reviews_ltm <= l.number_of_reviews);
        }
    }

    #[test]
    fn demo_dataset_feeds_the_catalogue_loader() {
        let csv = demo_csv(&DemoConfig { count: 400, seed: 42 });
        let catalogue = read_catalogue(csv.as_bytes()).unwrap();
        assert!(catalogue.neighbourhoods.len() > 5);
        assert!(!catalogue.neighbourhoods.iter().any(|n| n.is_empty()));
        assert!(SEVILLA_BOUNDS.contains(catalogue.mean_latitude, catalogue.mean_longitude));
    }

    #[test]
    fn demo_artifact_is_valid_and_covers_the_catalogue() {
        let pipeline = LogisticPipeline::from_artifact(demo_artifact()).unwrap();
        let known = pipeline.categories(COL_NEIGHBOURHOOD).unwrap();
        for (name, ..) in DISTRICTS {
            assert!(known.iter().any(|k| k == name));
        }
        let rooms = pipeline.categories(COL_ROOM_TYPE).unwrap();
        assert_eq!(rooms.len(), ROOM_TYPES.len());
        let mut sorted = rooms.to_vec();
        sorted.sort();
        assert_eq!(sorted, rooms);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(generate_listings(&DemoConfig { count: 0, seed: 1 }).is_err());
    }
}
