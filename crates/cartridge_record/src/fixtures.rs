//! Seeded fixture generators for platform records.
//!
//! Records look like what the platforms endpoint returns: prices arrive as
//! strings, and a share of records is missing one of the fields the
//! validator requires.

use crate::record::Record;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;

/// Platforms used to seed fixture names: (name, abbreviation, release year, launch price).
const PLATFORMS: [(&str, &str, u16, &str); 12] = [
    ("Nintendo Entertainment System", "NES", 1985, "199.99"),
    ("Sega Genesis", "GEN", 1989, "189.00"),
    ("Super Nintendo Entertainment System", "SNES", 1991, "199.00"),
    ("Sega Saturn", "SAT", 1995, "399.00"),
    ("PlayStation", "PS1", 1995, "299.00"),
    ("Nintendo 64", "N64", 1996, "199.99"),
    ("Dreamcast", "DC", 1999, "199.00"),
    ("PlayStation 2", "PS2", 2000, "299.00"),
    ("GameCube", "GCN", 2001, "199.00"),
    ("Xbox", "XBOX", 2001, "299.00"),
    ("Wii", "WII", 2006, "249.99"),
    ("Neo Geo", "NEO", 1990, "649.99"),
];

/// Configuration for fixture generation.
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Number of records to generate.
    pub count: usize,
    /// Probability that a record is missing a required field.
    pub invalid_ratio: f64,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            count: 100,
            invalid_ratio: 0.2,
        }
    }
}

impl FixtureConfig {
    /// Sets the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the record count.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Sets the share of invalid records, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_invalid_ratio(mut self, ratio: f64) -> Self {
        self.invalid_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

/// Seeded generator of platform records.
pub struct PlatformFixtures {
    rng: ChaCha8Rng,
    config: FixtureConfig,
}

impl PlatformFixtures {
    /// Creates a new fixture generator.
    #[must_use]
    pub fn new(config: FixtureConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { rng, config }
    }

    /// Generates `count` records. Each record gets a unique `id` equal to
    /// its position, so sequences can be checked for order and duplicates.
    #[must_use]
    pub fn records(&mut self) -> Vec<Record> {
        (0..self.config.count).map(|i| self.record(i)).collect()
    }

    fn record(&mut self, id: usize) -> Record {
        let (name, abbreviation, year, price) = PLATFORMS[self.rng.gen_range(0..PLATFORMS.len())];
        let month = self.rng.gen_range(1..=12);
        let day = self.rng.gen_range(1..=28);

        let mut record = Record::new()
            .with("id", id)
            .with("name", name)
            .with("abbreviation", abbreviation)
            .with("release_date", format!("{year}-{month:02}-{day:02} 00:00:00"))
            .with("original_price", price)
            .with("install_base", self.rng.gen_range(1..150).to_string());

        if self.rng.gen_bool(self.config.invalid_ratio) {
            self.break_record(&mut record);
        }

        record
    }

    /// Blanks one required field the way the live API does: null or an
    /// empty string.
    fn break_record(&mut self, record: &mut Record) {
        match self.rng.gen_range(0..5) {
            0 => record.insert("release_date", Value::Null),
            1 => record.insert("original_price", Value::Null),
            2 => record.insert("original_price", ""),
            3 => record.insert("name", ""),
            _ => record.insert("abbreviation", Value::Null),
        };
    }
}

/// Convenience: `count` records from `seed` with the default invalid ratio.
#[must_use]
pub fn platform_records(seed: u64, count: usize) -> Vec<Record> {
    PlatformFixtures::new(FixtureConfig::default().with_seed(seed).with_count(count)).records()
}
