//! The immutable, shuffled record collection

use icpe_core::Record;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::features::parse_feature_collection;
use crate::sources::DatasetSource;
use crate::DataError;

/// Loaded records in their display order
///
/// The order is shuffled exactly once, when the store is built. Selection
/// passes walk this order, so it decides which records win a budget slot
/// when there are more matches than the budget allows.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    skipped_features: usize,
}

impl RecordStore {
    /// Shuffle records into a store; `seed` makes the order reproducible
    pub fn from_records(mut records: Vec<Record>, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        records.shuffle(&mut rng);

        Self {
            records,
            skipped_features: 0,
        }
    }

    /// Keep records in the given order
    pub fn ordered(records: Vec<Record>) -> Self {
        Self {
            records,
            skipped_features: 0,
        }
    }

    /// Parse a FeatureCollection document and shuffle its records
    pub fn parse(text: &str, seed: Option<u64>) -> Result<Self, DataError> {
        let parsed = parse_feature_collection(text)?;
        if parsed.skipped > 0 {
            tracing::warn!("Skipped {} features without a point geometry", parsed.skipped);
        }

        let mut store = Self::from_records(parsed.records, seed);
        store.skipped_features = parsed.skipped;
        Ok(store)
    }

    /// Fetch and parse the dataset
    pub async fn load(source: &dyn DatasetSource, seed: Option<u64>) -> Result<Self, DataError> {
        tracing::info!("Loading dataset from {}", source.source_name());
        let text = source.fetch().await?;

        let store = tokio::task::spawn_blocking(move || Self::parse(&text, seed)).await??;
        tracing::info!(
            "Loaded {} records from {}",
            store.len(),
            source.source_name()
        );
        Ok(store)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Features dropped at load because they had no usable point
    pub fn skipped_features(&self) -> usize {
        self.skipped_features
    }
}
