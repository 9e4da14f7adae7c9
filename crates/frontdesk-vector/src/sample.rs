//! Sample fitness datasets for demo stores.
//!
//! Vectors are random stand-ins for sentence embeddings; swap in real
//! embeddings before relying on search quality.

use rand::Rng;
use serde_json::json;

use crate::error::VectorError;
use crate::index::VectorIndex;
use crate::metadata::Metadata;
use crate::store::VectorIndexStore;

/// Built-in sample datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDataset {
    /// Exercise learning resources (videos, articles, research)
    Exercises,
    /// Member profiles for similar-member lookup
    Members,
}

impl SampleDataset {
    pub const ALL: [SampleDataset; 2] = [SampleDataset::Exercises, SampleDataset::Members];

    /// Store directory name under the vector index root
    pub fn index_name(&self) -> &'static str {
        match self {
            SampleDataset::Exercises => "exercise_index",
            SampleDataset::Members => "member_index",
        }
    }

    /// Metadata records in insertion order
    pub fn records(&self) -> Vec<Metadata> {
        let values = match self {
            SampleDataset::Exercises => vec![
                exercise(
                    "Complete squat guide",
                    "video",
                    "https://youtube.com/squat",
                    "Correct squat form",
                ),
                exercise(
                    "Bench press tips",
                    "video",
                    "https://youtube.com/bench",
                    "Chest training essentials",
                ),
                exercise(
                    "Deadlift study",
                    "research",
                    "https://pubmed.com/deadlift",
                    "Research on back muscle development",
                ),
                exercise(
                    "HIIT training",
                    "article",
                    "https://blog.com/hiit",
                    "High-intensity intervals",
                ),
                exercise(
                    "Diet meal plan",
                    "article",
                    "https://blog.com/diet",
                    "Meal plan for weight loss",
                ),
                exercise(
                    "Yoga stretching",
                    "video",
                    "https://youtube.com/yoga",
                    "Improve flexibility",
                ),
                exercise(
                    "Running form correction",
                    "video",
                    "https://youtube.com/running",
                    "Correct running posture",
                ),
                exercise(
                    "Protein intake guide",
                    "article",
                    "https://blog.com/protein",
                    "Protein for muscle growth",
                ),
            ],
            SampleDataset::Members => vec![
                member(1, "Kim Cheol-su", "muscle_gain", "intermediate"),
                member(2, "Lee Young-hee", "weight_loss", "beginner"),
                member(3, "Park Min-su", "fitness", "advanced"),
                member(4, "Choi Su-young", "weight_loss", "beginner"),
                member(5, "Jung Dae-han", "muscle_gain", "intermediate"),
            ],
        };
        values
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect()
    }
}

impl std::str::FromStr for SampleDataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exercises" => Ok(SampleDataset::Exercises),
            "members" => Ok(SampleDataset::Members),
            other => Err(format!("unknown dataset '{}'", other)),
        }
    }
}

fn exercise(title: &str, kind: &str, url: &str, description: &str) -> serde_json::Value {
    json!({"title": title, "type": kind, "url": url, "description": description})
}

fn member(user_id: u32, name: &str, goal: &str, level: &str) -> serde_json::Value {
    json!({"user_id": user_id, "name": name, "goal": goal, "level": level})
}

/// Generate `count` vectors with components uniform in [0, 1).
pub fn random_vectors<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    dimension: usize,
) -> Vec<Vec<f32>> {
    (0..count)
        .map(|_| (0..dimension).map(|_| rng.random::<f32>()).collect())
        .collect()
}

/// Add every record of `dataset` to `store` with a random vector.
///
/// Does not save. Returns the number of vectors added.
pub fn seed_dataset<I: VectorIndex, R: Rng + ?Sized>(
    store: &mut VectorIndexStore<I>,
    dataset: SampleDataset,
    rng: &mut R,
) -> Result<usize, VectorError> {
    let records = dataset.records();
    let vectors = random_vectors(rng, records.len(), store.dimension());
    let added = records.len();
    store.add_vectors(&vectors, records)?;
    Ok(added)
}
