use chrono::{DateTime, Datelike};

/// A single thought as supplied by the embedding source.
///
/// Immutable for the duration of a render cycle; the whole collection is
/// replaced when the data source refreshes.
#[derive(Clone, Debug, PartialEq)]
pub struct Thought {
	pub id: String,
	pub content: String,
	/// Epoch milliseconds.
	pub timestamp: i64,
	/// High-dimensional embedding, components pre-scaled to [0, 1].
	/// May be empty when the source has not embedded the item yet.
	pub embedding: Vec<f64>,
	/// Precomputed 2D projection, when the reduction pass has run.
	pub projected: Option<(f64, f64)>,
	/// Node weight for the network view.
	pub size_metric: Option<f64>,
}

/// A similarity edge between two thoughts, pre-filtered by the data source
/// to `similarity` at or above its threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityLink {
	pub source: String,
	pub target: String,
	/// Cosine similarity in [0, 1].
	pub similarity: f64,
}

/// Thoughts plus their similarity edges, as fed to the network view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThoughtGraph {
	pub thoughts: Vec<Thought>,
	pub links: Vec<SimilarityLink>,
}

/// Format an epoch-ms timestamp for display in tooltips.
pub fn format_timestamp(ms: i64) -> String {
	DateTime::from_timestamp_millis(ms)
		.map(|dt| dt.format("%b %e, %Y %H:%M").to_string())
		.unwrap_or_default()
}

/// The (year, month) a timestamp falls in, for date faceting.
pub fn year_month(ms: i64) -> Option<(i32, u32)> {
	DateTime::from_timestamp_millis(ms).map(|dt| (dt.year(), dt.month()))
}

/// Distinct (year, month) facets present in a collection, oldest first.
pub fn month_facets(thoughts: &[Thought]) -> Vec<(i32, u32)> {
	let mut facets: Vec<(i32, u32)> = thoughts
		.iter()
		.filter_map(|t| year_month(t.timestamp))
		.collect();
	facets.sort_unstable();
	facets.dedup();
	facets
}

/// Filter to the thoughts falling in `facet`, or all of them when no facet
/// is selected. Runs upstream of the visualization core.
pub fn filter_by_month(thoughts: &[Thought], facet: Option<(i32, u32)>) -> Vec<Thought> {
	match facet {
		None => thoughts.to_vec(),
		Some(f) => thoughts
			.iter()
			.filter(|t| year_month(t.timestamp) == Some(f))
			.cloned()
			.collect(),
	}
}
