use leptos::prelude::*;

use crate::components::network::ThoughtGraphCanvas;
use crate::components::scatter::ScatterPlotCanvas;
use crate::components::types::{self, SimilarityLink, Thought, ThoughtGraph};

/// Edges below this cosine similarity never reach the network view.
const SIMILARITY_THRESHOLD: f64 = 0.72;
const EMBED_DIM: usize = 8;
const SAMPLE_COUNT: usize = 48;
/// 2025-10-01T00:00:00Z.
const SAMPLE_EPOCH_MS: i64 = 1_759_276_800_000;
/// Roughly two and a half days between consecutive thoughts.
const SAMPLE_STEP_MS: i64 = 225_000_000;

const PHRASES: &[&str] = &[
	"ship the embedding cache before friday",
	"gradient noise might explain the drift",
	"call mum about the weekend",
	"reread the attention survey",
	"the garden needs a second raised bed",
	"batch the similarity queries",
	"what if notes clustered themselves",
	"refactor the ingest pipeline",
	"cheap flights to lisbon in november",
	"projection quality depends on perplexity",
	"try sourdough with rye starter",
	"index rebuilds are quadratic again",
	"sketch the onboarding flow",
	"vector store compaction strategy",
	"birthday gift ideas for sam",
	"profile the tokenizer hot path",
	"museum exhibit on cartography",
	"dedupe near-identical snippets",
	"swimming on tuesday evenings",
	"cluster labels from top terms",
];

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Generate a sample thought collection, standing in for the embedding
/// service. Embedding components live in [0, 1]; most items carry a
/// precomputed projection, some only the vector, a few neither.
fn generate_sample_thoughts(n: usize) -> Vec<Thought> {
	(0..n)
		.map(|i| {
			let cluster = i % 4;
			let embedding: Vec<f64> = (0..EMBED_DIM)
				.map(|d| {
					let center = rand_simple(cluster * 31 + d * 7);
					(center * 0.6 + rand_simple(i * 13 + d) * 0.4).clamp(0.0, 1.0)
				})
				.collect();
			let projected = if i % 9 == 7 {
				None
			} else {
				Some((
					(embedding[0] * 2.0 - 1.0) * 0.8 + (rand_simple(i * 17) - 0.5) * 0.3,
					(embedding[1] * 2.0 - 1.0) * 0.8 + (rand_simple(i * 19) - 0.5) * 0.3,
				))
			};
			let embedding = if i % 11 == 10 { Vec::new() } else { embedding };
			Thought {
				id: format!("thought-{i}"),
				content: PHRASES[i % PHRASES.len()].to_string(),
				timestamp: SAMPLE_EPOCH_MS + i as i64 * SAMPLE_STEP_MS,
				embedding,
				projected,
				size_metric: Some(1.0 + rand_simple(i * 23) * 8.0),
			}
		})
		.collect()
}

/// Cosine similarity between two equal-length vectors; 0.0 when either has
/// no magnitude.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
	if a.len() != b.len() || a.is_empty() {
		return 0.0;
	}
	let (mut dot, mut mag_a, mut mag_b) = (0.0, 0.0, 0.0);
	for (x, y) in a.iter().zip(b.iter()) {
		dot += x * y;
		mag_a += x * x;
		mag_b += y * y;
	}
	let denom = mag_a.sqrt() * mag_b.sqrt();
	if denom < f64::EPSILON {
		0.0
	} else {
		(dot / denom).clamp(-1.0, 1.0)
	}
}

/// Pairwise similarity edges at or above the threshold. Items without
/// embeddings take part in no edges.
fn similarity_links(thoughts: &[Thought], threshold: f64) -> Vec<SimilarityLink> {
	let mut links = Vec::new();
	for i in 0..thoughts.len() {
		for j in (i + 1)..thoughts.len() {
			let (a, b) = (&thoughts[i], &thoughts[j]);
			if a.embedding.is_empty() || b.embedding.is_empty() {
				continue;
			}
			let similarity = cosine_similarity(&a.embedding, &b.embedding);
			if similarity >= threshold {
				links.push(SimilarityLink {
					source: a.id.clone(),
					target: b.id.clone(),
					similarity,
				});
			}
		}
	}
	links
}

const MONTH_NAMES: &[&str] = &[
	"Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn facet_label((year, month): (i32, u32)) -> String {
	format!("{} {}", MONTH_NAMES[(month as usize - 1) % 12], year)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ViewKind {
	Network,
	Scatter,
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let mode = RwSignal::new(ViewKind::Network);
	let facet = RwSignal::new(None::<(i32, u32)>);
	let (focused, set_focused) = signal(None::<String>);
	let (hovered, set_hovered) = signal(None::<String>);

	// Facet filtering happens here, upstream of the visualization core.
	let thoughts = Signal::derive(move || {
		types::filter_by_month(&generate_sample_thoughts(SAMPLE_COUNT), facet.get())
	});
	let graph_data = Signal::derive(move || {
		let thoughts = thoughts.get();
		let links = similarity_links(&thoughts, SIMILARITY_THRESHOLD);
		ThoughtGraph { thoughts, links }
	});
	let facets = Signal::derive(move || types::month_facets(&generate_sample_thoughts(SAMPLE_COUNT)));

	let on_focus = Callback::new(move |id: String| set_focused.set(Some(id)));
	let on_hover = Callback::new(move |id: Option<String>| set_hovered.set(id));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				{move || match mode.get() {
					ViewKind::Network => {
						view! {
							<ThoughtGraphCanvas
								data=graph_data
								fullscreen=true
								on_focus=on_focus
								on_hover=on_hover
							/>
						}
							.into_any()
					}
					ViewKind::Scatter => {
						view! {
							<ScatterPlotCanvas
								data=thoughts
								fullscreen=true
								on_focus=on_focus
								on_hover=on_hover
							/>
						}
							.into_any()
					}
				}}
				<div class="graph-overlay">
					<h1>"Thought Atlas"</h1>
					<p class="subtitle">
						"Click a thought to focus it. Scroll to zoom. Drag the background to pan."
					</p>
					<div class="view-toggle">
						<button
							class:active=move || mode.get() == ViewKind::Network
							on:click=move |_| mode.set(ViewKind::Network)
						>
							"Network"
						</button>
						<button
							class:active=move || mode.get() == ViewKind::Scatter
							on:click=move |_| mode.set(ViewKind::Scatter)
						>
							"Scatter"
						</button>
					</div>
					<div class="facets">
						<button
							class:active=move || facet.get().is_none()
							on:click=move |_| facet.set(None)
						>
							"All"
						</button>
						{move || {
							facets
								.get()
								.into_iter()
								.map(|f| {
									view! {
										<button
											class:active=move || facet.get() == Some(f)
											on:click=move |_| facet.set(Some(f))
										>
											{facet_label(f)}
										</button>
									}
								})
								.collect_view()
						}}
					</div>
					<p class="status">
						{move || {
							hovered
								.get()
								.map(|id| format!("hovering {id}"))
								.or_else(|| focused.get().map(|id| format!("focused {id}")))
								.unwrap_or_default()
						}}
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cosine_of_identical_vectors_is_one() {
		let v = vec![0.2, 0.5, 0.8];
		assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
	}

	#[test]
	fn cosine_of_orthogonal_vectors_is_zero() {
		assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
	}

	#[test]
	fn links_respect_the_threshold_and_skip_unembedded_items() {
		let mut thoughts = generate_sample_thoughts(12);
		thoughts[3].embedding = Vec::new();
		let links = similarity_links(&thoughts, SIMILARITY_THRESHOLD);
		for link in &links {
			assert!(link.similarity >= SIMILARITY_THRESHOLD);
			assert_ne!(link.source, thoughts[3].id);
			assert_ne!(link.target, thoughts[3].id);
		}
	}

	#[test]
	fn sample_thoughts_exercise_every_projection_fallback() {
		let thoughts = generate_sample_thoughts(SAMPLE_COUNT);
		assert!(thoughts.iter().any(|t| t.projected.is_some()));
		assert!(
			thoughts
				.iter()
				.any(|t| t.projected.is_none() && !t.embedding.is_empty())
		);
		assert!(
			thoughts
				.iter()
				.any(|t| t.projected.is_none() && t.embedding.is_empty())
		);
	}
}
