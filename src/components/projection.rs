use std::f64::consts::PI;

use super::types::Thought;

/// A thought resolved to one definite data-space position.
///
/// Coordinates are unbounded reals, conventionally within roughly [-1, 1]
/// when produced by a fallback branch.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub content: String,
	pub timestamp: i64,
}

/// Resolve the `index`-th of `count` thoughts to a data-space point.
///
/// Fallback chain, first applicable branch wins:
/// 1. the precomputed projection, when both components are finite;
/// 2. the first two embedding components mapped `v -> v*2 - 1` — a degraded
///    placeholder, not a real projection;
/// 3. a deterministic slot on a radius-0.5 circle, from `index`/`count`
///    alone.
///
/// Total: every thought gets a finite position, whatever data it carries.
pub fn resolve(thought: &Thought, index: usize, count: usize) -> DataPoint {
	let (x, y) = match thought.projected {
		Some((px, py)) if px.is_finite() && py.is_finite() => (px, py),
		_ if thought.embedding.len() >= 2
			&& thought.embedding[0].is_finite()
			&& thought.embedding[1].is_finite() =>
		{
			(
				thought.embedding[0] * 2.0 - 1.0,
				thought.embedding[1] * 2.0 - 1.0,
			)
		}
		_ => {
			let angle = (index as f64 / count.max(1) as f64) * 2.0 * PI;
			(0.5 * angle.cos(), 0.5 * angle.sin())
		}
	};
	DataPoint {
		id: thought.id.clone(),
		x,
		y,
		content: thought.content.clone(),
		timestamp: thought.timestamp,
	}
}

/// Resolve a whole collection, one point per thought, in input order.
pub fn resolve_all(thoughts: &[Thought]) -> Vec<DataPoint> {
	let count = thoughts.len();
	thoughts
		.iter()
		.enumerate()
		.map(|(i, t)| resolve(t, i, count))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bare(id: &str) -> Thought {
		Thought {
			id: id.into(),
			content: format!("thought {id}"),
			timestamp: 0,
			embedding: Vec::new(),
			projected: None,
			size_metric: None,
		}
	}

	#[test]
	fn precomputed_projection_wins() {
		let mut t = bare("a");
		t.projected = Some((0.25, -0.75));
		t.embedding = vec![0.9, 0.9];
		let p = resolve(&t, 0, 1);
		assert_eq!((p.x, p.y), (0.25, -0.75));
	}

	#[test]
	fn embedding_head_is_rescaled() {
		let mut t = bare("a");
		t.embedding = vec![0.75, 0.25, 0.5];
		let p = resolve(&t, 0, 1);
		assert!((p.x - 0.5).abs() < 1e-12);
		assert!((p.y + 0.5).abs() < 1e-12);
	}

	#[test]
	fn non_finite_projection_falls_through() {
		let mut t = bare("a");
		t.projected = Some((f64::NAN, 0.0));
		t.embedding = vec![1.0, 1.0];
		let p = resolve(&t, 0, 1);
		assert_eq!((p.x, p.y), (1.0, 1.0));
	}

	#[test]
	fn five_bare_items_land_on_the_circle() {
		let thoughts: Vec<Thought> = (0..5).map(|i| bare(&i.to_string())).collect();
		let points = resolve_all(&thoughts);
		for (i, p) in points.iter().enumerate() {
			let angle = (i as f64 / 5.0) * 2.0 * PI;
			assert!((p.x - 0.5 * angle.cos()).abs() < 1e-12);
			assert!((p.y - 0.5 * angle.sin()).abs() < 1e-12);
			assert!((p.x * p.x + p.y * p.y).sqrt() - 0.5 < 1e-12);
		}
	}

	#[test]
	fn always_finite() {
		let cases = vec![
			bare("empty"),
			{
				let mut t = bare("short");
				t.embedding = vec![0.4];
				t
			},
			{
				let mut t = bare("nan-vec");
				t.embedding = vec![f64::NAN, f64::NAN];
				t
			},
			{
				let mut t = bare("inf-proj");
				t.projected = Some((f64::INFINITY, 1.0));
				t
			},
		];
		let count = cases.len();
		for (i, t) in cases.iter().enumerate() {
			let p = resolve(t, i, count);
			assert!(p.x.is_finite() && p.y.is_finite(), "{} not finite", t.id);
		}
	}
}
