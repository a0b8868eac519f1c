use crate::components::projection::DataPoint;

/// Data-space distance under which two points are considered nearby.
pub const PROXIMITY_THRESHOLD: f64 = 0.3;

/// Derive the "nearby" relation over a point set.
///
/// Distances are measured in data space, so the relation is invariant under
/// pan and zoom. Pairs come out canonically ordered `(i, j)` with `i < j`,
/// indices into the input slice. Quadratic on purpose; callers with very
/// large sets downsample before this stage.
pub fn proximity_links(points: &[DataPoint]) -> Vec<(usize, usize)> {
	let mut links = Vec::new();
	for i in 0..points.len() {
		for j in (i + 1)..points.len() {
			let dx = points[i].x - points[j].x;
			let dy = points[i].y - points[j].y;
			if (dx * dx + dy * dy).sqrt() < PROXIMITY_THRESHOLD {
				links.push((i, j));
			}
		}
	}
	links
}

#[cfg(test)]
mod tests {
	use super::*;

	fn point(id: &str, x: f64, y: f64) -> DataPoint {
		DataPoint {
			id: id.into(),
			x,
			y,
			content: String::new(),
			timestamp: 0,
		}
	}

	#[test]
	fn near_pair_is_linked_far_pair_is_not() {
		let near = vec![point("a", 0.0, 0.0), point("b", 0.25, 0.0)];
		assert_eq!(proximity_links(&near), vec![(0, 1)]);

		let far = vec![point("a", 0.0, 0.0), point("b", 0.35, 0.0)];
		assert!(proximity_links(&far).is_empty());
	}

	#[test]
	fn pairs_are_canonical_and_irreflexive() {
		let points = vec![
			point("a", 0.0, 0.0),
			point("b", 0.1, 0.0),
			point("c", 0.1, 0.1),
		];
		let links = proximity_links(&points);
		for &(i, j) in &links {
			assert!(i < j);
			assert!(!links.contains(&(j, i)));
		}
		assert_eq!(links, vec![(0, 1), (0, 2), (1, 2)]);
	}

	#[test]
	fn relation_does_not_depend_on_input_scale_state() {
		// Same data-space geometry, differing ids/content only.
		let a = vec![point("x", -0.5, -0.5), point("y", -0.5, -0.3)];
		assert_eq!(proximity_links(&a).len(), 1);
	}
}
