use super::{DependencyGraph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
	White,
	Gray,
	Black,
}

/// Depth-first search from `starts` with three-color marking.
///
/// Returns the nodes of the first cycle found, in edge order starting at the
/// node where the back edge lands.
pub(crate) fn find_cycle(graph: &DependencyGraph, starts: &[NodeId]) -> Option<Vec<NodeId>> {
	let mut colors = vec![Color::White; graph.len()];
	let mut stack: Vec<(NodeId, usize)> = Vec::new();

	for &start in starts {
		if colors[start as usize] != Color::White {
			continue;
		}
		colors[start as usize] = Color::Gray;
		stack.push((start, 0));

		while let Some(top) = stack.last_mut() {
			let node = top.0;
			let Some(&successor) = graph.successors(node).get(top.1) else {
				colors[node as usize] = Color::Black;
				stack.pop();
				continue;
			};
			top.1 += 1;

			match colors[successor as usize] {
				Color::White => {
					colors[successor as usize] = Color::Gray;
					stack.push((successor, 0));
				}
				Color::Gray => {
					let from = stack.iter().position(|&(id, _)| id == successor).unwrap_or_default();
					return Some(stack[from..].iter().map(|&(id, _)| id).collect());
				}
				Color::Black => {}
			}
		}
	}
	None
}
