//! A graph-agnostic best-first search. The caller owns the graph: it drives
//! the search by repeatedly calling [GraphSearch::run] to expand the best
//! open node and then feeding the edges of that node back in through
//! [GraphSearch::add_neighbor]. Nodes are identified by an externally
//! meaningful key and stored in a growable table that is scanned linearly on
//! lookup - the engine assumes small active-node counts (tens, not millions).
//!
//! There is no sticky closed set: a node that has left the open list can be
//! re-opened by [GraphSearch::add_neighbor] when a strictly better route to
//! it is found. This mirrors the behaviour the rest of the crate was built
//! against and is deliberate
//!

/// A discovered node in the search table
#[derive(Clone, Copy, Debug)]
struct GraphNode<Id> {
	/// Externally meaningful key of the node
	id: Id,
	/// Index into the node table of the node this one was reached from,
	/// [None] for the start node
	parent: Option<usize>,
	/// Cost of the best route discovered from the start to this node
	g: i32,
	/// Heuristic estimate from this node to the goal
	h: i32,
	/// Total score `g + h`
	f: i32,
}

/// Incremental best-first search over an externally supplied graph
#[derive(Clone, Debug)]
pub struct GraphSearch<Id> {
	/// Table of every node discovered so far
	nodes: Vec<GraphNode<Id>>,
	/// Indices into `nodes` that have been discovered but not yet expanded
	open: Vec<usize>,
	/// Index into `nodes` of the node currently being expanded
	root: usize,
}

impl<Id: Copy + PartialEq> GraphSearch<Id> {
	/// Create a new search rooted at `start` with the given heuristic
	/// estimate to the goal
	pub fn new(start: Id, heuristic: i32) -> Self {
		let root = GraphNode {
			id: start,
			parent: None,
			g: 0,
			h: heuristic,
			f: heuristic,
		};
		GraphSearch {
			nodes: vec![root],
			open: vec![0],
			root: 0,
		}
	}
	/// Expand the open node with the lowest `f` score, making it the new
	/// root. Ties are broken by open-list order (first found wins) which is
	/// stable but not canonical - callers should not rely on a specific tie
	/// winner. Returns false once the open list is exhausted, after which no
	/// further progress is possible
	pub fn run(&mut self) -> bool {
		if self.open.is_empty() {
			return false;
		}
		let mut best = 0;
		for i in 1..self.open.len() {
			if self.nodes[self.open[i]].f < self.nodes[self.open[best]].f {
				best = i;
			}
		}
		self.root = self.open.remove(best);
		true
	}
	/// Get the id of the node currently being expanded
	pub fn root(&self) -> Id {
		self.nodes[self.root].id
	}
	/// Relax the edge from the current root to the node `id`, where
	/// `distance` is the edge cost and `heuristic` the estimate from `id` to
	/// the goal. Unseen ids are inserted parented at the root and opened.
	/// Seen ids are updated in place when the new score is strictly better
	/// and re-opened if they had already left the open list
	pub fn add_neighbor(&mut self, id: Id, distance: i32, heuristic: i32) {
		let g = self.nodes[self.root].g + distance;
		let f = g + heuristic;

		match self.nodes.iter().position(|n| n.id == id) {
			None => {
				self.open.push(self.nodes.len());
				self.nodes.push(GraphNode {
					id,
					parent: Some(self.root),
					g,
					h: heuristic,
					f,
				});
			}
			Some(index) => {
				let node = &mut self.nodes[index];
				if f < node.f {
					node.g = g;
					node.h = heuristic;
					node.f = f;
					node.parent = Some(self.root);
				}
				if !self.open.contains(&index) {
					self.open.push(index);
				}
			}
		}
	}
	/// Walk the parent links from the current root back to the start,
	/// producing the id sequence in **root to start order** - the caller is
	/// responsible for reversing it if a start-first ordering is wanted
	pub fn generate_path(&self) -> Vec<Id> {
		let mut path = Vec::new();
		let mut index = Some(self.root);
		while let Some(i) = index {
			let node = &self.nodes[i];
			path.push(node.id);
			index = node.parent;
		}
		path
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn scores_stay_consistent() {
		// a line of nodes 0-1-2 with an expensive shortcut 0-2 that later
		// gets undercut by the 1-2 edge
		let mut search = GraphSearch::new(0, 20);
		search.add_neighbor(1, 10, 10);
		search.add_neighbor(2, 35, 0);
		assert!(search.run());
		assert_eq!(1, search.root());
		search.add_neighbor(2, 10, 0);
		for node in search.nodes.iter() {
			assert_eq!(node.f, node.g + node.h);
		}
		// node 2 must hold the cheaper of the two relaxed routes
		let node = search.nodes.iter().find(|n| n.id == 2).unwrap();
		assert_eq!(20, node.g);
	}
	#[test]
	fn path_is_root_to_start_order() {
		let mut search = GraphSearch::new(0, 30);
		search.add_neighbor(1, 10, 20);
		assert!(search.run());
		search.add_neighbor(2, 10, 10);
		assert!(search.run());
		search.add_neighbor(3, 10, 0);
		assert!(search.run());
		assert_eq!(3, search.root());
		assert_eq!(vec![3, 2, 1, 0], search.generate_path());
	}
	#[test]
	fn exhausted_search_stops() {
		let mut search = GraphSearch::new(0, 0);
		assert!(search.run());
		assert!(!search.run());
		assert!(!search.run());
		// root stays wherever it last was
		assert_eq!(0, search.root());
	}
	#[test]
	fn closed_node_reopens_on_better_route() {
		let mut search = GraphSearch::new(0, 10);
		search.add_neighbor(1, 30, 5);
		// expand node 1, taking it off the open list
		assert!(search.run());
		assert_eq!(1, search.root());
		assert!(search.open.is_empty());
		// pretend the caller found a cheaper edge into 1 from a later root
		search.root = 0;
		search.add_neighbor(1, 5, 5);
		let index = search.nodes.iter().position(|n| n.id == 1).unwrap();
		assert!(search.open.contains(&index));
		assert_eq!(5, search.nodes[index].g);
	}
	#[test]
	fn worse_route_does_not_overwrite() {
		let mut search = GraphSearch::new(0, 10);
		search.add_neighbor(1, 10, 5);
		search.add_neighbor(1, 50, 5);
		let node = search.nodes.iter().find(|n| n.id == 1).unwrap();
		assert_eq!(10, node.g);
		assert_eq!(15, node.f);
	}
}
