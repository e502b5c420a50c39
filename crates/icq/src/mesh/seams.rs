//! Seam identification across cube faces.
//!
//! Twelve edge rules and eight corner rules relate boundary cells of adjacent
//! faces. Together they partition every `(face, j, i)` cell into equivalence
//! classes, one per physical vertex: 8 corner classes of three cells, edge
//! classes of two cells, and single-cell interior classes.
//!
//! The table stores a class id per flat index plus the members of every
//! class, in flat order. It is built once per resolution.

use super::{flat_index, GridIndex, FACE_COUNT};

/// Identifier of a seam class (one physical vertex).
pub type SeamClassId = u32;

#[derive(Debug, Clone, Copy)]
enum Side {
    Start,
    End,
}

impl Side {
    fn at(self, q: usize) -> usize {
        match self {
            Side::Start => 0,
            Side::End => q,
        }
    }
}

/// A boundary row or column of one face, walked by a parameter `t` in `0..=Q`.
#[derive(Debug, Clone, Copy)]
enum Line {
    /// Fixed row `j`, walking along `i`
    Row(Side),
    /// Fixed column `i`, walking along `j`
    Column(Side),
}

#[derive(Debug, Clone, Copy)]
struct BoundaryRun {
    face: usize,
    line: Line,
    reversed: bool,
}

impl BoundaryRun {
    const fn new(face: usize, line: Line, reversed: bool) -> Self {
        Self {
            face,
            line,
            reversed,
        }
    }

    fn cell(&self, q: usize, t: usize) -> GridIndex {
        let s = if self.reversed { q - t } else { t };
        match self.line {
            Line::Row(side) => GridIndex::new(self.face, side.at(q), s),
            Line::Column(side) => GridIndex::new(self.face, s, side.at(q)),
        }
    }
}

use Line::{Column, Row};
use Side::{End, Start};

/// Pairs of boundary runs holding the same vertices.
const EDGE_SEAMS: [(BoundaryRun, BoundaryRun); 12] = [
    // v(I,Q,5) = v(Q-I,Q,3)
    (BoundaryRun::new(5, Row(End), false), BoundaryRun::new(3, Row(End), true)),
    // v(I,0,5) = v(I,Q,1)
    (BoundaryRun::new(5, Row(Start), false), BoundaryRun::new(1, Row(End), false)),
    // v(I,0,4) = v(Q,Q-I,0)
    (BoundaryRun::new(4, Row(Start), false), BoundaryRun::new(0, Column(End), true)),
    // v(I,0,3) = v(Q-I,0,0)
    (BoundaryRun::new(3, Row(Start), false), BoundaryRun::new(0, Row(Start), true)),
    // v(I,0,2) = v(0,I,0)
    (BoundaryRun::new(2, Row(Start), false), BoundaryRun::new(0, Column(Start), false)),
    // v(I,0,1) = v(I,Q,0)
    (BoundaryRun::new(1, Row(Start), false), BoundaryRun::new(0, Row(End), false)),
    // v(Q,I,5) = v(I,Q,4)
    (BoundaryRun::new(5, Column(End), false), BoundaryRun::new(4, Row(End), false)),
    // v(Q,I,4) = v(0,I,3)
    (BoundaryRun::new(4, Column(End), false), BoundaryRun::new(3, Column(Start), false)),
    // v(Q,I,3) = v(0,I,2)
    (BoundaryRun::new(3, Column(End), false), BoundaryRun::new(2, Column(Start), false)),
    // v(Q,I,2) = v(0,I,1)
    (BoundaryRun::new(2, Column(End), false), BoundaryRun::new(1, Column(Start), false)),
    // v(0,I,5) = v(Q-I,Q,2)
    (BoundaryRun::new(5, Column(Start), false), BoundaryRun::new(2, Row(End), true)),
    // v(0,I,4) = v(Q,I,1)
    (BoundaryRun::new(4, Column(Start), false), BoundaryRun::new(1, Column(End), false)),
];

/// Three-way corner identifications as `(face, row side, column side)`.
/// Implied by the edge rules, kept to make the corner classes explicit.
const CORNER_SEAMS: [[(usize, Side, Side); 3]; 8] = [
    [(0, Start, Start), (2, Start, Start), (3, Start, End)],
    [(0, End, Start), (1, Start, Start), (2, Start, End)],
    [(0, Start, End), (3, Start, Start), (4, Start, End)],
    [(0, End, End), (4, Start, Start), (1, Start, End)],
    [(5, Start, Start), (1, End, Start), (2, End, End)],
    [(5, End, Start), (2, End, Start), (3, End, End)],
    [(5, Start, End), (4, End, Start), (1, End, End)],
    [(5, End, End), (3, End, Start), (4, End, End)],
];

/// Precomputed seam-equivalence table for one resolution.
#[derive(Debug, Clone)]
pub struct SeamTable {
    q: usize,
    /// Class id of every flat index
    class_of: Vec<SeamClassId>,
    /// Offsets into `members`, one per class plus a terminator
    class_start: Vec<u32>,
    /// Flat indices grouped by class, ascending within a class
    members: Vec<u32>,
}

impl SeamTable {
    /// Build the table for resolution `q`.
    pub fn new(q: usize) -> Self {
        let side = q + 1;
        let total = FACE_COUNT * side * side;

        let mut parent: Vec<usize> = (0..total).collect();

        for (a, b) in EDGE_SEAMS.iter() {
            for t in 0..=q {
                union(
                    &mut parent,
                    flat_index(q, a.cell(q, t)),
                    flat_index(q, b.cell(q, t)),
                );
            }
        }
        for corner in CORNER_SEAMS.iter() {
            let cells: Vec<usize> = corner
                .iter()
                .map(|&(face, row, col)| flat_index(q, GridIndex::new(face, row.at(q), col.at(q))))
                .collect();
            union(&mut parent, cells[0], cells[1]);
            union(&mut parent, cells[1], cells[2]);
        }

        // Class ids are assigned in order of first appearance, so class 0 is
        // the first vertex of face 0 and representatives are lowest flat indices.
        let mut root_class: Vec<Option<SeamClassId>> = vec![None; total];
        let mut class_of = Vec::with_capacity(total);
        let mut class_count: u32 = 0;
        for idx in 0..total {
            let root = find(&mut parent, idx);
            let class = *root_class[root].get_or_insert_with(|| {
                class_count += 1;
                class_count - 1
            });
            class_of.push(class);
        }

        let mut class_start = vec![0u32; class_count as usize + 1];
        for &class in &class_of {
            class_start[class as usize + 1] += 1;
        }
        for c in 0..class_count as usize {
            class_start[c + 1] += class_start[c];
        }
        let mut cursor = class_start.clone();
        let mut members = vec![0u32; total];
        for (idx, &class) in class_of.iter().enumerate() {
            let slot = &mut cursor[class as usize];
            members[*slot as usize] = idx as u32;
            *slot += 1;
        }

        Self {
            q,
            class_of,
            class_start,
            members,
        }
    }

    /// Resolution this table was built for.
    pub fn resolution(&self) -> usize {
        self.q
    }

    /// Number of classes (unique vertices).
    pub fn class_count(&self) -> usize {
        self.class_start.len() - 1
    }

    /// Class of a flat index.
    pub fn class_of(&self, flat: usize) -> SeamClassId {
        self.class_of[flat]
    }

    /// Class id of every flat index.
    pub fn classes(&self) -> &[SeamClassId] {
        &self.class_of
    }

    /// Flat indices belonging to a class, ascending.
    pub fn members(&self, class: SeamClassId) -> &[u32] {
        let start = self.class_start[class as usize] as usize;
        let end = self.class_start[class as usize + 1] as usize;
        &self.members[start..end]
    }

    /// Representative flat index of a class (its lowest member).
    pub fn representative(&self, class: SeamClassId) -> usize {
        self.members[self.class_start[class as usize] as usize] as usize
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // Lower index wins so roots stay deterministic
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[hi] = lo;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::unique_vertex_count;

    fn class_size_histogram(table: &SeamTable) -> [usize; 4] {
        let mut hist = [0usize; 4];
        for class in 0..table.class_count() as u32 {
            let size = table.members(class).len();
            hist[size.min(3)] += 1;
        }
        hist
    }

    #[test]
    fn test_class_sizes_for_q4() {
        let table = SeamTable::new(4);
        let hist = class_size_histogram(&table);
        // 6 * 3^2 interior singletons, 12 * 3 edge pairs, 8 corner triples
        assert_eq!(hist[1], 54);
        assert_eq!(hist[2], 36);
        assert_eq!(hist[3], 8);
        assert_eq!(table.class_count(), unique_vertex_count(4));
    }

    #[test]
    fn test_q1_has_only_corners() {
        let table = SeamTable::new(1);
        assert_eq!(table.class_count(), 8);
        for class in 0..8 {
            assert_eq!(table.members(class).len(), 3);
        }
    }

    #[test]
    fn test_every_index_belongs_to_its_class() {
        let table = SeamTable::new(3);
        for flat in 0..table.classes().len() {
            let class = table.class_of(flat);
            assert!(table.members(class).contains(&(flat as u32)));
        }
    }

    #[test]
    fn test_representative_is_lowest_member() {
        let table = SeamTable::new(2);
        assert_eq!(table.class_of(0), 0);
        assert_eq!(table.representative(0), 0);
        for class in 0..table.class_count() as u32 {
            let members = table.members(class);
            assert!(members.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(table.representative(class), members[0] as usize);
        }
    }

    #[test]
    fn test_corner_rule_groups_three_faces() {
        let q = 5;
        let table = SeamTable::new(q);
        let a = table.class_of(flat_index(q, GridIndex::new(0, 0, 0)));
        let b = table.class_of(flat_index(q, GridIndex::new(2, 0, 0)));
        let c = table.class_of(flat_index(q, GridIndex::new(3, 0, q)));
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_reversed_edge_rule() {
        let q = 4;
        let table = SeamTable::new(q);
        // v(I,Q,5) = v(Q-I,Q,3) at I = 1
        let a = table.class_of(flat_index(q, GridIndex::new(5, q, 1)));
        let b = table.class_of(flat_index(q, GridIndex::new(3, q, q - 1)));
        assert_eq!(a, b);
        assert_eq!(table.members(a).len(), 2);
    }
}
