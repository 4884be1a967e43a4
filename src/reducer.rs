/*

    Fold per-chunk bounding box tables into one global table.

    The fold is componentwise min/max per label, which is associative
    and commutative with BBox::EMPTY as identity, so any fold order
    (sequential, pairwise tree, streaming) gives a bit-identical
    result. The executor normally folds on the fly via rayon's
    try_reduce; this standalone fold is for callers that materialize
    the chunk tables themselves.

    Calling it with zero tables is a contract violation: the executor
    never produces an empty chunk set for a non-empty volume.

    @date: 13 Dec, 2025
    @author: Bartu
*/

use crate::table::BBoxTable;

/// Reduce a non-empty collection of per-chunk tables into the global table.
pub fn reduce_tables(tables: impl IntoIterator<Item = BBoxTable>) -> BBoxTable {
    let mut iter = tables.into_iter();
    let mut global = iter
        .next()
        .expect("reduce_tables called with zero chunk tables");
    for table in iter {
        global.merge(&table);
    }
    global
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;

    fn table_with(label: usize, p: [crate::numeric::Coord; 3]) -> BBoxTable {
        let mut t = BBoxTable::empty(6);
        t.expand(label, p);
        t
    }

    #[test]
    fn test_fold_order_does_not_matter() {
        let a = table_with(5, [1, 1, 1]);
        let b = table_with(5, [3, 2, 0]);
        let c = table_with(2, [0, 4, 4]);

        let abc = reduce_tables([a.clone(), b.clone(), c.clone()]);
        let cba = reduce_tables([c, b, a]);
        assert_eq!(abc, cba);
        assert_eq!(abc.get(5).to_row(), [1, 1, 0, 3, 2, 1]);
        assert_eq!(abc.get(2).to_row(), [0, 4, 4, 0, 4, 4]);
    }

    #[test]
    fn test_sentinel_tables_are_neutral() {
        let a = table_with(1, [7, 0, 2]);
        let folded = reduce_tables([BBoxTable::empty(6), a.clone(), BBoxTable::empty(6)]);
        assert_eq!(folded, a);
        assert_eq!(*folded.get(0), BBox::EMPTY);
    }

    #[test]
    #[should_panic]
    fn test_zero_tables_is_a_contract_violation() {
        reduce_tables(Vec::new());
    }
}
