use matrixcompare::assert_matrix_eq;
use mshconv::compact::compact_nodes;
use mshconv::error::ConversionError;
use mshconv::raw::NodeId;
use nalgebra::DMatrix;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[test]
fn unreferenced_nodes_are_discarded() {
    let ids = [1, 2, 3, 4, 5];
    #[rustfmt::skip]
    let coords = [
        0.0, 0.0, 0.0,
        1.0, 0.0, 0.0,
        9.0, 9.0, 9.0,
        1.0, 1.0, 0.0,
        0.0, 1.0, 0.0,
    ];
    let (map, points) = compact_nodes(&ids, &coords, vec![1, 2, 4, 1, 4, 5]).unwrap();

    assert_eq!(map.num_nodes(), 4);
    assert_eq!(map.get(3), None);
    assert_eq!(map.get(4), Some(2));
    let expected = DMatrix::from_row_slice(4, 3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    assert_matrix_eq!(points, expected);
}

#[test]
fn missing_referenced_node_is_rejected() {
    let ids = [1, 2, 3];
    let coords = [0.0; 9];
    let result = compact_nodes(&ids, &coords, vec![1, 2, 7]);
    assert!(matches!(result, Err(ConversionError::InvalidMesh(_))));

    let result = compact_nodes(&ids, &coords, vec![0]);
    assert!(matches!(result, Err(ConversionError::InvalidMesh(_))));
}

#[test]
fn malformed_node_lists_are_rejected() {
    let result = compact_nodes(&[1, 2, 2], &[0.0; 9], vec![1]);
    assert!(matches!(result, Err(ConversionError::InvalidMesh(_))));

    let result = compact_nodes(&[0, 1], &[0.0; 6], vec![1]);
    assert!(matches!(result, Err(ConversionError::InvalidMesh(_))));

    let result = compact_nodes(&[1, 2], &[0.0; 5], vec![1]);
    assert!(matches!(result, Err(ConversionError::InvalidMesh(_))));
}

#[test]
fn index_of_unknown_node_is_invalid_mesh() {
    let (map, _) = compact_nodes(&[1, 2], &[0.0; 6], vec![2]).unwrap();
    assert_eq!(map.index_of(2), Ok(0));
    assert!(matches!(map.index_of(1), Err(ConversionError::InvalidMesh(_))));

    let mut indices = [0; 2];
    assert!(map.remap_into(&[2, 1], &mut indices).is_err());
}

#[test]
fn huge_sparse_ids_are_compacted() {
    let ids = [1 << 62, 2, 1, 3, u64::MAX];
    let coords: Vec<f64> = ids.iter().flat_map(|&id| [id as f64, 0.0, 0.0]).collect();
    let (map, points) = compact_nodes(&ids, &coords, vec![1, 1 << 62, 3, u64::MAX]).unwrap();

    assert_eq!(map.num_nodes(), 4);
    assert_eq!(map.get(1), Some(0));
    assert_eq!(map.get(2), None);
    assert_eq!(map.get(3), Some(1));
    assert_eq!(map.get(1 << 62), Some(2));
    assert_eq!(map.get(u64::MAX), Some(3));
    assert_eq!(map.get((1 << 62) + 1), None);
    assert_eq!(points[(2, 0)], (1u64 << 62) as f64);

    let result = compact_nodes(&ids, &coords, vec![10_000_000_000]);
    assert!(matches!(result, Err(ConversionError::InvalidMesh(_))));
}

#[test]
fn unreferenced_huge_id_does_not_affect_numbering() {
    let ids = [3, 1, 10_000_000_000, 2];
    let (map, points) = compact_nodes(&ids, &[0.0; 12], vec![2, 3, 1]).unwrap();
    assert_eq!(map.num_nodes(), 3);
    assert_eq!(points.nrows(), 3);
    assert_eq!(map.get(10_000_000_000), None);
    assert_eq!(map.index_of(3), Ok(2));
}

/// Distinct node ids in shuffled order, and a subset of them marked as referenced.
fn ids_and_references() -> impl Strategy<Value = (Vec<NodeId>, Vec<bool>)> {
    let dense = prop::collection::btree_set(1..200 as NodeId, 1..40);
    let sparse = prop::collection::btree_set(1..NodeId::MAX, 1..40);
    prop_oneof![dense, sparse]
        .prop_flat_map(|ids| {
            let n = ids.len();
            let ids: Vec<_> = ids.into_iter().collect();
            (Just(ids).prop_shuffle(), prop::collection::vec(any::<bool>(), n))
        })
}

proptest! {
    #[test]
    fn compaction_is_a_bijection_onto_referenced_nodes((ids, referenced) in ids_and_references()) {
        // Coordinates encode the id, so that rows can be traced back
        let coords: Vec<f64> = ids.iter().flat_map(|&id| [id as f64, 0.0, -(id as f64)]).collect();
        let referenced_ids: BTreeSet<NodeId> = ids
            .iter()
            .zip(&referenced)
            .filter(|&(_, &r)| r)
            .map(|(&id, _)| id)
            .collect();

        let (map, points) = compact_nodes(&ids, &coords, referenced_ids.iter().copied()).unwrap();

        prop_assert_eq!(map.num_nodes(), referenced_ids.len());
        prop_assert_eq!(points.nrows(), referenced_ids.len());
        // Indices are assigned in ascending id order
        for (expected_index, &id) in referenced_ids.iter().enumerate() {
            prop_assert_eq!(map.get(id), Some(expected_index));
            prop_assert_eq!(points[(expected_index, 0)], id as f64);
            prop_assert_eq!(points[(expected_index, 2)], -(id as f64));
        }
        for &id in &ids {
            if !referenced_ids.contains(&id) {
                prop_assert_eq!(map.get(id), None);
            }
        }
    }
}
