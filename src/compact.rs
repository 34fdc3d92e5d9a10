//! Removal of unreferenced nodes and renumbering of the remaining ones.
use crate::error::ConversionError;
use crate::raw::NodeId;
use log::{debug, warn};
use nalgebra::DMatrix;

const UNUSED: usize = usize::MAX;

/// The dense index array is used as long as the largest id is at most this multiple of the
/// number of retained nodes.
const MAX_DENSE_FILL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lookup {
    /// `perm[id - 1]` is the compacted index of `id`, or `UNUSED`.
    Dense(Vec<usize>),
    /// Retained ids in ascending order. The compacted index is the position in this list.
    Sparse(Vec<NodeId>),
}

/// Map from generator node ids to compacted 0-based node indices.
///
/// Compacted indices are assigned in ascending order of node id, so the map does not depend on
/// the order in which the generator lists its nodes. For ids that are reasonably contiguous the map
/// is an index array `perm` with `perm[id - 1]` holding the compacted index of the node `id`, or a
/// sentinel if the node was discarded. Very sparse ids are looked up by binary search instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMap {
    lookup: Lookup,
    num_retained: usize,
}

impl NodeMap {
    fn from_retained_ids(retained_ids: Vec<NodeId>) -> Self {
        let num_retained = retained_ids.len();
        let max_id = retained_ids.last().copied().unwrap_or(0);
        let dense_len = usize::try_from(max_id)
            .ok()
            .filter(|&len| len <= MAX_DENSE_FILL.saturating_mul(num_retained.max(1)));

        let lookup = match dense_len {
            Some(len) => {
                let mut perm = vec![UNUSED; len];
                for (index, &id) in retained_ids.iter().enumerate() {
                    perm[id as usize - 1] = index;
                }
                Lookup::Dense(perm)
            }
            None => Lookup::Sparse(retained_ids),
        };
        Self { lookup, num_retained }
    }

    /// Number of retained nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_retained
    }

    /// Compacted index of the node with the given id, if it was retained.
    pub fn get(&self, id: NodeId) -> Option<usize> {
        match &self.lookup {
            Lookup::Dense(perm) => {
                let slot = usize::try_from(id).ok()?.checked_sub(1)?;
                perm.get(slot).copied().filter(|&index| index != UNUSED)
            }
            Lookup::Sparse(ids) => ids.binary_search(&id).ok(),
        }
    }

    /// Compacted index of the node with the given id.
    pub fn index_of(&self, id: NodeId) -> Result<usize, ConversionError> {
        self.get(id).ok_or_else(|| {
            ConversionError::InvalidMesh(format!(
                "node id {} is not among the nodes of the top-dimension cells",
                id
            ))
        })
    }

    /// Writes the compacted indices of `ids` into `indices`.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    pub fn remap_into(&self, ids: &[NodeId], indices: &mut [usize]) -> Result<(), ConversionError> {
        assert_eq!(ids.len(), indices.len());
        for (index, &id) in indices.iter_mut().zip(ids) {
            *index = self.index_of(id)?;
        }
        Ok(())
    }
}

/// Discards nodes not referenced by any element and renumbers the remaining ones.
///
/// `coordinates` holds three values per entry of `node_ids`. Returns the node map together with
/// the coordinates of the retained nodes, one row per compacted index.
///
/// Node ids may be arbitrary positive integers with gaps. Fails with
/// [`ConversionError::InvalidMesh`] if a referenced id is not among `node_ids`, or if `node_ids`
/// contains zero or duplicated ids, or if the coordinate buffer has the wrong length.
pub fn compact_nodes(
    node_ids: &[NodeId],
    coordinates: &[f64],
    referenced: impl IntoIterator<Item = NodeId>,
) -> Result<(NodeMap, DMatrix<f64>), ConversionError> {
    if coordinates.len() != 3 * node_ids.len() {
        return Err(ConversionError::InvalidMesh(format!(
            "expected {} coordinates for {} nodes, got {}",
            3 * node_ids.len(),
            node_ids.len(),
            coordinates.len()
        )));
    }

    // (id, position in the generator's node list), sorted by id
    let mut sorted: Vec<(NodeId, usize)> = node_ids
        .iter()
        .copied()
        .enumerate()
        .map(|(k, id)| (id, k))
        .collect();
    sorted.sort_unstable();

    if sorted.first().map_or(false, |&(id, _)| id == 0) {
        return Err(ConversionError::InvalidMesh("node ids must be 1-based".to_string()));
    }
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(ConversionError::InvalidMesh(format!("duplicate node id {}", pair[0].0)));
    }

    let mut used = vec![false; sorted.len()];
    for id in referenced {
        let slot = sorted
            .binary_search_by_key(&id, |&(id, _)| id)
            .map_err(|_| {
                ConversionError::InvalidMesh(format!(
                    "element references node id {} which is not among the generator's nodes",
                    id
                ))
            })?;
        used[slot] = true;
    }

    // Compacted indices in ascending id order
    let (retained_ids, retained): (Vec<NodeId>, Vec<usize>) = sorted
        .iter()
        .zip(&used)
        .filter(|&(_, &is_used)| is_used)
        .map(|(&pair, _)| pair)
        .unzip();

    let num_discarded = node_ids.len() - retained.len();
    if num_discarded > 0 {
        warn!("Discarding {} nodes not referenced by any cell", num_discarded);
    }
    debug!(
        "Compacted {} nodes (max id {}) to {} nodes",
        node_ids.len(),
        sorted.last().map_or(0, |&(id, _)| id),
        retained.len()
    );

    let points = DMatrix::from_fn(retained.len(), 3, |i, j| coordinates[3 * retained[i] + j]);
    Ok((NodeMap::from_retained_ids(retained_ids), points))
}
