//! Latent trait discovery: greedy clustering over co-activation structure.
//!
//! ```text
//! pairs ──► edge weight = (P(b|a) + P(a|b)) / 2 ──► keep if ≥ threshold
//!   nodes by total strength (strongest first)
//!   for each unvisited node: BFS, adding the top-k unvisited neighbors
//!   of the current node, until the cluster is full
//!   keep clusters with at least `min_size` members
//! ```
//!
//! Nodes claimed by a cluster that ends up too small stay visited; they are
//! not offered to later clusters.

use std::collections::VecDeque;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::manifold::TraitManifold;
use crate::model::{LatentTrait, TraitId, TraitStrength, MAX_LATENT_COMPONENTS};

/// Clustering knobs. See [`ProfileConfig`](crate::config::ProfileConfig).
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClusterParams {
    pub min_size: usize,
    pub min_co_activation: f64,
    pub max_size: usize,
    pub max_branching: usize,
}

type Members = SmallVec<[usize; MAX_LATENT_COMPONENTS]>;

/// Discover latent traits. `ranked` must hold every trait, strongest first.
pub(crate) fn discover(
    manifold: &TraitManifold,
    ranked: &[TraitStrength],
    params: ClusterParams,
) -> Vec<LatentTrait> {
    let max_size = params.max_size.min(MAX_LATENT_COMPONENTS);
    let n = ranked.len();
    let position: HashMap<&TraitId, usize> = ranked
        .iter()
        .enumerate()
        .map(|(i, t)| (&t.trait_id, i))
        .collect();

    // Undirected weighted adjacency, by rank position.
    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for (key, count) in manifold.pairs() {
        if count == 0 {
            continue;
        }
        let (a, b) = (key.first(), key.second());
        let weight = (manifold.co_activation_probability(a.as_str(), b.as_str())
            + manifold.co_activation_probability(b.as_str(), a.as_str()))
            / 2.0;
        if weight < params.min_co_activation {
            continue;
        }
        if let (Some(&ia), Some(&ib)) = (position.get(a), position.get(b)) {
            adjacency[ia].push((ib, weight));
            adjacency[ib].push((ia, weight));
        }
    }
    for neighbors in &mut adjacency {
        neighbors.sort_by(|x, y| y.1.total_cmp(&x.1).then(x.0.cmp(&y.0)));
    }

    let mut visited = vec![false; n];
    let mut kept: Vec<Members> = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut members: Members = SmallVec::new();
        members.push(start);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if members.len() >= max_size {
                break;
            }
            let picks: SmallVec<[usize; 4]> = adjacency[current]
                .iter()
                .filter(|(j, _)| !visited[*j])
                .take(params.max_branching)
                .map(|(j, _)| *j)
                .collect();
            for j in picks {
                if members.len() >= max_size {
                    break;
                }
                visited[j] = true;
                members.push(j);
                queue.push_back(j);
            }
        }

        if members.len() >= params.min_size {
            kept.push(members);
        } else {
            tracing::trace!(seed = %ranked[start].trait_id, size = members.len(), "dropped undersized cluster");
        }
    }

    let mut latent: Vec<LatentTrait> = kept
        .into_iter()
        .map(|members| {
            let components: SmallVec<[TraitId; MAX_LATENT_COMPONENTS]> =
                members.iter().map(|&i| ranked[i].trait_id.clone()).collect();
            let strength = members.iter().map(|&i| ranked[i].strength).sum::<f64>()
                / members.len() as f64;
            LatentTrait {
                id: String::new(),
                cohesion: cohesion(manifold, &components),
                components,
                strength,
            }
        })
        .collect();

    latent.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    for (i, cluster) in latent.iter_mut().enumerate() {
        cluster.id = format!("latent_{}", i + 1);
    }

    tracing::debug!(clusters = latent.len(), traits = n, "latent trait discovery complete");
    latent
}

/// Mean of P(j | i) over ordered member pairs that co-occurred at least once.
fn cohesion(manifold: &TraitManifold, components: &[TraitId]) -> f64 {
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for a in components {
        for b in components {
            if a == b || manifold.co_occurrence(a.as_str(), b.as_str()) == 0 {
                continue;
            }
            sum += manifold.co_activation_probability(a.as_str(), b.as_str());
            pairs += 1;
        }
    }
    if pairs == 0 { 0.0 } else { sum / pairs as f64 }
}
