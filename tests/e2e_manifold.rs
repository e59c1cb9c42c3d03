//! End-to-end tests for accumulation and profile analysis.
//!
//! Each test records responses into a fresh `TraitManifold` and reads the
//! result back through `ProfileAnalyzer`.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use trait_manifold::{ProfileAnalyzer, SituationalContext, TraitManifold};

// ============================================================================
// Helper: two disjoint triangles, one tight and one loose.
// ============================================================================

/// {a, b, c} always fire together. {d, e, f} fire together once and
/// alone twice each, so every directed probability inside it is 1/3.
fn two_triangles() -> TraitManifold {
    let mut m = TraitManifold::new();
    for _ in 0..4 {
        m.record([("a", 1.0), ("b", 1.0), ("c", 1.0)], SituationalContext::WORK);
    }
    m.record([("d", 1.0), ("e", 1.0), ("f", 1.0)], SituationalContext::SOCIAL);
    for t in ["d", "e", "f"] {
        for _ in 0..2 {
            m.record([(t, 1.0)], SituationalContext::SOCIAL);
        }
    }
    m
}

fn clustered(m: &TraitManifold, threshold: f64) -> usize {
    ProfileAnalyzer::new(m)
        .discover_latent_traits(3, threshold)
        .iter()
        .map(|l| l.len())
        .sum()
}

// ============================================================================
// 1. Empty manifold
// ============================================================================

#[test]
fn test_empty_manifold() {
    let m = TraitManifold::new();
    let analyzer = ProfileAnalyzer::new(&m);

    assert_eq!(analyzer.trait_diversity(), 0);
    assert_eq!(analyzer.context_variance(), 0.0);
    assert_eq!(analyzer.contradiction_tolerance(), 0.0);
    assert_eq!(analyzer.tension(), 0.0);
    assert!(analyzer.discover_latent_traits(3, 0.3).is_empty());
    assert!(analyzer.generate_profile().is_empty());
}

// ============================================================================
// 2. Repeated pair
// ============================================================================

#[test]
fn test_repeated_pair_under_work() {
    let mut m = TraitManifold::new();
    for _ in 0..2 {
        m.record([("a", 0.5), ("b", 0.3)], SituationalContext::WORK);
    }
    let analyzer = ProfileAnalyzer::new(&m);

    assert_eq!(analyzer.trait_diversity(), 2);
    assert_eq!(m.co_occurrence("a", "b"), 2);
    assert_eq!(m.co_occurrence("b", "a"), 2);
    assert_eq!(m.co_activation_probability("a", "b"), 1.0);
    assert_eq!(m.co_activation_probability("b", "a"), 1.0);

    let top = analyzer.dominant_traits(1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].trait_id.as_str(), "a");
    assert_eq!(top[0].strength, 1.0);
}

// ============================================================================
// 3. Context buckets
// ============================================================================

#[test]
fn test_strength_split_by_context() {
    let mut m = TraitManifold::new();
    m.record([("a", 0.4)], SituationalContext::WORK);
    m.record([("a", 0.6)], SituationalContext::SOCIAL);

    assert_eq!(m.contextual_strength("a", SituationalContext::WORK), 0.4);
    assert_eq!(m.contextual_strength("a", SituationalContext::SOCIAL), 0.6);
    assert_eq!(m.contextual_strength("a", SituationalContext::STRESS), 0.0);
    assert_eq!(m.total_strength("a"), 1.0);

    // Population variance of [0.4, 0.6] is 0.01.
    let variance = ProfileAnalyzer::new(&m).context_variance();
    assert!((variance - 0.01).abs() < 1e-12);
}

#[test]
fn test_contextual_dominant_uses_intersection() {
    let mut m = TraitManifold::new();
    m.record([("a", 0.9)], SituationalContext::WORK | SituationalContext::STRESS);
    m.record([("b", 0.5)], SituationalContext::WORK);
    m.record([("c", 1.5)], SituationalContext::LEISURE);

    let analyzer = ProfileAnalyzer::new(&m);
    let stress = analyzer.contextual_dominant_traits(SituationalContext::STRESS, 5);
    let stress: Vec<&str> = stress.iter().map(|t| t.trait_id.as_str()).collect();
    assert_eq!(stress, vec!["a"]);

    let work = analyzer.contextual_dominant_traits(SituationalContext::WORK, 5);
    let work: Vec<&str> = work.iter().map(|t| t.trait_id.as_str()).collect();
    assert_eq!(work, vec!["a", "b"]);
}

// ============================================================================
// 4. Asymmetric conditional probability
// ============================================================================

#[test]
fn test_co_activation_probability_is_asymmetric() {
    let mut m = TraitManifold::new();
    for _ in 0..2 {
        m.record([("t1", 0.5), ("t2", 0.5)], SituationalContext::NONE);
    }
    for _ in 0..8 {
        m.record([("t1", 0.5)], SituationalContext::NONE);
    }

    assert_eq!(m.activation_count("t1"), 10);
    assert_eq!(m.co_activation_probability("t1", "t2"), 0.2);
    assert_eq!(m.co_activation_probability("t2", "t1"), 1.0);
    assert!(m.contexts().is_empty());
}

// ============================================================================
// 5. Opposite pairs
// ============================================================================

#[test]
fn test_no_opposites_means_no_tension() {
    let mut m = TraitManifold::new();
    for _ in 0..5 {
        m.record(
            [("logical_analysis", 0.8), ("planning_ahead", 0.6), ("novelty_seeking", 0.4)],
            SituationalContext::WORK,
        );
    }
    let analyzer = ProfileAnalyzer::new(&m);
    assert_eq!(analyzer.contradiction_tolerance(), 0.0);
    assert_eq!(analyzer.tension(), 0.0);
}

#[test]
fn test_observed_opposites_feed_tension() {
    let mut m = TraitManifold::new();
    for _ in 0..2 {
        m.record([("risk_taking", 0.5), ("risk_averse", 0.5)], SituationalContext::CRISIS);
    }
    let analyzer = ProfileAnalyzer::new(&m);
    assert_eq!(analyzer.contradiction_tolerance(), 2.0);
    // sqrt(1.0 * 1.0) * 2 / 2
    assert_eq!(analyzer.tension(), 1.0);
}

// ============================================================================
// 6. Latent traits
// ============================================================================

#[test]
fn test_latent_clusters_from_triangles() {
    let m = two_triangles();
    let latent = ProfileAnalyzer::new(&m).discover_latent_traits(3, 0.3);

    assert_eq!(latent.len(), 2);
    assert_eq!(latent[0].id, "latent_1");
    assert!(latent[0].contains("a") && latent[0].contains("b") && latent[0].contains("c"));
    assert_eq!(latent[0].strength, 4.0);
    assert_eq!(latent[0].cohesion, 1.0);

    assert_eq!(latent[1].id, "latent_2");
    assert!(latent[1].contains("d"));
    assert!((latent[1].cohesion - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_stricter_threshold_never_adds_members() {
    let m = two_triangles();
    let counts: Vec<usize> = [0.3, 0.5, 0.9, 1.0]
        .into_iter()
        .map(|t| clustered(&m, t))
        .collect();
    assert_eq!(counts, vec![6, 3, 3, 3]);
    assert!(counts.windows(2).all(|w| w[1] <= w[0]));
}

/// Strict threshold: a ten-member tree under `hub` plus the triangle
/// {bridge, c, d}. A weak `hub`-`bridge` edge lets `hub` claim `bridge`
/// early; the tree fills its ten slots before reaching `c`, `d` or
/// `tail`, which are left in undersized remnants.
fn bridged_tree() -> TraitManifold {
    fn pair(m: &mut TraitManifold, a: &str, strength: f64, b: &str, times: usize) {
        for _ in 0..times {
            m.record([(a, strength), (b, 1.0)], SituationalContext::NONE);
        }
    }

    let mut m = TraitManifold::new();
    pair(&mut m, "hub", 10.0, "left", 10);
    pair(&mut m, "hub", 10.0, "right", 10);
    for leaf in ["l1", "l2", "l3"] {
        pair(&mut m, "left", 1.0, leaf, 10);
    }
    for leaf in ["r1", "r2", "r3"] {
        pair(&mut m, "right", 1.0, leaf, 10);
    }
    pair(&mut m, "l1", 1.0, "tail", 10);
    pair(&mut m, "bridge", 1.0, "c", 10);
    pair(&mut m, "bridge", 1.0, "d", 10);
    pair(&mut m, "c", 1.0, "d", 10);
    // (1/21 + 1/21) / 2 ≈ 0.048
    pair(&mut m, "hub", 10.0, "bridge", 1);
    m
}

#[test]
fn test_looser_threshold_can_strand_traits() {
    let m = bridged_tree();
    let analyzer = ProfileAnalyzer::new(&m);

    let strict = analyzer.discover_latent_traits(3, 0.3);
    assert_eq!(strict.iter().map(|l| l.len()).collect::<Vec<_>>(), vec![10, 3]);
    assert!(strict[0].contains("tail") && !strict[0].contains("bridge"));

    let loose = analyzer.discover_latent_traits(3, 0.04);
    assert_eq!(loose.len(), 1);
    assert_eq!(loose[0].len(), 10);
    assert!(loose[0].contains("bridge"));
    assert!(!loose[0].contains("c") && !loose[0].contains("tail"));

    assert_eq!(clustered(&m, 0.3), 13);
    assert_eq!(clustered(&m, 0.04), 10);
}

#[test]
fn test_generated_profile_carries_everything() {
    let m = two_triangles();
    let profile = ProfileAnalyzer::new(&m).generate_profile();

    assert_eq!(profile.response_count, 11);
    assert_eq!(profile.trait_diversity, 6);
    assert_eq!(profile.all_traits.len(), 6);
    assert_eq!(profile.dominant_traits.len(), 5);
    assert_eq!(profile.latent_traits.len(), 2);
    assert_eq!(profile.strength("a"), 4.0);
    assert_eq!(profile.strength("missing"), 0.0);
}

// ============================================================================
// 7. Properties
// ============================================================================

const VOCAB: [&str; 8] = [
    "logical_analysis",
    "empathic_attunement",
    "risk_taking",
    "risk_averse",
    "planning_ahead",
    "spontaneity",
    "social_energizing",
    "solitude_recharging",
];

type Response = (Vec<(usize, f64)>, u16);

fn responses() -> impl Strategy<Value = Vec<Response>> {
    prop::collection::vec(
        (
            prop::collection::vec((0..VOCAB.len(), 0.0f64..1.0), 0..5),
            0u16..256,
        ),
        0..40,
    )
}

fn feed(responses: &[Response]) -> TraitManifold {
    let mut m = TraitManifold::new();
    for (activations, bits) in responses {
        m.record(
            activations.iter().map(|&(i, s)| (VOCAB[i], s)),
            SituationalContext::from_bits_truncate(*bits),
        );
    }
    m
}

proptest! {
    #[test]
    fn prop_identical_input_gives_identical_profile(input in responses()) {
        let a = ProfileAnalyzer::new(&feed(&input)).generate_profile();
        let b = ProfileAnalyzer::new(&feed(&input)).generate_profile();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_manifold_invariants(input in responses(), threshold in 0.0f64..1.0) {
        let m = feed(&input);
        prop_assert_eq!(m.response_count(), input.len());

        for (key, count) in m.pairs() {
            prop_assert!(key.first() < key.second());
            prop_assert!(count > 0);
        }
        for a in m.traits() {
            for b in m.traits() {
                let p = m.co_activation_probability(a.as_str(), b.as_str());
                prop_assert!((0.0..=1.0).contains(&p));
            }
        }

        for latent in ProfileAnalyzer::new(&m).discover_latent_traits(3, threshold) {
            prop_assert!(latent.len() >= 3 && latent.len() <= 10);
            prop_assert!((0.0..=1.0).contains(&latent.cohesion));
        }
    }
}
