use proptest::prelude::*;
use recipe_graph::{
    accumulate, build_recipe_graph, write_graph, AccumulateConfig, CancelToken, EdgeStorage,
    IngredientIndex, OutputConfig, RecipeGraph,
};
use recipe_graph::{Graph, WeightedGraph};

/// `(num_recipes, ingredient lists)` with valid, duplicate-free lists in arbitrary order.
fn relation() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
    (1usize..16).prop_flat_map(|n| {
        let list = prop::sample::subsequence((0..n).collect::<Vec<_>>(), 1..=n).prop_shuffle();
        (Just(n), prop::collection::vec(list, 0..12))
    })
}

fn edges(g: &RecipeGraph) -> Vec<(usize, usize, f64)> {
    let mut out = Vec::new();
    for (r, row) in g.rows() {
        for (&nb, &w) in row {
            out.push((r, nb, w));
        }
    }
    out
}

fn assert_weights_close(a: &RecipeGraph, b: &RecipeGraph) {
    let ea = edges(a);
    let eb = edges(b);
    assert_eq!(ea.len(), eb.len(), "edge sets differ");
    for (&(ra, na, wa), &(rb, nb, wb)) in ea.iter().zip(eb.iter()) {
        assert_eq!((ra, na), (rb, nb));
        assert!((wa - wb).abs() <= 1e-9 * wa.abs().max(1.0), "({ra},{na}): {wa} vs {wb}");
    }
}

proptest! {
    #[test]
    fn ingredient_and_list_order_do_not_matter((n, lists) in relation()) {
        let forward = IngredientIndex::from_lists(n, lists.clone()).unwrap();
        let reversed: Vec<Vec<usize>> = lists
            .into_iter()
            .rev()
            .map(|mut l| { l.reverse(); l })
            .collect();
        let backward = IngredientIndex::from_lists(n, reversed).unwrap();

        assert_weights_close(&build_recipe_graph(&forward).unwrap(), &build_recipe_graph(&backward).unwrap());
    }

    #[test]
    fn weights_are_non_negative_and_loop_free((n, lists) in relation()) {
        let idx = IngredientIndex::from_lists(n, lists).unwrap();
        for storage in [EdgeStorage::Canonical, EdgeStorage::Symmetric] {
            let cfg = AccumulateConfig { storage, parallel: false };
            let g = accumulate(&idx, cfg, &(), &CancelToken::new()).unwrap();
            for (r, nb, w) in edges(&g) {
                prop_assert_ne!(r, nb);
                prop_assert!(w >= 0.0 && w.is_finite(), "({}, {}) = {}", r, nb, w);
            }
        }
    }

    #[test]
    fn reference_counts_match_recount((n, lists) in relation()) {
        let idx = IngredientIndex::from_lists(n, lists.clone()).unwrap();
        for r in 0..n {
            let recount = lists.iter().filter(|l| l.contains(&r)).count();
            prop_assert_eq!(idx.reference_count(r), recount);
        }
    }

    #[test]
    fn edges_exist_exactly_for_co_occurring_pairs((n, lists) in relation()) {
        let idx = IngredientIndex::from_lists(n, lists.clone()).unwrap();
        let g = build_recipe_graph(&idx).unwrap();
        for a in 0..n {
            for b in 0..n {
                let shared = a != b && lists.iter().any(|l| l.contains(&a) && l.contains(&b));
                prop_assert_eq!(g.edge_weight(a, b).is_some(), shared, "({}, {})", a, b);
            }
        }
    }

    #[test]
    fn storage_layouts_answer_queries_identically((n, lists) in relation()) {
        let idx = IngredientIndex::from_lists(n, lists).unwrap();
        let canonical = build_recipe_graph(&idx).unwrap();
        let cfg = AccumulateConfig { storage: EdgeStorage::Symmetric, parallel: false };
        let symmetric = accumulate(&idx, cfg, &(), &CancelToken::new()).unwrap();

        prop_assert_eq!(canonical.edge_count(), symmetric.edge_count());
        for a in 0..n {
            prop_assert_eq!(Graph::neighbors(&canonical, a), Graph::neighbors(&symmetric, a));
            for b in 0..n {
                prop_assert_eq!(
                    WeightedGraph::edge_weight(&canonical, a, b),
                    WeightedGraph::edge_weight(&symmetric, b, a)
                );
            }
        }
    }

    #[test]
    fn sequential_output_is_deterministic((n, lists) in relation()) {
        let dump = || {
            let idx = IngredientIndex::from_lists(n, lists.clone()).unwrap();
            let g = build_recipe_graph(&idx).unwrap();
            let mut out = Vec::new();
            write_graph(&g, &mut out, OutputConfig::default()).unwrap();
            out
        };
        let first = dump();
        prop_assert_eq!(&first, &dump());
        prop_assert_eq!(first.iter().filter(|&&b| b == b'\n').count(), n);
    }
}

#[cfg(feature = "parallel")]
proptest! {
    #[test]
    fn parallel_matches_sequential((n, lists) in relation()) {
        let idx = IngredientIndex::from_lists(n, lists).unwrap();
        let seq = build_recipe_graph(&idx).unwrap();
        let cfg = AccumulateConfig { storage: EdgeStorage::Canonical, parallel: true };
        let par = accumulate(&idx, cfg, &(), &CancelToken::new()).unwrap();
        assert_weights_close(&seq, &par);
    }
}
