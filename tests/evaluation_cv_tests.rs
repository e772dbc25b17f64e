#![cfg(feature = "dev")]
//! Tests for cross-validation fold construction and candidate selection.

use approx::assert_relative_eq;

use loess_knn::internals::evaluation::cv::{CVKind, KFold, LOOCV};
use loess_knn::internals::primitives::errors::SmoothError;

// ============================================================================
// Fold Construction
// ============================================================================

#[test]
fn test_kfold_partitions_every_index_once() {
    let folds = CVKind::KFold(3).folds(10, Some(42)).unwrap();
    assert_eq!(folds.len(), 3);

    let mut seen: Vec<usize> = folds.iter().flat_map(|f| f.test.iter().copied()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..10).collect::<Vec<_>>());

    for fold in &folds {
        assert_eq!(fold.train.len() + fold.test.len(), 10);
        assert!(fold.test.iter().all(|i| !fold.train.contains(i)));
    }
    // 10 / 3 = 3 per fold; the last fold takes the remainder
    assert_eq!(folds[0].test.len(), 3);
    assert_eq!(folds[2].test.len(), 4);
}

#[test]
fn test_kfold_unshuffled_is_contiguous() {
    let folds = CVKind::KFold(2).folds(4, None).unwrap();
    assert_eq!(folds[0].test, vec![0, 1]);
    assert_eq!(folds[0].train, vec![2, 3]);
    assert_eq!(folds[1].test, vec![2, 3]);
}

#[test]
fn test_kfold_seed_is_reproducible() {
    let a = CVKind::KFold(5).folds(50, Some(7)).unwrap();
    let b = CVKind::KFold(5).folds(50, Some(7)).unwrap();
    let c = CVKind::KFold(5).folds(50, Some(8)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_loocv_folds() {
    let folds = CVKind::LOOCV.folds(4, None).unwrap();
    assert_eq!(folds.len(), 4);
    assert_eq!(folds[2].test, vec![2]);
    assert_eq!(folds[2].train, vec![0, 1, 3]);
}

#[test]
fn test_invalid_folds() {
    assert_eq!(
        CVKind::KFold(1).folds(10, None),
        Err(SmoothError::InvalidFolds { folds: 1, n: 10 })
    );
    assert_eq!(
        CVKind::KFold(11).folds(10, None),
        Err(SmoothError::InvalidFolds { folds: 11, n: 10 })
    );
    assert!(CVKind::LOOCV.folds(1, None).is_err());
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_run_selects_minimum_score() {
    let candidates = [1.0, 2.0, 3.0];
    // Loss per held-out point = (candidate - 2)²
    let (best, scores) = CVKind::KFold(2)
        .run(6, &candidates, None, |c: f64, fold| {
            Ok((c - 2.0) * (c - 2.0) * fold.test.len() as f64)
        })
        .unwrap();

    assert_eq!(best, 2.0);
    assert_relative_eq!(scores[0], 1.0);
    assert_relative_eq!(scores[1], 0.0);
    assert_relative_eq!(scores[2], 1.0);
}

#[test]
fn test_select_best_ties_pick_first() {
    let (best, _) = CVKind::select_best(&[5usize, 3, 7], vec![0.5, 0.2, 0.2]);
    assert_eq!(best, 3);
}

#[test]
fn test_select_best_ignores_nan() {
    let (best, _) = CVKind::select_best(&[1usize, 2, 3], vec![f64::NAN, 0.4, 0.3]);
    assert_eq!(best, 3);
}

#[test]
fn test_run_without_candidates() {
    let candidates: [f64; 0] = [];
    let result = CVKind::LOOCV.run(5, &candidates, None, |_: f64, _| Ok(0.0f64));
    assert!(matches!(result, Err(SmoothError::InvalidInput(_))));
}

#[test]
fn test_run_propagates_fold_errors() {
    let result = CVKind::LOOCV.run(5, &[1usize], None, |_, _| -> Result<f64, SmoothError> {
        Err(SmoothError::InsufficientNeighbors { k: 5, available: 4 })
    });
    assert_eq!(result, Err(SmoothError::InsufficientNeighbors { k: 5, available: 4 }));
}

#[test]
fn test_config_constructors() {
    let spans = [0.3, 0.5];
    let cfg = KFold(5, &spans).seed(11);
    assert_eq!(cfg.kind(), CVKind::KFold(5));
    assert_eq!(cfg.candidates(), &[0.3, 0.5]);
    assert_eq!(cfg.get_seed(), Some(11));

    let ks = [1usize, 3];
    let cfg = LOOCV(&ks);
    assert_eq!(cfg.kind(), CVKind::LOOCV);
    assert_eq!(cfg.get_seed(), None);
}

#[test]
fn test_gather_rows() {
    let x = [0.0, 1.0, 10.0, 11.0, 20.0, 21.0];
    assert_eq!(CVKind::gather(&x, 2, &[2, 0]), vec![20.0, 21.0, 0.0, 1.0]);
}
