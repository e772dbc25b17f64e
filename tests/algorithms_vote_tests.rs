#![cfg(feature = "dev")]

use approx::assert_relative_eq;

use loess_knn::internals::algorithms::vote::{LabelSet, VoteTally, mean_vote};

#[test]
fn test_label_set_is_sorted_and_distinct() {
    let labels = ["b", "a", "c", "a", "b"];
    let set = LabelSet::from_labels(&labels);
    assert_eq!(set.labels(), &["a", "b", "c"]);
    assert_eq!(set.len(), 3);
    assert_eq!(set.code_of(&"c"), Some(2));
    assert_eq!(set.code_of(&"z"), None);
    assert_eq!(set.encode(&labels), vec![1, 0, 2, 0, 1]);
    assert_eq!(*set.label(1), "b");
}

#[test]
fn test_majority() {
    let codes = [0, 0, 1, 1, 1];
    let tally = VoteTally::tally(&codes, &[0, 2, 3], 2);
    let proportions: Vec<f64> = tally.proportions();
    assert_relative_eq!(proportions[0], 1.0 / 3.0);
    assert_relative_eq!(proportions[1], 2.0 / 3.0);
    assert_eq!(tally.majority(), 1);
}

#[test]
fn test_tie_goes_to_lowest_label() {
    let codes = [1, 0, 1, 0];
    // Two votes each, in either neighbor order
    assert_eq!(VoteTally::tally(&codes, &[0, 1, 2, 3], 2).majority(), 0);
    assert_eq!(VoteTally::tally(&codes, &[2, 0, 3, 1], 2).majority(), 0);

    let codes = [2, 1, 2, 1, 0];
    assert_eq!(VoteTally::tally(&codes, &[0, 1, 2, 3, 4], 3).majority(), 1);
}

#[test]
fn test_proportions_sum_to_one() {
    let codes = [0, 1, 2, 2];
    let tally = VoteTally::tally(&codes, &[0, 1, 2, 3], 3);
    let p: Vec<f64> = tally.proportions();
    assert_eq!(p, vec![0.25, 0.25, 0.5]);
    assert_relative_eq!(p.iter().sum::<f64>(), 1.0);
}

#[test]
fn test_mean_vote() {
    let y = [1.0, 2.0, 3.0, 10.0];
    assert_relative_eq!(mean_vote(&y, &[0, 1, 2]), 2.0);
    assert_relative_eq!(mean_vote(&y, &[3]), 10.0);
}
