use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::Sampler;

#[test]
fn test_sequential_sampler() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(Sampler::Sequential.indices(5, &mut rng), vec![0, 1, 2, 3, 4]);
    assert_eq!(Sampler::Sequential.len(5), 5);
    assert!(Sampler::Sequential.is_empty(0));
}

#[test]
fn test_shuffle_sampler_is_permutation() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut indices = Sampler::Shuffle.indices(50, &mut rng);
    assert_ne!(indices, (0..50).collect::<Vec<_>>());
    indices.sort_unstable();
    assert_eq!(indices, (0..50).collect::<Vec<_>>());
}

#[test]
fn test_subset_samplers() {
    let mut rng = StdRng::seed_from_u64(2);
    let subset = vec![9, 3, 5, 1];

    let sequential = Sampler::SubsetSequential(subset.clone());
    assert_eq!(sequential.len(100), 4);
    assert_eq!(sequential.indices(100, &mut rng), subset);

    let random = Sampler::SubsetRandom(subset.clone());
    let mut drawn = random.indices(100, &mut rng);
    drawn.sort_unstable();
    assert_eq!(drawn, vec![1, 3, 5, 9]);
    assert_eq!(random.max_index(), Some(9));
    assert_eq!(Sampler::Shuffle.max_index(), None);
}

#[test]
fn test_same_seed_same_order() {
    let a = Sampler::Shuffle.indices(20, &mut StdRng::seed_from_u64(42));
    let b = Sampler::Shuffle.indices(20, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}
