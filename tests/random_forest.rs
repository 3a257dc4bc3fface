use linfa::prelude::*;
use linfa_datasets::iris;
use linfa_forests::RandomForestParams;
use ndarray::{Array, Array1, Axis};
use ndarray_rand::{rand_distr::Uniform, RandomExt};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn iris_random_forest_high_accuracy() {
    // reproducible split
    let mut rng = SmallRng::seed_from_u64(42);
    let (train, valid) = iris().shuffle(&mut rng).split_with_ratio(0.8);

    let model = RandomForestParams::new(100)
        .max_depth(Some(10))
        .feature_subsample(Some(2))
        .seed(42)
        .fit(&train)
        .expect("Training failed");

    let preds = model.predict(valid.records());
    let cm = preds
        .confusion_matrix(&valid)
        .expect("Failed to compute confusion matrix");

    let accuracy = cm.accuracy();
    assert!(
        accuracy >= 0.9,
        "Expected at least 90% accuracy on iris, got {:.2}",
        accuracy
    );
}

#[test]
fn synthetic_end_to_end() {
    // 100 observations of 5 numeric features, labelled by the sign of a
    // linear combination of the first two features
    let mut rng = SmallRng::seed_from_u64(17);
    let data = Array::random_using((100, 5), Uniform::new(-4., 4.), &mut rng);
    let targets = data
        .index_axis(Axis(1), 0)
        .iter()
        .zip(data.index_axis(Axis(1), 1).iter())
        .map(|(a, b)| usize::from(a + 2. * b > 0.0))
        .collect::<Array1<usize>>();
    let dataset = Dataset::new(data, targets);

    let model = RandomForestParams::new(10)
        .feature_subsample(Some(2))
        .seed(3)
        .fit(&dataset)
        .expect("Training failed");

    assert_eq!(model.num_trees(), 10);

    // every predicted label was observed during training
    let predictions: Array1<usize> = model.predict(dataset.records());
    for prediction in predictions.iter() {
        assert!(*prediction == 0 || *prediction == 1);
    }

    // the forest separates the training data reasonably well
    let cm = predictions.confusion_matrix(&dataset).unwrap();
    assert!(cm.accuracy() > 0.8);
}
