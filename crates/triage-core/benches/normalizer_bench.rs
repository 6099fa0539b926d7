use criterion::{Criterion, black_box, criterion_group, criterion_main};
use triage_core::estimator::{MultiLabelEstimator, Transformer};
use triage_core::{AdaBoostParams, CountVectorizer, LabelMatrix, Normalizer, Pipeline};

const MESSAGES: &[&str] = &[
    "We need water and food in Leogane, please help us!",
    "There's nothing to eat here, we're hungry since the earthquake",
    "Storm surge flooded the shelters, people need tents http://bit.ly/x1y2z3",
    "UN reports roads to the airport are blocked by debris",
    "Is the hurricane over? My family's house wasn't damaged.",
];

fn messages() -> Vec<String> {
    MESSAGES.iter().map(|s| s.to_string()).collect()
}

fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::new().unwrap();

    c.bench_function("normalize_single", |b| {
        b.iter(|| normalizer.normalize(black_box(MESSAGES[0])));
    });

    c.bench_function("normalize_batch_5", |b| {
        b.iter(|| {
            for message in MESSAGES {
                let _ = normalizer.normalize(black_box(message));
            }
        });
    });
}

fn bench_vectorize(c: &mut Criterion) {
    let docs = messages();
    let mut vectorizer = CountVectorizer::new(Normalizer::new().unwrap());
    vectorizer.fit(&docs).unwrap();

    c.bench_function("count_vectorize_batch_5", |b| {
        b.iter(|| vectorizer.transform(black_box(&docs)).unwrap());
    });
}

fn bench_predict(c: &mut Criterion) {
    let docs = messages();
    let labels = LabelMatrix::from_rows(
        vec![vec![1, 1], vec![1, 0], vec![1, 0], vec![0, 0], vec![0, 0]],
        2,
    )
    .unwrap();
    let mut pipeline = Pipeline::new(Normalizer::new().unwrap(), AdaBoostParams::new(0.5, 50));
    pipeline.fit(&docs, &labels).unwrap();
    let query = vec![MESSAGES[0].to_string()];

    c.bench_function("pipeline_predict_single", |b| {
        b.iter(|| pipeline.predict(black_box(&query)).unwrap());
    });
}

criterion_group!(benches, bench_normalize, bench_vectorize, bench_predict);
criterion_main!(benches);
