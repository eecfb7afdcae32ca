//! Integration test: train-all → save → load-all → score, end to end

use std::io::Write;

use demand_forecast::app::{score_saved_models, train_and_save};
use demand_forecast::data::DemandObservation;
use demand_forecast::features::design_matrix;
use demand_forecast::model::{ModelArtifact, Scorer};
use demand_forecast::training::registry;

fn demand_observations(n: usize) -> Vec<DemandObservation> {
    (0..n)
        .map(|i| {
            let id = (i % 4 + 1) as f64;
            let hour = (i % 24) as f64;
            DemandObservation {
                id,
                year: 2019.0,
                month: (i % 12 + 1) as f64,
                day: (i % 28 + 1) as f64,
                hour,
                weekday: (i % 7 + 1) as f64,
                count: (hour + id * 3.0).round(),
            }
        })
        .collect()
}

#[test]
fn test_one_artifact_per_trainer() {
    let dir = tempfile::tempdir().unwrap();
    let observations = demand_observations(80);

    train_and_save(&observations, dir.path(), 0).unwrap();

    let specs = registry(0);
    for spec in &specs {
        let path = spec.artifact_path(dir.path());
        assert!(path.exists(), "missing artifact for {}", spec.name);
    }

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), specs.len(), "exactly one artifact per trainer");
}

#[test]
fn test_cold_scoring_run_after_training_run() {
    let dir = tempfile::tempdir().unwrap();
    let observations = demand_observations(80);

    // Warm run: train, save, score
    train_and_save(&observations, dir.path(), 0).unwrap();
    score_saved_models(&observations, dir.path(), 0, 10, None).unwrap();

    // Cold run: artifacts only, no retraining
    score_saved_models(&observations, dir.path(), 0, 10, None).unwrap();
}

#[test]
fn test_saved_model_reproduces_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let observations = demand_observations(80);
    let x = design_matrix(&observations);

    train_and_save(&observations, dir.path(), 0).unwrap();

    for spec in registry(0) {
        let loaded = ModelArtifact::load(&spec.artifact_path(dir.path())).unwrap();
        let first = loaded.model.predict(&x).unwrap();
        let again = ModelArtifact::load(&spec.artifact_path(dir.path()))
            .unwrap()
            .model
            .predict(&x)
            .unwrap();
        assert_eq!(first, again, "{} predictions must be stable across loads", spec.name);
    }
}

#[test]
fn test_two_training_runs_agree_under_one_seed() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let observations = demand_observations(80);
    let x = design_matrix(&observations);

    train_and_save(&observations, dir_a.path(), 3).unwrap();
    train_and_save(&observations, dir_b.path(), 3).unwrap();

    for spec in registry(3) {
        let a = ModelArtifact::load(&spec.artifact_path(dir_a.path())).unwrap();
        let b = ModelArtifact::load(&spec.artifact_path(dir_b.path())).unwrap();

        let pa = a.model.predict(&x).unwrap();
        let pb = b.model.predict(&x).unwrap();
        for (va, vb) in pa.iter().zip(pb.iter()) {
            assert!(
                (va - vb).abs() < 1e-9,
                "{} diverged between identical runs",
                spec.name
            );
        }
    }
}

#[test]
fn test_sample_record_scores_with_id_passthrough() {
    let dir = tempfile::tempdir().unwrap();
    let observations = demand_observations(80);

    train_and_save(&observations, dir.path(), 0).unwrap();

    for spec in registry(0) {
        let scorer = Scorer::from_path(&spec.artifact_path(dir.path())).unwrap();
        let prediction = scorer.predict_one(&DemandObservation::sample()).unwrap();

        assert_eq!(prediction.recognition_type_id, 2.0);
        assert!(prediction.predicted_count.is_finite());
        assert!(prediction.predicted_count >= 0.0);
    }
}

#[test]
fn test_scoring_from_sample_csv() {
    let dir = tempfile::tempdir().unwrap();
    let observations = demand_observations(80);
    train_and_save(&observations, dir.path(), 0).unwrap();

    let csv_path = dir.path().join("samples.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "id,year,month,day,hour,weekday,count").unwrap();
    writeln!(file, "2,2019,1,1,4,3,4").unwrap();
    writeln!(file, "1,2019,2,5,10,6,13").unwrap();

    score_saved_models(&observations, dir.path(), 0, 10, Some(&csv_path)).unwrap();
}

#[test]
fn test_missing_artifact_is_fatal_for_scoring() {
    let dir = tempfile::tempdir().unwrap();
    let observations = demand_observations(20);

    // Nothing was trained into this directory
    let result = score_saved_models(&observations, dir.path(), 0, 5, None);
    assert!(result.is_err());
}
