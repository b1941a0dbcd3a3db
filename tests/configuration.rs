use freqgen::config::{AppConfig, ConfigManager, SelectionMethod};
use freqgen::error::FreqgenError;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults_without_file() {
    let manager = ConfigManager::new();
    let config = manager.get();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.genetic_code, 11);
    assert_eq!(config.evolution.population_size, 100);
    assert_eq!(config.evolution.mutation_rate, 0.3);
    assert_eq!(config.evolution.crossover_rate, 0.8);
    assert_eq!(config.evolution.patience, 50);
    assert_eq!(config.evolution.selection_method, SelectionMethod::Tournament);
    assert!(config.evolution.seed.is_none());
    assert!(config.featurize.k_values.is_empty());
}

#[test]
fn test_load_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "freqgen.toml",
        r#"
genetic_code = 2

[evolution]
population_size = 40
mutation_rate = 0.05
selection_method = "roulette"
seed = 17

[featurize]
k_values = [1, 2, 3]
codon_usage = true
"#,
    );

    let manager = ConfigManager::new();
    manager.load_from_file(&path).unwrap();
    let config = manager.get();

    assert_eq!(config.genetic_code, 2);
    assert_eq!(config.evolution.population_size, 40);
    assert_eq!(config.evolution.mutation_rate, 0.05);
    assert_eq!(config.evolution.selection_method, SelectionMethod::Roulette);
    assert_eq!(config.evolution.seed, Some(17));
    // Unset keys keep their defaults
    assert_eq!(config.evolution.patience, 50);
    assert_eq!(config.featurize.k_values, vec![1, 2, 3]);
    assert!(config.featurize.codon_usage);
}

#[test]
fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "freqgen.json",
        r#"{"evolution": {"patience": 12, "parallel": false}}"#,
    );

    let manager = ConfigManager::new();
    manager.load_from_file(&path).unwrap();
    let config = manager.get();

    assert_eq!(config.evolution.patience, 12);
    assert!(!config.evolution.parallel);
    assert_eq!(config.genetic_code, 11);
}

#[test]
fn test_invalid_files_leave_config_untouched() {
    let dir = TempDir::new().unwrap();
    let manager = ConfigManager::new();

    let tiny_population = write_config(&dir, "tiny.toml", "[evolution]\npopulation_size = 1\n");
    assert!(matches!(
        manager.load_from_file(&tiny_population),
        Err(FreqgenError::Configuration(_))
    ));

    let unknown_code = write_config(&dir, "code.toml", "genetic_code = 7\n");
    assert!(matches!(
        manager.load_from_file(&unknown_code),
        Err(FreqgenError::UnknownGeneticCode(7))
    ));

    let zero_k = write_config(&dir, "zero.toml", "[featurize]\nk_values = [0]\n");
    assert!(manager.load_from_file(&zero_k).is_err());

    assert!(matches!(
        manager.load_from_file(dir.path().join("missing.toml")),
        Err(FreqgenError::Config(_))
    ));

    assert_eq!(manager.get(), AppConfig::default());
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");

    let manager = ConfigManager::new();
    manager
        .update(|config| {
            config.genetic_code = 4;
            config.evolution.tournament_size = 5;
            config.evolution.seed = Some(99);
            config.featurize.k_values = vec![2, 4];
        })
        .unwrap();
    manager.save_to_file(&path).unwrap();

    let reloaded = ConfigManager::new();
    reloaded.load_from_file(&path).unwrap();
    assert_eq!(reloaded.get(), manager.get());
}

#[test]
fn test_update_rejects_invalid_values() {
    let manager = ConfigManager::new();

    let result = manager.update(|config| config.evolution.crossover_rate = 1.5);
    assert!(matches!(result, Err(FreqgenError::Configuration(_))));
    assert_eq!(manager.get().evolution.crossover_rate, 0.8);

    let result = manager.update(|config| config.evolution.mutation_rate = f64::NAN);
    assert!(result.is_err());

    manager
        .update(|config| config.evolution.mutation_rate = 0.0)
        .unwrap();
    assert_eq!(manager.get().evolution.mutation_rate, 0.0);
}
