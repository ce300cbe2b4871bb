//! End-to-end generation through the public API.

use planetgen::biomes::classify;
use planetgen::config::PlanetConfig;
use planetgen::random::RandomSource;
use planetgen::terrain::{ocean_fraction, Planet, TerrainConfig};

fn config(seed: u64, size: u32) -> PlanetConfig {
    PlanetConfig {
        name: "Integration".to_string(),
        seed,
        terrain: TerrainConfig {
            width: size,
            height: size,
            erosion_iterations: size * 20,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn generate(seed: u64, size: u32) -> Planet {
    Planet::generate(&config(seed, size), &mut RandomSource::new(seed)).unwrap()
}

#[test]
fn test_same_seed_is_bit_identical() {
    let a = generate(1234, 48);
    let b = generate(1234, 48);
    assert_eq!(a.elevation(), b.elevation());
    assert_eq!(a.temperature(), b.temperature());
    assert_eq!(a.moisture(), b.moisture());
    assert_eq!(a.biomes(), b.biomes());
}

#[test]
fn test_randomized_config_is_reproducible() {
    let run = |seed: u64| {
        let mut rng = RandomSource::new(seed);
        let mut config = PlanetConfig::randomized("Rand", seed, 32, &mut rng);
        config.terrain.erosion_iterations = 400;
        let planet = Planet::generate(&config, &mut rng).unwrap();
        (config.terrain.num_plates, planet)
    };
    let (plates_a, a) = run(99);
    let (plates_b, b) = run(99);
    assert_eq!(plates_a, plates_b);
    assert_eq!(a.elevation(), b.elevation());
    assert_eq!(a.biomes(), b.biomes());
}

#[test]
fn test_sea_level_fraction_matches_config() {
    for &sea in &[0.25f32, 0.4, 0.6] {
        let mut cfg = config(5, 64);
        cfg.set_sea_level(sea);
        let planet = Planet::generate(&cfg, &mut RandomSource::new(5)).unwrap();
        let n = planet.elevation().len() as f32;
        let frac = ocean_fraction(planet.elevation(), sea);
        assert!((frac - sea).abs() <= 1.0 / n + 1e-6, "sea {} -> {}", sea, frac);
        assert!((planet.land_fraction() - (1.0 - frac)).abs() < 1e-6);
    }
}

#[test]
fn test_every_cell_matches_classifier() {
    let planet = generate(8, 40);
    let sea = planet.sea_level();
    for y in 0..planet.height() {
        for x in 0..planet.width() {
            let expected = classify(
                planet.elevation().get(x, y),
                planet.temperature().get(x, y),
                planet.moisture().get(x, y),
                sea,
            );
            assert_eq!(planet.biome_at(x, y), expected);
        }
    }
}

#[test]
fn test_grids_stay_in_range() {
    let planet = generate(21, 40);
    let e = planet.elevation();
    assert!(e.min_value() >= 0.0 && e.max_value() <= 1.0 + 1e-6);
    let m = planet.moisture();
    assert!(m.min_value() >= 0.0 && m.max_value() <= 1.0);
    let t = planet.temperature();
    assert!(t.min_value() > -100.0 && t.max_value() < 100.0);
}

#[test]
fn test_invalid_config_is_rejected_without_output() {
    let mut cfg = config(1, 32);
    cfg.terrain.num_plates = 0;
    assert!(Planet::generate(&cfg, &mut RandomSource::new(1)).is_err());

    let mut cfg = config(1, 32);
    cfg.terrain.sea_level = 0.5;
    assert!(Planet::generate(&cfg, &mut RandomSource::new(1)).is_err());
}
