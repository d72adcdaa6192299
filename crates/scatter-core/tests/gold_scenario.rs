use std::path::PathBuf;
use xscatter::core::io::text::{QGridFile, SeedFile, StructureFile};
use xscatter::core::io::traits::TableFile;
use xscatter::core::models::orientation::OrientationSeed;
use xscatter::core::models::qgrid::QGrid;
use xscatter::core::models::structure::AtomicStructure;
use xscatter::workflows::simulate::simulate;

const NUM_MOLECULES: usize = 512;
const NUM_Q_VECTORS: usize = 1;
/// Reference intensity of the first q-vector, computed independently in double precision.
const EXPECTED_REFERENCE_INTENSITY: f64 = 24_178_322.493_908_945;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn load() -> (AtomicStructure, QGrid, Vec<OrientationSeed>) {
    let structure = StructureFile::read_from_path(data_path("512_atom_benchmark.xyz")).unwrap();
    let q_grid = QGridFile::read_from_path(data_path("512_q.xyz"))
        .unwrap()
        .truncated(NUM_Q_VECTORS)
        .unwrap();
    let seeds = SeedFile::read_from_path(data_path("512_x_3_random_floats.txt")).unwrap();
    (structure, q_grid, seeds)
}

#[test]
fn fixture_has_expected_shape() {
    let (structure, q_grid, seeds) = load();
    assert_eq!(structure.len(), 512);
    assert_eq!(q_grid.len(), 1);
    assert_eq!(seeds.len(), NUM_MOLECULES);
    assert_eq!(structure.species(), vec![1, 6, 7, 8, 26, 79]);
}

#[test]
fn reference_intensity_matches_recorded_value() {
    let (structure, q_grid, seeds) = load();
    let field = simulate(&structure, &q_grid, NUM_MOLECULES, Some(&seeds[..])).unwrap();
    let relative = (field[0] - EXPECTED_REFERENCE_INTENSITY).abs() / EXPECTED_REFERENCE_INTENSITY;
    assert!(
        relative < 1e-9,
        "reference intensity {} differs from recorded {EXPECTED_REFERENCE_INTENSITY}",
        field[0]
    );
}

#[cfg(feature = "parallel")]
#[test]
fn accelerated_backend_agrees_with_reference_at_default_tolerance() {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use xscatter::engine::config::{AcceleratedConfig, Tolerance};
    use xscatter::engine::progress::ProgressReporter;
    use xscatter::workflows::consistency::ConsistencyHarness;

    let (structure, q_grid, seeds) = load();
    let harness = ConsistencyHarness::new(Tolerance::default()).unwrap();
    let report = harness
        .run(
            &structure,
            &q_grid,
            NUM_MOLECULES,
            Some(&seeds[..]),
            &AcceleratedConfig::default(),
            &mut StdRng::seed_from_u64(0),
            &ProgressReporter::new(),
        )
        .unwrap();

    let deviation = report.deviations[0];
    assert!(
        report.passed(),
        "accelerated {} vs reference {}",
        deviation.accelerated,
        deviation.reference
    );
    report.into_result().unwrap();
}
