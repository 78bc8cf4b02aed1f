use metoedm::kernel::{ConverterState, KindCode};
use metoedm::monitor::{Axis, Hist1D, Hist2D, InMemoryMonitorStore, StoredElement};
use metoedm::output::RunRecordStore;
use metoedm::{ConfigError, Converter, ConverterConfig, ConverterError, Kind};

fn hist1d(title: &str) -> Hist1D {
    let mut h = Hist1D::new(title, Axis::new(10, 0.0, 10.0));
    h.fill(3.0, 1.0);
    h
}

// Store used by the worked example: 3 Hist1D, 0 Hist2D, 1 Int.
fn example_store() -> InMemoryMonitorStore {
    InMemoryMonitorStore::from_elements(vec![
        StoredElement::new("Tracking/Tracks", "pt", hist1d("pt")),
        StoredElement::new("Tracking/Tracks", "eta", hist1d("eta")),
        StoredElement::new("Muon/Segments", "chi2", hist1d("chi2")),
        StoredElement::int("Tracking", "nTracks", 12),
    ])
}

#[test]
fn test_declares_only_kinds_present_at_init() {
    let mut sink = RunRecordStore::new();
    let converter =
        Converter::initialize(ConverterConfig::new("dqm", 0, 1), Some(example_store()), &mut sink).unwrap();

    assert_eq!(converter.declared_kinds(), vec![Kind::Int, Kind::Hist1D]);
    assert_eq!(sink.declared_kinds(), vec![Kind::Int, Kind::Hist1D]);
    assert!(sink.is_declared(Kind::Hist1D, "dqm"));
    assert!(!sink.is_declared(Kind::Hist2D, "dqm"));
    assert_eq!(converter.state(), ConverterState::Initialized);

    // Declaration is not extraction: nothing stored, nothing reset.
    assert!(sink.is_empty());
    let pt = converter.store().get("Tracking/Tracks/pt").unwrap();
    assert!(!pt.object().unwrap().is_empty());
}

#[test]
fn test_inventory_counts_kinds_and_packages() {
    let mut store = example_store();
    store.insert(StoredElement::int("Muon/Segments", "legacy", 0).with_kind_code(KindCode(0x99)));

    let mut sink = RunRecordStore::new();
    let converter = Converter::initialize(ConverterConfig::new("dqm", 1, 1), Some(store), &mut sink).unwrap();
    let inventory = converter.inventory();

    assert_eq!(inventory.count(Kind::Hist1D), 3);
    assert_eq!(inventory.count(Kind::Int), 1);
    assert_eq!(inventory.count(Kind::Hist2D), 0);
    assert_eq!(inventory.unrecognized, 1);

    // Unrecognised elements still count toward their package.
    assert_eq!(inventory.packages.get("Tracking"), Some(&3));
    assert_eq!(inventory.packages.get("Muon"), Some(&2));
    assert_eq!(inventory.packages.len(), 2);
}

#[test]
fn test_empty_store_declares_nothing() {
    let mut sink = RunRecordStore::new();
    let converter = Converter::initialize(
        ConverterConfig::new("dqm", 0, 1),
        Some(InMemoryMonitorStore::new()),
        &mut sink,
    )
    .unwrap();

    assert!(converter.declared_kinds().is_empty());
    assert_eq!(sink.declarations().count(), 0);
}

#[test]
fn test_missing_store_fails_initialization() {
    let mut sink = RunRecordStore::new();
    let result = Converter::<InMemoryMonitorStore>::initialize(ConverterConfig::new("dqm", 0, 1), None, &mut sink);

    assert!(matches!(result, Err(ConverterError::StoreUnavailable)));
    assert_eq!(sink.declarations().count(), 0);
}

#[test]
fn test_empty_label_is_a_config_error() {
    let mut sink = RunRecordStore::new();
    let result = Converter::initialize(ConverterConfig::new("", 0, 1), Some(example_store()), &mut sink);

    assert!(matches!(result, Err(ConverterError::Config(ConfigError::EmptyName))));
}

#[test]
fn test_store_verbosity_follows_effective_verbosity() {
    let cases = [(0, 0), (10, 0), (1, 1), (12, 1), (-1, 1)];
    for (verbosity, expected) in cases {
        let mut sink = RunRecordStore::new();
        let converter =
            Converter::initialize(ConverterConfig::new("dqm", verbosity, 1), Some(example_store()), &mut sink)
                .unwrap();
        assert_eq!(converter.store().verbose(), expected, "verbosity {}", verbosity);
        assert_eq!(converter.verbosity(), verbosity % 10);
    }
}

#[test]
fn test_all_eight_kinds_are_declared() {
    use metoedm::monitor::{Hist3D, Profile1D, Profile2D};

    let axis = || Axis::new(2, 0.0, 1.0);
    let store = InMemoryMonitorStore::from_elements(vec![
        StoredElement::int("A", "i", 1),
        StoredElement::float("A", "f", 1.0),
        StoredElement::string("A", "s", "ok"),
        StoredElement::new("A", "h1", Hist1D::new("h1", axis())),
        StoredElement::new("A", "h2", Hist2D::new("h2", axis(), axis())),
        StoredElement::new("A", "h3", Hist3D::new("h3", axis(), axis(), axis())),
        StoredElement::new("A", "p1", Profile1D::new("p1", axis())),
        StoredElement::new("A", "p2", Profile2D::new("p2", axis(), axis())),
    ]);

    let mut sink = RunRecordStore::new();
    let converter = Converter::initialize(ConverterConfig::new("dqm", -1, 1), Some(store), &mut sink).unwrap();

    assert_eq!(converter.declared_kinds(), Kind::ALL.to_vec());
    assert_eq!(sink.declarations().count(), 8);
}
