use iolat::bench::{create_test_file, ProbeConfig, RandomReadProbe};
use iolat::config::persistence::ProbeHistory;
use iolat::models::ProbeRecord;
use iolat::BLOCK_SIZE;
use tempfile::tempdir;

#[test]
fn test_create_then_probe() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("probe.dat");
    let created = create_test_file(&file, 32).unwrap();
    assert_eq!(created.bytes_written, 32 * BLOCK_SIZE);

    for io_size in [4096u64, 8192, 16384, 32768, 65536] {
        let report = RandomReadProbe::new(ProbeConfig::new(&file, io_size, 9).with_seed(42))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(report.io_size, io_size);
        assert_eq!(report.latency.samples, 9);
        assert!(report.latency.median_us > 0.0);
    }
}

#[test]
fn test_probe_larger_than_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("probe.dat");
    create_test_file(&file, 1).unwrap();
    assert!(RandomReadProbe::new(ProbeConfig::new(&file, 8192, 1)).is_err());
}

#[test]
fn test_record_round_trip_through_history() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("probe.dat");
    create_test_file(&file, 4).unwrap();
    let report = RandomReadProbe::new(ProbeConfig::new(&file, 4096, 3))
        .unwrap()
        .run()
        .unwrap();
    let median = report.latency.median_us;

    let history = ProbeHistory::at(dir.path().join("probes.json"));
    history.append(ProbeRecord::new(report)).unwrap();
    let stored = history.load().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].report.latency.median_us, median);
}

#[test]
fn test_direct_reads_any_io_size() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("probe.dat");
    create_test_file(&file, 16).unwrap();

    // Not a whole number of blocks, so O_DIRECT cannot serve it
    let report = RandomReadProbe::new(ProbeConfig::new(&file, 5000, 9).with_direct(true))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.latency.samples, 9);
    assert!(!report.direct);

    let report = RandomReadProbe::new(ProbeConfig::new(&file, 8192, 9).with_direct(true))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.latency.samples, 9);
}

#[test]
#[ignore]
fn test_probe_many_samples_on_large_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("probe.dat");
    // 256 MiB
    create_test_file(&file, 65536).unwrap();

    let report = RandomReadProbe::new(ProbeConfig::new(&file, 65536, 10_000))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.latency.samples, 10_000);
    assert!(report.latency.min_us <= report.latency.median_us);
}
