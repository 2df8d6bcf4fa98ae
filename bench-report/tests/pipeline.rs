// End-to-end runs of the report pipeline against temporary directories
use bench_report::{ChartKind, ImageFormat, ReportConfig, ReportError, ReportGenerator};
use std::fs;
use std::path::Path;

const RESULTS: &str = "\
DataStructure,N,Run,InsertionTime_us,AvgSearchTime_ns,Height
BST,16,1,3,40.5,6
BST,16,2,5,42.5,8
BST,256,1,60,70.0,17
BST,256,2,64,74.0,19
AVL,16,1,4,35.0,5
AVL,16,2,4,37.0,5
AVL,256,1,80,55.0,9
AVL,256,2,84,57.0,9
Treap,16,1,5,45.0,7
Treap,256,1,90,80.0,18
SkipList_p025,16,1,6,60.0,3
SkipList_p025,256,1,110,120.0,5
SkipList_p050,16,1,5,50.0,4
SkipList_p050,256,1,100,95.0,8
SkipList_p075,16,1,7,70.0,6
SkipList_p075,256,1,130,140.0,14
";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_results(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("results.csv");
    fs::write(&path, RESULTS).unwrap();
    path
}

fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_run_creates_output_dir_with_three_charts() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = write_results(dir.path());
    let output = dir.path().join("plots");

    let config = ReportConfig::new()
        .with_input(&input)
        .with_output_dir(&output)
        .with_format(ImageFormat::Svg);
    let summary = ReportGenerator::new(config).run().unwrap();

    assert!(summary.created_output_dir);
    assert_eq!(summary.raw_rows, 16);
    assert_eq!(summary.groups, 12);
    assert_eq!(
        list_dir(&output),
        vec!["1_insertion_time.svg", "2_search_time.svg", "3_height.svg"]
    );
    assert_eq!(summary.charts.len(), 3);
    assert!(summary.charts.iter().all(|p| p.starts_with(&output)));
}

#[test]
fn test_timing_charts_leave_out_excluded_variants() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = write_results(dir.path());
    let output = dir.path().join("plots");

    let config = ReportConfig::new()
        .with_input(&input)
        .with_output_dir(&output)
        .with_format(ImageFormat::Svg);
    ReportGenerator::new(config).run().unwrap();

    let insertion = fs::read_to_string(output.join("1_insertion_time.svg")).unwrap();
    let search = fs::read_to_string(output.join("2_search_time.svg")).unwrap();
    let height = fs::read_to_string(output.join("3_height.svg")).unwrap();

    for chart in [&insertion, &search] {
        assert!(chart.contains("SkipList_p050"));
        assert!(!chart.contains("SkipList_p025"));
        assert!(!chart.contains("SkipList_p075"));
    }

    assert!(height.contains("SkipList_p025"));
    assert!(height.contains("SkipList_p075"));
    assert!(height.contains("Average Height vs. Number of Nodes (N)"));
}

#[test]
fn test_png_output() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = write_results(dir.path());
    let output = dir.path().join("plots");

    let generator = ReportGenerator::new(
        ReportConfig::new()
            .with_input(&input)
            .with_output_dir(&output),
    );
    generator.run().unwrap();

    for kind in ChartKind::ALL {
        let bytes = fs::read(generator.chart_path(kind)).unwrap();
        // PNG signature
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}

#[test]
fn test_rerun_is_byte_stable() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = write_results(dir.path());
    let output = dir.path().join("plots");

    let generator = ReportGenerator::new(
        ReportConfig::new()
            .with_input(&input)
            .with_output_dir(&output)
            .with_format(ImageFormat::Svg),
    );

    let first = generator.run().unwrap();
    let before: Vec<Vec<u8>> = first.charts.iter().map(|p| fs::read(p).unwrap()).collect();

    let second = generator.run().unwrap();
    assert!(!second.created_output_dir);
    let after: Vec<Vec<u8>> = second.charts.iter().map(|p| fs::read(p).unwrap()).collect();

    assert_eq!(before, after);
    assert_eq!(list_dir(&output).len(), 3);
}

#[test]
fn test_missing_input_writes_nothing() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("plots");

    let config = ReportConfig::new()
        .with_input(dir.path().join("results.csv"))
        .with_output_dir(&output);
    let err = ReportGenerator::new(config).run().unwrap_err();

    assert!(matches!(err, ReportError::MissingInput(_)));
    assert!(err.to_string().contains("results.csv"));
    assert!(!output.exists());
}

#[test]
fn test_missing_column_aborts_before_rendering() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("results.csv");
    fs::write(&input, "DataStructure,N,InsertionTime_us,Height\nBST,16,3,6\n").unwrap();
    let output = dir.path().join("plots");

    let config = ReportConfig::new()
        .with_input(&input)
        .with_output_dir(&output);
    let err = ReportGenerator::new(config).run().unwrap_err();

    match err {
        ReportError::MissingColumn(column) => assert_eq!(column, "AvgSearchTime_ns"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(list_dir(&output).is_empty());
}

#[test]
fn test_only_excluded_variants_still_writes_three_charts() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("results.csv");
    fs::write(
        &input,
        "DataStructure,N,InsertionTime_us,AvgSearchTime_ns,Height\n\
         SkipList_p025,16,6,60.0,3\n\
         SkipList_p075,16,7,70.0,6\n",
    )
    .unwrap();
    let output = dir.path().join("plots");

    let config = ReportConfig::new()
        .with_input(&input)
        .with_output_dir(&output)
        .with_format(ImageFormat::Svg);
    let summary = ReportGenerator::new(config).run().unwrap();

    assert_eq!(summary.charts.len(), 3);
    assert_eq!(
        list_dir(&output),
        vec!["1_insertion_time.svg", "2_search_time.svg", "3_height.svg"]
    );

    let insertion = fs::read_to_string(output.join("1_insertion_time.svg")).unwrap();
    assert!(insertion.contains("Average Insertion Time vs. Number of Nodes (N)"));
    assert!(!insertion.contains("SkipList_p025"));

    let height = fs::read_to_string(output.join("3_height.svg")).unwrap();
    assert!(height.contains("SkipList_p025"));
    assert!(height.contains("SkipList_p075"));
}
