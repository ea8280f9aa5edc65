use std::fs::File;
use std::io::Write;

use insole_config::{CurveSegment, load_curve_csv, validate_segments};
use rstest::rstest;
use tempfile::tempdir;

fn write_csv(lines: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("curve.csv");
    let mut f = File::create(&path).unwrap();
    for l in lines {
        writeln!(f, "{l}").unwrap();
    }
    (dir, path)
}

#[rstest]
fn loads_stock_curve_table() {
    let (_dir, path) = write_csv(&[
        "upper_raw,slope,pivot,offset_n",
        "2925,0.0335,0,0",
        "2934,1.604,2934,196.2",
        "3056.33,1.604,2934,196.2",
        "3217.5,0.791,3056.33,392.4",
        "3259,5.437,3217.5,519.93",
    ]);
    let segs = load_curve_csv(&path).unwrap();
    assert_eq!(segs.len(), 5);
    assert_eq!(
        segs[3],
        CurveSegment {
            upper_raw: 3217.5,
            slope: 0.791,
            pivot: 3056.33,
            offset_n: 392.4,
        }
    );
}

#[rstest]
fn rejects_wrong_headers() {
    let (_dir, path) = write_csv(&["raw,newtons", "100,1.0"]);
    let err = load_curve_csv(&path).expect_err("bad headers");
    assert!(format!("{err}").contains("curve CSV must have headers"));
}

#[rstest]
fn rejects_unordered_rows() {
    let (_dir, path) = write_csv(&[
        "upper_raw,slope,pivot,offset_n",
        "3000,0.1,0,0",
        "3000,0.2,0,0",
    ]);
    let err = load_curve_csv(&path).expect_err("equal bounds");
    assert!(format!("{err}").contains("strictly increasing"));
}

#[rstest]
fn reports_bad_row_number() {
    let (_dir, path) = write_csv(&["upper_raw,slope,pivot,offset_n", "100,abc,0,0"]);
    let err = load_curve_csv(&path).expect_err("non-numeric slope");
    assert!(format!("{err}").contains("invalid CSV row 2"));
}

#[rstest]
fn rejects_empty_table() {
    let (_dir, path) = write_csv(&["upper_raw,slope,pivot,offset_n"]);
    assert!(load_curve_csv(&path).is_err());
    assert!(validate_segments(&[]).is_err());
}

#[rstest]
fn rejects_missing_file() {
    let dir = tempdir().unwrap();
    let err = load_curve_csv(&dir.path().join("nope.csv")).expect_err("missing file");
    assert!(format!("{err}").contains("open curve CSV"));
}
