//! ASCII grid and header report output tests.

use nimrod_parser::header::element;
use nimrod_parser::{write_ascii_grid, RasterFile};
use test_utils::{create_rain_raster, NimrodBuilder};

fn minimal() -> RasterFile {
    RasterFile::from_bytes(&NimrodBuilder::minimal().build()).unwrap()
}

#[test]
fn test_ascii_grid_minimal() {
    let text = minimal().to_ascii_grid().unwrap();

    let expected = "\
xmin: 0.0 
xmax: 2000.0 
ymin: 5000.0 
ymax: 6000.0 
ncols: 3 
nrows: 2 
cellsize : 1000.0 
na_value: -1.0 
1 2 3
4 5 6
";
    assert_eq!(text, expected);
}

#[test]
fn test_ascii_grid_after_clip() {
    let clipped = minimal().clip_to(500.0, 1500.0, 5501.0, 6500.0).unwrap();
    let text = clipped.to_ascii_grid().unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "xmin: 1000.0 ");
    assert_eq!(lines[4], "ncols: 2 ");
    assert_eq!(lines[5], "nrows: 1 ");
    assert_eq!(&lines[8..], &["2 3"]);
}

#[test]
fn test_ascii_grid_non_square_uses_y_size() {
    let bytes = NimrodBuilder::new(1, 2)
        .with_geometry(500.0, 1000.0, 0.0, 2000.0)
        .with_data(vec![-7, 9])
        .build();
    let raster = RasterFile::from_bytes(&bytes).unwrap();

    let mut out = Vec::new();
    write_ascii_grid(&raster, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("cellsize : 1000.0 \n"));
    assert!(text.contains("xmax: 2000.0 \n"));
    assert!(text.ends_with("-7 9\n"));
}

#[test]
fn test_ascii_grid_no_data_from_element_38() {
    let bytes = NimrodBuilder::minimal()
        .with_real(element::MISSING_DATA, -32767.0)
        .build();
    let text = RasterFile::from_bytes(&bytes).unwrap().to_ascii_grid().unwrap();
    assert!(text.contains("na_value: -32767.0 \n"));
}

#[test]
fn test_ascii_grid_rain_field_with_missing_border() {
    let bytes = NimrodBuilder::new(6, 6)
        .with_data(create_rain_raster(6, 6, -1))
        .build();
    let text = RasterFile::from_bytes(&bytes).unwrap().to_ascii_grid().unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8 + 6);
    assert_eq!(lines[7], "na_value: -1.0 ");
    assert_eq!(lines[8], "-1 -1 -1 -1 -1 -1");
    assert_eq!(lines[13], "-1 -1 -1 -1 -1 -1");
    assert!(lines[11].starts_with("-1 ") && lines[11].ends_with(" -1"));
}

#[test]
fn test_save_ascii_grid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minimal.asc");

    let raster = minimal();
    raster.save_ascii_grid(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, raster.to_ascii_grid().unwrap());
}

#[test]
fn test_report_summary() {
    let report = minimal().report().to_string();

    assert!(report.starts_with("NIMROD file raw header fields listed by element number:\n"));
    assert!(report.contains("Validity Time:  12:00 on 20/06/2023\n"));
    assert!(report.contains("Easting range:  -500.0 - 2500.0 (at pixel steps of 1000.0)\n"));
    assert!(report.contains("Northing range: 4500.0 - 6500.0 (at pixel steps of 1000.0)\n"));
    assert!(report.ends_with("Image size: 2 rows x 3 cols\n"));
}

#[test]
fn test_report_element_groups() {
    let bytes = NimrodBuilder::minimal()
        .with_int(element::N_SPECIFIC_REALS, 2)
        .with_int(element::N_SPECIFIC_INTS, 0)
        .with_real(60, 12.5)
        .with_int(108, 42)
        .build();
    let report = RasterFile::from_bytes(&bytes).unwrap().report().to_string();

    assert!(report.contains("Data Specific (Real) header entries (2):\n  60 \t12.5\n  61 \t0.0\n"));
    assert!(report.contains("Data Specific (Integer) header entries (1):\n  108\t42\n"));
    assert!(report.contains("  16 \t2\n"));
    assert!(report.contains("  34 \t6000.0\n"));
    assert!(report.contains("  105 Units:           mm/h*32\n"));
    assert!(report.contains("  107 Title of field:  Rainfall rate Composite\n"));
    // Unused specific elements are not listed
    assert!(!report.contains("  62 \t"));
    assert!(!report.contains("  109\t"));
}

#[test]
fn test_report_after_clip_shows_new_extent() {
    let clipped = minimal().clip_to(500.0, 1500.0, 5500.0, 6500.0).unwrap();
    let report = clipped.report().to_string();

    assert!(report.contains("Easting range:  500.0 - 2500.0 (at pixel steps of 1000.0)\n"));
    assert!(report.contains("Image size: 2 rows x 2 cols\n"));
}
