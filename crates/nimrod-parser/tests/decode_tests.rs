//! Decoding tests against synthetic record streams.

use nimrod_parser::header::element;
use nimrod_parser::{Header, NimrodError, RasterFile, RecordLocation};
use test_utils::{create_test_raster, NimrodBuilder};

#[test]
fn test_minimal_file_geometry() {
    let raster = RasterFile::from_bytes(&NimrodBuilder::minimal().build()).unwrap();

    assert_eq!(raster.rows(), 2);
    assert_eq!(raster.cols(), 3);
    assert_eq!(raster.x_right(), 2000.0);
    assert_eq!(raster.y_bottom(), 5000.0);
    assert_eq!(raster.x_pixel_size(), 1000.0);
    assert_eq!(raster.y_pixel_size(), 1000.0);
    assert_eq!(raster.data(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_derived_geometry_does_not_drift() {
    let builder = NimrodBuilder::new(7, 11)
        .with_geometry(1_199_500.0, 1000.0, -404_500.0, 1000.0)
        .with_data(create_test_raster(7, 11));
    let raster = RasterFile::from_bytes(&builder.build()).unwrap();

    let x_right = raster.x_left() + raster.x_pixel_size() * (raster.cols() as f64 - 1.0);
    let y_bottom = raster.y_top() - raster.y_pixel_size() * (raster.rows() as f64 - 1.0);
    assert_eq!(raster.x_right(), x_right);
    assert_eq!(raster.y_bottom(), y_bottom);
    assert_eq!(raster.x_right(), -394_500.0);
    assert_eq!(raster.y_bottom(), 1_193_500.0);
}

#[test]
fn test_header_decode_independent_of_framing() {
    let builder = NimrodBuilder::minimal().with_int(element::N_SPECIFIC_REALS, 3);
    let bare = Header::decode(&builder.header_block()).unwrap();
    let framed = RasterFile::from_bytes(&builder.build()).unwrap();

    assert_eq!(&bare, framed.header());
    assert!(bare
        .elements()
        .zip(framed.header().elements())
        .all(|(a, b)| a == b));
}

#[test]
fn test_wrong_header_start_length() {
    let bytes = NimrodBuilder::minimal().with_header_start_length(500).build();
    let err = RasterFile::from_bytes(&bytes).unwrap_err();

    match err {
        NimrodError::RecordLength {
            actual,
            expected,
            location,
        } => {
            assert_eq!(actual, 500);
            assert_eq!(expected, 512);
            assert_eq!(location, RecordLocation::HeaderStart);
        }
        other => panic!("expected RecordLength, got {other:?}"),
    }
}

#[test]
fn test_wrong_header_end_length() {
    let bytes = NimrodBuilder::minimal().with_header_end_length(0).build();
    let err = RasterFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        NimrodError::RecordLength {
            actual: 0,
            expected: 512,
            location: RecordLocation::HeaderEnd
        }
    ));
}

#[test]
fn test_wrong_data_lengths() {
    let bytes = NimrodBuilder::minimal().with_data_start_length(24).build();
    let err = RasterFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        NimrodError::RecordLength {
            actual: 24,
            expected: 12,
            location: RecordLocation::DataStart
        }
    ));

    let bytes = NimrodBuilder::minimal().with_data_end_length(10).build();
    let err = RasterFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        NimrodError::RecordLength {
            location: RecordLocation::DataEnd,
            ..
        }
    ));
}

#[test]
fn test_empty_stream() {
    let err = RasterFile::from_bytes(&[]).unwrap_err();
    assert!(matches!(err, NimrodError::HeaderRead(_)));
}

#[test]
fn test_truncated_header() {
    let bytes = NimrodBuilder::minimal().build_truncated(300);
    let err = RasterFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, NimrodError::HeaderRead(_)));
}

#[test]
fn test_truncated_payload() {
    // Header records intact, payload cut after two values
    let bytes = NimrodBuilder::minimal().build_truncated(4 + 512 + 4 + 4 + 4);
    let err = RasterFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, NimrodError::PayloadRead(_)));
}

#[test]
fn test_payload_shorter_than_dimensions() {
    // Framing agrees with the short payload, but not with rows * cols
    let bytes = NimrodBuilder::minimal().with_data(vec![1, 2, 3, 4]).build();
    let err = RasterFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        NimrodError::RecordLength {
            actual: 8,
            expected: 12,
            location: RecordLocation::DataStart
        }
    ));
}

#[test]
fn test_non_positive_dimensions() {
    let bytes = NimrodBuilder::new(0, 3).build();
    assert!(matches!(
        RasterFile::from_bytes(&bytes),
        Err(NimrodError::HeaderRead(_))
    ));

    let bytes = NimrodBuilder::new(2, -3).build();
    assert!(matches!(
        RasterFile::from_bytes(&bytes),
        Err(NimrodError::HeaderRead(_))
    ));
}

#[test]
fn test_extreme_values() {
    let data = vec![i16::MIN, -1, 0, i16::MAX];
    let bytes = NimrodBuilder::new(2, 2).with_data(data.clone()).build();
    let raster = RasterFile::from_bytes(&bytes).unwrap();
    assert_eq!(raster.data(), data.as_slice());
}

#[test]
fn test_character_and_time_fields() {
    let raster = RasterFile::from_bytes(&NimrodBuilder::minimal().build()).unwrap();
    let header = raster.header();

    assert_eq!(header.units(), b"mm/h*32 ");
    assert_eq!(&header.data_source()[..15], b"Radar composite");
    assert_eq!(header.title(), b"Rainfall rate Composite");
    assert_eq!(header.valid_time().to_string(), "12:00 on 20/06/2023");
    assert_eq!(header.missing_data_value(), -1.0);
}

#[test]
fn test_open_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = NimrodBuilder::minimal().write_to_dir(dir.path(), "minimal.dat");

    let raster = RasterFile::open(&path).unwrap();
    assert_eq!(raster.data(), &[1, 2, 3, 4, 5, 6]);
}
