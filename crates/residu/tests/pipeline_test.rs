use burn_ndarray::NdArray;
use dicom::core::{dicom_value, DataElement, PrimitiveValue, VR};
use dicom::dictionary_std::tags;
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use residu::PipelineError;
use residu_core::CoreError;
use residu_io::DecodeError;
use std::path::Path;

type Backend = NdArray<f32>;

/// Write a minimal single-frame 8-bit grayscale DICOM file.
fn write_scan(path: &Path, pixels: &[u8], rows: u16, columns: u16, position: Option<[f64; 3]>) {
    let mut obj = InMemDicomObject::new_empty();
    obj.put(DataElement::new(
        tags::PHOTOMETRIC_INTERPRETATION,
        VR::CS,
        PrimitiveValue::from("MONOCHROME2"),
    ));
    obj.put(DataElement::new(
        tags::SAMPLES_PER_PIXEL,
        VR::US,
        PrimitiveValue::from(1_u16),
    ));
    obj.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(rows)));
    obj.put(DataElement::new(
        tags::COLUMNS,
        VR::US,
        PrimitiveValue::from(columns),
    ));
    obj.put(DataElement::new(
        tags::BITS_ALLOCATED,
        VR::US,
        PrimitiveValue::from(8_u16),
    ));
    obj.put(DataElement::new(
        tags::BITS_STORED,
        VR::US,
        PrimitiveValue::from(8_u16),
    ));
    obj.put(DataElement::new(
        tags::HIGH_BIT,
        VR::US,
        PrimitiveValue::from(7_u16),
    ));
    obj.put(DataElement::new(
        tags::PIXEL_REPRESENTATION,
        VR::US,
        PrimitiveValue::from(0_u16),
    ));
    if let Some([x, y, z]) = position {
        obj.put(DataElement::new(
            tags::IMAGE_POSITION_PATIENT,
            VR::DS,
            dicom_value!(F64, [x, y, z]),
        ));
    }
    obj.put(DataElement::new(
        tags::PIXEL_DATA,
        VR::OB,
        PrimitiveValue::from(pixels.to_vec()),
    ));

    let meta = FileMetaTableBuilder::new()
        .transfer_syntax("1.2.840.10008.1.2.1")
        .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
        .media_storage_sop_instance_uid("1.2.826.0.1.3680043.10.1234.1");
    obj.with_meta(meta)
        .unwrap()
        .write_to_file(path)
        .unwrap();
}

fn run(dir: &Path) -> Result<(), PipelineError> {
    let device = Default::default();
    residu::run::<Backend>(dir, &device)
}

#[test]
fn empty_directory_aborts_with_incorrect_count() {
    let temp = tempfile::tempdir().unwrap();
    let err = run(temp.path()).unwrap_err();
    assert!(matches!(err, PipelineError::IncorrectImageCount(0)));
    assert!(!temp.path().join("residues").exists());
}

#[test]
fn single_file_aborts_with_incorrect_count() {
    let temp = tempfile::tempdir().unwrap();
    write_scan(&temp.path().join("a.dcm"), &[10; 64], 8, 8, Some([0.0, 0.0, 0.0]));

    let err = run(temp.path()).unwrap_err();
    assert!(matches!(err, PipelineError::IncorrectImageCount(1)));
    assert!(!temp.path().join("residues").exists());
}

#[test]
fn three_files_abort_with_incorrect_count_before_any_decode() {
    let temp = tempfile::tempdir().unwrap();
    write_scan(&temp.path().join("a.dcm"), &[10; 64], 8, 8, Some([0.0, 0.0, 0.0]));
    write_scan(&temp.path().join("b.dcm"), &[4; 64], 8, 8, Some([0.0, 0.0, 5.0]));
    // The third file is unreadable as DICOM; the count check must fire first
    std::fs::write(temp.path().join("c.dcm"), b"garbage").unwrap();

    let err = run(temp.path()).unwrap_err();
    assert!(matches!(err, PipelineError::IncorrectImageCount(3)));
    assert!(!temp.path().join("residues").exists());
}

#[test]
fn non_scan_files_are_ignored_by_discovery() {
    let temp = tempfile::tempdir().unwrap();
    write_scan(&temp.path().join("a.dcm"), &[10; 64], 8, 8, Some([0.0, 0.0, 0.0]));
    write_scan(&temp.path().join("b.dcm"), &[4; 64], 8, 8, Some([0.0, 0.0, 5.0]));
    std::fs::write(temp.path().join("notes.txt"), b"not a scan").unwrap();

    run(temp.path()).unwrap();
}

#[test]
fn duplicate_position_aborts_before_any_write() {
    let temp = tempfile::tempdir().unwrap();
    write_scan(&temp.path().join("a.dcm"), &[10; 64], 8, 8, Some([1.0, 2.0, 3.0]));
    write_scan(&temp.path().join("b.dcm"), &[4; 64], 8, 8, Some([1.0, 2.0, 3.0]));

    let err = run(temp.path()).unwrap_err();
    assert!(matches!(err, PipelineError::DuplicatePosition(_)));
    assert!(!temp.path().join("residues").exists());
}

#[test]
fn undecodable_file_aborts_without_output() {
    let temp = tempfile::tempdir().unwrap();
    write_scan(&temp.path().join("a.dcm"), &[10; 64], 8, 8, Some([0.0, 0.0, 0.0]));
    // Second scan lacks ImagePositionPatient
    write_scan(&temp.path().join("b.dcm"), &[4; 64], 8, 8, None);

    let err = run(temp.path()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Decode(DecodeError::MissingPosition { .. })
    ));
    assert!(!temp.path().join("residues").exists());
}

#[test]
fn mismatched_shapes_abort_with_shape_mismatch() {
    let temp = tempfile::tempdir().unwrap();
    write_scan(&temp.path().join("a.dcm"), &[10; 64], 8, 8, Some([0.0, 0.0, 0.0]));
    write_scan(&temp.path().join("b.dcm"), &[4; 16], 4, 4, Some([0.0, 0.0, 5.0]));

    let err = run(temp.path()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Residue(CoreError::ShapeMismatch { .. })
    ));
    assert!(!temp.path().join("residues").exists());
}

#[test]
fn valid_pair_produces_both_residual_images() {
    let temp = tempfile::tempdir().unwrap();
    write_scan(&temp.path().join("a.dcm"), &[10; 64], 8, 8, Some([0.0, 0.0, 0.0]));
    write_scan(&temp.path().join("b.dcm"), &[4; 64], 8, 8, Some([0.0, 0.0, 5.0]));

    run(temp.path()).unwrap();

    let out_dir = temp.path().join("residues");
    let raw = out_dir.join("unfiltered_residu.jpeg");
    let smoothed = out_dir.join("filtered_residu.jpeg");
    assert!(raw.exists());
    assert!(smoothed.exists());

    // Constant 10 minus constant 4 is a constant grid, which normalizes to
    // all-zero pixels in both outputs
    let raw = image::open(&raw).unwrap().into_luma8();
    assert_eq!(raw.dimensions(), (8, 8));
    assert!(raw.pixels().all(|p| p.0[0] == 0));
}

#[test]
fn rerun_overwrites_previous_output() {
    let temp = tempfile::tempdir().unwrap();
    write_scan(&temp.path().join("a.dcm"), &[10; 64], 8, 8, Some([0.0, 0.0, 0.0]));
    write_scan(&temp.path().join("b.dcm"), &[4; 64], 8, 8, Some([0.0, 0.0, 5.0]));

    run(temp.path()).unwrap();
    run(temp.path()).unwrap();

    assert!(temp.path().join("residues/unfiltered_residu.jpeg").exists());
    assert!(temp.path().join("residues/filtered_residu.jpeg").exists());
}
