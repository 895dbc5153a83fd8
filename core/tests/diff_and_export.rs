mod common;

use common::{ct_instance, with_string, write_instance, write_malformed, write_series};
use dcmtags_core::dictionary::{lookup_all, BODY_PART_EXAMINED, PATIENT_ID, STUDY_DESCRIPTION};
use dcmtags_core::{BatchConfig, DcmTagsError, DiffReport, TagDiffEngine, TagTable};
use dicom_core::VR;
use tempfile::TempDir;

#[test]
fn test_diff_classifies_every_tag_once() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("a.dcm");
    let b = temp_dir.path().join("b.dcm");
    write_instance(
        &a,
        with_string(
            ct_instance("1.2.3", "1.2.3.1", "1.2.3.1.1"),
            BODY_PART_EXAMINED,
            VR::CS,
            "HEAD",
        ),
    );
    write_instance(
        &b,
        with_string(
            with_string(
                ct_instance("1.2.3", "1.2.3.1", "1.2.3.1.2"),
                PATIENT_ID,
                VR::LO,
                "P-0002",
            ),
            STUDY_DESCRIPTION,
            VR::LO,
            "",
        ),
    );

    let c = TagDiffEngine::compare_files(&a, &b).unwrap();
    assert_eq!(c.unique_to_a, vec![BODY_PART_EXAMINED]);
    assert_eq!(c.unique_to_b, vec![STUDY_DESCRIPTION]);
    let differing = c.differing_tags();
    assert!(differing.contains(&PATIENT_ID));
    assert_eq!(differing.len(), 2);
    assert!(!c.common.contains(&PATIENT_ID));

    let swapped = TagDiffEngine::compare_files(&b, &a).unwrap();
    assert_eq!(swapped.unique_to_a, c.unique_to_b);
    assert_eq!(swapped.differing_tags(), differing);

    let text = format!("{}", DiffReport::new(&c, &a, &b).color(false));
    assert!(text.contains("Differing Tags (2):"));
    assert!(text.contains("  File 2: P-0002"));
}

#[test]
fn test_diff_fails_fast_on_bad_input() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("good.dcm");
    let bad = temp_dir.path().join("bad.dcm");
    write_instance(&good, ct_instance("1.2.3", "1.2.3.1", "1.2.3.1.1"));
    write_malformed(&bad);

    assert!(matches!(
        TagDiffEngine::compare_files(&good, &bad),
        Err(DcmTagsError::Parse { .. })
    ));
    assert!(matches!(
        TagDiffEngine::compare_files(&temp_dir.path().join("missing.dcm"), &good),
        Err(DcmTagsError::NotFound(_))
    ));
}

#[test]
fn test_report_dedups_a_series_to_one_row() {
    let temp_dir = TempDir::new().unwrap();
    write_series(temp_dir.path(), 4);
    write_malformed(&temp_dir.path().join("zz.dcm"));

    let tags = lookup_all(&["StudyInstanceUID", "SeriesInstanceUID", "Modality"]).unwrap();
    let table = TagTable::project(temp_dir.path(), &tags, true, &BatchConfig::default()).unwrap();

    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.skipped.len(), 1);

    let mut out = Vec::new();
    table.write_delimited(&mut out, b'\t').unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "StudyInstanceUID\tSeriesInstanceUID\tModality\n1.2.3.100\t1.2.3.100.1\tCT\n"
    );
}
