//! Tag-level comparison of two datasets
//!
//! Every tag present in either dataset lands in exactly one of four sets:
//! common, differing, unique to A, unique to B. Membership is decided by
//! presence, so an empty value in A and an absent tag in B is unique to A.

use crate::dataset::{open_dataset, Dataset};
use crate::dictionary::{render_value, trim_padding};
use crate::error::Result;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::Tag;
use dicom_object::mem::InMemElement;
use dicom_object::InMemDicomObject;
use log::info;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A tag present in both datasets with unequal values
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct TagDifference {
    #[cfg_attr(feature = "json", serde(serialize_with = "serialize_tag"))]
    pub tag: Tag,
    /// Rendered value in A
    pub left: String,
    /// Rendered value in B
    pub right: String,
}

/// Classification of every tag over two datasets
///
/// All four lists are in ascending (group, element) order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct TagClassification {
    #[cfg_attr(feature = "json", serde(serialize_with = "serialize_tags"))]
    pub common: Vec<Tag>,
    pub differing: Vec<TagDifference>,
    #[cfg_attr(feature = "json", serde(serialize_with = "serialize_tags"))]
    pub unique_to_a: Vec<Tag>,
    #[cfg_attr(feature = "json", serde(serialize_with = "serialize_tags"))]
    pub unique_to_b: Vec<Tag>,
}

impl TagClassification {
    /// Tags whose values differ, without rendered values
    pub fn differing_tags(&self) -> Vec<Tag> {
        self.differing.iter().map(|d| d.tag).collect()
    }

    /// Whether both datasets hold the same tags with the same values
    pub fn is_identical(&self) -> bool {
        self.differing.is_empty() && self.unique_to_a.is_empty() && self.unique_to_b.is_empty()
    }
}

#[cfg(feature = "json")]
fn serialize_tag<S: serde::Serializer>(tag: &Tag, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(tag)
}

#[cfg(feature = "json")]
fn serialize_tags<S: serde::Serializer>(
    tags: &[Tag],
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_seq(tags.iter().map(|t| t.to_string()))
}

/// Compares two datasets tag by tag
pub struct TagDiffEngine;

impl TagDiffEngine {
    /// Classifies every top-level tag of `a` and `b`
    ///
    /// Runs in time linear in the number of elements (plus the final sort
    /// for deterministic report order).
    pub fn classify<A, B>(a: &A, b: &B) -> TagClassification
    where
        A: Dataset + ?Sized,
        B: Dataset + ?Sized,
    {
        let right: HashMap<Tag, &InMemElement> = b
            .iter_elements()
            .into_iter()
            .map(|e| (e.header().tag, e))
            .collect();

        let mut out = TagClassification::default();
        let mut seen_in_a = Vec::new();

        for left in a.iter_elements() {
            let tag = left.header().tag;
            seen_in_a.push(tag);
            match right.get(&tag) {
                Some(other) if elements_equal(left, other) => out.common.push(tag),
                Some(other) => out.differing.push(TagDifference {
                    tag,
                    left: render_value(left),
                    right: render_value(other),
                }),
                None => out.unique_to_a.push(tag),
            }
        }

        let left_tags: HashSet<Tag> = seen_in_a.into_iter().collect();
        out.unique_to_b = right
            .keys()
            .filter(|t| !left_tags.contains(t))
            .copied()
            .collect();

        out.common.sort();
        out.differing.sort_by_key(|d| d.tag);
        out.unique_to_a.sort();
        out.unique_to_b.sort();
        out
    }

    /// Loads two files and classifies their tags
    ///
    /// # Errors
    ///
    /// Fails immediately if either file is missing or cannot be parsed.
    pub fn compare_files(a: &Path, b: &Path) -> Result<TagClassification> {
        info!("Comparing {} and {}", a.display(), b.display());
        let left = open_dataset(a)?;
        let right = open_dataset(b)?;
        Ok(Self::classify(&*left, &*right))
    }
}

/// Whether two elements at the same tag hold equal values
///
/// Multi-valued elements are compared position by position, so a
/// reordering is a difference.
pub fn elements_equal(a: &InMemElement, b: &InMemElement) -> bool {
    values_equal(a.value(), b.value())
}

fn values_equal(
    a: &Value<InMemDicomObject, dicom_object::mem::InMemFragment>,
    b: &Value<InMemDicomObject, dicom_object::mem::InMemFragment>,
) -> bool {
    match (a, b) {
        (Value::Primitive(x), Value::Primitive(y)) => primitives_equal(x, y),
        (Value::Sequence(x), Value::Sequence(y)) => {
            x.items().len() == y.items().len()
                && x.items()
                    .iter()
                    .zip(y.items())
                    .all(|(i, j)| TagDiffEngine::classify(i, j).is_identical())
        }
        (Value::PixelSequence(x), Value::PixelSequence(y)) => {
            x.offset_table() == y.offset_table() && x.fragments() == y.fragments()
        }
        _ => false,
    }
}

fn primitives_equal(a: &PrimitiveValue, b: &PrimitiveValue) -> bool {
    match (a, b) {
        (
            PrimitiveValue::Str(_) | PrimitiveValue::Strs(_),
            PrimitiveValue::Str(_) | PrimitiveValue::Strs(_),
        ) => {
            let x = a.to_multi_str();
            let y = b.to_multi_str();
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(i, j)| trim_padding(i) == trim_padding(j))
        }
        // bitwise, so NaN equals itself
        (PrimitiveValue::F32(x), PrimitiveValue::F32(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(i, j)| i.to_bits() == j.to_bits())
        }
        (PrimitiveValue::F64(x), PrimitiveValue::F64(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(i, j)| i.to_bits() == j.to_bits())
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testing::make_object;
    use crate::dictionary::tags::{
        IMAGE_TYPE, MODALITY, PATIENT_COMMENTS, PATIENT_ID, PATIENT_NAME, PIXEL_SPACING,
    };
    use dicom_core::value::DataSetSequence;
    use dicom_core::{DataElement, Tag, VR};

    const REFERENCED_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x1140);
    const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);

    fn strs(values: &[&str]) -> PrimitiveValue {
        PrimitiveValue::Strs(values.iter().map(|s| s.to_string()).collect())
    }

    fn reference(uid: &str) -> InMemDicomObject {
        let mut item = InMemDicomObject::new_empty();
        item.put(DataElement::new(
            REFERENCED_SOP_INSTANCE_UID,
            VR::UI,
            PrimitiveValue::from(uid),
        ));
        item
    }

    fn with_references(sop: &str, uids: &[&str]) -> InMemDicomObject {
        let mut obj = make_object(sop);
        let items: Vec<InMemDicomObject> = uids.iter().map(|u| reference(u)).collect();
        obj.put(DataElement::new(
            REFERENCED_IMAGE_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(items),
        ));
        obj
    }

    #[test]
    fn test_classify_identical_dataset() {
        let a = make_object("1.2.3");
        let result = TagDiffEngine::classify(&a, &a);
        assert_eq!(result.common, a.sorted_tags());
        assert!(result.differing.is_empty());
        assert!(result.unique_to_a.is_empty());
        assert!(result.unique_to_b.is_empty());
        assert!(result.is_identical());
    }

    #[test]
    fn test_classify_differing_and_unique() {
        let mut a = make_object("1.2.3");
        let mut b = make_object("1.2.4");
        a.put(DataElement::new(PATIENT_ID, VR::LO, PrimitiveValue::from("P1")));
        b.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("CT")));
        b.put(DataElement::new(PATIENT_COMMENTS, VR::LT, PrimitiveValue::from("none")));

        let result = TagDiffEngine::classify(&a, &b);
        assert_eq!(result.unique_to_a, vec![PATIENT_ID]);
        assert_eq!(result.unique_to_b, vec![PATIENT_COMMENTS]);
        assert_eq!(result.differing.len(), 2);
        // ascending tag order: SOPInstanceUID (0008,0018) before Modality (0008,0060)
        assert_eq!(result.differing[0].left, "1.2.3");
        assert_eq!(result.differing[0].right, "1.2.4");
        assert_eq!(result.differing[1].tag, MODALITY);
        assert!(result.common.contains(&PATIENT_NAME));
    }

    #[test]
    fn test_classify_is_symmetric() {
        let mut a = make_object("1.2.3");
        let mut b = make_object("1.2.4");
        a.put(DataElement::new(PATIENT_ID, VR::LO, PrimitiveValue::from("P1")));
        b.put(DataElement::new(PATIENT_COMMENTS, VR::LT, PrimitiveValue::from("x")));

        let ab = TagDiffEngine::classify(&a, &b);
        let ba = TagDiffEngine::classify(&b, &a);
        assert_eq!(ab.unique_to_a, ba.unique_to_b);
        assert_eq!(ab.unique_to_b, ba.unique_to_a);
        assert_eq!(ab.differing_tags(), ba.differing_tags());
        assert_eq!(ab.common, ba.common);
    }

    #[test]
    fn test_reordered_multi_value_differs() {
        let mut a = make_object("1.2.3");
        let mut b = make_object("1.2.3");
        a.put(DataElement::new(PIXEL_SPACING, VR::DS, strs(&["1", "2", "3"])));
        b.put(DataElement::new(PIXEL_SPACING, VR::DS, strs(&["3", "2", "1"])));

        let result = TagDiffEngine::classify(&a, &b);
        assert_eq!(result.differing_tags(), vec![PIXEL_SPACING]);
        assert!(!result.common.contains(&PIXEL_SPACING));
    }

    #[test]
    fn test_equal_multi_value_is_common() {
        let mut a = make_object("1.2.3");
        let mut b = make_object("1.2.3");
        a.put(DataElement::new(IMAGE_TYPE, VR::CS, strs(&["ORIGINAL", "PRIMARY"])));
        b.put(DataElement::new(IMAGE_TYPE, VR::CS, strs(&["ORIGINAL", "PRIMARY "])));

        let result = TagDiffEngine::classify(&a, &b);
        assert!(result.common.contains(&IMAGE_TYPE));
    }

    #[test]
    fn test_empty_value_versus_absent_is_unique() {
        let mut a = make_object("1.2.3");
        let b = make_object("1.2.3");
        a.put(DataElement::new(PATIENT_ID, VR::LO, PrimitiveValue::Empty));

        let result = TagDiffEngine::classify(&a, &b);
        assert_eq!(result.unique_to_a, vec![PATIENT_ID]);
        assert!(result.differing.is_empty());
    }

    #[test]
    fn test_numeric_values_compare_exactly() {
        let mut a = make_object("1.2.3");
        let mut b = make_object("1.2.3");
        let rows = dicom_core::Tag(0x0028, 0x0010);
        a.put(DataElement::new(rows, VR::US, PrimitiveValue::from(512_u16)));
        b.put(DataElement::new(rows, VR::US, PrimitiveValue::from(256_u16)));

        let result = TagDiffEngine::classify(&a, &b);
        assert_eq!(result.differing_tags(), vec![rows]);
        assert_eq!(result.differing[0].left, "512");
    }

    #[test]
    fn test_float_nan_equals_itself() {
        let mut a = make_object("1.2.3");
        let tag = Tag(0x0018, 0x9087);
        a.put(DataElement::new(tag, VR::FD, PrimitiveValue::F64(vec![f64::NAN].into())));
        a.put(DataElement::new(
            Tag(0x0009, 0x1010),
            VR::FL,
            PrimitiveValue::F32(vec![f32::NAN, 0.5].into()),
        ));

        let result = TagDiffEngine::classify(&a, &a);
        assert!(result.is_identical());
        assert_eq!(result.common, a.sorted_tags());
    }

    #[test]
    fn test_float_values_differ() {
        let mut a = make_object("1.2.3");
        let mut b = make_object("1.2.3");
        let tag = Tag(0x0018, 0x9087);
        a.put(DataElement::new(tag, VR::FD, PrimitiveValue::F64(vec![1.0].into())));
        b.put(DataElement::new(tag, VR::FD, PrimitiveValue::F64(vec![f64::NAN].into())));

        let result = TagDiffEngine::classify(&a, &b);
        assert_eq!(result.differing_tags(), vec![tag]);
    }

    #[test]
    fn test_equal_sequences_are_common() {
        let a = with_references("1.2.3", &["1.9.1", "1.9.2"]);
        let b = with_references("1.2.3", &["1.9.1", "1.9.2"]);

        let result = TagDiffEngine::classify(&a, &b);
        assert!(result.common.contains(&REFERENCED_IMAGE_SEQUENCE));
        assert!(result.is_identical());
    }

    #[test]
    fn test_reordered_sequence_items_differ() {
        let a = with_references("1.2.3", &["1.9.1", "1.9.2"]);
        let b = with_references("1.2.3", &["1.9.2", "1.9.1"]);

        let result = TagDiffEngine::classify(&a, &b);
        assert_eq!(result.differing_tags(), vec![REFERENCED_IMAGE_SEQUENCE]);
        assert_eq!(result.differing[0].left, "<sequence of 2 item(s)>");
    }

    #[test]
    fn test_sequence_item_count_differs() {
        let a = with_references("1.2.3", &["1.9.1", "1.9.2"]);
        let b = with_references("1.2.3", &["1.9.1"]);

        let result = TagDiffEngine::classify(&a, &b);
        assert_eq!(result.differing_tags(), vec![REFERENCED_IMAGE_SEQUENCE]);
    }
}
