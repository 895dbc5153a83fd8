use crate::dataset::Dataset;
use dicom_core::value::{PrimitiveValue, Value};
use dicom_core::{Tag, VR};
use dicom_object::mem::InMemElement;
use std::str::FromStr;

/// Display bound for values rendered in reports
pub const DISPLAY_LIMIT: usize = 100;

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value<D: Dataset + ?Sized>(dcm: &D, tag: Tag) -> Option<String> {
    dcm.get_element(tag)
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim_end_matches(['\0', ' ']).trim_start().to_string())
}

/// Helper to get a string value, treating empty strings as absent
pub fn get_non_empty_string<D: Dataset + ?Sized>(dcm: &D, tag: Tag) -> Option<String> {
    get_string_value(dcm, tag).filter(|s| !s.is_empty())
}

/// Renders an element value as a single line of text
///
/// Multi-valued primitives are joined with a backslash, the DICOM value
/// separator. Sequences and encapsulated pixel data are summarised.
pub fn render_value(elem: &InMemElement) -> String {
    match elem.value() {
        Value::Primitive(PrimitiveValue::Empty) => String::new(),
        Value::Primitive(v) if v.multiplicity() > 1 => v
            .to_multi_str()
            .iter()
            .map(|s| trim_padding(s))
            .collect::<Vec<_>>()
            .join("\\"),
        Value::Primitive(v) => trim_padding(&v.to_str()).to_string(),
        Value::Sequence(seq) => format!("<sequence of {} item(s)>", seq.items().len()),
        Value::PixelSequence(seq) => {
            format!("<encapsulated pixel data, {} fragment(s)>", seq.fragments().len())
        }
    }
}

/// Truncates a rendered value to `limit` characters, ellipsis-terminated
pub fn truncate_value(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        value.to_string()
    } else {
        let head: String = value.chars().take(limit).collect();
        format!("{}...", head)
    }
}

/// Converts a literal replacement string into a primitive value for `vr`
///
/// Text VRs keep the literal verbatim, split into multiple values on `\`.
/// Numeric binary VRs parse each component. No conformance checking is
/// done beyond what is needed to encode the value.
///
/// # Errors
///
/// Returns an error message if a numeric component cannot be parsed or the
/// VR cannot carry a literal (sequences, tags, raw binary).
pub fn literal_to_primitive(vr: VR, literal: &str) -> Result<PrimitiveValue, String> {
    if literal.is_empty() {
        return Ok(PrimitiveValue::Empty);
    }
    let parts: Vec<&str> = literal.split('\\').collect();

    let value = match vr {
        VR::US => PrimitiveValue::U16(parse_all::<u16>(&parts)?.into()),
        VR::SS => PrimitiveValue::I16(parse_all::<i16>(&parts)?.into()),
        VR::UL => PrimitiveValue::U32(parse_all::<u32>(&parts)?.into()),
        VR::SL => PrimitiveValue::I32(parse_all::<i32>(&parts)?.into()),
        VR::UV => PrimitiveValue::U64(parse_all::<u64>(&parts)?.into()),
        VR::SV => PrimitiveValue::I64(parse_all::<i64>(&parts)?.into()),
        VR::FL | VR::OF => PrimitiveValue::F32(parse_all::<f32>(&parts)?.into()),
        VR::FD | VR::OD => PrimitiveValue::F64(parse_all::<f64>(&parts)?.into()),
        VR::SQ | VR::AT | VR::OB | VR::OW | VR::OL | VR::OV | VR::UN => {
            return Err(format!("VR {} cannot hold a literal text value", vr));
        }
        _ if parts.len() == 1 => PrimitiveValue::from(literal),
        _ => PrimitiveValue::Strs(parts.iter().map(|s| s.to_string()).collect()),
    };
    Ok(value)
}

fn parse_all<T: FromStr>(parts: &[&str]) -> Result<Vec<T>, String> {
    parts
        .iter()
        .map(|p| {
            p.trim()
                .parse::<T>()
                .map_err(|_| format!("'{}' is not a valid number", p))
        })
        .collect()
}

/// Strips DICOM trailing padding (space or NUL) from a string component
pub fn trim_padding(s: &str) -> &str {
    s.trim_end_matches(['\0', ' '])
}
