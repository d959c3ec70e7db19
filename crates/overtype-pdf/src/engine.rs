//! Instruction application.
//!
//! [`apply_instructions`] is a pure function from (original PDF bytes,
//! ordered instruction list) to new PDF bytes. Every invocation owns its
//! document, font cache, and buffers; nothing survives between calls.
//!
//! Failure semantics are asymmetric on purpose: a PDF that cannot be
//! parsed or saved fails the whole call, while an instruction that targets
//! a missing page or carries an undecodable image is skipped, counted in
//! the [`ApplyReport`], and logged at debug level. Callers surface the
//! report however they like; skips never become request failures.

use std::collections::{BTreeMap, HashMap};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use overtype_core::{text_width, FontSpec, MutationInstruction};

use crate::error::MutateError;
use crate::fonts::FontCache;
use crate::image::{decode_image, parse_data_url};

/// Horizontal mask padding, points.
const PAD_X: f64 = 12.0;

/// Vertical mask padding, points.
const PAD_Y: f64 = 4.0;

/// Mask width floor, points — covers form-field underlines that run past
/// the measured text.
const MIN_HIDE_WIDTH: f64 = 260.0;

/// Placement for images that arrive without coordinates.
const DEFAULT_IMAGE_X: f64 = 40.0;
const DEFAULT_IMAGE_Y: f64 = 40.0;

/// MediaBox lookups walk at most this many Parent links.
const MEDIA_BOX_DEPTH: usize = 10;

/// Fallback page height (US Letter) when no MediaBox resolves.
const LETTER_HEIGHT: f64 = 792.0;

/// Counts of what one invocation did and did not apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    /// Instructions whose page index matched no page.
    pub skipped_pages: usize,
    /// Image instructions whose payload could not be embedded.
    pub skipped_images: usize,
}

impl ApplyReport {
    pub fn skipped(&self) -> usize {
        self.skipped_pages + self.skipped_images
    }
}

/// The regenerated document plus the skip diagnostics.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub bytes: Vec<u8>,
    pub report: ApplyReport,
}

/// Apply `instructions` to `pdf_bytes`, strictly in input order.
///
/// An empty instruction list returns the input unchanged. Overlapping
/// paints composite last-wins because every instruction appends to the
/// page's content after everything painted before it.
pub fn apply_instructions(
    pdf_bytes: &[u8],
    instructions: &[MutationInstruction],
) -> Result<ApplyOutcome, MutateError> {
    if instructions.is_empty() {
        return Ok(ApplyOutcome { bytes: pdf_bytes.to_vec(), report: ApplyReport::default() });
    }

    let mut doc =
        Document::load_mem(pdf_bytes).map_err(|e| MutateError::Parse(e.to_string()))?;

    let pages: BTreeMap<u32, ObjectId> = doc.get_pages();
    let mut fonts = FontCache::new();
    let mut report = ApplyReport::default();
    let mut page_ops: BTreeMap<ObjectId, Vec<Operation>> = BTreeMap::new();
    let mut heights: HashMap<ObjectId, f64> = HashMap::new();
    let mut image_seq = 0usize;

    for instruction in instructions {
        let Some(&page_id) = pages.get(&instruction.page()) else {
            report.skipped_pages += 1;
            tracing::debug!(
                page = instruction.page(),
                total = pages.len(),
                "instruction targets a page the document does not have, skipping"
            );
            continue;
        };
        let page_height = *heights
            .entry(page_id)
            .or_insert_with(|| media_box_height(&doc, page_id));

        match instruction {
            MutationInstruction::Text {
                x,
                y_top,
                text,
                original_text,
                font_size,
                color,
                hide_original,
                original_width,
                original_height,
                font_family,
                is_bold,
                is_italic,
                ..
            } => {
                let size = font_size.unwrap_or(*original_height);
                let spec = FontSpec::classify(font_family.as_deref(), *is_bold, *is_italic);
                let font = fonts.resolve(&mut doc, spec);
                add_page_resource(&mut doc, page_id, "Font", &font.resource_name, font.object_id)?;

                let old_width = text_width(original_text, spec, size);
                let new_width = text_width(text, spec, size);
                // yTop is measured down from the page top; the box bottom
                // in PDF space doubles as the text baseline.
                let baseline = page_height - y_top - original_height;

                let ops = page_ops.entry(page_id).or_default();
                if *hide_original {
                    let hide_width =
                        original_width.max(old_width).max(new_width).max(MIN_HIDE_WIDTH)
                            + PAD_X * 2.0;
                    let hide_height = original_height + PAD_Y * 2.0;
                    ops.extend([
                        Operation::new("q", vec![]),
                        Operation::new("rg", vec![real(1.0), real(1.0), real(1.0)]),
                        Operation::new(
                            "re",
                            vec![
                                real(x - PAD_X),
                                real(baseline - PAD_Y),
                                real(hide_width),
                                real(hide_height),
                            ],
                        ),
                        Operation::new("f", vec![]),
                        Operation::new("Q", vec![]),
                    ]);
                }

                let (r, g, b) = color.clamped();
                ops.extend([
                    Operation::new("q", vec![]),
                    Operation::new("BT", vec![]),
                    Operation::new(
                        "Tf",
                        vec![Object::Name(font.resource_name.clone().into_bytes()), real(size)],
                    ),
                    Operation::new("rg", vec![real(r), real(g), real(b)]),
                    Operation::new("Td", vec![real(*x), real(baseline)]),
                    Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                    Operation::new("ET", vec![]),
                    Operation::new("Q", vec![]),
                ]);
                report.applied += 1;
            }

            MutationInstruction::Image { data_url, x, y, width, height, .. } => {
                let decoded = parse_data_url(data_url)
                    .and_then(|(mime, bytes)| decode_image(mime, &bytes));
                let decoded = match decoded {
                    Ok(decoded) => decoded,
                    Err(err) => {
                        report.skipped_images += 1;
                        tracing::debug!(error = %err, "skipping image instruction");
                        continue;
                    }
                };

                let mut dict = decoded.dict;
                if let Some(mask) = decoded.soft_mask {
                    let mask_id = doc.add_object(Object::Stream(Stream::new(mask.dict, mask.data)));
                    dict.set("SMask", Object::Reference(mask_id));
                }
                let xobject_id = doc.add_object(Object::Stream(Stream::new(dict, decoded.data)));

                image_seq += 1;
                let name = format!("OtIm{image_seq}");
                add_page_resource(&mut doc, page_id, "XObject", &name, xobject_id)?;

                let draw_width = width.unwrap_or(f64::from(decoded.width));
                let draw_height = height.unwrap_or(f64::from(decoded.height));
                let draw_x = x.unwrap_or(DEFAULT_IMAGE_X);
                // A requested y is top-anchored; convert to the PDF origin.
                let draw_y = match y {
                    Some(y_top) => page_height - y_top - draw_height,
                    None => DEFAULT_IMAGE_Y,
                };

                page_ops.entry(page_id).or_default().extend([
                    Operation::new("q", vec![]),
                    Operation::new(
                        "cm",
                        vec![
                            real(draw_width),
                            real(0.0),
                            real(0.0),
                            real(draw_height),
                            real(draw_x),
                            real(draw_y),
                        ],
                    ),
                    Operation::new("Do", vec![Object::Name(name.into_bytes())]),
                    Operation::new("Q", vec![]),
                ]);
                report.applied += 1;
            }
        }
    }

    for (page_id, operations) in page_ops {
        append_page_content(&mut doc, page_id, operations)?;
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|e| MutateError::Save(e.to_string()))?;

    Ok(ApplyOutcome { bytes, report })
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Height of the page's MediaBox, walking Parent links with a depth limit
/// and defaulting to US Letter for malformed trees.
fn media_box_height(doc: &Document, page_id: ObjectId) -> f64 {
    media_box(doc, page_id).map_or(LETTER_HEIGHT, |mb| mb[3] - mb[1])
}

fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f64; 4]> {
    let mut object = doc.get_object(page_id).ok()?;
    for _ in 0..MEDIA_BOX_DEPTH {
        let dict = object.as_dict().ok()?;
        if let Ok(entry) = dict.get(b"MediaBox") {
            let array = match entry {
                Object::Array(array) => array.clone(),
                Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?.clone(),
                _ => return None,
            };
            if array.len() != 4 {
                return None;
            }
            let mut values = [0.0f64; 4];
            for (i, item) in array.iter().enumerate() {
                values[i] = number(doc, item)?;
            }
            return Some(values);
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => {
                object = doc.get_object(*parent_id).ok()?;
            }
            _ => return None,
        }
    }
    None
}

fn number(doc: &Document, object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        Object::Reference(id) => number(doc, doc.get_object(*id).ok()?),
        _ => None,
    }
}

/// Register `name -> target` under the page's `Font` or `XObject`
/// resources, tolerating inline, indirect, and missing dictionaries.
fn add_page_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    name: &str,
    target: ObjectId,
) -> Result<(), MutateError> {
    enum Slot {
        Inline,
        Indirect(ObjectId),
    }

    let slot = {
        let dict = doc
            .get_object(page_id)
            .and_then(|object| object.as_dict())
            .map_err(|e| MutateError::Object(e.to_string()))?;
        match dict.get(b"Resources") {
            Ok(Object::Reference(id)) => Slot::Indirect(*id),
            _ => Slot::Inline,
        }
    };

    // The category dictionary may itself be indirect; defer that mutation
    // so we never hold two borrows of the document.
    let deferred = match slot {
        Slot::Inline => {
            let page = doc
                .get_object_mut(page_id)
                .and_then(|object| object.as_dict_mut())
                .map_err(|e| MutateError::Object(e.to_string()))?;
            if !matches!(page.get(b"Resources"), Ok(Object::Dictionary(_))) {
                page.set("Resources", Object::Dictionary(Dictionary::new()));
            }
            let Ok(Object::Dictionary(resources)) = page.get_mut(b"Resources") else {
                return Err(MutateError::Object("page Resources is not a dictionary".into()));
            };
            set_in_category(resources, category, name, target)
        }
        Slot::Indirect(resources_id) => {
            let resources = doc
                .get_object_mut(resources_id)
                .and_then(|object| object.as_dict_mut())
                .map_err(|e| MutateError::Object(e.to_string()))?;
            set_in_category(resources, category, name, target)
        }
    };

    if let Some(category_id) = deferred {
        let category_dict = doc
            .get_object_mut(category_id)
            .and_then(|object| object.as_dict_mut())
            .map_err(|e| MutateError::Object(e.to_string()))?;
        category_dict.set(name, Object::Reference(target));
    }
    Ok(())
}

/// Set the entry if the category dict is inline; return the id to mutate
/// when it is an indirect reference.
fn set_in_category(
    resources: &mut Dictionary,
    category: &str,
    name: &str,
    target: ObjectId,
) -> Option<ObjectId> {
    match resources.get_mut(category.as_bytes()) {
        Ok(Object::Dictionary(dict)) => {
            dict.set(name, Object::Reference(target));
            None
        }
        Ok(Object::Reference(id)) => Some(*id),
        _ => {
            let mut dict = Dictionary::new();
            dict.set(name, Object::Reference(target));
            resources.set(category, Object::Dictionary(dict));
            None
        }
    }
}

/// Append a new content stream after the page's existing content so our
/// paints composite over the original page.
fn append_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<(), MutateError> {
    let encoded = Content { operations }
        .encode()
        .map_err(|e| MutateError::Object(e.to_string()))?;
    let stream_id = doc.add_object(Object::Stream(Stream::new(Dictionary::new(), encoded)));

    let page = doc
        .get_object_mut(page_id)
        .and_then(|object| object.as_dict_mut())
        .map_err(|e| MutateError::Object(e.to_string()))?;

    match page.get(b"Contents").ok().cloned() {
        Some(Object::Reference(existing)) => {
            page.set(
                "Contents",
                Object::Array(vec![Object::Reference(existing), Object::Reference(stream_id)]),
            );
        }
        Some(Object::Array(mut array)) => {
            array.push(Object::Reference(stream_id));
            page.set("Contents", Object::Array(array));
        }
        _ => {
            page.set("Contents", Object::Reference(stream_id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use lopdf::dictionary;
    use overtype_core::RgbColor;

    /// Minimal one-page Letter document with a line of Helvetica text.
    fn create_test_pdf() -> Vec<u8> {
        create_test_pdf_with_pages(1)
    }

    pub(super) fn create_test_pdf_with_pages(count: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        });

        let mut kids = Vec::new();
        for i in 0..count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(Object::Reference(page_id));
        }

        let kids_len = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => kids_len,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn text_instruction(page: u32, text: &str) -> MutationInstruction {
        MutationInstruction::Text {
            page,
            x: 40.0,
            y_top: 80.0,
            text: text.to_string(),
            original_text: "original".to_string(),
            font_size: Some(18.0),
            color: RgbColor::BLACK,
            hide_original: true,
            original_width: 50.0,
            original_height: 12.0,
            font_family: None,
            is_bold: false,
            is_italic: false,
        }
    }

    fn page_operations(bytes: &[u8], page: u32) -> Vec<Operation> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = *doc.get_pages().get(&page).unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        Content::decode(&content).unwrap().operations
    }

    fn operand(op: &Operation, index: usize) -> f64 {
        match &op.operands[index] {
            Object::Real(r) => f64::from(*r),
            Object::Integer(i) => *i as f64,
            other => panic!("operand {index} of {} is not numeric: {other:?}", op.operator),
        }
    }

    #[test]
    fn empty_instruction_list_returns_input_unchanged() {
        let pdf = create_test_pdf();
        let outcome = apply_instructions(&pdf, &[]).unwrap();
        assert_eq!(outcome.bytes, pdf);
        assert_eq!(outcome.report, ApplyReport::default());
    }

    #[test]
    fn corrupt_pdf_fails_the_whole_request() {
        let result = apply_instructions(b"not a pdf", &[text_instruction(1, "x")]);
        assert!(matches!(result, Err(MutateError::Parse(_))));
    }

    #[test]
    fn text_instruction_masks_and_draws_at_the_baseline() {
        let pdf = create_test_pdf();
        let outcome = apply_instructions(&pdf, &[text_instruction(1, "Hello")]).unwrap();
        assert!(outcome.bytes.starts_with(b"%PDF-"));
        assert_eq!(outcome.report.applied, 1);

        let ops = page_operations(&outcome.bytes, 1);

        // The mask: white fill, positioned at (x - pad, baseline - pad).
        let rect = ops.iter().find(|op| op.operator == "re").expect("mask rectangle");
        assert!((operand(rect, 0) - 28.0).abs() < 0.01); // 40 - 12
        assert!((operand(rect, 1) - 696.0).abs() < 0.01); // 792 - 80 - 12 - 4
        // 260 floor + both paddings.
        assert!((operand(rect, 2) - 284.0).abs() < 0.01);
        assert!((operand(rect, 3) - 20.0).abs() < 0.01); // 12 + 8

        // The replacement text at baseline pageH - yTop - boxH = 700.
        let td = ops.iter().filter(|op| op.operator == "Td").last().expect("Td");
        assert!((operand(td, 0) - 40.0).abs() < 0.01);
        assert!((operand(td, 1) - 700.0).abs() < 0.01);

        let drawn: Vec<&Operation> = ops.iter().filter(|op| op.operator == "Tj").collect();
        assert!(drawn.iter().any(|op| {
            matches!(&op.operands[0], Object::String(s, _) if s == b"Hello")
        }));
    }

    #[test]
    fn hide_original_false_paints_no_mask() {
        let pdf = create_test_pdf();
        let mut instruction = text_instruction(1, "bare");
        if let MutationInstruction::Text { hide_original, .. } = &mut instruction {
            *hide_original = false;
        }
        let outcome = apply_instructions(&pdf, &[instruction]).unwrap();
        let ops = page_operations(&outcome.bytes, 1);
        assert!(!ops.iter().any(|op| op.operator == "re"));
    }

    #[test]
    fn mask_width_covers_long_replacement_text() {
        let pdf = create_test_pdf();
        let long = "W".repeat(60); // 60 * 944/1000 * 18pt, far past the 260 floor
        let outcome = apply_instructions(&pdf, &[text_instruction(1, &long)]).unwrap();
        let ops = page_operations(&outcome.bytes, 1);

        let rect = ops.iter().find(|op| op.operator == "re").unwrap();
        let expected = overtype_core::text_width(
            &long,
            FontSpec::classify(None, false, false),
            18.0,
        );
        assert!(operand(rect, 2) >= expected);
    }

    #[test]
    fn out_of_range_page_is_skipped_not_fatal() {
        // Scenario C: one instruction past the last page among two valid
        // ones still yields a PDF reflecting exactly the valid edits.
        let pdf = create_test_pdf();
        let outcome = apply_instructions(
            &pdf,
            &[
                text_instruction(1, "first"),
                text_instruction(99, "ghost"),
                text_instruction(1, "second"),
            ],
        )
        .unwrap();

        assert_eq!(outcome.report.applied, 2);
        assert_eq!(outcome.report.skipped_pages, 1);
        assert_eq!(outcome.report.skipped(), 1);

        let ops = page_operations(&outcome.bytes, 1);
        let texts: Vec<Vec<u8>> = ops
            .iter()
            .filter(|op| op.operator == "Tj")
            .map(|op| match &op.operands[0] {
                Object::String(s, _) => s.clone(),
                other => panic!("unexpected Tj operand {other:?}"),
            })
            .collect();
        assert!(texts.contains(&b"first".to_vec()));
        assert!(texts.contains(&b"second".to_vec()));
        assert!(!texts.contains(&b"ghost".to_vec()));
        // Input order is preserved within the page.
        let first_pos = texts.iter().position(|t| t == b"first").unwrap();
        let second_pos = texts.iter().position(|t| t == b"second").unwrap();
        assert!(first_pos < second_pos);
    }

    #[test]
    fn color_channels_are_clamped() {
        let pdf = create_test_pdf();
        let mut instruction = text_instruction(1, "tinted");
        if let MutationInstruction::Text { color, hide_original, .. } = &mut instruction {
            *color = RgbColor { r: 5.0, g: -1.0, b: 0.5 };
            *hide_original = false;
        }
        let outcome = apply_instructions(&pdf, &[instruction]).unwrap();
        let ops = page_operations(&outcome.bytes, 1);

        let rg = ops.iter().find(|op| op.operator == "rg").unwrap();
        assert!((operand(rg, 0) - 1.0).abs() < 1e-6);
        assert!((operand(rg, 1) - 0.0).abs() < 1e-6);
        assert!((operand(rg, 2) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn same_font_is_embedded_once_per_invocation() {
        let pdf = create_test_pdf();
        let outcome = apply_instructions(
            &pdf,
            &[text_instruction(1, "one"), text_instruction(1, "two")],
        )
        .unwrap();

        let doc = Document::load_mem(&outcome.bytes).unwrap();
        let embedded = doc
            .objects
            .values()
            .filter(|object| {
                object
                    .as_dict()
                    .ok()
                    .and_then(|d| d.get(b"BaseFont").ok())
                    .is_some_and(|name| name == &Object::Name(b"Helvetica".to_vec()))
            })
            .count();
        // The document's own F1 plus exactly one cached embed of ours.
        assert_eq!(embedded, 2);
    }

    #[test]
    fn font_size_falls_back_to_box_height() {
        let pdf = create_test_pdf();
        let mut instruction = text_instruction(1, "sized");
        if let MutationInstruction::Text { font_size, hide_original, .. } = &mut instruction {
            *font_size = None;
            *hide_original = false;
        }
        let outcome = apply_instructions(&pdf, &[instruction]).unwrap();
        let ops = page_operations(&outcome.bytes, 1);

        let tf = ops.iter().filter(|op| op.operator == "Tf").last().unwrap();
        assert!((operand(tf, 1) - 12.0).abs() < 0.01);
    }

    fn png_data_url() -> String {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            4,
            image::Rgb([255, 0, 0]),
        ));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        format!("data:image/png;base64,{}", BASE64.encode(buf.into_inner()))
    }

    #[test]
    fn image_instruction_embeds_an_xobject() {
        let pdf = create_test_pdf();
        let instruction = MutationInstruction::Image {
            page: 1,
            data_url: png_data_url(),
            x: Some(100.0),
            y: Some(200.0),
            width: Some(50.0),
            height: Some(40.0),
        };
        let outcome = apply_instructions(&pdf, &[instruction]).unwrap();
        assert_eq!(outcome.report.applied, 1);

        let ops = page_operations(&outcome.bytes, 1);
        let cm = ops.iter().find(|op| op.operator == "cm").expect("image placement");
        assert!((operand(cm, 0) - 50.0).abs() < 0.01); // width
        assert!((operand(cm, 3) - 40.0).abs() < 0.01); // height
        assert!((operand(cm, 4) - 100.0).abs() < 0.01); // x
        // Requested y is top-anchored: 792 - 200 - 40.
        assert!((operand(cm, 5) - 552.0).abs() < 0.01);

        assert!(ops.iter().any(|op| op.operator == "Do"));
    }

    #[test]
    fn image_without_geometry_uses_native_size_and_default_position() {
        let pdf = create_test_pdf();
        let instruction = MutationInstruction::Image {
            page: 1,
            data_url: png_data_url(),
            x: None,
            y: None,
            width: None,
            height: None,
        };
        let outcome = apply_instructions(&pdf, &[instruction]).unwrap();
        let ops = page_operations(&outcome.bytes, 1);

        let cm = ops.iter().find(|op| op.operator == "cm").unwrap();
        assert!((operand(cm, 0) - 4.0).abs() < 0.01); // native 4px
        assert!((operand(cm, 3) - 4.0).abs() < 0.01);
        assert!((operand(cm, 4) - 40.0).abs() < 0.01);
        assert!((operand(cm, 5) - 40.0).abs() < 0.01);
    }

    #[test]
    fn unparseable_image_payloads_are_skipped() {
        let pdf = create_test_pdf();
        let instructions = vec![
            MutationInstruction::Image {
                page: 1,
                data_url: "data:image/gif;base64,R0lGOD".to_string(),
                x: None,
                y: None,
                width: None,
                height: None,
            },
            MutationInstruction::Image {
                page: 1,
                data_url: "not a data url".to_string(),
                x: None,
                y: None,
                width: None,
                height: None,
            },
            text_instruction(1, "still applied"),
        ];
        let outcome = apply_instructions(&pdf, &instructions).unwrap();
        assert_eq!(outcome.report.skipped_images, 2);
        assert_eq!(outcome.report.applied, 1);

        let doc = Document::load_mem(&outcome.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn instructions_land_on_their_own_pages() {
        let pdf = create_test_pdf_with_pages(3);
        let outcome = apply_instructions(
            &pdf,
            &[text_instruction(2, "page two"), text_instruction(3, "page three")],
        )
        .unwrap();

        let page2_ops = page_operations(&outcome.bytes, 2);
        assert!(page2_ops.iter().any(|op| {
            op.operator == "Tj"
                && matches!(&op.operands[0], Object::String(s, _) if s == b"page two")
        }));

        let page1_ops = page_operations(&outcome.bytes, 1);
        assert!(!page1_ops.iter().any(|op| {
            op.operator == "Tj"
                && matches!(&op.operands[0], Object::String(s, _) if s == b"page two")
        }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use overtype_core::RgbColor;
    use proptest::prelude::*;

    fn arb_text_instruction() -> impl Strategy<Value = MutationInstruction> {
        (
            1u32..6,
            0.0f64..600.0,
            0.0f64..760.0,
            "[ -~]{0,30}",
            4.0f64..200.0,
            4.0f64..40.0,
            any::<bool>(),
        )
            .prop_map(|(page, x, y_top, text, width, height, hide)| {
                MutationInstruction::Text {
                    page,
                    x,
                    y_top,
                    text: text.clone(),
                    original_text: text,
                    font_size: None,
                    color: RgbColor::BLACK,
                    hide_original: hide,
                    original_width: width,
                    original_height: height,
                    font_family: None,
                    is_bold: false,
                    is_italic: false,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: whatever mix of valid and out-of-range pages the
        /// batch contains, the engine returns a loadable PDF and accounts
        /// for every instruction as either applied or skipped.
        #[test]
        fn every_instruction_is_applied_or_skipped(
            instructions in proptest::collection::vec(arb_text_instruction(), 0..8)
        ) {
            let pdf = tests::create_test_pdf_with_pages(2);
            let outcome = apply_instructions(&pdf, &instructions).unwrap();

            prop_assert_eq!(
                outcome.report.applied + outcome.report.skipped(),
                instructions.len()
            );
            let doc = Document::load_mem(&outcome.bytes).unwrap();
            prop_assert_eq!(doc.get_pages().len(), 2);
        }
    }
}
