//! Builders for the ATS-like test documents shared by integration tests.

#![allow(dead_code)]

use lopdf::{Dictionary, Object, Stream, dictionary};

/// Content stream drawing a two-column table, one `re` per cell, with
/// the given `(left, right)` cell texts from the top row down.
pub fn table_content(rows: &[(&str, &str)]) -> String {
    let mut content = String::new();
    for (i, (left, right)) in rows.iter().enumerate() {
        let y = 700 - 20 * i as i32;
        content.push_str(&format!("50 {y} 200 20 re S 250 {y} 150 20 re S\n"));
        for (x, text) in [(55, left), (255, right)] {
            if !text.is_empty() {
                let y = y + 5;
                content.push_str(&format!("BT /F1 9 Tf {x} {y} Td ({text}) Tj ET\n"));
            }
        }
    }
    content
}

/// A PDF with one page per content stream.
pub fn pdf_with_pages(contents: &[String]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.as_bytes().to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => contents.len() as i64,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}
