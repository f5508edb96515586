//! Synthetic PDF construction shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as PdfDocument, Object, Stream};

/// One line of text: font resource name, size, x, baseline y, text.
pub type Line<'a> = (&'a str, i64, i64, i64, &'a str);

fn show(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Build a PDF whose pages hold the given lines. `F1` is Helvetica,
/// `F2` is Helvetica-Bold.
pub fn build_pdf(pages: &[Vec<Line>], media_box: bool) -> Vec<u8> {
    let pages: Vec<Vec<Operation>> = pages
        .iter()
        .map(|lines| {
            lines
                .iter()
                .flat_map(|(font, size, x, y, text)| show(font, *size, *x, *y, text))
                .collect()
        })
        .collect();
    build_pdf_from_operations(pages, media_box)
}

/// Integer operands for a content stream operator.
pub fn ints(values: &[i64]) -> Vec<Object> {
    values.iter().map(|&v| Object::Integer(v)).collect()
}

/// Build a PDF from raw content stream operations, one list per page.
pub fn build_pdf_from_operations(pages: Vec<Vec<Operation>>, media_box: bool) -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        };
        if media_box {
            page.set(
                "MediaBox",
                vec![0.into(), 0.into(), 595.into(), 842.into()],
            );
        }
        kids.push(doc.add_object(page).into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A small two-heading report with a title on page 0.
pub fn simple_report(title: &str) -> Vec<u8> {
    build_pdf(
        &[vec![
            ("F2", 22, 150, 760, title),
            ("F2", 14, 72, 700, "1. Introduction"),
            ("F1", 11, 72, 680, "This document describes the arrangements for the coming year in detail"),
            ("F1", 11, 72, 666, "and sets out the responsibilities of each office within the organisation"),
            ("F1", 11, 72, 620, "References"),
            ("F1", 11, 72, 600, "Annual statistics tables, published by the records office every autumn"),
        ]],
        true,
    )
}
