//! Integration tests for the svg-forge pipeline.
//!
//! These tests validate:
//! - PDF output exists and has valid format
//! - All supported elements produce output
//! - Build errors surface with the right kind
//! - Pagination works on real output
//! - The width probe agrees with final rendering

use std::fmt::Write;
use std::path::Path;

use svg_forge::config::PipelineConfig;
use svg_forge::elements::Element;
use svg_forge::fonts::FontStyle;
use svg_forge::pipeline::{generate_pdf, SvgPdf};
use svg_forge::templates;
use svg_forge::{Error, WidthProbe};

// =====================================================================
// Helper
// =====================================================================

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

fn write_png(path: &Path) {
    let img = image::RgbImage::from_pixel(8, 4, image::Rgb([200, 30, 30]));
    img.save(path).unwrap();
}

// =====================================================================
// PDF generation tests
// =====================================================================

#[test]
fn render_all_primitives() {
    let svg = r##"<svg width="595">
        <rect x="10" y="10" width="100" height="50" fill="#ff0000" stroke="#000"/>
        <rect x="10" y="70" width="100" height="50"/>
        <polygon points="200,10 250,60 150,60" fill="rgb(0, 128, 0)"/>
        <text x="300" y="40" font-size="14" text-anchor="middle">Centered</text>
        <text x="10" y="150" font-size="10" data-pdf-width="200" data-pdf-border="1">A longer paragraph that will wrap inside its box.</text>
    </svg>"##;
    let bytes = generate_pdf(svg, &PipelineConfig::default()).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn invoice_template_renders() {
    let bytes = generate_pdf(templates::invoice_template(), &PipelineConfig::default()).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn greyscale_output_is_valid() {
    let config = PipelineConfig::default().with_greyscale(true);
    let bytes = generate_pdf(templates::invoice_template(), &config).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn comments_and_styles_are_ignored() {
    let svg = r#"<svg width="595"><!-- <unknown/> --><style>rect { fill: red }</style>
        <text x="10" y="10" font-size="12">a&nbsp;b</text></svg>"#;
    let doc = SvgPdf::default().parse_document(svg).unwrap();
    assert_eq!(doc.elements.len(), 1);
    assert_eq!(doc.text_elements().next().unwrap().text, "a b");
}

#[test]
fn config_from_json_drives_pipeline() {
    let config = PipelineConfig::from_json(r#"{"title": "From JSON", "greyscale": true}"#).unwrap();
    let bytes = SvgPdf::new(config)
        .to_pdf_bytes(r##"<svg width="595"><rect x="0" y="0" width="10" height="10" fill="#00f"/></svg>"##)
        .unwrap();
    assert_valid_pdf(&bytes);
}

// =====================================================================
// Pagination tests
// =====================================================================

#[test]
fn short_document_fits_one_page() {
    let pdf = SvgPdf::default()
        .render_str(r#"<svg width="595"><rect x="0" y="700" width="10" height="10"/></svg>"#)
        .unwrap();
    assert_eq!(pdf.page_count(), 1);
}

#[test]
fn long_document_spans_pages() {
    let svg = SvgPdf::default();
    let pdf = svg.render_str(&templates::report_template()).unwrap();
    assert_eq!(pdf.page_count(), 3);
    assert_valid_pdf(&pdf.to_bytes().unwrap());
}

#[test]
fn wide_document_is_scaled_before_paginating() {
    // At twice the page width, y=1200 lands at about 600 pt: still page one.
    let svg = SvgPdf::default();
    let pdf = svg
        .render_str(r#"<svg width="1190"><rect x="0" y="1200" width="10" height="10"/></svg>"#)
        .unwrap();
    assert_eq!(pdf.page_count(), 1);
}

// =====================================================================
// Error taxonomy tests
// =====================================================================

#[test]
fn missing_attribute_names_element_and_attribute() {
    let err = generate_pdf(
        r#"<svg width="100"><rect y="1" width="2" height="3"/></svg>"#,
        &PipelineConfig::default(),
    )
    .unwrap_err();
    match err {
        Error::MissingAttribute { element, attribute } => {
            assert_eq!(element, "rect");
            assert_eq!(attribute, "x");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_document_width_fails() {
    assert!(matches!(
        generate_pdf("<svg></svg>", &PipelineConfig::default()),
        Err(Error::MissingAttribute { .. })
    ));
}

#[test]
fn unsupported_element_only_at_top_level() {
    let config = PipelineConfig::default();
    assert!(matches!(
        generate_pdf(r#"<svg width="100"><unknown/></svg>"#, &config),
        Err(Error::UnsupportedElement { tag }) if tag == "unknown"
    ));
    let bytes = generate_pdf(r#"<svg width="100"><switch><unknown/></switch></svg>"#, &config).unwrap();
    assert_valid_pdf(&bytes);
}

#[test]
fn invalid_color_is_reported() {
    assert!(matches!(
        generate_pdf(
            r#"<svg width="100"><rect x="0" y="0" width="1" height="1" fill="blue"/></svg>"#,
            &PipelineConfig::default()
        ),
        Err(Error::InvalidColor(raw)) if raw == "blue"
    ));
}

#[test]
fn malformed_markup_is_reported() {
    assert!(matches!(
        generate_pdf("<svg width=\"100\"><rect>", &PipelineConfig::default()),
        Err(Error::Markup(_))
    ));
}

#[test]
fn undefined_font_family_fails_render() {
    assert!(matches!(
        generate_pdf(
            r#"<svg width="100"><text x="0" y="9" font-size="9" font-family="Nope">a</text></svg>"#,
            &PipelineConfig::default()
        ),
        Err(Error::UndefinedFont { .. })
    ));
}

#[test]
fn font_without_directory_is_invalid_argument() {
    let config = PipelineConfig::default().with_font("Custom", "font.ttf", "");
    assert!(matches!(
        SvgPdf::new(config).create_renderer(595),
        Err(Error::InvalidArgument(_))
    ));
}

// =====================================================================
// Image tests
// =====================================================================

#[test]
fn image_without_base_path_is_configuration_error() {
    assert!(matches!(
        generate_pdf(
            r#"<svg width="100"><image href="missing.png"/></svg>"#,
            &PipelineConfig::default()
        ),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn image_missing_on_disk_fails_at_build() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default().with_image_path(dir.path());
    match SvgPdf::new(config).parse_document(r#"<svg width="100"><image href="missing.png"/></svg>"#) {
        Err(Error::AssetNotFound { path }) => assert_eq!(path, dir.path().join("missing.png")),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn image_is_embedded() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("logo.png"));
    let config = PipelineConfig::default().with_image_path(dir.path());
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="595">
        <image xlink:href="./logo.png" x="10" y="10" width="80" height="40"/>
        <image href="/logo.png" x="100" y="10"/>
    </svg>"#;
    let svg_pdf = SvgPdf::new(config);
    let doc = svg_pdf.parse_document(svg).unwrap();
    assert!(doc.elements.iter().all(|e| matches!(e, Element::Image(_))));
    let bytes = svg_pdf.render_document(&doc).unwrap().to_bytes().unwrap();
    assert_valid_pdf(&bytes);
}

// =====================================================================
// Width probe tests
// =====================================================================

#[test]
fn width_probe_matches_backend_metric() {
    let svg = SvgPdf::default();
    let mut probe = WidthProbe::new(&svg, 595);
    probe.start();
    write!(probe, r#"<text font-size="12" x="0" y="0">Hello</text>"#).unwrap();
    let probed = probe.width(true).unwrap();

    let mut pdf = svg.create_renderer(595).unwrap();
    let direct = pdf
        .text_width("Hello", 12.0, None, FontStyle::REGULAR)
        .unwrap();
    assert!(probed > 0.0);
    assert_eq!(probed, direct);
}

#[test]
fn width_probe_does_not_touch_real_renderer() {
    let svg = SvgPdf::default();
    let pdf = svg
        .render_str(r#"<svg width="595"><rect x="0" y="900" width="10" height="10"/></svg>"#)
        .unwrap();
    assert_eq!(pdf.page_count(), 2);

    let mut probe = WidthProbe::new(&svg, 595);
    probe.start();
    write!(probe, r#"<text font-size="12" x="0" y="5000">Far below</text>"#).unwrap();
    assert!(probe.width(true).unwrap() > 0.0);
    assert_eq!(pdf.page_count(), 2);
}
