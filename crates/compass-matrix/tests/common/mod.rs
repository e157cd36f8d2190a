#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::encryption::{decrypt_object, get_encryption_key};
use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

type FixtureResult<T> = Result<T, Box<dyn std::error::Error>>;

fn build_document(pages: &[Vec<&str>]) -> FixtureResult<(Document, ObjectId)> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids = Vec::new();

    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![16.into()]),
            Operation::new("Td", vec![50.into(), 780.into()]),
        ];

        for (index, line) in lines.iter().enumerate() {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            if index + 1 < lines.len() {
                operations.push(Operation::new("T*", vec![]));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
            "Count" => i64::try_from(page_ids.len())?,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    Ok((doc, catalog_id))
}

/// Writes a PDF with one text line per entry, one inner vector per page.
pub fn create_test_pdf(path: &Path, pages: &[Vec<&str>]) -> FixtureResult<()> {
    let (mut doc, _) = build_document(pages)?;
    doc.compress();
    doc.save(path)?;
    Ok(())
}

pub fn test_pdf_bytes(pages: &[Vec<&str>]) -> FixtureResult<Vec<u8>> {
    let (mut doc, _) = build_document(pages)?;
    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Writes a one-page PDF with an AcroForm holding text fields `company`,
/// `address.city` and `notes` (no value), plus a checkbox `agree`.
pub fn create_form_pdf(path: &Path) -> FixtureResult<()> {
    let (mut doc, catalog_id) = build_document(&[vec!["Application form"]])?;

    let company = doc.add_object(dictionary! {
        "FT" => "Tx",
        "T" => Object::string_literal("company"),
        "V" => Object::string_literal("Acme Corp"),
    });
    let address = doc.new_object_id();
    let city = doc.add_object(dictionary! {
        "T" => Object::string_literal("city"),
        "V" => Object::string_literal("Oslo"),
        "Parent" => address,
    });
    doc.objects.insert(
        address,
        Object::Dictionary(dictionary! {
            "FT" => "Tx",
            "T" => Object::string_literal("address"),
            "Kids" => vec![city.into()],
        }),
    );
    let agree = doc.add_object(dictionary! {
        "FT" => "Btn",
        "T" => Object::string_literal("agree"),
        "V" => "Yes",
    });
    let notes = doc.add_object(dictionary! {
        "FT" => "Tx",
        "T" => Object::string_literal("notes"),
    });

    let acro_form = doc.add_object(dictionary! {
        "Fields" => vec![company.into(), address.into(), agree.into(), notes.into()],
    });
    doc.get_object_mut(catalog_id)?
        .as_dict_mut()?
        .set("AcroForm", acro_form);

    doc.save(path)?;
    Ok(())
}

/// Writes a form PDF under 40-bit RC4 with an empty user password. Holds text
/// fields `company` and `totals.revenue`; the latter's value is an indirect
/// string object. Every field string is encrypted with its own object key.
pub fn create_encrypted_form_pdf(path: &Path) -> FixtureResult<()> {
    let (mut doc, catalog_id) = build_document(&[vec!["Application form"]])?;

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::String(vec![0x5A; 32], StringFormat::Hexadecimal),
        "P" => -4,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::String(b"compass-matrix-1".to_vec(), StringFormat::Hexadecimal),
            Object::String(b"compass-matrix-1".to_vec(), StringFormat::Hexadecimal),
        ],
    );

    // RC4 is symmetric, so decrypting plaintext yields the ciphertext.
    let key = get_encryption_key(&doc, "", false)?;
    let seal = |owner: ObjectId, text: &str| -> FixtureResult<Object> {
        let sealed = decrypt_object(&key, owner, &Object::string_literal(text))?;
        Ok(Object::String(sealed, StringFormat::Hexadecimal))
    };

    let company = doc.new_object_id();
    let company_field = dictionary! {
        "FT" => "Tx",
        "T" => seal(company, "company")?,
        "V" => seal(company, "Acme Corp")?,
    };
    doc.objects.insert(company, Object::Dictionary(company_field));

    let revenue_value = doc.new_object_id();
    let sealed_value = seal(revenue_value, "1,250.00")?;
    doc.objects.insert(revenue_value, sealed_value);

    let totals = doc.new_object_id();
    let revenue = doc.new_object_id();
    let revenue_field = dictionary! {
        "T" => seal(revenue, "revenue")?,
        "V" => revenue_value,
        "Parent" => totals,
    };
    doc.objects.insert(revenue, Object::Dictionary(revenue_field));
    let totals_field = dictionary! {
        "FT" => "Tx",
        "T" => seal(totals, "totals")?,
        "Kids" => vec![revenue.into()],
    };
    doc.objects.insert(totals, Object::Dictionary(totals_field));

    let acro_form = doc.add_object(dictionary! {
        "Fields" => vec![company.into(), totals.into()],
    });
    doc.get_object_mut(catalog_id)?
        .as_dict_mut()?
        .set("AcroForm", acro_form);

    doc.save(path)?;
    Ok(())
}

fn column_letter(index: usize) -> char {
    char::from(b'A' + u8::try_from(index).unwrap_or(25).min(25))
}

fn sheet_xml(rows: &[Vec<Option<&str>>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row_index, row) in rows.iter().enumerate() {
        let row_number = row_index + 1;
        xml.push_str(&format!(r#"<row r="{row_number}">"#));
        for (column_index, cell) in row.iter().enumerate() {
            let Some(text) = cell else {
                continue;
            };
            xml.push_str(&format!(
                r#"<c r="{}{row_number}" t="inlineStr"><is><t>{text}</t></is></c>"#,
                column_letter(column_index)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Writes a single-sheet `.xlsx`. `None` leaves the cell empty.
pub fn create_questions_xlsx(path: &Path, rows: &[Vec<Option<&str>>]) -> FixtureResult<()> {
    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
        ),
        ("xl/worksheets/sheet1.xml", sheet_xml(rows)),
    ];

    let mut writer = zip::ZipWriter::new(File::create(path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in parts {
        writer.start_file(name, options)?;
        writer.write_all(body.as_bytes())?;
    }
    writer.finish()?;
    Ok(())
}

/// A question sheet with an id column and a `Questions` column.
pub fn create_default_questions_xlsx(path: &Path, questions: &[&str]) -> FixtureResult<()> {
    let mut rows = vec![vec![Some("Id"), Some("Questions")]];
    rows.extend(questions.iter().map(|question| vec![Some("x"), Some(*question)]));
    create_questions_xlsx(path, &rows)
}
