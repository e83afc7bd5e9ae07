use crate::domain::model::Dataset;
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};
use zip::DateTime;

// An XLSX workbook is a ZIP container of XML parts. The dataset goes into a
// single inline-string worksheet; the remaining parts are fixed packaging.

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#
);

const WORKBOOK_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    r#"<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>"#,
    r#"</workbook>"#
);

const WORKBOOK_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>"#,
    r#"</Relationships>"#
);

/// Workbook name for a given run date, e.g. `Sample Data 07-03-2024.xlsx`.
pub fn artifact_file_name(date: NaiveDate) -> String {
    format!("Sample Data {}.xlsx", date.format("%d-%m-%Y"))
}

/// Serialize the dataset into XLSX bytes: one header row followed by one row
/// per record, every cell an inline string in dataset column order.
pub fn workbook_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("[Content_Types].xml", entry_options())?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", entry_options())?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("xl/workbook.xml", entry_options())?;
    zip.write_all(WORKBOOK_XML.as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", entry_options())?;
    zip.write_all(WORKBOOK_RELS_XML.as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", entry_options())?;
    zip.write_all(sheet_xml(dataset).as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

// Pinned timestamp so identical datasets produce identical bytes.
fn entry_options() -> FileOptions<'static, ()> {
    FileOptions::default().last_modified_time(DateTime::default())
}

fn sheet_xml(dataset: &Dataset) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );

    push_row(&mut xml, 1, dataset.columns.iter().map(String::as_str));
    for (index, record) in dataset.records.iter().enumerate() {
        let values = dataset
            .columns
            .iter()
            .map(|column| record.get(column).unwrap_or(""));
        push_row(&mut xml, index + 2, values);
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row<'a>(xml: &mut String, row: usize, cells: impl Iterator<Item = &'a str>) {
    xml.push_str(&format!(r#"<row r="{}">"#, row));
    for (column, value) in cells.enumerate() {
        xml.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_reference(column),
            row,
            escape_xml(value)
        ));
    }
    xml.push_str("</row>");
}

/// Spreadsheet column letters for a zero-based index: 0 → A, 25 → Z, 26 → AA.
fn column_reference(index: usize) -> String {
    let mut index = index;
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Record;
    use std::collections::HashMap;

    fn record(pairs: &[(&str, &str)]) -> Record {
        let mut data = HashMap::new();
        for (key, value) in pairs {
            data.insert(key.to_string(), value.to_string());
        }
        Record { data }
    }

    fn sample_dataset() -> Dataset {
        Dataset {
            columns: vec!["name".to_string(), "age".to_string()],
            records: vec![
                record(&[("name", "Alice"), ("age", "30")]),
                record(&[("name", "Bob"), ("age", "25")]),
            ],
        }
    }

    #[test]
    fn test_artifact_file_name_embeds_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(artifact_file_name(date), "Sample Data 07-03-2024.xlsx");
    }

    #[test]
    fn test_column_reference_wraps_after_z() {
        assert_eq!(column_reference(0), "A");
        assert_eq!(column_reference(1), "B");
        assert_eq!(column_reference(25), "Z");
        assert_eq!(column_reference(26), "AA");
        assert_eq!(column_reference(51), "AZ");
        assert_eq!(column_reference(52), "BA");
        assert_eq!(column_reference(701), "ZZ");
        assert_eq!(column_reference(702), "AAA");
    }

    #[test]
    fn test_escape_xml_covers_markup_characters() {
        assert_eq!(
            escape_xml(r#"<a & "b"> 'c'"#),
            "&lt;a &amp; &quot;b&quot;&gt; &apos;c&apos;"
        );
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_sheet_rows_follow_column_order() {
        let xml = sheet_xml(&sample_dataset());

        assert!(xml.contains(r#"<row r="1"><c r="A1" t="inlineStr"><is><t>name</t></is></c><c r="B1" t="inlineStr"><is><t>age</t></is></c></row>"#));
        assert!(xml.contains(r#"<row r="2"><c r="A2" t="inlineStr"><is><t>Alice</t></is></c><c r="B2" t="inlineStr"><is><t>30</t></is></c></row>"#));
        assert!(xml.contains(r#"<row r="3"><c r="A3" t="inlineStr"><is><t>Bob</t></is></c><c r="B3" t="inlineStr"><is><t>25</t></is></c></row>"#));
    }

    #[test]
    fn test_missing_cell_rendered_empty() {
        let dataset = Dataset {
            columns: vec!["name".to_string(), "age".to_string()],
            records: vec![record(&[("name", "Carol")])],
        };

        let xml = sheet_xml(&dataset);
        assert!(xml.contains(r#"<c r="B2" t="inlineStr"><is><t></t></is></c>"#));
    }

    #[test]
    fn test_workbook_contains_expected_parts() {
        let bytes = workbook_bytes(&sample_dataset()).unwrap();

        let cursor = Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        assert_eq!(archive.len(), 5);

        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "xl/_rels/workbook.xml.rels",
                "xl/workbook.xml",
                "xl/worksheets/sheet1.xml",
            ]
        );
    }

    #[test]
    fn test_workbook_sheet_readback() {
        let bytes = workbook_bytes(&sample_dataset()).unwrap();

        let cursor = Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();

        let sheet = {
            let mut file = archive.by_name("xl/worksheets/sheet1.xml").unwrap();
            let mut content = String::new();
            std::io::Read::read_to_string(&mut file, &mut content).unwrap();
            content
        };

        assert!(sheet.contains("<t>Alice</t>"));
        assert!(sheet.contains("<t>Bob</t>"));
        assert!(sheet.contains("<t>name</t>"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = workbook_bytes(&sample_dataset()).unwrap();
        let second = workbook_bytes(&sample_dataset()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_only_dataset_renders_single_row() {
        let dataset = Dataset {
            columns: vec!["name".to_string(), "age".to_string()],
            records: vec![],
        };

        let bytes = workbook_bytes(&dataset).unwrap();

        let cursor = Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        let sheet = {
            let mut file = archive.by_name("xl/worksheets/sheet1.xml").unwrap();
            let mut content = String::new();
            std::io::Read::read_to_string(&mut file, &mut content).unwrap();
            content
        };

        assert!(sheet.contains(r#"<row r="1">"#));
        assert!(!sheet.contains(r#"<row r="2">"#));
    }
}
