//! Spreadsheet text extraction
//!
//! Every sheet of the workbook is read as text: non-empty cells in
//! row-major order, one per line. Formulas contribute their cached values;
//! formatting is ignored.

use crate::TextError;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Extract cell text from a workbook (.xlsx, .xls, .ods).
pub fn extract(path: &Path) -> Result<String, TextError> {
    let mut workbook = open_workbook_auto(path)?;

    let mut lines: Vec<String> = Vec::new();
    for name in workbook.sheet_names().to_vec() {
        let range = workbook.worksheet_range(&name)?;
        for row in range.rows() {
            for cell in row {
                if matches!(cell, Data::Empty) {
                    continue;
                }
                let text = cell.to_string();
                if text.trim().is_empty() {
                    continue;
                }
                lines.push(text);
            }
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

    const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="First" sheetId="1" r:id="rId1"/>
<sheet name="Second" sheetId="2" r:id="rId2"/>
</sheets>
</workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

    // Row 1 fills A and B; row 2 has an empty A cell and a value in C, so
    // the extracted lines expose row-major order with holes dropped.
    const SHEET1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1">
<c r="A1" t="inlineStr"><is><t>Договор</t></is></c>
<c r="B1" t="inlineStr"><is><t>45/ЦБ-2024</t></is></c>
</row>
<row r="2">
<c r="A2"/>
<c r="C2" t="inlineStr"><is><t>1 250 000</t></is></c>
</row>
</sheetData>
</worksheet>"#;

    const SHEET2: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
<row r="1"><c r="A1" t="inlineStr"><is><t>second sheet</t></is></c></row>
</sheetData>
</worksheet>"#;

    fn write_xlsx(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("book.xlsx");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", ROOT_RELS),
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
            ("xl/worksheets/sheet1.xml", SHEET1),
            ("xl/worksheets/sheet2.xml", SHEET2),
        ];
        for (name, contents) in parts {
            writer.start_file(name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    #[test]
    fn cells_come_out_row_major_across_all_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_xlsx(dir.path());

        assert_eq!(
            extract(&path).unwrap(),
            "Договор\n45/ЦБ-2024\n1 250 000\nsecond sheet"
        );
    }

    #[test]
    fn missing_workbook_is_an_error() {
        assert!(extract(Path::new("/nonexistent/book.xlsx")).is_err());
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");
        std::fs::write(&path, b"this is not a workbook").unwrap();

        assert!(extract(&path).is_err());
    }
}
