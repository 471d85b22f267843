use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::risk::{classify, RiskTier, Thresholds};
use crate::store::{csv_quote, format_number, Dataset};

pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DATA_SHEET: &str = "StudentData";
const SUMMARY_SHEET: &str = "Summary";
const COLUMNS: [&str; 6] = ["StudentID", "Name", "Marks", "Attendance", "Logins", "Risk"];

// ARGB fills keyed by tier, matching the dashboard's palette.
const FILL_HIGH: &str = "FFFF9999";
const FILL_MEDIUM: &str = "FFFFD580";
const FILL_LOW: &str = "FF90EE90";

#[derive(Debug, Clone)]
pub struct Summary {
    pub total: usize,
    pub average_marks: f64,
    pub average_attendance: f64,
    pub average_logins: f64,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

pub fn summarize(dataset: &Dataset, thresholds: &Thresholds) -> Summary {
    let records = dataset.records();
    let n = records.len();
    let avg = |f: &dyn Fn(&crate::store::StudentRecord) -> f64| {
        if n == 0 {
            0.0
        } else {
            records.iter().map(f).sum::<f64>() / n as f64
        }
    };
    let mut high = 0;
    let mut medium = 0;
    let mut low = 0;
    for r in records {
        match classify(r.marks, r.attendance, thresholds) {
            RiskTier::High => high += 1,
            RiskTier::Medium => medium += 1,
            RiskTier::Low => low += 1,
        }
    }
    Summary {
        total: n,
        average_marks: avg(&|r| r.marks),
        average_attendance: avg(&|r| r.attendance),
        average_logins: avg(&|r| r.logins as f64),
        high,
        medium,
        low,
    }
}

/// Delimited snapshot including the derived Risk column. Re-importing it
/// through the store round-trips everything except Risk, which is recomputed.
pub fn csv_snapshot(dataset: &Dataset, thresholds: &Thresholds) -> String {
    let mut out = String::from("StudentID,Name,Marks,Attendance,Logins,Risk\n");
    for r in dataset.records() {
        let tier = classify(r.marks, r.attendance, thresholds);
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_quote(&r.student_id),
            csv_quote(&r.name),
            format_number(r.marks),
            format_number(r.attendance),
            r.logins,
            tier.label()
        ));
    }
    out
}

pub fn write_csv_snapshot(
    out_path: &Path,
    dataset: &Dataset,
    thresholds: &Thresholds,
) -> anyhow::Result<usize> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }
    std::fs::write(out_path, csv_snapshot(dataset, thresholds))
        .with_context(|| format!("failed to write {}", out_path.to_string_lossy()))?;
    Ok(dataset.len())
}

/// Spreadsheet snapshot: a data sheet with a frozen header row and per-row
/// risk-cell fills, plus a summary sheet with counts, averages and the tier
/// distribution. Built as a plain OPC zip; no sharedStrings table, all text
/// is inline.
pub fn write_xlsx_snapshot(
    out_path: &Path,
    dataset: &Dataset,
    thresholds: &Thresholds,
) -> anyhow::Result<usize> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create directory {}", parent.to_string_lossy())
            })?;
        }
    }
    let out_file = File::create(out_path)
        .with_context(|| format!("failed to create {}", out_path.to_string_lossy()))?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let entry = |zip: &mut ZipWriter<File>, name: &str, body: &str| -> anyhow::Result<()> {
        zip.start_file(name, opts)
            .with_context(|| format!("failed to start entry {}", name))?;
        zip.write_all(body.as_bytes())
            .with_context(|| format!("failed to write entry {}", name))?;
        Ok(())
    };

    entry(&mut zip, "[Content_Types].xml", &content_types_xml())?;
    entry(&mut zip, "_rels/.rels", &root_rels_xml())?;
    entry(&mut zip, "docProps/core.xml", &core_props_xml())?;
    entry(&mut zip, "xl/workbook.xml", &workbook_xml())?;
    entry(&mut zip, "xl/_rels/workbook.xml.rels", &workbook_rels_xml())?;
    entry(&mut zip, "xl/styles.xml", &styles_xml())?;
    entry(
        &mut zip,
        "xl/worksheets/sheet1.xml",
        &data_sheet_xml(dataset, thresholds),
    )?;
    entry(
        &mut zip,
        "xl/worksheets/sheet2.xml",
        &summary_sheet_xml(&summarize(dataset, thresholds)),
    )?;

    zip.finish().context("failed to finalize xlsx")?;
    Ok(dataset.len())
}

fn content_types_xml() -> String {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
        "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
        "<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>",
        "<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
        "<Override PartName=\"/xl/worksheets/sheet2.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
        "<Override PartName=\"/xl/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>",
        "<Override PartName=\"/docProps/core.xml\" ContentType=\"application/vnd.openxmlformats-package.core-properties+xml\"/>",
        "</Types>"
    )
    .to_string()
}

fn root_rels_xml() -> String {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>",
        "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>",
        "</Relationships>"
    )
    .to_string()
}

fn core_props_xml() -> String {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
            "<cp:coreProperties",
            " xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\"",
            " xmlns:dc=\"http://purl.org/dc/elements/1.1/\"",
            " xmlns:dcterms=\"http://purl.org/dc/terms/\"",
            " xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
            "<dc:creator>perfdashd {}</dc:creator>",
            "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>",
            "<dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>",
            "</cp:coreProperties>"
        ),
        env!("CARGO_PKG_VERSION"),
        now,
        now
    )
}

fn workbook_xml() -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
            "<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"",
            " xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">",
            "<sheets>",
            "<sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/>",
            "<sheet name=\"{}\" sheetId=\"2\" r:id=\"rId2\"/>",
            "</sheets>",
            "</workbook>"
        ),
        DATA_SHEET, SUMMARY_SHEET
    )
}

fn workbook_rels_xml() -> String {
    concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>",
        "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet2.xml\"/>",
        "<Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>",
        "</Relationships>"
    )
    .to_string()
}

// cellXfs: 0 default, 1 bold header, 2 high fill, 3 medium fill, 4 low fill.
fn styles_xml() -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
            "<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
            "<fonts count=\"2\">",
            "<font><sz val=\"11\"/><name val=\"Calibri\"/></font>",
            "<font><b/><sz val=\"11\"/><name val=\"Calibri\"/></font>",
            "</fonts>",
            "<fills count=\"5\">",
            "<fill><patternFill patternType=\"none\"/></fill>",
            "<fill><patternFill patternType=\"gray125\"/></fill>",
            "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"{high}\"/></patternFill></fill>",
            "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"{medium}\"/></patternFill></fill>",
            "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"{low}\"/></patternFill></fill>",
            "</fills>",
            "<borders count=\"1\"><border/></borders>",
            "<cellStyleXfs count=\"1\"><xf/></cellStyleXfs>",
            "<cellXfs count=\"5\">",
            "<xf xfId=\"0\"/>",
            "<xf xfId=\"0\" fontId=\"1\" applyFont=\"1\"/>",
            "<xf xfId=\"0\" fillId=\"2\" applyFill=\"1\"/>",
            "<xf xfId=\"0\" fillId=\"3\" applyFill=\"1\"/>",
            "<xf xfId=\"0\" fillId=\"4\" applyFill=\"1\"/>",
            "</cellXfs>",
            "</styleSheet>"
        ),
        high = FILL_HIGH,
        medium = FILL_MEDIUM,
        low = FILL_LOW
    )
}

fn risk_style(tier: RiskTier) -> u32 {
    match tier {
        RiskTier::High => 2,
        RiskTier::Medium => 3,
        RiskTier::Low => 4,
    }
}

fn col_letter(idx: usize) -> char {
    (b'A' + idx as u8) as char
}

fn text_cell(col: usize, row: usize, style: u32, text: &str) -> String {
    format!(
        "<c r=\"{}{}\" s=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
        col_letter(col),
        row,
        style,
        xml_escape(text)
    )
}

fn number_cell(col: usize, row: usize, value: &str) -> String {
    format!("<c r=\"{}{}\"><v>{}</v></c>", col_letter(col), row, value)
}

fn cols_xml(widths: &[f64]) -> String {
    let mut out = String::from("<cols>");
    for (i, w) in widths.iter().enumerate() {
        out.push_str(&format!(
            "<col min=\"{n}\" max=\"{n}\" width=\"{w}\" customWidth=\"1\"/>",
            n = i + 1,
            w = w
        ));
    }
    out.push_str("</cols>");
    out
}

fn data_sheet_xml(dataset: &Dataset, thresholds: &Thresholds) -> String {
    // Width rule from the dashboard: longest cell in the column plus two.
    let mut widths: Vec<f64> = COLUMNS.iter().map(|c| (c.len() + 2) as f64).collect();
    let mut body_rows: Vec<[String; 6]> = Vec::with_capacity(dataset.len());
    for r in dataset.records() {
        let tier = classify(r.marks, r.attendance, thresholds);
        let cells = [
            r.student_id.clone(),
            r.name.clone(),
            format_number(r.marks),
            format_number(r.attendance),
            r.logins.to_string(),
            tier.label().to_string(),
        ];
        for (i, c) in cells.iter().enumerate() {
            widths[i] = widths[i].max((c.chars().count() + 2) as f64);
        }
        body_rows.push(cells);
    }

    let mut sheet = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
        "<sheetViews><sheetView workbookViewId=\"0\">",
        "<pane ySplit=\"1\" topLeftCell=\"A2\" activePane=\"bottomLeft\" state=\"frozen\"/>",
        "</sheetView></sheetViews>",
    ));
    sheet.push_str(&cols_xml(&widths));
    sheet.push_str("<sheetData>");

    sheet.push_str("<row r=\"1\">");
    for (i, name) in COLUMNS.iter().enumerate() {
        sheet.push_str(&text_cell(i, 1, 1, name));
    }
    sheet.push_str("</row>");

    for (idx, (cells, r)) in body_rows.iter().zip(dataset.records()).enumerate() {
        let row = idx + 2;
        let tier = classify(r.marks, r.attendance, thresholds);
        sheet.push_str(&format!("<row r=\"{}\">", row));
        sheet.push_str(&text_cell(0, row, 0, &cells[0]));
        sheet.push_str(&text_cell(1, row, 0, &cells[1]));
        sheet.push_str(&number_cell(2, row, &cells[2]));
        sheet.push_str(&number_cell(3, row, &cells[3]));
        sheet.push_str(&number_cell(4, row, &cells[4]));
        sheet.push_str(&text_cell(5, row, risk_style(tier), &cells[5]));
        sheet.push_str("</row>");
    }

    sheet.push_str("</sheetData></worksheet>");
    sheet
}

fn summary_sheet_xml(summary: &Summary) -> String {
    let round2 = |v: f64| format!("{:.2}", v);
    // Metric table starts at row 2, tier counts at row 8, mirroring the
    // dashboard's summary layout.
    let metrics: [(&str, String); 4] = [
        ("Total Students", summary.total.to_string()),
        ("Average Marks", round2(summary.average_marks)),
        ("Average Attendance", round2(summary.average_attendance)),
        ("Average Logins", round2(summary.average_logins)),
    ];
    let tiers: [(&str, usize); 3] = [
        (RiskTier::High.label(), summary.high),
        (RiskTier::Medium.label(), summary.medium),
        (RiskTier::Low.label(), summary.low),
    ];

    let mut width_a = "Risk Category".len() + 2;
    for (label, _) in &metrics {
        width_a = width_a.max(label.len() + 2);
    }

    let mut sheet = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
        "<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
    ));
    sheet.push_str(&cols_xml(&[
        width_a as f64,
        ("Number of Students".len() + 2) as f64,
    ]));
    sheet.push_str("<sheetData>");

    sheet.push_str("<row r=\"2\">");
    sheet.push_str(&text_cell(0, 2, 1, "Metric"));
    sheet.push_str(&text_cell(1, 2, 1, "Value"));
    sheet.push_str("</row>");
    for (i, (label, value)) in metrics.iter().enumerate() {
        let row = 3 + i;
        sheet.push_str(&format!("<row r=\"{}\">", row));
        sheet.push_str(&text_cell(0, row, 0, label));
        sheet.push_str(&number_cell(1, row, value));
        sheet.push_str("</row>");
    }

    sheet.push_str("<row r=\"8\">");
    sheet.push_str(&text_cell(0, 8, 1, "Risk Category"));
    sheet.push_str(&text_cell(1, 8, 1, "Number of Students"));
    sheet.push_str("</row>");
    for (i, (label, count)) in tiers.iter().enumerate() {
        let row = 9 + i;
        sheet.push_str(&format!("<row r=\"{}\">", row));
        sheet.push_str(&text_cell(0, row, 0, label));
        sheet.push_str(&number_cell(1, row, &count.to_string()));
        sheet.push_str("</row>");
    }

    sheet.push_str("</sheetData></worksheet>");
    sheet
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
