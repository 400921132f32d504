//! Bulk upload workbook writer.
//!
//! One worksheet, a bold header row with every [`Column`], then one line per
//! record. Numeric fields are written as numbers so the platform does not
//! have to coerce text.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::config::WORKSHEET_NAME;
use crate::error::ExportResult;
use crate::models::{CellValue, Column, OutputRecord};

/// Render records into an in-memory `.xlsx` file.
pub fn records_to_xlsx(records: &[OutputRecord]) -> ExportResult<Vec<u8>> {
    let mut workbook = build_workbook(records)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write records to an `.xlsx` file on disk.
pub fn write_campaign_file(path: &Path, records: &[OutputRecord]) -> ExportResult<()> {
    let mut workbook = build_workbook(records)?;
    workbook.save(path)?;
    Ok(())
}

fn build_workbook(records: &[OutputRecord]) -> ExportResult<Workbook> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(WORKSHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, column) in Column::ALL.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, column.header(), &header)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.row().iter().enumerate() {
            let col = col as u16;
            match value {
                CellValue::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number(row, col, *number)?;
                }
                CellValue::Empty => {}
            }
        }
    }

    worksheet.autofit();

    let mut workbook = Workbook::new();
    workbook.push_worksheet(worksheet);
    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BiddingAdjustmentRecord, CampaignRecord, KeywordRecord};
    use std::io::{Cursor, Read};

    const HEADERS: [&str; 22] = [
        "Product",
        "Entity",
        "Operation",
        "Campaign ID",
        "Ad Group ID",
        "Ad ID",
        "Keyword ID",
        "Campaign Name",
        "Ad Group Name",
        "Start Date",
        "Targeting Type",
        "State",
        "Daily Budget",
        "Bidding Strategy",
        "Portfolio ID",
        "Ad Group Default Bid",
        "SKU",
        "Bid",
        "Keyword Text",
        "Match Type",
        "Placement",
        "Percentage",
    ];

    fn records() -> Vec<OutputRecord> {
        vec![
            OutputRecord::Campaign(CampaignRecord {
                campaign_id: "CAMPAIGN01".into(),
                campaign_name: "OW_B0ABC12345_lamp".into(),
                start_date: "20240101".into(),
                daily_budget: 10.0,
                bidding_strategy: "Dynamic bids - down only".into(),
                portfolio_id: None,
            }),
            OutputRecord::Keyword(KeywordRecord {
                campaign_id: "CAMPAIGN01".into(),
                ad_group_id: "ADGROUP001".into(),
                keyword_id: "KEYWORD001".into(),
                bid: 0.75,
                keyword_text: "lamp".into(),
                match_type: "exact".into(),
            }),
            OutputRecord::BiddingAdjustment(BiddingAdjustmentRecord {
                campaign_id: "CAMPAIGN01".into(),
                placement: "Placement Top".into(),
                percentage: Some(20.0),
            }),
        ]
    }

    /// Read one part of the `.xlsx` container as text.
    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    /// The `<c>` element for a cell reference such as `M2`.
    fn cell_xml<'a>(sheet: &'a str, reference: &str) -> Option<&'a str> {
        let start = sheet.find(&format!("<c r=\"{}\"", reference))?;
        let rest = &sheet[start..];
        let end = rest.find("</c>")? + "</c>".len();
        Some(&rest[..end])
    }

    fn cell_value(cell: &str) -> &str {
        let start = cell.find("<v>").unwrap() + "<v>".len();
        let end = cell.find("</v>").unwrap();
        &cell[start..end]
    }

    fn shared_strings(xml: &str) -> Vec<String> {
        xml.split("<si>")
            .skip(1)
            .map(|item| {
                let open = item.find("<t").unwrap();
                let start = open + item[open..].find('>').unwrap() + 1;
                let end = item.find("</t>").unwrap();
                item[start..end].to_string()
            })
            .collect()
    }

    fn column_letter(index: usize) -> char {
        (b'A' + index as u8) as char
    }

    #[test]
    fn test_buffer_is_zip_container() {
        let bytes = records_to_xlsx(&records()).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_single_named_worksheet() {
        let bytes = records_to_xlsx(&records()).unwrap();
        let workbook = part(&bytes, "xl/workbook.xml");

        assert!(workbook.contains("<sheet name=\"Sponsored Products Campaigns\""));
        assert_eq!(workbook.matches("<sheet ").count(), 1);
    }

    #[test]
    fn test_header_row_in_column_order() {
        let bytes = records_to_xlsx(&records()).unwrap();
        let sheet = part(&bytes, "xl/worksheets/sheet1.xml");
        let strings = shared_strings(&part(&bytes, "xl/sharedStrings.xml"));

        for (i, expected) in HEADERS.iter().enumerate() {
            let cell = cell_xml(&sheet, &format!("{}1", column_letter(i))).unwrap();
            assert!(cell.contains("t=\"s\""), "{}", expected);
            let index: usize = cell_value(cell).parse().unwrap();
            assert_eq!(strings[index], *expected);
        }
        assert!(cell_xml(&sheet, "W1").is_none());
    }

    #[test]
    fn test_numbers_text_and_blank_cells() {
        let bytes = records_to_xlsx(&records()).unwrap();
        let sheet = part(&bytes, "xl/worksheets/sheet1.xml");
        let strings = shared_strings(&part(&bytes, "xl/sharedStrings.xml"));

        // Daily Budget (M) on the campaign row
        let budget = cell_xml(&sheet, "M2").unwrap();
        assert!(!budget.contains("t=\"s\""));
        assert_eq!(cell_value(budget), "10");

        // Campaign ID (D) is text even though it is an identifier
        let campaign_id = cell_xml(&sheet, "D2").unwrap();
        assert!(campaign_id.contains("t=\"s\""));
        let index: usize = cell_value(campaign_id).parse().unwrap();
        assert_eq!(strings[index], "CAMPAIGN01");

        // Bid (R) on the keyword row
        let bid = cell_xml(&sheet, "R3").unwrap();
        assert!(!bid.contains("t=\"s\""));
        assert_eq!(cell_value(bid), "0.75");

        // Percentage (V) on the adjustment row
        assert_eq!(cell_value(cell_xml(&sheet, "V4").unwrap()), "20");

        // Portfolio ID, Ad Group ID and Bid are left blank where unset
        assert!(cell_xml(&sheet, "O2").is_none());
        assert!(cell_xml(&sheet, "E2").is_none());
        assert!(cell_xml(&sheet, "R2").is_none());
    }

    #[test]
    fn test_empty_record_list_still_has_header() {
        let bytes = records_to_xlsx(&[]).unwrap();
        let sheet = part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(cell_xml(&sheet, "A1").is_some());
        assert!(cell_xml(&sheet, "A2").is_none());
    }

    #[test]
    fn test_write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign.xlsx");
        write_campaign_file(&path, &records()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(part(&bytes, "xl/workbook.xml").contains("Sponsored Products Campaigns"));
    }
}
