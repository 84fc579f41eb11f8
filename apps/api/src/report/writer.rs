use rust_xlsxwriter::{Format, Workbook};

use super::Report;
use crate::errors::AppError;

const SHEET_NAME: &str = "Scores";

pub fn write_xlsx(report: &Report) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(SHEET_NAME)
        .map_err(|e| AppError::Report(format!("Unable to name worksheet: {e}")))?;

    let header_format = Format::new().set_bold();
    for (col, header) in report.headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| AppError::Report(format!("Unable to write header row: {e}")))?;
    }

    for (i, row) in report.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet
            .write_string(r, 0, &row.name)
            .map_err(|e| AppError::Report(format!("Unable to write row {r}: {e}")))?;
        for (j, &score) in row.scores.iter().enumerate() {
            sheet
                .write_number(r, (j + 1) as u16, score as f64)
                .map_err(|e| AppError::Report(format!("Unable to write row {r}: {e}")))?;
        }
        sheet
            .write_number(r, (row.scores.len() + 1) as u16, row.total as f64)
            .map_err(|e| AppError::Report(format!("Unable to write row {r}: {e}")))?;
    }

    sheet.autofit();

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Report(format!("Unable to finalize workbook: {e}")))
}

pub fn write_csv(report: &Report) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(&report.headers)
        .map_err(|e| AppError::Report(format!("Unable to write header row: {e}")))?;

    for row in &report.rows {
        let mut record = Vec::with_capacity(row.scores.len() + 2);
        record.push(row.name.clone());
        record.extend(row.scores.iter().map(u8::to_string));
        record.push(row.total.to_string());
        wtr.write_record(&record)
            .map_err(|e| AppError::Report(format!("Unable to write row: {e}")))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Report(format!("Unable to flush CSV: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::LabelStyle;
    use crate::scoring::batch::CandidateScores;

    fn sample_report() -> Report {
        let criteria = vec![
            "Must have 5 years of Python experience.".to_string(),
            "AWS certification required.".to_string(),
        ];
        let candidates = vec![
            CandidateScores::new("a.pdf".into(), "Jane Doe".into(), vec![4, 2]),
            CandidateScores::new("b.docx".into(), "Doe, John".into(), vec![0, 5]),
        ];
        Report::build(&criteria, &candidates, LabelStyle::NounPhrase)
    }

    #[test]
    fn test_csv_layout() {
        let bytes = write_csv(&sample_report()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Candidate Name,Python Experience,AWS Certification,Total Score"
        );
        assert_eq!(lines[1], "Jane Doe,4,2,6");
        // names containing commas are quoted
        assert_eq!(lines[2], "\"Doe, John\",0,5,5");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_xlsx_is_a_zip_archive() {
        let bytes = write_xlsx(&sample_report()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_header_only_report() {
        let report = Report::build(&["Rust".to_string()], &[], LabelStyle::Sanitized);
        let text = String::from_utf8(write_csv(&report).unwrap()).unwrap();
        assert_eq!(text, "Candidate Name,Rust,Total Score\n");
        assert!(write_xlsx(&report).is_ok());
    }
}
