use std::io::Write;

use crate::application::{AppError, LedgerService, LedgerSnapshot};

/// What an export writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportType {
    /// Every transaction as CSV, most recent first
    Transactions,
    /// Per-category totals as CSV
    Categories,
    /// Totals plus transactions as a JSON snapshot
    Full,
}

impl ExportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportType::Transactions => "transactions",
            ExportType::Categories => "categories",
            ExportType::Full => "full",
        }
    }
}

impl std::str::FromStr for ExportType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transactions" => Ok(ExportType::Transactions),
            "categories" => Ok(ExportType::Categories),
            "full" => Ok(ExportType::Full),
            _ => Err(AppError::UnknownExportType(s.to_string())),
        }
    }
}

/// Exporter for dumping the current session to CSV or JSON.
/// There is no matching importer: nothing written here is read back.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Run the export for `kind`, returning the number of records written.
    pub fn export<W: Write>(&self, kind: ExportType, writer: W) -> Result<usize, AppError> {
        match kind {
            ExportType::Transactions => self.export_transactions_csv(writer),
            ExportType::Categories => self.export_categories_csv(writer),
            ExportType::Full => self
                .export_full_json(writer)
                .map(|snapshot| snapshot.transactions.len()),
        }
    }

    /// Export transactions to CSV format
    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "sequence", "date", "name", "category", "amount_cents"])?;

        let mut count = 0;
        for transaction in self.service.transactions() {
            csv_writer.write_record(&[
                transaction.id.to_string(),
                transaction.sequence.to_string(),
                transaction.date.format("%Y-%m-%d").to_string(),
                transaction.name.clone(),
                transaction.category.to_string(),
                transaction.amount.to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export category totals to CSV format
    pub fn export_categories_csv<W: Write>(&self, writer: W) -> Result<usize, AppError> {
        let report = self.service.category_report();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["category", "total_cents", "count", "percentage"])?;

        for summary in &report.categories {
            csv_writer.write_record(&[
                summary.category.to_string(),
                summary.total.to_string(),
                summary.count.to_string(),
                format!("{:.2}", summary.percentage),
            ])?;
        }

        csv_writer.flush()?;
        Ok(report.categories.len())
    }

    /// Export the full session as a JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot, AppError> {
        let snapshot = self.service.snapshot();

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_type_parse() {
        assert_eq!("full".parse::<ExportType>().unwrap(), ExportType::Full);
        assert_eq!(
            "Transactions".parse::<ExportType>().unwrap(),
            ExportType::Transactions
        );
        assert!(matches!(
            "balances".parse::<ExportType>(),
            Err(AppError::UnknownExportType(_))
        ));
    }

    #[test]
    fn test_export_transactions_csv() {
        let mut service = LedgerService::empty();
        service.add_transaction("Coffee, large", "4.5", "food").unwrap();

        let mut out = Vec::new();
        let count = Exporter::new(&service)
            .export_transactions_csv(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(count, 1);
        assert_eq!(lines[0], "id,sequence,date,name,category,amount_cents");
        assert!(lines[1].contains("\"Coffee, large\",Food,-450"));
    }

    #[test]
    fn test_export_categories_csv_lists_all_categories() {
        let service = LedgerService::empty();
        let mut out = Vec::new();
        let count = Exporter::new(&service)
            .export_categories_csv(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(count, 9);
        assert_eq!(text.lines().count(), 10);
        assert_eq!(
            text.lines().next(),
            Some("category,total_cents,count,percentage")
        );
        assert!(text.contains("Income,0,0,0.00"));
    }
}
