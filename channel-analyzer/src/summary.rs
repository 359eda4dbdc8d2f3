use audience_core::{AnalysisRecord, PrimaryCategory};
use serde::Serialize;
use std::fmt;

/// Number of classified channels per primary category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub kids: usize,
    pub teen: usize,
    pub serious: usize,
    pub mixed: usize,
}

impl CategorySummary {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            *summary.slot(record.primary_category) += 1;
        }
        summary
    }

    fn slot(&mut self, category: PrimaryCategory) -> &mut usize {
        match category {
            PrimaryCategory::Kids => &mut self.kids,
            PrimaryCategory::Teen => &mut self.teen,
            PrimaryCategory::Serious => &mut self.serious,
            PrimaryCategory::Mixed => &mut self.mixed,
        }
    }

    pub fn count(&self, category: PrimaryCategory) -> usize {
        match category {
            PrimaryCategory::Kids => self.kids,
            PrimaryCategory::Teen => self.teen,
            PrimaryCategory::Serious => self.serious,
            PrimaryCategory::Mixed => self.mixed,
        }
    }

    pub fn total(&self) -> usize {
        self.kids + self.teen + self.serious + self.mixed
    }
}

impl fmt::Display for CategorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = PrimaryCategory::ALL
            .iter()
            .map(|category| format!("{}: {}", category, self.count(*category)))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audience_core::{CategoryScores, ChannelRecord, ScoreResult};

    fn record(primary: PrimaryCategory) -> AnalysisRecord {
        let score = ScoreResult {
            raw: CategoryScores::default(),
            percent: CategoryScores::default(),
            primary,
        };
        AnalysisRecord::new("https://youtu.be/x", &ChannelRecord::default(), &score)
    }

    #[test]
    fn test_counts_per_category() {
        let records = vec![
            record(PrimaryCategory::Kids),
            record(PrimaryCategory::Kids),
            record(PrimaryCategory::Serious),
            record(PrimaryCategory::Mixed),
        ];
        let summary = CategorySummary::from_records(&records);

        assert_eq!(summary.kids, 2);
        assert_eq!(summary.teen, 0);
        assert_eq!(summary.serious, 1);
        assert_eq!(summary.mixed, 1);
        assert_eq!(summary.total(), records.len());
        assert_eq!(summary.to_string(), "Kids: 2, Teen: 0, Serious: 1, Mixed: 1");
    }

    #[test]
    fn test_empty_summary() {
        let summary = CategorySummary::from_records(&[]);
        assert_eq!(summary, CategorySummary::default());
        assert_eq!(summary.total(), 0);
    }
}
