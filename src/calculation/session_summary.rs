//! Session realization aggregation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Period, RealizationStatus, ResolvedRealization, SessionCategory};

/// Approved session counts and income for one employee and period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Approved coding sessions.
    pub coding_sessions: u32,
    /// Sum of approved coding session rates.
    pub coding_income: Decimal,
    /// Approved non-coding sessions.
    pub non_coding_sessions: u32,
    /// Sum of approved non-coding session rates.
    pub non_coding_income: Decimal,
    /// Approved realizations skipped because their session no longer resolves.
    pub unresolved: u32,
}

impl SessionSummary {
    /// Coding plus non-coding income.
    pub fn total_income(&self) -> Decimal {
        self.coding_income + self.non_coding_income
    }
}

/// Summarizes approved realizations by their session's category.
///
/// Realizations outside the period or not yet approved are ignored. An
/// approved realization whose session no longer resolves is counted in
/// `unresolved` and otherwise skipped.
pub fn summarize_sessions(period: &Period, realizations: &[ResolvedRealization]) -> SessionSummary {
    let mut summary = SessionSummary::default();

    let approved = realizations.iter().filter(|r| {
        period.contains(r.realization.date) && r.realization.status == RealizationStatus::Approved
    });

    for resolved in approved {
        match &resolved.session {
            Some(session) => match session.category {
                SessionCategory::Coding => {
                    summary.coding_sessions += 1;
                    summary.coding_income += session.rate;
                }
                SessionCategory::NonCoding => {
                    summary.non_coding_sessions += 1;
                    summary.non_coding_income += session.rate;
                }
            },
            None => summary.unresolved += 1,
        }
    }

    summary
}
