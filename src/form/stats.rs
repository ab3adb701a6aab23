use serde::Serialize;

use crate::form::form_model::FormRecord;

/// Visit and submission figures for one form or a whole account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormStats {
    pub visits: u64,
    pub submissions: u64,
    /// Percentage of visits that ended in a submission
    pub submission_rate: f64,
    /// `100 - submission_rate`
    pub bounce_rate: f64,
}

impl FormStats {
    pub fn from_counts(visits: u64, submissions: u64) -> Self {
        let submission_rate = if visits > 0 {
            submissions as f64 / visits as f64 * 100.0
        } else {
            0.0
        };

        Self {
            visits,
            submissions,
            submission_rate,
            bounce_rate: 100.0 - submission_rate,
        }
    }

    pub fn for_form(form: &FormRecord) -> Self {
        Self::from_counts(form.visits, form.submissions)
    }

    /// Sums over every form before computing the rates.
    pub fn aggregate(forms: &[FormRecord]) -> Self {
        let visits = forms.iter().map(|f| f.visits).sum();
        let submissions = forms.iter().map(|f| f.submissions).sum();
        Self::from_counts(visits, submissions)
    }
}
